//! Per-process singleton cache
//!
//! Memoizes read-only remote values that are invariant for the lifetime of
//! one target process (the set tombstone address, resolved type-object
//! addresses). Owned by [`TargetProcess`](crate::process::TargetProcess)
//! and torn down with it when the process detaches.

use crate::core::types::{Error, Result};
use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Write-once, per-key memoization of typed values
#[derive(Default)]
pub struct SingletonCache {
    entries: Mutex<HashMap<String, Arc<dyn Any + Send + Sync>>>,
}

impl SingletonCache {
    /// Creates an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the memoized value for `key`, running `factory` exactly once
    /// on first access.
    ///
    /// The entry lock is held across the factory call, so concurrent
    /// first-time callers observe a single factory execution. The factory
    /// must not call back into the same cache (the lock is not reentrant);
    /// resolve any cached inputs before entering it. A failed factory
    /// inserts nothing; a later call may retry.
    pub fn get_or_try_init<T, F>(&self, key: &str, factory: F) -> Result<Arc<T>>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Result<T>,
    {
        let mut entries = self.entries.lock().unwrap();

        if let Some(existing) = entries.get(key) {
            return Arc::clone(existing).downcast::<T>().map_err(|_| {
                Error::Unsupported(format!("singleton {key} was created with a different type"))
            });
        }

        let value: Arc<dyn Any + Send + Sync> = Arc::new(factory()?);
        debug!(key, "singleton initialized");
        entries.insert(key.to_string(), Arc::clone(&value));

        value.downcast::<T>().map_err(|_| {
            Error::Unsupported(format!("singleton {key} was created with a different type"))
        })
    }

    /// Number of initialized singletons
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    /// True when no singleton has been initialized yet
    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }
}
