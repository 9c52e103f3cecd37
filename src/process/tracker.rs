//! Tracks attached target processes
//!
//! The tracker owns the per-process handles for the debugger session.
//! Detaching removes the handle; its layout and singleton caches are torn
//! down as a unit once the last proxy holding the handle is dropped.

use crate::core::types::ProcessId;
use crate::process::target::TargetProcess;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

/// Registry of attached processes keyed by pid
#[derive(Default)]
pub struct ProcessTracker {
    processes: Mutex<HashMap<ProcessId, Arc<TargetProcess>>>,
}

impl ProcessTracker {
    /// Creates an empty tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a process handle. If the pid is already tracked, the
    /// existing handle wins and is returned unchanged.
    pub fn attach(&self, process: Arc<TargetProcess>) -> Arc<TargetProcess> {
        let mut processes = self.processes.lock().unwrap();
        let entry = processes
            .entry(process.pid())
            .or_insert_with(|| {
                info!(pid = process.pid(), "process attached");
                process
            });
        Arc::clone(entry)
    }

    /// Returns the handle for a tracked pid
    pub fn get(&self, pid: ProcessId) -> Option<Arc<TargetProcess>> {
        self.processes.lock().unwrap().get(&pid).cloned()
    }

    /// Removes a process from the tracked set and returns its handle.
    /// The per-process caches are dropped with the last outstanding clone.
    pub fn detach(&self, pid: ProcessId) -> Option<Arc<TargetProcess>> {
        let removed = self.processes.lock().unwrap().remove(&pid);
        if removed.is_some() {
            debug!(pid, "process detached");
        }
        removed
    }

    /// Pids currently tracked
    pub fn pids(&self) -> Vec<ProcessId> {
        self.processes.lock().unwrap().keys().copied().collect()
    }

    /// Number of tracked processes
    pub fn len(&self) -> usize {
        self.processes.lock().unwrap().len()
    }

    /// True when no process is tracked
    pub fn is_empty(&self) -> bool {
        self.processes.lock().unwrap().is_empty()
    }
}
