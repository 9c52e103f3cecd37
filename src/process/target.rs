//! Target process handle
//!
//! A [`TargetProcess`] bundles everything the proxies need to interpret
//! one attached interpreter process: the raw memory access service, the
//! runtime discovery collaborator, the target architecture, and the two
//! pieces of per-process shared state: the layout-descriptor cache and
//! the singleton cache. Both caches die with the process handle.

use crate::config::Config;
use crate::core::types::{ProcessId, RemoteAddress, Result, TargetArchitecture};
use crate::memory::{MemoryAccess, MemoryReader};
use crate::process::runtime_info::{RuntimeInfo, StructLayout};
use crate::process::singletons::SingletonCache;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Handle to one attached target process
pub struct TargetProcess {
    pid: ProcessId,
    architecture: TargetArchitecture,
    memory: Arc<dyn MemoryAccess>,
    runtime: Arc<dyn RuntimeInfo>,
    config: Config,
    layouts: Mutex<HashMap<String, Arc<StructLayout>>>,
    singletons: SingletonCache,
}

impl TargetProcess {
    /// Creates a process handle with the default configuration
    pub fn new(
        pid: ProcessId,
        architecture: TargetArchitecture,
        memory: Arc<dyn MemoryAccess>,
        runtime: Arc<dyn RuntimeInfo>,
    ) -> Arc<Self> {
        Self::with_config(pid, architecture, memory, runtime, Config::default())
    }

    /// Creates a process handle with an explicit configuration
    pub fn with_config(
        pid: ProcessId,
        architecture: TargetArchitecture,
        memory: Arc<dyn MemoryAccess>,
        runtime: Arc<dyn RuntimeInfo>,
        config: Config,
    ) -> Arc<Self> {
        Arc::new(TargetProcess {
            pid,
            architecture,
            memory,
            runtime,
            config,
            layouts: Mutex::new(HashMap::new()),
            singletons: SingletonCache::new(),
        })
    }

    /// Target process id
    pub fn pid(&self) -> ProcessId {
        self.pid
    }

    /// Target architecture (determines pointer width)
    pub fn architecture(&self) -> TargetArchitecture {
        self.architecture
    }

    /// The raw memory access service
    pub fn memory(&self) -> &Arc<dyn MemoryAccess> {
        &self.memory
    }

    /// The runtime discovery collaborator
    pub fn runtime(&self) -> &Arc<dyn RuntimeInfo> {
        &self.runtime
    }

    /// Engine configuration for this process
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Opens a fresh read scope (one logical operation)
    pub fn reader(self: &Arc<Self>) -> MemoryReader {
        MemoryReader::new(Arc::clone(self))
    }

    /// Returns the layout descriptor for `struct_name`, resolving it
    /// through the runtime collaborator on first use and caching it for
    /// the process lifetime. First-writer-wins under concurrency.
    pub fn layout(&self, struct_name: &str) -> Result<Arc<StructLayout>> {
        let mut layouts = self.layouts.lock().unwrap();
        if let Some(layout) = layouts.get(struct_name) {
            return Ok(Arc::clone(layout));
        }

        let layout = self.runtime.layout_of(struct_name)?;
        debug!(pid = self.pid, struct_name, size = layout.size(), "layout resolved");
        layouts.insert(struct_name.to_string(), Arc::clone(&layout));
        Ok(layout)
    }

    /// Per-process singleton cache
    pub fn singletons(&self) -> &SingletonCache {
        &self.singletons
    }

    /// Resolves a static variable address, memoized per process
    pub fn static_address(&self, symbol: &str, module: &str) -> Result<RemoteAddress> {
        let key = format!("static.{module}.{symbol}");
        let address = self
            .singletons
            .get_or_try_init(&key, || self.runtime.resolve_static_variable(symbol, module))?;
        Ok(*address)
    }
}

impl fmt::Debug for TargetProcess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TargetProcess")
            .field("pid", &self.pid)
            .field("architecture", &self.architecture)
            .finish()
    }
}
