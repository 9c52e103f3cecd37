//! Target process management
//!
//! This module provides the per-process state the proxies hang off of:
//! the process handle itself, layout and symbol discovery, the singleton
//! cache, and the tracker that owns attached processes.

pub mod runtime_info;
pub mod singletons;
pub mod target;
pub mod tracker;

pub use runtime_info::{FieldKind, FieldLayout, RuntimeInfo, StaticRuntimeInfo, StructLayout};
pub use singletons::SingletonCache;
pub use target::TargetProcess;
pub use tracker::ProcessTracker;
