//! Memory introspection engine for live CPython processes
//!
//! Reconstructs interpreter values by reading the target's memory
//! directly; it never executes code in the target, so a process stopped
//! at a breakpoint (or one whose interpreter is wedged) can still be
//! inspected.

pub mod config;
pub mod core;
pub mod memory;
pub mod objects;
pub mod process;
pub mod proxy;

// Re-export main types from core module
pub use core::types::{Error, Offset, ProcessId, RemoteAddress, Result, TargetArchitecture};

// Re-export core directly for full access
pub use core::*;

pub use memory::{ArenaMemory, MemoryAccess, MemoryReader};
pub use objects::{
    render, resolve, ChildValue, EvaluationResult, PyObject, PySetObject, PyValue, ReprBuilder,
    ReprOptions, ResultCategory,
};
pub use process::{ProcessTracker, SingletonCache, TargetProcess};
pub use proxy::{ArrayProxy, PointerProxy, RemoteProxy, RemoteStruct, SSizeTProxy, StructProxy};
