//! Remote memory access for the introspection engine
//!
//! This module provides the read side of the engine:
//! - The [`MemoryAccess`] trait the host debugger implements
//! - [`MemoryReader`], a scoped typed reader built on that primitive
//! - [`ArenaMemory`], an in-memory backing store for tests and benches

pub mod access;
pub mod arena;
pub mod reader;

pub use access::MemoryAccess;
pub use arena::ArenaMemory;
pub use reader::MemoryReader;
