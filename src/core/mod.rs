//! Core module containing fundamental types for pyprobe
//!
//! This module provides the foundational building blocks used throughout
//! the introspection engine: remote address handling, target architecture
//! information, and error types.

pub mod types;

// Re-export commonly used types for convenience
pub use types::{Error, ProcessId, RemoteAddress, Result, TargetArchitecture};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const AUTHORS: &str = env!("CARGO_PKG_AUTHORS");
