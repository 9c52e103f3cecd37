//! Core type definitions for pyprobe
//!
//! Fundamental types used throughout the engine: remote addresses, target
//! architecture, and the introspection error taxonomy.

mod address;
mod arch;
mod error;

// Re-export all public types
pub use address::RemoteAddress;
pub use arch::TargetArchitecture;
pub use error::{Error, Result};

// Common type aliases
pub type ProcessId = u32;
pub type Offset = usize;
