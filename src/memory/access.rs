//! Memory access service interface
//!
//! The host debugger owns the actual transport to the target process
//! (read-process-memory syscalls, a debug channel, a core dump). The
//! engine only ever consumes this one primitive.

use crate::core::types::{RemoteAddress, Result};
use std::sync::Arc;

/// Raw remote-memory read service provided by the host debugger.
///
/// Implementations must fill `buffer` entirely from `address` or fail with
/// [`Error::Unreadable`](crate::Error::Unreadable); partial reads are not
/// part of the contract. Reads of unchanged memory must be idempotent
/// within a single debugger-stop window.
pub trait MemoryAccess: Send + Sync {
    /// Reads `buffer.len()` bytes starting at `address`
    fn read_memory(&self, address: RemoteAddress, buffer: &mut [u8]) -> Result<()>;
}

impl<T: MemoryAccess + ?Sized> MemoryAccess for Arc<T> {
    fn read_memory(&self, address: RemoteAddress, buffer: &mut [u8]) -> Result<()> {
        (**self).read_memory(address, buffer)
    }
}
