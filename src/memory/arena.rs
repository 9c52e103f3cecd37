//! In-memory arena backing store
//!
//! A fake "target process" for tests and benches: a map of independently
//! mapped segments addressed by the same `RemoteAddress` space the real
//! engine uses. Anything outside a mapped segment reads as unreadable,
//! which makes corrupt-slot and unmapped-page scenarios trivial to stage.

use crate::core::types::{Error, RemoteAddress, Result};
use crate::memory::access::MemoryAccess;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Segment-map memory with a read counter
pub struct ArenaMemory {
    segments: Mutex<BTreeMap<u64, Vec<u8>>>,
    reads: AtomicUsize,
}

impl ArenaMemory {
    /// Creates an empty arena
    pub fn new() -> Self {
        ArenaMemory {
            segments: Mutex::new(BTreeMap::new()),
            reads: AtomicUsize::new(0),
        }
    }

    /// Maps a segment of bytes at `base`. Later mappings at the same base
    /// replace earlier ones.
    pub fn map(&self, base: RemoteAddress, data: Vec<u8>) {
        self.segments.lock().unwrap().insert(base.as_u64(), data);
    }

    /// Removes the segment mapped at `base`, turning its range unreadable
    pub fn unmap(&self, base: RemoteAddress) {
        self.segments.lock().unwrap().remove(&base.as_u64());
    }

    /// Overwrites bytes inside an existing segment
    pub fn patch(&self, address: RemoteAddress, data: &[u8]) -> Result<()> {
        let mut segments = self.segments.lock().unwrap();
        let addr = address.as_u64();
        for (&base, bytes) in segments.iter_mut() {
            let end = base + bytes.len() as u64;
            if addr >= base && addr + data.len() as u64 <= end {
                let offset = (addr - base) as usize;
                bytes[offset..offset + data.len()].copy_from_slice(data);
                return Ok(());
            }
        }
        Err(Error::unreadable(address, data.len(), "not mapped"))
    }

    /// Writes a little-endian u64 into an existing segment
    pub fn patch_u64(&self, address: RemoteAddress, value: u64) -> Result<()> {
        self.patch(address, &value.to_le_bytes())
    }

    /// Number of raw reads served so far
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl Default for ArenaMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryAccess for ArenaMemory {
    fn read_memory(&self, address: RemoteAddress, buffer: &mut [u8]) -> Result<()> {
        self.reads.fetch_add(1, Ordering::SeqCst);

        let segments = self.segments.lock().unwrap();
        let addr = address.as_u64();
        // The request must be fully contained in one segment; ranges that
        // straddle segment boundaries count as unmapped.
        for (&base, bytes) in segments.range(..=addr).rev().take(1) {
            let end = base + bytes.len() as u64;
            if addr + buffer.len() as u64 <= end {
                let offset = (addr - base) as usize;
                buffer.copy_from_slice(&bytes[offset..offset + buffer.len()]);
                return Ok(());
            }
        }
        Err(Error::unreadable(address, buffer.len(), "not mapped"))
    }
}
