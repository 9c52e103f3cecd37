//! Typed reads over the raw memory access service
//!
//! A [`MemoryReader`] is the scope of one logical operation: it decodes
//! scalars at the target's pointer width and dedupes identical raw reads
//! within the scope. Dropping the reader drops the scope; nothing is
//! cached across logical operations, since target memory can change
//! between debugger stops.

use crate::core::types::{Error, RemoteAddress, Result};
use crate::process::TargetProcess;
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::trace;

/// Scoped, typed memory reader
pub struct MemoryReader {
    process: Arc<TargetProcess>,
    scope: RefCell<HashMap<(u64, usize), Vec<u8>>>,
}

impl MemoryReader {
    /// Creates a fresh read scope over a target process
    pub fn new(process: Arc<TargetProcess>) -> Self {
        MemoryReader {
            process,
            scope: RefCell::new(HashMap::new()),
        }
    }

    /// The process this reader reads from
    pub fn process(&self) -> &Arc<TargetProcess> {
        &self.process
    }

    /// Reads raw bytes, deduping identical reads within this scope
    pub fn read_bytes(&self, address: RemoteAddress, size: usize) -> Result<Vec<u8>> {
        let max = self.process.config().memory.max_read_size;
        if size > max {
            return Err(Error::unreadable(
                address,
                size,
                format!("read exceeds configured max_read_size ({max})"),
            ));
        }

        let key = (address.as_u64(), size);
        if let Some(bytes) = self.scope.borrow().get(&key) {
            return Ok(bytes.clone());
        }

        let mut buffer = vec![0u8; size];
        self.process.memory().read_memory(address, &mut buffer)?;
        trace!(%address, size, "remote read");

        self.scope.borrow_mut().insert(key, buffer.clone());
        Ok(buffer)
    }

    /// Reads an unsigned 8-bit value
    pub fn read_u8(&self, address: RemoteAddress) -> Result<u8> {
        Ok(self.read_bytes(address, 1)?[0])
    }

    /// Reads a little-endian unsigned 16-bit value
    pub fn read_u16(&self, address: RemoteAddress) -> Result<u16> {
        let bytes = self.read_bytes(address, 2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    /// Reads a little-endian unsigned 32-bit value
    pub fn read_u32(&self, address: RemoteAddress) -> Result<u32> {
        let bytes = self.read_bytes(address, 4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Reads a little-endian unsigned 64-bit value
    pub fn read_u64(&self, address: RemoteAddress) -> Result<u64> {
        let bytes = self.read_bytes(address, 8)?;
        Ok(u64::from_le_bytes([
            bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
        ]))
    }

    /// Reads a pointer at the target's pointer width
    pub fn read_pointer(&self, address: RemoteAddress) -> Result<RemoteAddress> {
        let value = match self.process.architecture().pointer_size() {
            4 => u64::from(self.read_u32(address)?),
            _ => self.read_u64(address)?,
        };
        Ok(RemoteAddress::new(value))
    }

    /// Reads a `Py_ssize_t`: pointer-width signed, sign-extended to i64
    pub fn read_ssize(&self, address: RemoteAddress) -> Result<i64> {
        let value = match self.process.architecture().pointer_size() {
            4 => i64::from(self.read_u32(address)? as i32),
            _ => self.read_u64(address)? as i64,
        };
        Ok(value)
    }

    /// Reads a NUL-terminated byte string, bounded by `max_len`.
    ///
    /// Bytes are fetched one at a time so a string close to an unmapped
    /// page boundary still reads up to the terminator.
    pub fn read_string(&self, address: RemoteAddress, max_len: usize) -> Result<String> {
        let mut bytes = Vec::new();
        for i in 0..max_len {
            let byte = self.read_u8(address.offset(i as u64))?;
            if byte == 0 {
                break;
            }
            bytes.push(byte);
        }
        String::from_utf8(bytes)
            .map_err(|e| Error::unreadable(address, max_len, format!("invalid UTF-8: {e}")))
    }
}
