//! Typed pointer proxy

use crate::core::types::{Error, RemoteAddress, Result};
use crate::memory::MemoryReader;
use crate::process::TargetProcess;
use crate::proxy::RemoteProxy;
use std::marker::PhantomData;
use std::sync::Arc;

/// A remote pointer slot typed as "points to a `T`".
///
/// The proxy addresses the *slot*, not the pointee; equality is
/// slot-address based. Reading yields the pointee address, which is
/// wrapped into a `T` proxy without validating that it is readable:
/// debugger UIs must be able to hold proxies over partially-corrupt
/// structures and fail only at the point of an actual read.
pub struct PointerProxy<T> {
    process: Arc<TargetProcess>,
    slot: RemoteAddress,
    _pointee: PhantomData<fn() -> T>,
}

impl<T> PointerProxy<T> {
    pub(crate) fn new(process: Arc<TargetProcess>, slot: RemoteAddress) -> Self {
        PointerProxy {
            process,
            slot,
            _pointee: PhantomData,
        }
    }

    /// Address of the pointer slot itself
    pub fn slot(&self) -> RemoteAddress {
        self.slot
    }

    /// Reads the stored pointee address; fails only if the slot itself is
    /// unreadable
    pub fn read_address(&self) -> Result<RemoteAddress> {
        self.read_address_in(&self.process.reader())
    }

    /// [`Self::read_address`] inside an existing scope
    pub fn read_address_in(&self, reader: &MemoryReader) -> Result<RemoteAddress> {
        reader.read_pointer(self.slot)
    }
}

impl<T: RemoteProxy> PointerProxy<T> {
    /// Reads the pointer; `Ok(None)` for the null sentinel, otherwise a
    /// `T` proxy bound at the pointee address
    pub fn try_read(&self) -> Result<Option<T>> {
        self.try_read_in(&self.process.reader())
    }

    /// [`Self::try_read`] inside an existing scope
    pub fn try_read_in(&self, reader: &MemoryReader) -> Result<Option<T>> {
        let address = self.read_address_in(reader)?;
        if address.is_null() {
            return Ok(None);
        }
        T::bind(Arc::clone(&self.process), address).map(Some)
    }

    /// Like [`Self::try_read`], but null fails hard with
    /// [`Error::NullPointer`]
    pub fn deref(&self) -> Result<T> {
        self.deref_in(&self.process.reader())
    }

    /// [`Self::deref`] inside an existing scope
    pub fn deref_in(&self, reader: &MemoryReader) -> Result<T> {
        self.try_read_in(reader)?
            .ok_or_else(|| Error::null_pointer(self.slot))
    }
}

// Manual impl so `T` needs no `Debug` bound; the pointee is never held
impl<T> std::fmt::Debug for PointerProxy<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PointerProxy")
            .field("slot", &self.slot)
            .finish()
    }
}

impl<T> Clone for PointerProxy<T> {
    fn clone(&self) -> Self {
        PointerProxy {
            process: Arc::clone(&self.process),
            slot: self.slot,
            _pointee: PhantomData,
        }
    }
}

impl<T> PartialEq for PointerProxy<T> {
    fn eq(&self, other: &Self) -> bool {
        self.process.pid() == other.process.pid() && self.slot == other.slot
    }
}

impl<T> Eq for PointerProxy<T> {}
