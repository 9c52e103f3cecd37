//! Remote address wrapper type with hex parsing and arithmetic

use super::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A byte offset into the target process's virtual address space.
///
/// The value is meaningless outside its `(process, address)` pair and is
/// never dereferenced directly; every read goes through the target's
/// memory access service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RemoteAddress(pub u64);

impl RemoteAddress {
    /// Creates a new address from a raw value
    pub const fn new(value: u64) -> Self {
        RemoteAddress(value)
    }

    /// Creates the null address (0x0)
    pub const fn null() -> Self {
        RemoteAddress(0)
    }

    /// Checks if the address is the null sentinel
    pub const fn is_null(&self) -> bool {
        self.0 == 0
    }

    /// Adds a byte offset to the address
    pub const fn offset(&self, offset: u64) -> Self {
        RemoteAddress(self.0.wrapping_add(offset))
    }

    /// Checks if the address is aligned to the specified boundary
    pub const fn is_aligned(&self, alignment: u64) -> bool {
        alignment != 0 && self.0 % alignment == 0
    }

    /// Returns the raw value
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl FromStr for RemoteAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();

        let value = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            u64::from_str_radix(hex, 16)
        } else if s.chars().any(|c| c.is_ascii_alphabetic()) {
            // Assume hex if it contains letters
            u64::from_str_radix(s, 16)
        } else {
            s.parse::<u64>().or_else(|_| u64::from_str_radix(s, 16))
        };

        value
            .map(RemoteAddress::new)
            .map_err(|_| Error::Unsupported(format!("invalid remote address: {s}")))
    }
}

impl fmt::Display for RemoteAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016X}", self.0)
    }
}

impl fmt::LowerHex for RemoteAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016x}", self.0)
    }
}

impl From<u64> for RemoteAddress {
    fn from(value: u64) -> Self {
        RemoteAddress::new(value)
    }
}

impl From<usize> for RemoteAddress {
    fn from(value: usize) -> Self {
        RemoteAddress::new(value as u64)
    }
}
