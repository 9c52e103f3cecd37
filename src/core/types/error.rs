//! Error types for remote introspection

use super::address::RemoteAddress;
use thiserror::Error;

/// Main error type for introspection operations
#[derive(Error, Debug)]
pub enum Error {
    /// The requested remote range could not be read (unmapped, access
    /// denied, process exited mid-read). Recoverable: container traversal
    /// skips the affected element unless the range is required to interpret
    /// all subsequent data.
    #[error("Failed to read {size} bytes at {address}: {reason}")]
    Unreadable {
        address: RemoteAddress,
        size: usize,
        reason: String,
    },

    /// A strict dereference found the null sentinel. Callers that can
    /// tolerate absence use `try_read` instead.
    #[error("Null pointer in slot at {slot}")]
    NullPointer { slot: RemoteAddress },

    /// The dynamic type tag read from target memory disagrees with the
    /// static type a proxy was constructed as. Never coerced: it signals a
    /// stale layout model or genuine target corruption.
    #[error("Object at {address} is not a {expected} (type tag {tag})")]
    TypeMismatch {
        expected: &'static str,
        address: RemoteAddress,
        tag: RemoteAddress,
    },

    /// No layout descriptor or decoder exists for the requested structure,
    /// field, or runtime build. The engine never guesses a fallback layout.
    #[error("Unsupported: {0}")]
    Unsupported(String),

    /// A static variable could not be located in the target's modules.
    #[error("Symbol {symbol} not found in {module}")]
    SymbolNotFound { symbol: String, module: String },
}

/// Result type alias for introspection operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Creates an unreadable-memory error
    pub fn unreadable(
        address: RemoteAddress,
        size: usize,
        reason: impl Into<String>,
    ) -> Self {
        Error::Unreadable {
            address,
            size,
            reason: reason.into(),
        }
    }

    /// Creates a null-pointer error for a pointer slot
    pub fn null_pointer(slot: RemoteAddress) -> Self {
        Error::NullPointer { slot }
    }

    /// Creates a type-mismatch error
    pub fn type_mismatch(
        expected: &'static str,
        address: RemoteAddress,
        tag: RemoteAddress,
    ) -> Self {
        Error::TypeMismatch {
            expected,
            address,
            tag,
        }
    }

    /// Creates a symbol-not-found error
    pub fn symbol_not_found(symbol: impl Into<String>, module: impl Into<String>) -> Self {
        Error::SymbolNotFound {
            symbol: symbol.into(),
            module: module.into(),
        }
    }

    /// True for failures a container traversal absorbs at per-element
    /// granularity (one bad slot skips one element). `TypeMismatch` and
    /// `Unsupported` are deliberately excluded: they mean the traversal's
    /// premises are wrong, not that one data point is missing.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::Unreadable { .. } | Error::NullPointer { .. })
    }
}
