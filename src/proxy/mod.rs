//! Remote value proxies
//!
//! Proxies are cheap, address-only views into the target process: binding
//! one performs no reads, and every proxy is identified by its
//! `(process, address)` pair. Reads happen only when a field or element is
//! actually pulled through a proxy.

pub mod array;
pub mod pointer;
pub mod structs;

pub use array::ArrayProxy;
pub use pointer::PointerProxy;
pub use structs::{SSizeTProxy, StructProxy};

use crate::core::types::{RemoteAddress, Result};
use crate::process::TargetProcess;
use std::sync::Arc;

/// A typed view bound to an address in a target process.
///
/// `bind` must not read target memory unless the type's contract requires
/// an upfront check (typed object proxies verify their type tag here).
pub trait RemoteProxy: Sized {
    /// Binds the proxy at `address`
    fn bind(process: Arc<TargetProcess>, address: RemoteAddress) -> Result<Self>;

    /// Base address of the proxied value
    fn address(&self) -> RemoteAddress;

    /// Owning process handle
    fn process(&self) -> &Arc<TargetProcess>;
}

/// A [`RemoteProxy`] backed by a named layout descriptor.
///
/// The layout's size doubles as the element stride when the type is used
/// inside an [`ArrayProxy`].
pub trait RemoteStruct: RemoteProxy {
    /// Layout descriptor name for this structure
    const LAYOUT: &'static str;
}
