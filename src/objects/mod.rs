//! Typed object proxies and value resolution
//!
//! This layer turns raw addresses into typed views of interpreter
//! values: the shared `PyObject` header, concrete proxies dispatched by
//! type tag, and a generic fallback for everything unregistered.

pub mod eval;
pub mod object;
pub mod repr;
pub mod set;

pub use eval::{ChildValue, EvaluationResult, ResultCategory};
pub use object::{GenericObject, PyObject, PyTypeObject};
pub use repr::{ReprBuilder, ReprOptions};
pub use set::{PySetObject, SetElements, SetEntry};

use crate::core::types::{Error, RemoteAddress, Result};
use crate::process::TargetProcess;
use crate::proxy::RemoteProxy;
use lazy_static::lazy_static;
use std::sync::Arc;
use tracing::trace;

/// A value proxy the engine can render and expand.
///
/// Implementations never execute code in the target; everything is
/// reconstructed from raw memory reads. `Debug` is a supertrait so
/// resolved values can sit in `Result` positions that tests and callers
/// unwrap.
pub trait PyValue: std::fmt::Debug {
    /// The underlying object header
    fn as_object(&self) -> &PyObject;

    /// Appends this value's textual form to `builder`
    fn repr(&self, builder: &mut ReprBuilder) -> Result<()>;

    /// Child entries for UI expansion
    fn children<'a>(
        &'a self,
        options: &ReprOptions,
    ) -> Result<Box<dyn Iterator<Item = Result<EvaluationResult>> + 'a>>;
}

/// Registry row mapping a static type object to a concrete proxy
struct TypeEntry {
    type_symbol: &'static str,
    module: &'static str,
    construct: fn(Arc<TargetProcess>, RemoteAddress) -> Result<Box<dyn PyValue>>,
}

lazy_static! {
    static ref TYPE_REGISTRY: Vec<TypeEntry> = vec![TypeEntry {
        type_symbol: "PySet_Type",
        module: "setobject",
        construct: |process, address| Ok(Box::new(PySetObject::bind(process, address)?)),
    }];
}

/// Resolves the object at `address` into its registered concrete proxy.
///
/// The dynamic type tag is read once and compared against each registered
/// static type object. An entry whose type object cannot be resolved in
/// this target (stripped symbols, older interpreter) is skipped rather
/// than failing the whole resolution. Unmatched tags fall back to
/// [`GenericObject`].
pub fn resolve(process: &Arc<TargetProcess>, address: RemoteAddress) -> Result<Box<dyn PyValue>> {
    if address.is_null() {
        return Err(Error::null_pointer(address));
    }

    let object = PyObject::bind(Arc::clone(process), address)?;
    let tag = object.type_address()?;

    for entry in TYPE_REGISTRY.iter() {
        match process.static_address(entry.type_symbol, entry.module) {
            Ok(type_object) if type_object == tag => {
                trace!(%address, symbol = entry.type_symbol, "resolved typed proxy");
                return (entry.construct)(Arc::clone(process), address);
            }
            Ok(_) => continue,
            Err(Error::SymbolNotFound { .. }) => continue,
            Err(e) => return Err(e),
        }
    }

    trace!(%address, %tag, "no registered proxy, using generic fallback");
    Ok(Box::new(GenericObject::new(object)))
}

/// Renders the object at `address` to a bounded top-level repr
pub fn render(
    process: &Arc<TargetProcess>,
    address: RemoteAddress,
    options: ReprOptions,
) -> Result<String> {
    let value = resolve(process, address)?;
    let mut builder = ReprBuilder::new(options);
    value.repr(&mut builder)?;
    Ok(builder.finish())
}
