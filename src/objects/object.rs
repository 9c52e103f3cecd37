//! Base object proxy and type tag verification
//!
//! Every CPython value starts with the `PyObject` header; the `ob_type`
//! pointer in that header is the dynamic type tag. A concrete proxy must
//! verify the tag against its expected type object before exposing any
//! type-specific member.

use crate::core::types::{Error, RemoteAddress, Result};
use crate::objects::eval::EvaluationResult;
use crate::objects::repr::{ReprBuilder, ReprOptions};
use crate::objects::PyValue;
use crate::process::TargetProcess;
use crate::proxy::{PointerProxy, RemoteProxy, RemoteStruct, StructProxy};
use std::sync::Arc;

/// Proxy over the common `PyObject` header.
///
/// Binding reads nothing; the header is only touched when the type tag or
/// a field is actually requested.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PyObject {
    proxy: StructProxy,
}

impl RemoteProxy for PyObject {
    fn bind(process: Arc<TargetProcess>, address: RemoteAddress) -> Result<Self> {
        Ok(PyObject {
            proxy: StructProxy::bind(process, address, Self::LAYOUT)?,
        })
    }

    fn address(&self) -> RemoteAddress {
        self.proxy.address()
    }

    fn process(&self) -> &Arc<TargetProcess> {
        self.proxy.process()
    }
}

impl RemoteStruct for PyObject {
    const LAYOUT: &'static str = "PyObject";
}

impl PyObject {
    /// The `ob_type` pointer field
    pub fn ob_type(&self) -> Result<PointerProxy<PyTypeObject>> {
        self.proxy.pointer_field("ob_type")
    }

    /// Reads the dynamic type tag (the type object's address)
    pub fn type_address(&self) -> Result<RemoteAddress> {
        self.ob_type()?.read_address()
    }

    /// Verifies the dynamic type tag against the expected type object.
    ///
    /// `type_symbol`/`module` name the interpreter's static type object
    /// (e.g. `PySet_Type` in `setobject`); its address is resolved once
    /// per process. Disagreement is a hard [`Error::TypeMismatch`]: it
    /// means a stale layout model or target corruption, never something
    /// to coerce past.
    pub fn verify_type(
        &self,
        expected: &'static str,
        type_symbol: &str,
        module: &str,
    ) -> Result<()> {
        let type_object = self
            .process()
            .static_address(type_symbol, module)
            .map_err(|e| match e {
                Error::SymbolNotFound { symbol, module } => Error::Unsupported(format!(
                    "cannot verify type {expected}: {symbol} not resolved in {module}"
                )),
                other => other,
            })?;

        let tag = self.type_address()?;
        if tag != type_object {
            return Err(Error::type_mismatch(expected, self.address(), tag));
        }
        Ok(())
    }

    /// Resolves this object into its registered concrete proxy
    pub fn resolve(&self) -> Result<Box<dyn PyValue>> {
        crate::objects::resolve(self.process(), self.address())
    }
}

/// Proxy over the interpreter's `PyTypeObject`
#[derive(Clone, Debug)]
pub struct PyTypeObject {
    proxy: StructProxy,
}

impl RemoteProxy for PyTypeObject {
    fn bind(process: Arc<TargetProcess>, address: RemoteAddress) -> Result<Self> {
        Ok(PyTypeObject {
            proxy: StructProxy::bind(process, address, Self::LAYOUT)?,
        })
    }

    fn address(&self) -> RemoteAddress {
        self.proxy.address()
    }

    fn process(&self) -> &Arc<TargetProcess> {
        self.proxy.process()
    }
}

impl RemoteStruct for PyTypeObject {
    const LAYOUT: &'static str = "PyTypeObject";
}

impl PyTypeObject {
    /// Reads the type's `tp_name` (a NUL-terminated C string)
    pub fn name(&self) -> Result<String> {
        let tp_name: PointerProxy<()> = self.proxy.pointer_field("tp_name")?;
        let reader = self.process().reader();
        let address = tp_name.read_address_in(&reader)?;
        if address.is_null() {
            return Err(Error::null_pointer(tp_name.slot()));
        }
        let max = self.process().config().repr.max_string_length;
        reader.read_string(address, max)
    }
}

/// Fallback proxy for objects whose type tag is not registered.
///
/// Renders as `<tp_name object at 0x...>` when the type name can be
/// chased, degrading to `<object at 0x...>` otherwise.
#[derive(Debug)]
pub struct GenericObject {
    object: PyObject,
}

impl GenericObject {
    pub fn new(object: PyObject) -> Self {
        GenericObject { object }
    }

    fn type_name(&self) -> Option<String> {
        let type_object = self.object.ob_type().ok()?.try_read().ok()??;
        type_object.name().ok()
    }
}

impl PyValue for GenericObject {
    fn as_object(&self) -> &PyObject {
        &self.object
    }

    fn repr(&self, builder: &mut ReprBuilder) -> Result<()> {
        match self.type_name() {
            Some(name) => builder.append(&format!(
                "<{name} object at {:#x}>",
                self.object.address().as_u64()
            )),
            None => builder.append(&format!(
                "<object at {:#x}>",
                self.object.address().as_u64()
            )),
        }
        Ok(())
    }

    fn children<'a>(
        &'a self,
        _options: &ReprOptions,
    ) -> Result<Box<dyn Iterator<Item = Result<EvaluationResult>> + 'a>> {
        Ok(Box::new(std::iter::empty()))
    }
}
