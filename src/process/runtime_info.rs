//! Runtime layout and symbol information
//!
//! Layout descriptors map structure and field names to byte offsets and
//! decoders for one concrete interpreter build. They are derived outside
//! the engine (debug symbols, version tables) and handed in through the
//! [`RuntimeInfo`] trait; the engine never guesses a layout.

use crate::core::types::{Error, Offset, RemoteAddress, Result};
use std::collections::HashMap;
use std::sync::Arc;

/// Decoder kind for a struct field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Pointer-width signed integer (`Py_ssize_t`)
    SSizeT,
    /// Pointer-width remote address
    Pointer,
}

/// One field of a layout descriptor
#[derive(Debug, Clone)]
pub struct FieldLayout {
    pub name: String,
    pub offset: Offset,
    pub kind: FieldKind,
}

/// Layout descriptor for one target structure.
///
/// `size` is the full in-memory size of the structure including padding;
/// array proxies use it as the element stride.
#[derive(Debug, Clone)]
pub struct StructLayout {
    name: String,
    size: usize,
    fields: HashMap<String, FieldLayout>,
}

impl StructLayout {
    /// Creates an empty layout descriptor
    pub fn new(name: impl Into<String>, size: usize) -> Self {
        StructLayout {
            name: name.into(),
            size,
            fields: HashMap::new(),
        }
    }

    /// Adds a field to the descriptor
    pub fn with_field(mut self, name: impl Into<String>, offset: Offset, kind: FieldKind) -> Self {
        let name = name.into();
        self.fields.insert(
            name.clone(),
            FieldLayout {
                name,
                offset,
                kind,
            },
        );
        self
    }

    /// Structure name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Structure size in bytes (array stride)
    pub fn size(&self) -> usize {
        self.size
    }

    /// Looks up a field descriptor by name
    pub fn field(&self, name: &str) -> Result<&FieldLayout> {
        self.fields.get(name).ok_or_else(|| {
            Error::Unsupported(format!("struct {} has no field {name}", self.name))
        })
    }
}

/// Runtime discovery collaborator.
///
/// Implementations locate static variables in the target's loaded modules
/// and produce layout descriptors for the target's interpreter build.
pub trait RuntimeInfo: Send + Sync {
    /// Returns the layout descriptor for a structure name, or
    /// [`Error::Unsupported`] when this runtime build has no descriptor
    fn layout_of(&self, struct_name: &str) -> Result<Arc<StructLayout>>;

    /// Resolves the address of a static variable in a target module
    fn resolve_static_variable(&self, symbol: &str, module: &str) -> Result<RemoteAddress>;
}

/// Table-driven [`RuntimeInfo`] for embedders and tests.
///
/// Holds explicit layout descriptors and static-variable addresses; useful
/// when the host debugger has already extracted them from debug symbols.
#[derive(Default)]
pub struct StaticRuntimeInfo {
    layouts: HashMap<String, Arc<StructLayout>>,
    statics: HashMap<(String, String), RemoteAddress>,
}

impl StaticRuntimeInfo {
    /// Creates an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a layout descriptor
    pub fn with_layout(mut self, layout: StructLayout) -> Self {
        self.layouts
            .insert(layout.name().to_string(), Arc::new(layout));
        self
    }

    /// Registers a static variable address
    pub fn with_static(
        mut self,
        symbol: impl Into<String>,
        module: impl Into<String>,
        address: RemoteAddress,
    ) -> Self {
        self.statics
            .insert((symbol.into(), module.into()), address);
        self
    }
}

impl RuntimeInfo for StaticRuntimeInfo {
    fn layout_of(&self, struct_name: &str) -> Result<Arc<StructLayout>> {
        self.layouts
            .get(struct_name)
            .cloned()
            .ok_or_else(|| Error::Unsupported(format!("no layout for struct {struct_name}")))
    }

    fn resolve_static_variable(&self, symbol: &str, module: &str) -> Result<RemoteAddress> {
        self.statics
            .get(&(symbol.to_string(), module.to_string()))
            .copied()
            .ok_or_else(|| Error::symbol_not_found(symbol, module))
    }
}
