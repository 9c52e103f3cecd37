//! Struct proxy and scalar field proxies

use crate::core::types::{Error, RemoteAddress, Result};
use crate::memory::MemoryReader;
use crate::process::runtime_info::{FieldKind, StructLayout};
use crate::process::TargetProcess;
use crate::proxy::pointer::PointerProxy;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A view binding a named layout descriptor to a base address.
///
/// Owns no memory and performs no reads; fields are computed lazily from
/// the layout resolved once per process.
#[derive(Clone, Debug)]
pub struct StructProxy {
    process: Arc<TargetProcess>,
    address: RemoteAddress,
    layout: Arc<StructLayout>,
}

impl StructProxy {
    /// Binds a struct view at `address` using the process's layout for
    /// `struct_name`; unknown names fail with [`Error::Unsupported`]
    pub fn bind(
        process: Arc<TargetProcess>,
        address: RemoteAddress,
        struct_name: &str,
    ) -> Result<Self> {
        let layout = process.layout(struct_name)?;
        Ok(StructProxy {
            process,
            address,
            layout,
        })
    }

    /// Owning process handle
    pub fn process(&self) -> &Arc<TargetProcess> {
        &self.process
    }

    /// Base address of the structure
    pub fn address(&self) -> RemoteAddress {
        self.address
    }

    /// The resolved layout descriptor
    pub fn layout(&self) -> &Arc<StructLayout> {
        &self.layout
    }

    /// Returns a `Py_ssize_t` field proxy
    pub fn ssize_field(&self, name: &str) -> Result<SSizeTProxy> {
        let field = self.layout.field(name)?;
        if field.kind != FieldKind::SSizeT {
            return Err(Error::Unsupported(format!(
                "field {name} of struct {} is not a Py_ssize_t",
                self.layout.name()
            )));
        }
        Ok(SSizeTProxy::new(
            Arc::clone(&self.process),
            self.address.offset(field.offset as u64),
        ))
    }

    /// Returns a typed pointer field proxy
    pub fn pointer_field<T>(&self, name: &str) -> Result<PointerProxy<T>> {
        let field = self.layout.field(name)?;
        if field.kind != FieldKind::Pointer {
            return Err(Error::Unsupported(format!(
                "field {name} of struct {} is not a pointer",
                self.layout.name()
            )));
        }
        Ok(PointerProxy::new(
            Arc::clone(&self.process),
            self.address.offset(field.offset as u64),
        ))
    }
}

// Identity is (process, address); two views with compatible layouts over
// the same location are interchangeable.
impl PartialEq for StructProxy {
    fn eq(&self, other: &Self) -> bool {
        self.process.pid() == other.process.pid() && self.address == other.address
    }
}

impl Eq for StructProxy {}

impl Hash for StructProxy {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.process.pid().hash(state);
        self.address.hash(state);
    }
}

/// Proxy over a pointer-width signed integer field
#[derive(Clone, Debug)]
pub struct SSizeTProxy {
    process: Arc<TargetProcess>,
    address: RemoteAddress,
}

impl SSizeTProxy {
    pub(crate) fn new(process: Arc<TargetProcess>, address: RemoteAddress) -> Self {
        SSizeTProxy { process, address }
    }

    /// Address of the scalar slot
    pub fn address(&self) -> RemoteAddress {
        self.address
    }

    /// Reads the value in a fresh scope
    pub fn read(&self) -> Result<i64> {
        self.read_in(&self.process.reader())
    }

    /// Reads the value inside an existing scope
    pub fn read_in(&self, reader: &MemoryReader) -> Result<i64> {
        reader.read_ssize(self.address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::TargetArchitecture;
    use crate::memory::ArenaMemory;
    use crate::process::runtime_info::StaticRuntimeInfo;

    fn fixture() -> (Arc<ArenaMemory>, Arc<TargetProcess>) {
        let arena = Arc::new(ArenaMemory::new());
        let runtime = StaticRuntimeInfo::new().with_layout(
            StructLayout::new("PySetObject", 48)
                .with_field("mask", 32, FieldKind::SSizeT)
                .with_field("table", 40, FieldKind::Pointer),
        );
        let process = TargetProcess::new(
            1,
            TargetArchitecture::X64,
            arena.clone() as Arc<dyn crate::memory::MemoryAccess>,
            Arc::new(runtime),
        );
        (arena, process)
    }

    #[test]
    fn test_bind_performs_no_reads() {
        let (arena, process) = fixture();
        StructProxy::bind(process, RemoteAddress::new(0x1000), "PySetObject").unwrap();
        assert_eq!(arena.read_count(), 0);
    }

    #[test]
    fn test_unknown_struct_unsupported() {
        let (_, process) = fixture();
        assert!(matches!(
            StructProxy::bind(process, RemoteAddress::new(0x1000), "PyDictObject").unwrap_err(),
            Error::Unsupported(_)
        ));
    }

    #[test]
    fn test_ssize_field_read() {
        let (arena, process) = fixture();
        let mut object = vec![0u8; 48];
        object[32..40].copy_from_slice(&7i64.to_le_bytes());
        arena.map(RemoteAddress::new(0x1000), object);

        let proxy =
            StructProxy::bind(process, RemoteAddress::new(0x1000), "PySetObject").unwrap();
        assert_eq!(proxy.ssize_field("mask").unwrap().read().unwrap(), 7);
    }

    #[test]
    fn test_field_kind_enforced() {
        let (_, process) = fixture();
        let proxy =
            StructProxy::bind(process, RemoteAddress::new(0x1000), "PySetObject").unwrap();

        // mask is a Py_ssize_t, not a pointer
        assert!(matches!(
            proxy.pointer_field::<StructProxyStub>("mask").unwrap_err(),
            Error::Unsupported(_)
        ));
        assert!(matches!(
            proxy.ssize_field("table").unwrap_err(),
            Error::Unsupported(_)
        ));
        assert!(matches!(
            proxy.ssize_field("missing").unwrap_err(),
            Error::Unsupported(_)
        ));
    }

    #[test]
    fn test_identity_equality() {
        let (_, process) = fixture();
        let a = StructProxy::bind(process.clone(), RemoteAddress::new(0x1000), "PySetObject")
            .unwrap();
        let b = StructProxy::bind(process.clone(), RemoteAddress::new(0x1000), "PySetObject")
            .unwrap();
        let c =
            StructProxy::bind(process, RemoteAddress::new(0x2000), "PySetObject").unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);

        let mut set = std::collections::HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    // Placeholder pointee for kind-check tests
    struct StructProxyStub;
}
