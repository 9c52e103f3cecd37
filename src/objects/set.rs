//! Set object proxy
//!
//! CPython sets are open-addressed hash tables: `mask + 1` contiguous
//! `setentry` slots, each holding a key pointer that is null (never
//! occupied), the interpreter's shared dummy object (removed, a
//! tombstone), or a live key. Traversal replicates that classification
//! from raw bytes only.

use crate::core::types::{RemoteAddress, Result};
use crate::memory::MemoryReader;
use crate::objects::eval::{ChildValue, EvaluationResult};
use crate::objects::object::PyObject;
use crate::objects::repr::{ReprBuilder, ReprOptions};
use crate::objects::PyValue;
use crate::process::TargetProcess;
use crate::proxy::{ArrayProxy, PointerProxy, RemoteProxy, RemoteStruct, StructProxy};
use std::sync::Arc;
use tracing::warn;

/// One slot of the set's hash table
#[derive(Debug)]
pub struct SetEntry {
    proxy: StructProxy,
}

impl RemoteProxy for SetEntry {
    fn bind(process: Arc<TargetProcess>, address: RemoteAddress) -> Result<Self> {
        Ok(SetEntry {
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

impl RemoteStruct for SetEntry {
    const LAYOUT: &'static str = "setentry";
}

impl SetEntry {
    /// The slot's key reference
    pub fn key(&self) -> Result<PointerProxy<PyObject>> {
        self.proxy.pointer_field("key")
    }
}

/// Proxy over a `PySetObject`
#[derive(Debug)]
pub struct PySetObject {
    object: PyObject,
    proxy: StructProxy,
    dummy: RemoteAddress,
}

impl RemoteProxy for PySetObject {
    /// Binds and verifies the type tag before anything else; the dummy
    /// (tombstone) address is resolved once per process through the
    /// singleton cache and shared by every traversal.
    fn bind(process: Arc<TargetProcess>, address: RemoteAddress) -> Result<Self> {
        let object = PyObject::bind(Arc::clone(&process), address)?;
        object.verify_type("set", "PySet_Type", "setobject")?;

        let proxy = StructProxy::bind(Arc::clone(&process), address, Self::LAYOUT)?;
        // static_address goes through the singleton cache itself, and the
        // cache lock is held while a factory runs, so the slot must be
        // resolved before entering the factory.
        let dummy_slot = process.static_address("dummy", "setobject")?;
        let dummy = *process
            .singletons()
            .get_or_try_init("set.dummy", || process.reader().read_pointer(dummy_slot))?;

        Ok(PySetObject {
            object,
            proxy,
            dummy,
        })
    }

    fn address(&self) -> RemoteAddress {
        self.proxy.address()
    }

    fn process(&self) -> &Arc<TargetProcess> {
        self.proxy.process()
    }
}

impl RemoteStruct for PySetObject {
    const LAYOUT: &'static str = "PySetObject";
}

impl PySetObject {
    /// The table-size mask (`size = mask + 1`)
    pub fn mask(&self) -> Result<crate::proxy::SSizeTProxy> {
        self.proxy.ssize_field("mask")
    }

    /// Pointer to the first table slot
    pub fn table(&self) -> Result<PointerProxy<ArrayProxy<SetEntry>>> {
        self.proxy.pointer_field("table")
    }

    /// Walks the table and yields the live keys in slot order.
    ///
    /// The sequence is lazy, finite, and restartable: every call opens a
    /// fresh read scope and re-reads memory, so it observes whatever the
    /// target holds at that moment. Per-slot `Unreadable`/`NullPointer`
    /// failures skip the slot; `TypeMismatch`/`Unsupported` propagate. An
    /// unreadable `mask` or `table` pointer propagates too, since without
    /// them no slot can be interpreted.
    pub fn elements(&self) -> Result<SetElements> {
        let reader = self.process().reader();

        let mask = self.mask()?.read_in(&reader)?;
        let size = if mask < 0 { 0 } else { mask as usize + 1 };

        let table = if size == 0 {
            None
        } else {
            Some(self.table()?.deref_in(&reader)?)
        };

        Ok(SetElements {
            table,
            size,
            dummy: self.dummy,
            index: 0,
            reader,
        })
    }

    /// Number of live elements (one full table walk)
    pub fn len(&self) -> Result<usize> {
        let mut count = 0;
        for element in self.elements()? {
            element?;
            count += 1;
        }
        Ok(count)
    }
}

/// Lazy traversal over a set's live keys
pub struct SetElements {
    table: Option<ArrayProxy<SetEntry>>,
    size: usize,
    dummy: RemoteAddress,
    index: usize,
    reader: MemoryReader,
}

impl std::fmt::Debug for SetElements {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SetElements")
            .field("size", &self.size)
            .field("index", &self.index)
            .field("dummy", &self.dummy)
            .finish()
    }
}

impl Iterator for SetElements {
    type Item = Result<PyObject>;

    fn next(&mut self) -> Option<Self::Item> {
        let table = self.table.as_ref()?;

        while self.index < self.size {
            let index = self.index;
            self.index += 1;

            let entry = match table.at(index) {
                Ok(entry) => entry,
                Err(e) => return Some(Err(e)),
            };
            let key = match entry.key() {
                Ok(key) => key,
                Err(e) => return Some(Err(e)),
            };

            match key.try_read_in(&self.reader) {
                // Never occupied
                Ok(None) => continue,
                // Removed: the key is the interpreter's shared tombstone
                Ok(Some(object)) if object.address() == self.dummy => continue,
                Ok(Some(object)) => return Some(Ok(object)),
                Err(e) if e.is_recoverable() => {
                    warn!(slot = index, error = %e, "skipping unreadable set slot");
                    continue;
                }
                Err(e) => return Some(Err(e)),
            }
        }
        None
    }
}

impl PyValue for PySetObject {
    fn as_object(&self) -> &PyObject {
        &self.object
    }

    fn repr(&self, builder: &mut ReprBuilder) -> Result<()> {
        if builder.is_top_level() {
            let count = self.len()?;
            if count > builder.options().max_joined_items {
                builder.append(&format!("<set, len() = {count}>"));
                return Ok(());
            }
        }

        builder.append("{");
        builder.append_joined(", ", self.elements()?, |b, element| {
            b.append_repr(&element?)
        })?;
        builder.append("}");
        Ok(())
    }

    fn children<'a>(
        &'a self,
        _options: &ReprOptions,
    ) -> Result<Box<dyn Iterator<Item = Result<EvaluationResult>> + 'a>> {
        let len = self.len()?;
        let head = std::iter::once(Ok(EvaluationResult::method(
            "len()",
            ChildValue::Int(len as i64),
        )));
        let elements = self
            .elements()?
            .map(|element| element.map(|object| EvaluationResult::element(ChildValue::Object(object))));
        Ok(Box::new(head.chain(elements)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Error, TargetArchitecture};
    use crate::memory::ArenaMemory;
    use crate::objects::repr::ReprOptions;
    use crate::process::runtime_info::{FieldKind, StaticRuntimeInfo, StructLayout};

    const SET_TYPE: u64 = 0x0100_0000;
    const OTHER_TYPE: u64 = 0x0200_0000;
    const DUMMY_SLOT: u64 = 0x0300_0000;
    const DUMMY_OBJECT: u64 = 0x0300_0100;
    const SET_ADDR: u64 = 0x0400_0000;
    const TABLE: u64 = 0x0500_0000;
    const ELEMENTS: u64 = 0x0600_0000;

    #[derive(Clone, Copy)]
    enum Slot {
        Null,
        Tombstone,
        Live,
        Unmapped,
    }

    fn runtime() -> StaticRuntimeInfo {
        StaticRuntimeInfo::new()
            .with_layout(
                StructLayout::new("PyObject", 16)
                    .with_field("ob_refcnt", 0, FieldKind::SSizeT)
                    .with_field("ob_type", 8, FieldKind::Pointer),
            )
            .with_layout(
                StructLayout::new("PySetObject", 48)
                    .with_field("mask", 32, FieldKind::SSizeT)
                    .with_field("table", 40, FieldKind::Pointer),
            )
            .with_layout(
                StructLayout::new("setentry", 16)
                    .with_field("key", 0, FieldKind::Pointer)
                    .with_field("hash", 8, FieldKind::SSizeT),
            )
            .with_layout(
                StructLayout::new("PyTypeObject", 32).with_field("tp_name", 24, FieldKind::Pointer),
            )
            .with_static("PySet_Type", "setobject", RemoteAddress::new(SET_TYPE))
            .with_static("dummy", "setobject", RemoteAddress::new(DUMMY_SLOT))
    }

    /// Lays out a fake interpreter heap holding one set whose table has
    /// the given slot states.
    fn build_set(slots: &[Slot]) -> (Arc<ArenaMemory>, Arc<TargetProcess>) {
        let arena = Arc::new(ArenaMemory::new());

        // Set object: header with the set type tag, then mask and table
        let mut set = vec![0u8; 48];
        set[8..16].copy_from_slice(&SET_TYPE.to_le_bytes());
        set[32..40].copy_from_slice(&(slots.len() as i64 - 1).to_le_bytes());
        set[40..48].copy_from_slice(&TABLE.to_le_bytes());
        arena.map(RemoteAddress::new(SET_ADDR), set);

        // The interpreter's shared dummy: a static slot pointing at the
        // tombstone object
        arena.map(
            RemoteAddress::new(DUMMY_SLOT),
            DUMMY_OBJECT.to_le_bytes().to_vec(),
        );
        arena.map(RemoteAddress::new(DUMMY_OBJECT), vec![0u8; 16]);

        // One independently mapped segment per table slot so single slots
        // can be left unmapped
        for (i, slot) in slots.iter().enumerate() {
            let key = match slot {
                Slot::Null => 0,
                Slot::Tombstone => DUMMY_OBJECT,
                Slot::Live => {
                    let element = ELEMENTS + (i as u64) * 16;
                    let mut object = vec![0u8; 16];
                    object[8..16].copy_from_slice(&OTHER_TYPE.to_le_bytes());
                    arena.map(RemoteAddress::new(element), object);
                    element
                }
                Slot::Unmapped => continue,
            };
            let mut entry = vec![0u8; 16];
            entry[0..8].copy_from_slice(&key.to_le_bytes());
            arena.map(RemoteAddress::new(TABLE + (i as u64) * 16), entry);
        }

        let process = TargetProcess::new(
            1,
            TargetArchitecture::X64,
            arena.clone() as Arc<dyn crate::memory::MemoryAccess>,
            Arc::new(runtime()),
        );
        (arena, process)
    }

    fn bind_set(process: &Arc<TargetProcess>) -> PySetObject {
        PySetObject::bind(Arc::clone(process), RemoteAddress::new(SET_ADDR)).unwrap()
    }

    #[test]
    fn test_empty_table_yields_nothing() {
        let (_, process) = build_set(&[Slot::Null; 8]);
        let set = bind_set(&process);
        assert_eq!(set.len().unwrap(), 0);
    }

    #[test]
    fn test_full_table_yields_all() {
        let (_, process) = build_set(&[Slot::Live; 8]);
        let set = bind_set(&process);
        assert_eq!(set.len().unwrap(), 8);
    }

    #[test]
    fn test_mixed_table_skips_null_and_tombstones() {
        let slots = [
            Slot::Live,
            Slot::Null,
            Slot::Tombstone,
            Slot::Live,
            Slot::Tombstone,
            Slot::Null,
            Slot::Null,
            Slot::Live,
        ];
        let (_, process) = build_set(&slots);
        let set = bind_set(&process);

        let elements: Vec<_> = set
            .elements()
            .unwrap()
            .map(|e| e.unwrap().address())
            .collect();
        assert_eq!(elements.len(), 3);
        // Slot order, not sorted
        assert_eq!(elements[0], RemoteAddress::new(ELEMENTS));
        assert_eq!(elements[1], RemoteAddress::new(ELEMENTS + 3 * 16));
        assert_eq!(elements[2], RemoteAddress::new(ELEMENTS + 7 * 16));
    }

    #[test]
    fn test_unreadable_slot_does_not_abort() {
        let slots = [Slot::Live, Slot::Unmapped, Slot::Live, Slot::Null];
        let (_, process) = build_set(&slots);
        let set = bind_set(&process);
        assert_eq!(set.len().unwrap(), 2);
    }

    #[test]
    fn test_reiteration_rereads_memory() {
        let (arena, process) = build_set(&[Slot::Live; 4]);
        let set = bind_set(&process);

        let first: Vec<_> = set
            .elements()
            .unwrap()
            .map(|e| e.unwrap().address())
            .collect();
        let reads_after_first = arena.read_count();

        let second: Vec<_> = set
            .elements()
            .unwrap()
            .map(|e| e.unwrap().address())
            .collect();
        assert_eq!(first, second);
        assert!(arena.read_count() > reads_after_first);
    }

    #[test]
    fn test_traversal_observes_mutation() {
        let (arena, process) = build_set(&[Slot::Live, Slot::Live, Slot::Null, Slot::Null]);
        let set = bind_set(&process);
        assert_eq!(set.len().unwrap(), 2);

        // Turn slot 1 into a tombstone behind the proxy's back
        arena
            .patch_u64(RemoteAddress::new(TABLE + 16), DUMMY_OBJECT)
            .unwrap();
        assert_eq!(set.len().unwrap(), 1);
    }

    #[test]
    fn test_type_mismatch_on_bind() {
        let (arena, process) = build_set(&[Slot::Null; 4]);
        // Overwrite the tag with a different type object
        arena
            .patch_u64(RemoteAddress::new(SET_ADDR + 8), OTHER_TYPE)
            .unwrap();

        let reads_before = arena.read_count();
        let err =
            PySetObject::bind(Arc::clone(&process), RemoteAddress::new(SET_ADDR)).unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { expected: "set", .. }));
        // Only the header tag was read before failing
        assert_eq!(arena.read_count(), reads_before + 1);
    }

    #[test]
    fn test_first_bind_with_cold_caches_completes() {
        let (_, process) = build_set(&[Slot::Null; 4]);

        // Run the cold-cache bind on its own thread with a bounded wait so
        // a regression fails the test instead of hanging it
        let handle = std::thread::spawn(move || {
            PySetObject::bind(process, RemoteAddress::new(SET_ADDR)).map(|set| set.address())
        });
        let start = std::time::Instant::now();
        while !handle.is_finished() {
            assert!(
                start.elapsed() < std::time::Duration::from_secs(5),
                "first bind did not complete"
            );
            std::thread::yield_now();
        }
        assert_eq!(
            handle.join().unwrap().unwrap(),
            RemoteAddress::new(SET_ADDR)
        );
    }

    #[test]
    fn test_dummy_resolved_once_per_process() {
        let (arena, process) = build_set(&[Slot::Null; 4]);

        bind_set(&process);
        let reads_after_first = arena.read_count();
        bind_set(&process);
        // Second bind re-reads the tag but not the dummy slot
        assert_eq!(arena.read_count(), reads_after_first + 1);
    }

    #[test]
    fn test_null_table_pointer_propagates() {
        let (arena, process) = build_set(&[Slot::Null; 4]);
        arena.patch_u64(RemoteAddress::new(SET_ADDR + 40), 0).unwrap();

        let set = bind_set(&process);
        assert!(matches!(
            set.elements().unwrap_err(),
            Error::NullPointer { .. }
        ));
    }

    #[test]
    fn test_repr_small_set_joined() {
        let (_, process) = build_set(&[Slot::Live, Slot::Null, Slot::Null, Slot::Null]);
        let set = bind_set(&process);

        let mut builder = ReprBuilder::new(ReprOptions::default());
        set.repr(&mut builder).unwrap();
        let text = builder.finish();
        assert!(text.starts_with('{') && text.ends_with('}'), "got: {text}");
        assert!(text.contains("object at"), "got: {text}");
    }

    #[test]
    fn test_repr_large_set_summarized_at_top_level() {
        let (_, process) = build_set(&[Slot::Live; 16]);
        let set = bind_set(&process);

        let options = ReprOptions {
            max_joined_items: 4,
            ..ReprOptions::default()
        };
        let mut builder = ReprBuilder::new(options);
        set.repr(&mut builder).unwrap();
        assert_eq!(builder.finish(), "<set, len() = 16>");
    }

    #[test]
    fn test_children_len_then_elements() {
        let (_, process) = build_set(&[Slot::Live, Slot::Tombstone, Slot::Live, Slot::Null]);
        let set = bind_set(&process);

        let children: Vec<_> = set
            .children(&ReprOptions::default())
            .unwrap()
            .map(|c| c.unwrap())
            .collect();
        assert_eq!(children.len(), 3);

        assert_eq!(children[0].label.as_deref(), Some("len()"));
        assert_eq!(children[0].category, crate::objects::ResultCategory::Method);
        assert!(matches!(children[0].value, ChildValue::Int(2)));

        for child in &children[1..] {
            assert!(child.label.is_none());
            assert_eq!(child.category, crate::objects::ResultCategory::Property);
            assert!(matches!(child.value, ChildValue::Object(_)));
        }
    }
}
