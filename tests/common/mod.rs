//! Shared test fixture: a fake interpreter heap laid out the way CPython
//! lays out its objects, backed by an [`ArenaMemory`].

use pyprobe::memory::{ArenaMemory, MemoryAccess};
use pyprobe::process::runtime_info::{FieldKind, StaticRuntimeInfo, StructLayout};
use pyprobe::{RemoteAddress, TargetArchitecture, TargetProcess};
use std::sync::Arc;

pub const SET_TYPE: u64 = 0x0100_0000;
pub const INT_TYPE: u64 = 0x0200_0000;
pub const DUMMY_SLOT: u64 = 0x0300_0000;
pub const DUMMY_OBJECT: u64 = 0x0300_0100;

const PY_OBJECT_SIZE: u64 = 16;
const SET_ENTRY_SIZE: u64 = 16;

/// Slot states of an open-addressed hash table
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
    Null,
    Tombstone,
    Live,
    Unmapped,
}

fn cpython_runtime() -> StaticRuntimeInfo {
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
        .with_layout(StructLayout::new("PyTypeObject", 32).with_field("tp_name", 24, FieldKind::Pointer))
        .with_static("PySet_Type", "setobject", RemoteAddress::new(SET_TYPE))
        .with_static("dummy", "setobject", RemoteAddress::new(DUMMY_SLOT))
}

/// A fake attached interpreter with type objects and the set tombstone
/// already mapped
pub struct FakeInterpreter {
    pub arena: Arc<ArenaMemory>,
    pub process: Arc<TargetProcess>,
}

impl FakeInterpreter {
    pub fn new() -> Self {
        init_tracing();
        let arena = Arc::new(ArenaMemory::new());

        Self::map_type_object(&arena, SET_TYPE, "set");
        Self::map_type_object(&arena, INT_TYPE, "int");

        // Static dummy slot pointing at the shared tombstone object
        arena.map(
            RemoteAddress::new(DUMMY_SLOT),
            DUMMY_OBJECT.to_le_bytes().to_vec(),
        );
        arena.map(
            RemoteAddress::new(DUMMY_OBJECT),
            vec![0u8; PY_OBJECT_SIZE as usize],
        );

        let process = TargetProcess::new(
            4242,
            TargetArchitecture::X64,
            arena.clone() as Arc<dyn MemoryAccess>,
            Arc::new(cpython_runtime()),
        );
        FakeInterpreter { arena, process }
    }

    fn map_type_object(arena: &ArenaMemory, address: u64, name: &str) {
        let name_address = address + 0x100;
        let mut type_object = vec![0u8; 32];
        type_object[24..32].copy_from_slice(&name_address.to_le_bytes());
        arena.map(RemoteAddress::new(address), type_object);

        let mut bytes = name.as_bytes().to_vec();
        bytes.push(0);
        arena.map(RemoteAddress::new(name_address), bytes);
    }

    /// Maps a `PyObject` header with the given type tag
    pub fn map_object(&self, address: u64, type_tag: u64) -> RemoteAddress {
        let mut object = vec![0u8; PY_OBJECT_SIZE as usize];
        object[8..16].copy_from_slice(&type_tag.to_le_bytes());
        self.arena.map(RemoteAddress::new(address), object);
        RemoteAddress::new(address)
    }

    /// Maps a set whose table holds the given slot states.
    ///
    /// The table lands at `address + 0x1000`, live elements at
    /// `address + 0x2000 + i * 16`, each table slot in its own segment so
    /// tests can leave single slots unmapped.
    pub fn map_set(&self, address: u64, slots: &[Slot]) -> RemoteAddress {
        let table = address + 0x1000;
        let elements = address + 0x2000;

        let mut set = vec![0u8; 48];
        set[8..16].copy_from_slice(&SET_TYPE.to_le_bytes());
        set[32..40].copy_from_slice(&(slots.len() as i64 - 1).to_le_bytes());
        set[40..48].copy_from_slice(&table.to_le_bytes());
        self.arena.map(RemoteAddress::new(address), set);

        for (i, slot) in slots.iter().enumerate() {
            let key = match slot {
                Slot::Null => 0,
                Slot::Tombstone => DUMMY_OBJECT,
                Slot::Live => {
                    let element = elements + (i as u64) * PY_OBJECT_SIZE;
                    self.map_object(element, INT_TYPE);
                    element
                }
                Slot::Unmapped => continue,
            };
            let mut entry = vec![0u8; SET_ENTRY_SIZE as usize];
            entry[0..8].copy_from_slice(&key.to_le_bytes());
            self.arena
                .map(RemoteAddress::new(table + (i as u64) * SET_ENTRY_SIZE), entry);
        }

        RemoteAddress::new(address)
    }

    /// Address of the live element mapped for table slot `i`
    pub fn element_address(set: RemoteAddress, i: usize) -> RemoteAddress {
        RemoteAddress::new(set.as_u64() + 0x2000 + (i as u64) * PY_OBJECT_SIZE)
    }
}

impl Default for FakeInterpreter {
    fn default() -> Self {
        Self::new()
    }
}

/// Installs the test subscriber once; later calls are no-ops
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
