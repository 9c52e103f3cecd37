//! Target architecture description

use serde::{Deserialize, Serialize};

/// Architecture of the target process.
///
/// Determines the pointer width used to decode remote pointers and
/// `Py_ssize_t` values; the engine never hard-codes a width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetArchitecture {
    X86,
    X64,
    Arm,
    Arm64,
}

impl TargetArchitecture {
    /// Returns the pointer size in bytes for this architecture
    pub const fn pointer_size(&self) -> usize {
        match self {
            TargetArchitecture::X86 | TargetArchitecture::Arm => 4,
            TargetArchitecture::X64 | TargetArchitecture::Arm64 => 8,
        }
    }

    /// Checks if this is a 64-bit architecture
    pub const fn is_64bit(&self) -> bool {
        matches!(self, TargetArchitecture::X64 | TargetArchitecture::Arm64)
    }
}
