//! Default configuration values for pyprobe

use serde::{Deserialize, Serialize};

/// Default configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigDefaults {
    pub repr: ReprDefaults,
    pub memory: MemoryDefaults,
    pub logging: LoggingDefaults,
}

/// Default repr rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReprDefaults {
    pub max_joined_items: usize,
    pub max_string_length: usize,
    pub max_depth: usize,
}

/// Default memory access configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryDefaults {
    pub max_read_size: usize,
}

/// Default logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingDefaults {
    pub level: String,
    pub file: String,
}

/// Returns the default configuration
pub fn default_config() -> ConfigDefaults {
    ConfigDefaults {
        repr: ReprDefaults {
            max_joined_items: 10,
            max_string_length: 256,
            max_depth: 10,
        },
        memory: MemoryDefaults {
            max_read_size: 1_048_576, // 1MB
        },
        logging: LoggingDefaults {
            level: "info".to_string(),
            file: "pyprobe.log".to_string(),
        },
    }
}
