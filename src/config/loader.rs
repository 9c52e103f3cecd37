//! Configuration loader for pyprobe
//!
//! Handles loading configuration from TOML or JSON files and merging with
//! defaults.

use super::defaults::default_config;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_repr")]
    pub repr: ReprConfig,

    #[serde(default = "default_memory")]
    pub memory: MemoryConfig,

    #[serde(default = "default_logging")]
    pub logging: LoggingConfig,
}

/// Repr rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReprConfig {
    /// Container element count above which a top-level repr renders the
    /// length-only summary instead of the joined element list
    #[serde(default = "default_max_joined_items")]
    pub max_joined_items: usize,
    /// Upper bound on remote string reads during rendering
    #[serde(default = "default_max_string_length")]
    pub max_string_length: usize,
    /// Nesting depth past which repr elements render as an elision marker
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

/// Memory access configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    #[serde(default = "default_max_read_size")]
    pub max_read_size: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_file")]
    pub file: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            repr: default_repr(),
            memory: default_memory(),
            logging: default_logging(),
        }
    }
}

/// Configuration loader
pub struct ConfigLoader {
    config_path: PathBuf,
}

impl ConfigLoader {
    /// Creates a new configuration loader
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        ConfigLoader {
            config_path: path.as_ref().to_path_buf(),
        }
    }

    /// Loads configuration from file; the format is chosen by extension
    /// (`.json` is JSON, anything else is parsed as TOML)
    pub fn load(&self) -> Result<Config, ConfigError> {
        if !self.config_path.exists() {
            return Err(ConfigError::FileNotFound(
                self.config_path.display().to_string(),
            ));
        }

        let contents = fs::read_to_string(&self.config_path)?;
        let config = if self.is_json() {
            serde_json::from_str(&contents)?
        } else {
            toml::from_str(&contents)?
        };
        Ok(config)
    }

    /// Loads configuration or returns defaults if the file doesn't exist
    pub fn load_or_default(&self) -> Config {
        self.load().unwrap_or_default()
    }

    /// Saves configuration to file
    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        let contents = if self.is_json() {
            serde_json::to_string_pretty(config)?
        } else {
            toml::to_string_pretty(config)?
        };
        fs::write(&self.config_path, contents)?;
        Ok(())
    }

    fn is_json(&self) -> bool {
        self.config_path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
    }
}

/// Loads configuration from the default location
pub fn load_config() -> Result<Config, ConfigError> {
    let loader = ConfigLoader::new("pyprobe.toml");
    Ok(loader.load_or_default())
}

// Default functions for serde
fn default_repr() -> ReprConfig {
    let defaults = default_config();
    ReprConfig {
        max_joined_items: defaults.repr.max_joined_items,
        max_string_length: defaults.repr.max_string_length,
        max_depth: defaults.repr.max_depth,
    }
}

fn default_memory() -> MemoryConfig {
    let defaults = default_config();
    MemoryConfig {
        max_read_size: defaults.memory.max_read_size,
    }
}

fn default_logging() -> LoggingConfig {
    let defaults = default_config();
    LoggingConfig {
        level: defaults.logging.level,
        file: defaults.logging.file,
    }
}

fn default_max_joined_items() -> usize {
    default_config().repr.max_joined_items
}

fn default_max_string_length() -> usize {
    default_config().repr.max_string_length
}

fn default_max_depth() -> usize {
    default_config().repr.max_depth
}

fn default_max_read_size() -> usize {
    default_config().memory.max_read_size
}

fn default_log_level() -> String {
    default_config().logging.level
}

fn default_log_file() -> String {
    default_config().logging.file
}
