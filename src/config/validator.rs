//! Configuration validator for pyprobe
//!
//! Validates configuration values to ensure they are within acceptable
//! ranges.

use super::loader::{Config, ConfigError};

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates the entire configuration
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        Self::validate_repr(&config.repr)?;
        Self::validate_memory(&config.memory)?;
        Self::validate_logging(&config.logging)?;
        Ok(())
    }

    fn validate_repr(repr: &super::loader::ReprConfig) -> Result<(), ConfigError> {
        if repr.max_joined_items == 0 {
            return Err(ConfigError::Invalid(
                "max_joined_items must be at least 1".to_string(),
            ));
        }

        if repr.max_string_length == 0 {
            return Err(ConfigError::Invalid(
                "max_string_length must be at least 1".to_string(),
            ));
        }

        if repr.max_depth == 0 {
            return Err(ConfigError::Invalid(
                "max_depth must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    fn validate_memory(memory: &super::loader::MemoryConfig) -> Result<(), ConfigError> {
        if memory.max_read_size == 0 {
            return Err(ConfigError::Invalid(
                "max_read_size must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    fn validate_logging(logging: &super::loader::LoggingConfig) -> Result<(), ConfigError> {
        const VALID_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

        if !VALID_LEVELS.contains(&logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::Invalid(format!(
                "Invalid log level: {} (expected one of {:?})",
                logging.level, VALID_LEVELS
            )));
        }

        Ok(())
    }
}

/// Validates a configuration
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    ConfigValidator::validate(config)
}
