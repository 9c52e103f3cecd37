//! Logging initialization from configuration
//!
//! The engine itself only emits `tracing` events; installing a subscriber
//! is the embedder's call. This helper builds one from the `[logging]`
//! settings for hosts that don't bring their own.

use super::loader::{Config, ConfigError};
use std::fs::OpenOptions;
use std::sync::Arc;
use tracing::Level;

/// Installs a global subscriber writing to the configured log file at the
/// configured level.
///
/// Fails if the level string is unknown or the file cannot be opened. If a
/// subscriber is already installed (an embedder's own, or a previous
/// call), the existing one is kept and this returns `Ok`.
pub fn init_logging(config: &Config) -> Result<(), ConfigError> {
    let level: Level = config.logging.level.parse().map_err(|_| {
        ConfigError::Invalid(format!("invalid log level: {}", config.logging.level))
    })?;

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.logging.file)?;

    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .try_init();
    Ok(())
}
