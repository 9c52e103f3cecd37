//! Configuration module for pyprobe
//!
//! Provides configuration loading, validation, and default settings for
//! the introspection engine.

mod defaults;
mod loader;
mod logging;
mod validator;

pub use defaults::{default_config, ConfigDefaults};
pub use loader::{load_config, Config, ConfigLoader, LoggingConfig, MemoryConfig, ReprConfig};
pub use logging::init_logging;
pub use validator::{validate_config, ConfigValidator};

// Configuration-related error type
pub use loader::ConfigError;

// Configuration result type
pub type ConfigResult<T> = Result<T, ConfigError>;
