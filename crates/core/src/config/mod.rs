//! Configuration loading and validation.
//!
//! The configuration file is TOML; every key can be overridden from the
//! environment with the `TRACKSYNC_` prefix, using `__` to descend into
//! tables (`TRACKSYNC_TARGET__PATH=/media/player`).

mod loader;
mod types;
mod validate;

pub use loader::{load_config, load_config_from_str};
pub use types::*;
pub use validate::validate_config;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
