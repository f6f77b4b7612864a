/// Structured error types for tablectl-core.
///
/// The binary (tablectl-cli) wraps these in `anyhow` for reporting;
/// the server crate keeps its own store errors.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for tablectl-core operations
#[derive(Error, Debug)]
pub enum TableError {
    /// Reading the config file failed
    #[error("Failed to read config file {path:?}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Config file is not valid TOML for `ServiceConfig`
    #[error("Failed to parse config file {path:?}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A config value was rejected by validation
    #[error("Invalid configuration for '{field}': {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    /// Serializing the effective config failed
    #[error("Failed to render config: {0}")]
    ConfigRender(#[from] toml::ser::Error),
}

/// Result type alias for tablectl-core operations
pub type Result<T> = std::result::Result<T, TableError>;

impl TableError {
    /// Create an invalid config error
    pub fn invalid_config(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}
