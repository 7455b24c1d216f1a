//! Error types for configuration loading.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Cannot read configuration file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed configuration document {path}: {message}")]
    Malformed { path: PathBuf, message: String },

    #[error("Missing required configuration key(s) in {document}: {}", .keys.join(", "))]
    MissingKeys { document: String, keys: Vec<String> },

    #[error("Zone '{zone}' has no private subnet entry '{key}' in the environment configuration")]
    UnknownZone { zone: String, key: String },

    #[error("Invalid configuration: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

impl ConfigError {
    pub fn missing_key(document: impl Into<String>, key: impl Into<String>) -> Self {
        Self::MissingKeys {
            document: document.into(),
            keys: vec![key.into()],
        }
    }
}
