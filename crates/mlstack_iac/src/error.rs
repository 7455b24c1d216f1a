//! Error types for template generation.

use thiserror::Error;

/// Result type alias for template operations.
pub type IacResult<T> = Result<T, IacError>;

/// Errors that can occur while building or serializing a template.
#[derive(Error, Debug)]
pub enum IacError {
    #[error("Duplicate resource name in template: {0}")]
    DuplicateResource(String),

    #[error("Resource {resource} references unknown resource {target}")]
    DanglingReference { resource: String, target: String },

    #[error("Configuration error: {0}")]
    Config(#[from] mlstack_config::ConfigError),

    #[error("Template serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
