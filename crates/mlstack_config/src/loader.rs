//! Configuration document loading.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::{ConfigError, ConfigResult};
use crate::models::{ClusterConfig, EnvironmentConfig};
use crate::validator::ConfigValidator;

/// Document formats accepted for configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Pick the format from the file extension; anything but YAML is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => DocumentFormat::Yaml,
            _ => DocumentFormat::Json,
        }
    }
}

/// Loader for the environment and cluster documents.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Read a configuration file into an untyped document.
    pub fn read_document(path: &Path) -> ConfigResult<Value> {
        debug!("Reading configuration from {:?}", path);

        let content = fs::read_to_string(path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => ConfigError::NotFound(path.to_path_buf()),
            _ => ConfigError::Read {
                path: path.to_path_buf(),
                source,
            },
        })?;

        Self::parse_document(path, &content, DocumentFormat::from_path(path))
    }

    /// Parse document text; the root must be a mapping.
    pub fn parse_document(path: &Path, content: &str, format: DocumentFormat) -> ConfigResult<Value> {
        let malformed = |message: String| ConfigError::Malformed {
            path: path.to_path_buf(),
            message,
        };

        let document: Value = match format {
            DocumentFormat::Json => serde_json::from_str(content).map_err(|e| malformed(e.to_string()))?,
            DocumentFormat::Yaml => serde_yaml::from_str(content).map_err(|e| malformed(e.to_string()))?,
        };

        if !document.is_object() {
            return Err(malformed("top level must be a key/value mapping".to_string()));
        }

        Ok(document)
    }

    /// Load and validate the environment document.
    pub fn load_environment(path: &Path) -> ConfigResult<EnvironmentConfig> {
        let document = Self::read_document(path)?;
        Self::environment_from_document(path, document)
    }

    /// Load and validate the cluster document.
    pub fn load_cluster(path: &Path) -> ConfigResult<ClusterConfig> {
        let document = Self::read_document(path)?;
        Self::cluster_from_document(path, document)
    }

    pub fn environment_from_document(path: &Path, document: Value) -> ConfigResult<EnvironmentConfig> {
        ConfigValidator::check_environment_keys(&document)?;
        Self::typed(path, document)
    }

    pub fn cluster_from_document(path: &Path, document: Value) -> ConfigResult<ClusterConfig> {
        ConfigValidator::check_cluster_keys(&document)?;
        Self::typed(path, document)
    }

    fn typed<T: DeserializeOwned>(path: &Path, document: Value) -> ConfigResult<T> {
        serde_json::from_value(document).map_err(|e| ConfigError::Malformed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}
