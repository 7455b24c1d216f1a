//! Combined, validated configuration for one template run.

use std::ops::RangeInclusive;
use std::path::Path;

use tracing::info;

use crate::error::ConfigResult;
use crate::loader::ConfigLoader;
use crate::models::{ClusterConfig, EnvironmentConfig};
use crate::validator::ConfigValidator;

/// Default location of the environment document.
pub const ENVIRONMENT_CONFIG_PATH: &str = "conf/aws_config.json";

/// Default location of the cluster document.
pub const DEFAULT_CLUSTER_CONFIG_PATH: &str = "conf/ml_master.json";

/// Environment and cluster configuration, validated against each other.
#[derive(Debug, Clone)]
pub struct StackConfig {
    pub environment: EnvironmentConfig,
    pub cluster: ClusterConfig,
}

impl StackConfig {
    /// Load both documents and validate them together.
    pub fn load(environment_path: &Path, cluster_path: &Path) -> ConfigResult<Self> {
        let environment = ConfigLoader::load_environment(environment_path)?;
        let cluster = ConfigLoader::load_cluster(cluster_path)?;
        let stack = Self::new(environment, cluster)?;

        info!(
            "Loaded cluster configuration from {:?}: {} zone(s), {} instance(s) per zone",
            cluster_path,
            stack.zones().len(),
            stack.cluster.number_of_instances_per_zone
        );

        Ok(stack)
    }

    /// Validate an already-parsed pair of documents.
    pub fn new(environment: EnvironmentConfig, cluster: ClusterConfig) -> ConfigResult<Self> {
        let stack = Self { environment, cluster };
        ConfigValidator::validate_stack(&stack)?;
        Ok(stack)
    }

    /// Zones to deploy into: the cluster override, else the environment list.
    pub fn zones(&self) -> &[String] {
        self.cluster
            .zones
            .as_deref()
            .unwrap_or(&self.environment.zones)
    }

    /// Instance numbers used within each zone, starting at 1.
    pub fn instance_numbers(&self) -> RangeInclusive<u32> {
        1..=self.cluster.number_of_instances_per_zone
    }
}
