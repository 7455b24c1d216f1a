//! # mlstack_config
//!
//! Configuration loading and validation for mlstack.
//!
//! Two documents drive a template run: the environment document (VPC, zones,
//! private subnets) and the cluster document (instance, volume, port and load
//! balancer parameters). Both are read as JSON, or YAML when the file
//! extension says so, checked for required keys in one pass, then
//! deserialized into typed models and validated against each other.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use mlstack_config::{StackConfig, ENVIRONMENT_CONFIG_PATH};
//!
//! let stack = StackConfig::load(
//!     Path::new(ENVIRONMENT_CONFIG_PATH),
//!     Path::new("conf/ml_master.json"),
//! )
//! .unwrap();
//!
//! for zone in stack.zones() {
//!     println!("{} -> {}", zone, stack.environment.subnet_for_zone(zone).unwrap());
//! }
//! ```

pub mod error;
pub mod loader;
pub mod models;
pub mod stack;
pub mod validator;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, DocumentFormat};
pub use models::{
    ClusterConfig, ConnectionDraining, EnvironmentConfig, HealthCheckPolicy, LoadBalancerPolicy,
    PortRange, ScalarValue, SubnetGroup, VolumeSpec,
};
pub use stack::{StackConfig, DEFAULT_CLUSTER_CONFIG_PATH, ENVIRONMENT_CONFIG_PATH};
pub use validator::{ConfigValidator, ValidationResult};
