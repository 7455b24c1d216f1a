//! Configuration validation.
//!
//! Required keys are checked on the untyped document so that every missing
//! key path is reported in one pass, before typed deserialization.

use std::collections::{HashMap, HashSet};

use serde_json::Value;
use tracing::warn;

use crate::error::{ConfigError, ConfigResult};
use crate::models::DEFAULT_SUBNET_GROUP;
use crate::stack::StackConfig;

/// Keys every environment document must provide.
pub const ENVIRONMENT_REQUIRED_KEYS: &[&str] = &["VpcId", "Zones", "Subnets"];

/// Keys every cluster document must provide.
pub const CLUSTER_REQUIRED_KEYS: &[&str] = &[
    "MarkLogicAMIImageId",
    "InstanceType",
    "KeyName",
    "IamInstanceProfile",
    "Tenancy",
    "Tags",
    "NumberOfInstancesPerZone",
    "DataVolumes.Size",
    "DataVolumes.Iops",
    "DataVolumes.VolumeType",
    "DataVolumes.Encrypted",
    "ConfigVolumes.Size",
    "ConfigVolumes.Iops",
    "ConfigVolumes.VolumeType",
    "ConfigVolumes.Encrypted",
    "LoadBalancedPorts.FromPort",
    "LoadBalancedPorts.ToPort",
    "ClusterPorts.FromPort",
    "ClusterPorts.ToPort",
    "LoadBalancer.AppCookieStickinessPolicy",
    "LoadBalancer.Listeners",
    "LoadBalancer.HealthCheck.Target",
    "LoadBalancer.HealthCheck.HealthyThreshold",
    "LoadBalancer.HealthCheck.UnhealthyThreshold",
    "LoadBalancer.HealthCheck.Interval",
    "LoadBalancer.HealthCheck.Timeout",
    "LoadBalancer.ConnectionDrainingPolicy.Enabled",
    "LoadBalancer.ConnectionDrainingPolicy.Timeout",
];

/// Validation result with details.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn add_error(&mut self, message: impl Into<String>) {
        self.valid = false;
        self.errors.push(message.into());
    }

    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn merge(&mut self, other: ValidationResult) {
        if !other.valid {
            self.valid = false;
        }
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    /// Log warnings and turn errors into a single configuration error.
    pub fn into_result(self) -> ConfigResult<()> {
        for warning in &self.warnings {
            warn!("{}", warning);
        }
        if self.valid {
            Ok(())
        } else {
            Err(ConfigError::Invalid(self.errors))
        }
    }
}

/// Validator for configuration documents.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Look up a nested value by path segments. `null` counts as absent.
    pub fn lookup<'a, S: AsRef<str>>(document: &'a Value, path: &[S]) -> Option<&'a Value> {
        path.iter()
            .try_fold(document, |node, segment| node.get(segment.as_ref()))
            .filter(|value| !value.is_null())
    }

    /// Dotted paths from `required` that are absent in `document`.
    pub fn missing_keys(document: &Value, required: &[&str]) -> Vec<String> {
        required
            .iter()
            .filter(|path| {
                let segments: Vec<&str> = path.split('.').collect();
                Self::lookup(document, &segments).is_none()
            })
            .map(|path| path.to_string())
            .collect()
    }

    /// Check the environment document, including the selected subnet group.
    pub fn check_environment_keys(document: &Value) -> ConfigResult<()> {
        let mut missing = Self::missing_keys(document, ENVIRONMENT_REQUIRED_KEYS);

        if Self::lookup(document, &["Subnets"]).is_some() {
            let group = document
                .get("SubnetGroup")
                .and_then(Value::as_str)
                .unwrap_or(DEFAULT_SUBNET_GROUP);
            if Self::lookup(document, &["Subnets", group, "PrivateSubnets"]).is_none() {
                missing.push(format!("Subnets.{}.PrivateSubnets", group));
            }
        }

        Self::report("environment", missing)
    }

    /// Check the cluster document.
    pub fn check_cluster_keys(document: &Value) -> ConfigResult<()> {
        Self::report("cluster", Self::missing_keys(document, CLUSTER_REQUIRED_KEYS))
    }

    fn report(document: &str, keys: Vec<String>) -> ConfigResult<()> {
        if keys.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::MissingKeys {
                document: document.to_string(),
                keys,
            })
        }
    }

    /// Cross-document checks on loaded configuration.
    ///
    /// Zone resolution failures are reported as [`ConfigError::UnknownZone`];
    /// everything else is collected into [`ConfigError::Invalid`].
    pub fn validate_stack(stack: &StackConfig) -> ConfigResult<()> {
        for zone in stack.zones() {
            stack.environment.subnet_for_zone(zone)?;
        }

        let mut result = ValidationResult::new();
        result.merge(Self::validate_zones(stack.zones()));
        result.merge(Self::validate_instance_names(
            stack.zones(),
            stack.cluster.number_of_instances_per_zone,
        ));
        result.merge(Self::validate_cluster(stack));

        if stack.environment.private_subnets()?.is_empty() {
            result.add_warning(format!(
                "Subnet group '{}' has no private subnets, the load balancer will have none",
                stack.environment.subnet_group
            ));
        }

        result.into_result()
    }

    /// Zone names must be non-empty and distinct so resource names stay unique.
    pub fn validate_zones(zones: &[String]) -> ValidationResult {
        let mut result = ValidationResult::new();

        if zones.is_empty() {
            result.add_warning("Zone list is empty, no cluster instances will be generated");
        }

        let mut seen = HashSet::new();
        for zone in zones {
            if zone.is_empty() {
                result.add_error("Zone names cannot be empty");
            } else if !seen.insert(zone.as_str()) {
                result.add_error(format!("Zone '{}' is listed more than once", zone));
            }
        }

        result
    }

    /// Per-instance names are `label + zone + number`, so distinct
    /// (zone, number) pairs must not concatenate to the same suffix.
    pub fn validate_instance_names(zones: &[String], instances_per_zone: u32) -> ValidationResult {
        let mut result = ValidationResult::new();
        let mut seen: HashMap<String, (&str, u32)> = HashMap::new();

        for zone in zones {
            for number in 1..=instances_per_zone {
                let suffix = format!("{}{}", zone, number);
                match seen.get(&suffix) {
                    Some(&(other_zone, other_number)) if other_zone != zone.as_str() => {
                        result.add_error(format!(
                            "Zone '{}' instance {} and zone '{}' instance {} both produce resource suffix '{}'",
                            other_zone, other_number, zone, number, suffix
                        ));
                    }
                    Some(_) => {}
                    None => {
                        seen.insert(suffix, (zone.as_str(), number));
                    }
                }
            }
        }

        result
    }

    fn validate_cluster(stack: &StackConfig) -> ValidationResult {
        let mut result = ValidationResult::new();
        let cluster = &stack.cluster;

        for (name, range) in [
            ("LoadBalancedPorts", &cluster.load_balanced_ports),
            ("ClusterPorts", &cluster.cluster_ports),
        ] {
            if !range.is_ordered() {
                result.add_warning(format!(
                    "{} FromPort {} is greater than ToPort {}",
                    name, range.from_port, range.to_port
                ));
            }
        }

        if cluster.number_of_instances_per_zone == 0 {
            result.add_warning("NumberOfInstancesPerZone is 0, no cluster instances will be generated");
        }

        if cluster.tags.is_empty() {
            result.add_warning("Tags is empty, generated resources will be untagged");
        }

        result
    }
}
