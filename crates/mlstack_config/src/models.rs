//! Typed configuration models.
//!
//! Field names follow the PascalCase keys of the JSON documents.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ConfigError, ConfigResult};

pub const DEFAULT_SUBNET_GROUP: &str = "Sandbox_DEV";
pub const DEFAULT_PRIVATE_SUBNET_PREFIX: &str = "Sandbox_DEV_PVT_1";

/// A number-or-string value copied verbatim into the template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Number(serde_json::Number),
    Text(String),
}

impl From<u64> for ScalarValue {
    fn from(value: u64) -> Self {
        ScalarValue::Number(value.into())
    }
}

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        ScalarValue::Text(value.to_string())
    }
}

/// Deployment-environment facts shared by every cluster.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EnvironmentConfig {
    pub vpc_id: String,
    pub zones: Vec<String>,
    pub subnets: BTreeMap<String, SubnetGroup>,
    /// Which entry of `Subnets` holds the cluster's private subnets.
    #[serde(default = "default_subnet_group")]
    pub subnet_group: String,
    /// Prefix joined with a zone name to form a private subnet key.
    #[serde(default = "default_private_subnet_prefix")]
    pub private_subnet_prefix: String,
}

fn default_subnet_group() -> String {
    DEFAULT_SUBNET_GROUP.to_string()
}

fn default_private_subnet_prefix() -> String {
    DEFAULT_PRIVATE_SUBNET_PREFIX.to_string()
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SubnetGroup {
    #[serde(default)]
    pub private_subnets: BTreeMap<String, String>,
}

impl EnvironmentConfig {
    /// All private subnets of the configured subnet group, keyed by subnet key.
    pub fn private_subnets(&self) -> ConfigResult<&BTreeMap<String, String>> {
        self.subnets
            .get(&self.subnet_group)
            .map(|group| &group.private_subnets)
            .ok_or_else(|| {
                ConfigError::missing_key(
                    "environment",
                    format!("Subnets.{}.PrivateSubnets", self.subnet_group),
                )
            })
    }

    /// Key under which the private subnet of `zone` is stored.
    pub fn subnet_key(&self, zone: &str) -> String {
        format!("{}{}", self.private_subnet_prefix, zone)
    }

    /// Resolve the private subnet id for a zone.
    pub fn subnet_for_zone(&self, zone: &str) -> ConfigResult<&str> {
        let key = self.subnet_key(zone);
        self.private_subnets()?
            .get(&key)
            .map(String::as_str)
            .ok_or_else(|| ConfigError::UnknownZone {
                zone: zone.to_string(),
                key,
            })
    }
}

/// Cluster parameters supplied by the operator.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ClusterConfig {
    #[serde(rename = "MarkLogicAMIImageId")]
    pub image_id: String,
    pub instance_type: String,
    pub key_name: String,
    pub iam_instance_profile: String,
    pub tenancy: String,
    #[serde(default)]
    pub ebs_optimized: bool,
    pub tags: Vec<String>,
    pub number_of_instances_per_zone: u32,
    pub data_volumes: VolumeSpec,
    pub config_volumes: VolumeSpec,
    pub load_balanced_ports: PortRange,
    pub cluster_ports: PortRange,
    pub load_balancer: LoadBalancerPolicy,
    /// Overrides the environment's zone list when present.
    #[serde(default)]
    pub zones: Option<Vec<String>>,
    /// Boot script lines for launch configurations.
    #[serde(default = "default_user_data")]
    pub user_data: Vec<String>,
}

pub fn default_user_data() -> Vec<String> {
    vec![
        "#!/bin/bash\n".to_string(),
        "echo \"<?php phpinfo(); ?>\" > /tmp/userdata.log".to_string(),
    ]
}

/// Block storage parameters shared by every volume of one kind.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VolumeSpec {
    pub size: ScalarValue,
    pub iops: ScalarValue,
    pub volume_type: String,
    pub encrypted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PortRange {
    pub from_port: u16,
    pub to_port: u16,
}

impl PortRange {
    pub fn is_ordered(&self) -> bool {
        self.from_port <= self.to_port
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LoadBalancerPolicy {
    pub app_cookie_stickiness_policy: Value,
    pub connection_draining_policy: ConnectionDraining,
    #[serde(default)]
    pub cross_zone: bool,
    pub health_check: HealthCheckPolicy,
    pub listeners: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ConnectionDraining {
    pub enabled: bool,
    pub timeout: ScalarValue,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HealthCheckPolicy {
    pub target: String,
    pub healthy_threshold: ScalarValue,
    pub unhealthy_threshold: ScalarValue,
    pub interval: ScalarValue,
    pub timeout: ScalarValue,
}
