//! Resource factory.
//!
//! Every method builds one resource from configuration and a (zone, instance)
//! position. Nothing here touches a template; the caller decides what to add.

use mlstack_config::{PortRange, StackConfig, VolumeSpec};

use crate::error::IacResult;
use crate::resources::{
    ConnectionDrainingPolicy, HealthCheck, IngressRule, Instance, LaunchConfiguration,
    LoadBalancer, Named, NetworkInterface, NetworkInterfaceAttachment, Ref, SecurityGroup, Tag,
    UserData, Volume, VolumeAttachment,
};

pub const CLUSTER_SECURITY_GROUP: &str = "ClusterSecurityGroup";
pub const LOAD_BALANCER_SECURITY_GROUP: &str = "LoadBalancerSecurityGroup";
pub const LOAD_BALANCER: &str = "MarkLogicLoadBalancer";

pub const LAUNCH_CONFIG_LABEL: &str = "LaunchConfig";
pub const INSTANCE_LABEL: &str = "MarkLogic";
pub const NETWORK_INTERFACE_LABEL: &str = "MarkLogicNetworkInterface";
pub const NETWORK_INTERFACE_ATTACHMENT_LABEL: &str = "NetworkInterfaceAttachment";

/// Zone label used in tags of resources that span every zone.
pub const ALL_ZONES: &str = "allzones";

const ANYWHERE: &str = "0.0.0.0/0";
const NETWORK_INTERFACE_DEVICE_INDEX: u32 = 1;

/// Logical name of a positioned resource: label, zone, then instance number.
pub fn resource_name(label: &str, zone: &str, instance: Option<u32>) -> String {
    match instance {
        Some(number) => format!("{}{}{}", label, zone, number),
        None => format!("{}{}", label, zone),
    }
}

/// One tag per configured tag name, valued `<tag>-<role>-zone-<zone>[-instance-<n>]`.
pub fn tags_for(tag_names: &[String], role: &str, zone: &str, instance: Option<u32>) -> Vec<Tag> {
    tag_names
        .iter()
        .map(|tag| {
            let mut value = format!("{}-{}-zone-{}", tag, role, zone);
            if let Some(number) = instance {
                value.push_str(&format!("-instance-{}", number));
            }
            Tag {
                key: tag.clone(),
                value,
            }
        })
        .collect()
}

/// The two kinds of block storage attached to every instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeRole {
    Config,
    Data,
}

impl VolumeRole {
    pub fn label(&self) -> &'static str {
        match self {
            VolumeRole::Config => "MarkLogicConfigVolume",
            VolumeRole::Data => "MarkLogicDataVolume",
        }
    }

    pub fn attachment_label(&self) -> &'static str {
        match self {
            VolumeRole::Config => "ConfigVolumeAttachment",
            VolumeRole::Data => "DataVolumeAttachment",
        }
    }

    /// Role used in tag values.
    pub fn tag_role(&self) -> &'static str {
        match self {
            VolumeRole::Config => "ConfigVolume",
            VolumeRole::Data => "DataVolume",
        }
    }

    pub fn device(&self) -> &'static str {
        match self {
            VolumeRole::Config => "/dev/xvdh",
            VolumeRole::Data => "/dev/xvdg",
        }
    }
}

/// Builds resources from a validated [`StackConfig`].
pub struct ResourceFactory<'a> {
    config: &'a StackConfig,
}

impl<'a> ResourceFactory<'a> {
    pub fn new(config: &'a StackConfig) -> Self {
        Self { config }
    }

    pub fn tags(&self, role: &str, zone: &str, instance: Option<u32>) -> Vec<Tag> {
        tags_for(&self.config.cluster.tags, role, zone, instance)
    }

    pub fn subnet_id(&self, zone: &str) -> IacResult<String> {
        Ok(self.config.environment.subnet_for_zone(zone)?.to_string())
    }

    fn security_group(&self, name: &str, description: &str, ports: &PortRange) -> Named<SecurityGroup> {
        Named::new(
            name,
            SecurityGroup {
                group_description: description.to_string(),
                security_group_ingress: vec![IngressRule {
                    ip_protocol: "tcp".to_string(),
                    from_port: ports.from_port,
                    to_port: ports.to_port,
                    cidr_ip: ANYWHERE.to_string(),
                }],
                vpc_id: self.config.environment.vpc_id.clone(),
            },
        )
    }

    pub fn cluster_security_group(&self) -> Named<SecurityGroup> {
        self.security_group(
            CLUSTER_SECURITY_GROUP,
            "Enable communication of cluster ports e.g. For nodes within cluster and replication between clusters.",
            &self.config.cluster.cluster_ports,
        )
    }

    pub fn load_balancer_security_group(&self) -> Named<SecurityGroup> {
        self.security_group(
            LOAD_BALANCER_SECURITY_GROUP,
            "Enable HTTP/XDBC access on the inbound port",
            &self.config.cluster.load_balanced_ports,
        )
    }

    /// The load balancer spans every private subnet of the environment,
    /// whatever zones the cluster is deployed into.
    pub fn load_balancer(&self, security_groups: &[Ref]) -> IacResult<Named<LoadBalancer>> {
        let policy = &self.config.cluster.load_balancer;
        let subnets = self
            .config
            .environment
            .private_subnets()?
            .values()
            .cloned()
            .collect();

        Ok(Named::new(
            LOAD_BALANCER,
            LoadBalancer {
                app_cookie_stickiness_policy: policy.app_cookie_stickiness_policy.clone(),
                connection_draining_policy: ConnectionDrainingPolicy {
                    enabled: policy.connection_draining_policy.enabled,
                    timeout: policy.connection_draining_policy.timeout.clone(),
                },
                cross_zone: policy.cross_zone,
                health_check: HealthCheck {
                    target: policy.health_check.target.clone(),
                    healthy_threshold: policy.health_check.healthy_threshold.clone(),
                    unhealthy_threshold: policy.health_check.unhealthy_threshold.clone(),
                    interval: policy.health_check.interval.clone(),
                    timeout: policy.health_check.timeout.clone(),
                },
                listeners: policy.listeners.clone(),
                subnets,
                security_groups: security_groups.to_vec(),
                tags: self.tags("LoadBalancer", ALL_ZONES, None),
            },
        ))
    }

    pub fn launch_configuration(
        &self,
        zone: &str,
        instance: u32,
        security_groups: &[Ref],
    ) -> Named<LaunchConfiguration> {
        let cluster = &self.config.cluster;
        Named::new(
            resource_name(LAUNCH_CONFIG_LABEL, zone, Some(instance)),
            LaunchConfiguration {
                ebs_optimized: cluster.ebs_optimized,
                iam_instance_profile: cluster.iam_instance_profile.clone(),
                image_id: cluster.image_id.clone(),
                instance_type: cluster.instance_type.clone(),
                key_name: cluster.key_name.clone(),
                security_groups: security_groups.to_vec(),
                user_data: UserData::from_lines(&cluster.user_data),
            },
        )
    }

    pub fn instance(&self, zone: &str, instance: u32) -> IacResult<Named<Instance>> {
        let cluster = &self.config.cluster;
        Ok(Named::new(
            resource_name(INSTANCE_LABEL, zone, Some(instance)),
            Instance {
                availability_zone: zone.to_string(),
                ebs_optimized: cluster.ebs_optimized,
                image_id: cluster.image_id.clone(),
                instance_type: cluster.instance_type.clone(),
                subnet_id: self.subnet_id(zone)?,
                tags: self.tags("instance", zone, Some(instance)),
                tenancy: cluster.tenancy.clone(),
            },
        ))
    }

    fn volume_spec(&self, role: VolumeRole) -> &VolumeSpec {
        match role {
            VolumeRole::Config => &self.config.cluster.config_volumes,
            VolumeRole::Data => &self.config.cluster.data_volumes,
        }
    }

    pub fn volume(&self, role: VolumeRole, zone: &str, instance: u32) -> Named<Volume> {
        let spec = self.volume_spec(role);
        Named::new(
            resource_name(role.label(), zone, Some(instance)),
            Volume {
                availability_zone: zone.to_string(),
                encrypted: spec.encrypted,
                iops: spec.iops.clone(),
                size: spec.size.clone(),
                tags: self.tags(role.tag_role(), zone, Some(instance)),
                volume_type: spec.volume_type.clone(),
            },
        )
    }

    pub fn config_volume(&self, zone: &str, instance: u32) -> Named<Volume> {
        self.volume(VolumeRole::Config, zone, instance)
    }

    pub fn data_volume(&self, zone: &str, instance: u32) -> Named<Volume> {
        self.volume(VolumeRole::Data, zone, instance)
    }

    pub fn volume_attachment(
        &self,
        role: VolumeRole,
        zone: &str,
        instance_number: u32,
        instance: &Named<Instance>,
        volume: &Named<Volume>,
    ) -> Named<VolumeAttachment> {
        Named::new(
            resource_name(role.attachment_label(), zone, Some(instance_number)),
            VolumeAttachment {
                device: role.device().to_string(),
                instance_id: instance.reference(),
                volume_id: volume.reference(),
            },
        )
    }

    pub fn network_interface(
        &self,
        zone: &str,
        instance: u32,
        security_groups: &[Ref],
    ) -> IacResult<Named<NetworkInterface>> {
        Ok(Named::new(
            resource_name(NETWORK_INTERFACE_LABEL, zone, Some(instance)),
            NetworkInterface {
                description: format!("For MarkLogic zone {} instance {}", zone, instance),
                group_set: security_groups.to_vec(),
                subnet_id: self.subnet_id(zone)?,
                tags: self.tags("NetworkInterface", zone, Some(instance)),
            },
        ))
    }

    pub fn network_interface_attachment(
        &self,
        zone: &str,
        instance_number: u32,
        instance: &Named<Instance>,
        network_interface: &Named<NetworkInterface>,
    ) -> Named<NetworkInterfaceAttachment> {
        Named::new(
            resource_name(NETWORK_INTERFACE_ATTACHMENT_LABEL, zone, Some(instance_number)),
            NetworkInterfaceAttachment {
                delete_on_termination: false,
                device_index: NETWORK_INTERFACE_DEVICE_INDEX,
                instance_id: instance.reference(),
                network_interface_id: network_interface.reference(),
            },
        )
    }
}
