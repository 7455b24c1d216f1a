//! CloudFormation resource bodies.
//!
//! Each resource serializes as `{"Type": ..., "Properties": {...}}` through
//! [`ResourceBody`]. Cross-resource links are [`Ref`]s taken from a
//! constructed [`Named`] value, never typed-in names.

use mlstack_config::ScalarValue;
use serde::Serialize;
use serde_json::Value;

/// A resource value together with its logical name in the template.
#[derive(Debug, Clone, PartialEq)]
pub struct Named<T> {
    pub name: String,
    pub body: T,
}

impl<T> Named<T> {
    pub fn new(name: impl Into<String>, body: T) -> Self {
        Self {
            name: name.into(),
            body,
        }
    }

    /// Reference to this resource for use inside another resource.
    pub fn reference(&self) -> Ref {
        Ref {
            logical_id: self.name.clone(),
        }
    }
}

/// `{"Ref": "<logical name>"}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ref {
    #[serde(rename = "Ref")]
    pub logical_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Tag {
    pub key: String,
    pub value: String,
}

/// `{"Fn::Base64": {"Fn::Join": ["", [lines...]]}}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserData {
    #[serde(rename = "Fn::Base64")]
    encoded: Join,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct Join {
    #[serde(rename = "Fn::Join")]
    parts: (String, Vec<String>),
}

impl UserData {
    pub fn from_lines(lines: &[String]) -> Self {
        Self {
            encoded: Join {
                parts: (String::new(), lines.to_vec()),
            },
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.encoded.parts.1
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct IngressRule {
    pub ip_protocol: String,
    pub from_port: u16,
    pub to_port: u16,
    pub cidr_ip: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SecurityGroup {
    pub group_description: String,
    pub security_group_ingress: Vec<IngressRule>,
    pub vpc_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Instance {
    pub availability_zone: String,
    pub ebs_optimized: bool,
    pub image_id: String,
    pub instance_type: String,
    pub subnet_id: String,
    pub tags: Vec<Tag>,
    pub tenancy: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Volume {
    pub availability_zone: String,
    pub encrypted: bool,
    pub iops: ScalarValue,
    pub size: ScalarValue,
    pub tags: Vec<Tag>,
    pub volume_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct VolumeAttachment {
    pub device: String,
    pub instance_id: Ref,
    pub volume_id: Ref,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct NetworkInterface {
    pub description: String,
    pub group_set: Vec<Ref>,
    pub subnet_id: String,
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct NetworkInterfaceAttachment {
    pub delete_on_termination: bool,
    pub device_index: u32,
    pub instance_id: Ref,
    pub network_interface_id: Ref,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct LaunchConfiguration {
    pub ebs_optimized: bool,
    pub iam_instance_profile: String,
    pub image_id: String,
    pub instance_type: String,
    pub key_name: String,
    pub security_groups: Vec<Ref>,
    pub user_data: UserData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct HealthCheck {
    pub target: String,
    pub healthy_threshold: ScalarValue,
    pub unhealthy_threshold: ScalarValue,
    pub interval: ScalarValue,
    pub timeout: ScalarValue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ConnectionDrainingPolicy {
    pub enabled: bool,
    pub timeout: ScalarValue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct LoadBalancer {
    pub app_cookie_stickiness_policy: Value,
    pub connection_draining_policy: ConnectionDrainingPolicy,
    pub cross_zone: bool,
    pub health_check: HealthCheck,
    pub listeners: Vec<Value>,
    pub subnets: Vec<String>,
    pub security_groups: Vec<Ref>,
    pub tags: Vec<Tag>,
}

/// Any resource the template can hold.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "Type", content = "Properties")]
pub enum ResourceBody {
    #[serde(rename = "AWS::EC2::SecurityGroup")]
    SecurityGroup(SecurityGroup),
    #[serde(rename = "AWS::ElasticLoadBalancing::LoadBalancer")]
    LoadBalancer(LoadBalancer),
    #[serde(rename = "AWS::AutoScaling::LaunchConfiguration")]
    LaunchConfiguration(LaunchConfiguration),
    #[serde(rename = "AWS::EC2::Instance")]
    Instance(Instance),
    #[serde(rename = "AWS::EC2::Volume")]
    Volume(Volume),
    #[serde(rename = "AWS::EC2::VolumeAttachment")]
    VolumeAttachment(VolumeAttachment),
    #[serde(rename = "AWS::EC2::NetworkInterface")]
    NetworkInterface(NetworkInterface),
    #[serde(rename = "AWS::EC2::NetworkInterfaceAttachment")]
    NetworkInterfaceAttachment(NetworkInterfaceAttachment),
}

impl ResourceBody {
    /// CloudFormation type name.
    pub fn type_name(&self) -> &'static str {
        match self {
            ResourceBody::SecurityGroup(_) => "AWS::EC2::SecurityGroup",
            ResourceBody::LoadBalancer(_) => "AWS::ElasticLoadBalancing::LoadBalancer",
            ResourceBody::LaunchConfiguration(_) => "AWS::AutoScaling::LaunchConfiguration",
            ResourceBody::Instance(_) => "AWS::EC2::Instance",
            ResourceBody::Volume(_) => "AWS::EC2::Volume",
            ResourceBody::VolumeAttachment(_) => "AWS::EC2::VolumeAttachment",
            ResourceBody::NetworkInterface(_) => "AWS::EC2::NetworkInterface",
            ResourceBody::NetworkInterfaceAttachment(_) => "AWS::EC2::NetworkInterfaceAttachment",
        }
    }

    /// Every other resource this one points at.
    pub fn references(&self) -> Vec<&Ref> {
        match self {
            ResourceBody::SecurityGroup(_)
            | ResourceBody::Instance(_)
            | ResourceBody::Volume(_) => Vec::new(),
            ResourceBody::LoadBalancer(lb) => lb.security_groups.iter().collect(),
            ResourceBody::LaunchConfiguration(lc) => lc.security_groups.iter().collect(),
            ResourceBody::NetworkInterface(nic) => nic.group_set.iter().collect(),
            ResourceBody::VolumeAttachment(att) => vec![&att.instance_id, &att.volume_id],
            ResourceBody::NetworkInterfaceAttachment(att) => {
                vec![&att.instance_id, &att.network_interface_id]
            }
        }
    }

    pub fn is_attachment(&self) -> bool {
        matches!(
            self,
            ResourceBody::VolumeAttachment(_) | ResourceBody::NetworkInterfaceAttachment(_)
        )
    }
}

macro_rules! impl_into_body {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for ResourceBody {
                fn from(body: $variant) -> Self {
                    ResourceBody::$variant(body)
                }
            }
        )*
    };
}

impl_into_body!(
    SecurityGroup,
    LoadBalancer,
    LaunchConfiguration,
    Instance,
    Volume,
    VolumeAttachment,
    NetworkInterface,
    NetworkInterfaceAttachment,
);
