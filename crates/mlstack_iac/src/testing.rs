//! Shared fixtures for unit tests.

use mlstack_config::{ClusterConfig, EnvironmentConfig, StackConfig};
use serde_json::{json, Value};

pub fn environment_document() -> Value {
    json!({
        "VpcId": "vpc-1234",
        "Zones": ["a", "b", "c"],
        "Subnets": {
            "Sandbox_DEV": {
                "PrivateSubnets": {
                    "Sandbox_DEV_PVT_1a": "subnet-a",
                    "Sandbox_DEV_PVT_1b": "subnet-b",
                    "Sandbox_DEV_PVT_1c": "subnet-c"
                }
            }
        }
    })
}

pub fn cluster_document(zones: &[&str], instances_per_zone: u32) -> Value {
    json!({
        "MarkLogicAMIImageId": "ami-1234",
        "InstanceType": "r3.xlarge",
        "KeyName": "dev-key",
        "IamInstanceProfile": "ml-profile",
        "Tenancy": "default",
        "Tags": ["Name"],
        "Zones": zones,
        "NumberOfInstancesPerZone": instances_per_zone,
        "DataVolumes": {"Size": 500, "Iops": 3000, "VolumeType": "io1", "Encrypted": true},
        "ConfigVolumes": {"Size": "20", "Iops": 300, "VolumeType": "io1", "Encrypted": false},
        "LoadBalancedPorts": {"FromPort": 8000, "ToPort": 8002},
        "ClusterPorts": {"FromPort": 7998, "ToPort": 7999},
        "LoadBalancer": {
            "AppCookieStickinessPolicy": [{"CookieName": "SessionID", "PolicyName": "MLSession"}],
            "ConnectionDrainingPolicy": {"Enabled": true, "Timeout": 60},
            "CrossZone": true,
            "HealthCheck": {
                "Target": "HTTP:7997/",
                "HealthyThreshold": "3",
                "UnhealthyThreshold": "5",
                "Interval": "10",
                "Timeout": "5"
            },
            "Listeners": [{"LoadBalancerPort": "8000", "InstancePort": "8000", "Protocol": "HTTP"}]
        }
    })
}

/// A validated configuration deploying `instances_per_zone` instances into `zones`.
pub fn stack_config(zones: &[&str], instances_per_zone: u32) -> StackConfig {
    let environment: EnvironmentConfig = serde_json::from_value(environment_document()).unwrap();
    let cluster: ClusterConfig =
        serde_json::from_value(cluster_document(zones, instances_per_zone)).unwrap();
    StackConfig::new(environment, cluster).unwrap()
}
