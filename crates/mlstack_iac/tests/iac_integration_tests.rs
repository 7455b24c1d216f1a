//! Integration tests for template generation.

use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use mlstack_config::{ClusterConfig, ConfigError, EnvironmentConfig, StackConfig};
use mlstack_iac::{expected_resource_count, generate_template, tags_for, IacError, ResourceBody};
use proptest::prelude::*;
use serde_json::{json, Value};
use tempfile::{tempdir, TempDir};

const ZONES: [&str; 5] = ["a", "b", "c", "d", "e"];

fn environment_document() -> Value {
    let subnets: serde_json::Map<String, Value> = ZONES
        .iter()
        .map(|zone| (format!("Sandbox_DEV_PVT_1{}", zone), json!(format!("subnet-{}", zone))))
        .collect();

    json!({
        "VpcId": "vpc-1234",
        "Zones": ["a", "b", "c"],
        "Subnets": {"Sandbox_DEV": {"PrivateSubnets": subnets}}
    })
}

fn cluster_document(instances_per_zone: u32) -> Value {
    json!({
        "MarkLogicAMIImageId": "ami-1234",
        "InstanceType": "r3.xlarge",
        "KeyName": "dev-key",
        "IamInstanceProfile": "ml-profile",
        "Tenancy": "dedicated",
        "EbsOptimized": true,
        "Tags": ["Name", "Cluster"],
        "NumberOfInstancesPerZone": instances_per_zone,
        "DataVolumes": {"Size": 500, "Iops": 3000, "VolumeType": "io1", "Encrypted": true},
        "ConfigVolumes": {"Size": 20, "Iops": 300, "VolumeType": "io1", "Encrypted": true},
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

fn stack(zones: Option<&[&str]>, instances_per_zone: u32) -> StackConfig {
    let environment: EnvironmentConfig = serde_json::from_value(environment_document()).unwrap();
    let mut cluster_doc = cluster_document(instances_per_zone);
    if let Some(zones) = zones {
        cluster_doc["Zones"] = json!(zones);
    }
    let cluster: ClusterConfig = serde_json::from_value(cluster_doc).unwrap();
    StackConfig::new(environment, cluster).unwrap()
}

fn write_json(dir: &TempDir, name: &str, document: &Value) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, serde_json::to_string(document).unwrap()).unwrap();
    path
}

fn rendered(config: &StackConfig) -> Value {
    let json = generate_template(config).unwrap().to_json().unwrap();
    serde_json::from_str(&json).unwrap()
}

#[test]
fn test_two_zones_two_instances() {
    let config = stack(Some(&["a", "b"][..]), 2);
    let template = generate_template(&config).unwrap();

    assert_eq!(template.len(), expected_resource_count(2, 2));
    assert_eq!(
        template.names_of_type("AWS::EC2::Instance"),
        vec!["MarkLogica1", "MarkLogica2", "MarkLogicb1", "MarkLogicb2"]
    );
    assert_eq!(template.names_of_type("AWS::EC2::Volume").len(), 8);
    assert_eq!(template.names_of_type("AWS::EC2::VolumeAttachment").len(), 8);
    assert_eq!(template.names_of_type("AWS::EC2::NetworkInterface").len(), 4);
    assert_eq!(template.names_of_type("AWS::EC2::NetworkInterfaceAttachment").len(), 4);
    assert_eq!(template.names_of_type("AWS::AutoScaling::LaunchConfiguration").len(), 4);
    assert_eq!(template.names_of_type("AWS::EC2::SecurityGroup").len(), 2);
    assert_eq!(template.names_of_type("AWS::ElasticLoadBalancing::LoadBalancer").len(), 1);
}

#[test]
fn test_uppercase_zone_names() {
    let environment = json!({
        "VpcId": "vpc-1",
        "Zones": ["A", "B"],
        "Subnets": {"Sandbox_DEV": {"PrivateSubnets": {
            "Sandbox_DEV_PVT_1A": "subnet-A",
            "Sandbox_DEV_PVT_1B": "subnet-B"
        }}}
    });
    let config = StackConfig::new(
        serde_json::from_value(environment).unwrap(),
        serde_json::from_value(cluster_document(2)).unwrap(),
    )
    .unwrap();

    let template = generate_template(&config).unwrap();
    assert_eq!(
        template.names_of_type("AWS::EC2::Instance"),
        vec!["MarkLogicA1", "MarkLogicA2", "MarkLogicB1", "MarkLogicB2"]
    );
}

#[test]
fn test_no_zones_and_no_subnets_gives_shared_resources() {
    let environment = json!({
        "VpcId": "vpc-1",
        "Zones": [],
        "Subnets": {"Sandbox_DEV": {"PrivateSubnets": {}}}
    });
    let config = StackConfig::new(
        serde_json::from_value(environment).unwrap(),
        serde_json::from_value(cluster_document(2)).unwrap(),
    )
    .unwrap();

    let doc = rendered(&config);
    let resources = doc["Resources"].as_object().unwrap();
    assert_eq!(resources.len(), expected_resource_count(0, 2));
    assert_eq!(resources["MarkLogicLoadBalancer"]["Properties"]["Subnets"], json!([]));
}

#[test]
fn test_colliding_instance_names_fail_before_generation() {
    let environment = json!({
        "VpcId": "vpc-1",
        "Zones": ["a", "a1"],
        "Subnets": {"Sandbox_DEV": {"PrivateSubnets": {
            "Sandbox_DEV_PVT_1a": "subnet-a",
            "Sandbox_DEV_PVT_1a1": "subnet-a1"
        }}}
    });

    let err = StackConfig::new(
        serde_json::from_value(environment).unwrap(),
        serde_json::from_value(cluster_document(11)).unwrap(),
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn test_rendered_document_shape() {
    let doc = rendered(&stack(Some(&["b"][..]), 1));

    assert_eq!(doc["AWSTemplateFormatVersion"], "2010-09-09");
    let resources = &doc["Resources"];

    let instance = &resources["MarkLogicb1"];
    assert_eq!(instance["Type"], "AWS::EC2::Instance");
    assert_eq!(instance["Properties"]["SubnetId"], "subnet-b");
    assert_eq!(instance["Properties"]["Tenancy"], "dedicated");
    assert_eq!(instance["Properties"]["EbsOptimized"], true);
    assert_eq!(
        instance["Properties"]["Tags"],
        json!([
            {"Key": "Name", "Value": "Name-instance-zone-b-instance-1"},
            {"Key": "Cluster", "Value": "Cluster-instance-zone-b-instance-1"}
        ])
    );

    let data_attachment = &resources["DataVolumeAttachmentb1"]["Properties"];
    assert_eq!(data_attachment["Device"], "/dev/xvdg");
    assert_eq!(data_attachment["InstanceId"], json!({"Ref": "MarkLogicb1"}));
    assert_eq!(data_attachment["VolumeId"], json!({"Ref": "MarkLogicDataVolumeb1"}));

    let nic_attachment = &resources["NetworkInterfaceAttachmentb1"]["Properties"];
    assert_eq!(nic_attachment["DeviceIndex"], 1);
    assert_eq!(nic_attachment["DeleteOnTermination"], false);

    let nic = &resources["MarkLogicNetworkInterfaceb1"]["Properties"];
    assert_eq!(nic["GroupSet"], json!([{"Ref": "ClusterSecurityGroup"}]));

    let launch_config = &resources["LaunchConfigb1"];
    assert_eq!(launch_config["Type"], "AWS::AutoScaling::LaunchConfiguration");
    assert_eq!(
        launch_config["Properties"]["SecurityGroups"],
        json!([{"Ref": "ClusterSecurityGroup"}])
    );
    assert!(launch_config["Properties"]["UserData"]["Fn::Base64"]["Fn::Join"].is_array());

    let load_balancer = &resources["MarkLogicLoadBalancer"]["Properties"];
    assert_eq!(load_balancer["SecurityGroups"], json!([{"Ref": "LoadBalancerSecurityGroup"}]));
    assert_eq!(load_balancer["CrossZone"], true);
    assert_eq!(load_balancer["HealthCheck"]["Interval"], "10");
    assert_eq!(load_balancer["ConnectionDrainingPolicy"], json!({"Enabled": true, "Timeout": 60}));
    assert_eq!(
        load_balancer["Listeners"],
        json!([{"LoadBalancerPort": "8000", "InstancePort": "8000", "Protocol": "HTTP"}])
    );

    let group = &resources["LoadBalancerSecurityGroup"]["Properties"];
    assert_eq!(group["VpcId"], "vpc-1234");
    assert_eq!(
        group["SecurityGroupIngress"],
        json!([{"IpProtocol": "tcp", "FromPort": 8000, "ToPort": 8002, "CidrIp": "0.0.0.0/0"}])
    );
}

#[test]
fn test_launch_configuration_is_never_referenced() {
    let template = generate_template(&stack(None, 1)).unwrap();
    let launch_configs = template.names_of_type("AWS::AutoScaling::LaunchConfiguration");

    for (_, body) in template.resources() {
        for reference in body.references() {
            assert!(!launch_configs.contains(&reference.logical_id.as_str()));
        }
    }
}

#[test]
fn test_end_to_end_from_files() {
    let dir = tempdir().unwrap();
    let env_path = write_json(&dir, "aws_config.json", &environment_document());
    let cluster_path = write_json(&dir, "ml_master.json", &cluster_document(1));

    let config = StackConfig::load(&env_path, &cluster_path).unwrap();
    let doc = rendered(&config);
    assert_eq!(doc["Resources"].as_object().unwrap().len(), expected_resource_count(3, 1));
}

#[test]
fn test_missing_instance_type_fails_before_generation() {
    let dir = tempdir().unwrap();
    let env_path = write_json(&dir, "aws_config.json", &environment_document());
    let mut cluster = cluster_document(1);
    cluster.as_object_mut().unwrap().remove("InstanceType");
    let cluster_path = write_json(&dir, "ml_master.json", &cluster);

    let err = StackConfig::load(&env_path, &cluster_path).unwrap_err();
    assert!(matches!(err, ConfigError::MissingKeys { .. }));
}

#[test]
fn test_zone_without_subnet_is_a_config_error() {
    let mut config = stack(Some(&["a"][..]), 1);
    config.cluster.zones = Some(vec!["f".to_string()]);

    match generate_template(&config).unwrap_err() {
        IacError::Config(ConfigError::UnknownZone { zone, .. }) => assert_eq!(zone, "f"),
        other => panic!("expected UnknownZone, got {:?}", other),
    }
}

proptest! {
    #[test]
    fn prop_resource_count_and_unique_names(
        zones in prop::sample::subsequence(ZONES.to_vec(), 0..=ZONES.len()),
        instances in 0u32..6,
    ) {
        let config = stack(Some(zones.as_slice()), instances);
        let template = generate_template(&config).unwrap();

        prop_assert_eq!(template.len(), expected_resource_count(zones.len(), instances));

        let names: HashSet<&str> = template.resources().map(|(name, _)| name).collect();
        prop_assert_eq!(names.len(), template.len());
    }

    #[test]
    fn prop_references_are_closed(
        zones in prop::sample::subsequence(ZONES.to_vec(), 0..=ZONES.len()),
        instances in 0u32..4,
    ) {
        let template = generate_template(&stack(Some(zones.as_slice()), instances)).unwrap();
        prop_assert!(template.validate_references().is_ok());

        for (_, body) in template.resources() {
            if body.is_attachment() {
                for reference in body.references() {
                    prop_assert!(template.contains(&reference.logical_id));
                }
            }
        }
    }

    #[test]
    fn prop_load_balancer_spans_all_private_subnets(
        zones in prop::sample::subsequence(ZONES.to_vec(), 0..=ZONES.len()),
    ) {
        let template = generate_template(&stack(Some(zones.as_slice()), 1)).unwrap();
        let subnets = match template.get("MarkLogicLoadBalancer") {
            Some(ResourceBody::LoadBalancer(lb)) => lb.subnets.clone(),
            other => panic!("expected load balancer, got {:?}", other),
        };

        let expected: Vec<String> = ZONES.iter().map(|zone| format!("subnet-{}", zone)).collect();
        prop_assert_eq!(subnets, expected);
    }

    #[test]
    fn prop_tags_are_pure(
        names in prop::collection::vec("[A-Za-z]{1,8}", 0..4),
        role in "[A-Za-z]{1,12}",
        zone in "[a-z]{1,3}",
        instance in prop::option::of(1u32..20),
    ) {
        let first = tags_for(&names, &role, &zone, instance);
        let second = tags_for(&names, &role, &zone, instance);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.len(), names.len());
        for (tag, name) in first.iter().zip(&names) {
            let base = format!("{}-{}-zone-{}", name, role, zone);
            let expected = match instance {
                Some(number) => format!("{}-instance-{}", base, number),
                None => base,
            };
            prop_assert_eq!(&tag.key, name);
            prop_assert_eq!(&tag.value, &expected);
        }
    }
}
