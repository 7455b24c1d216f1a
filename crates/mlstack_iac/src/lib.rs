//! # mlstack_iac
//!
//! CloudFormation template generation for a MarkLogic cluster.
//!
//! This crate turns a validated [`mlstack_config::StackConfig`] into a
//! [`Template`] holding the cluster's security groups, load balancer and,
//! per zone and instance, a launch configuration, an instance, config and
//! data volumes, a network interface and the attachments wiring them up.
//!
//! ## Features
//!
//! - Deterministic resource naming and tagging per (zone, instance)
//! - Attachments built from the referenced resources themselves
//! - Duplicate-name and dangling-reference checks before serialization
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use mlstack_config::StackConfig;
//! use mlstack_iac::generate_template;
//!
//! let config = StackConfig::load(
//!     Path::new("conf/aws_config.json"),
//!     Path::new("conf/ml_master.json"),
//! )
//! .unwrap();
//!
//! let template = generate_template(&config).unwrap();
//! println!("{}", template.to_json().unwrap());
//! ```

pub mod error;
pub mod factory;
pub mod resources;
pub mod template;
pub mod topology;

#[cfg(test)]
mod testing;

pub use error::{IacError, IacResult};
pub use factory::{resource_name, tags_for, ResourceFactory, VolumeRole};
pub use resources::{Named, Ref, ResourceBody, Tag};
pub use template::{Template, TEMPLATE_FORMAT_VERSION};
pub use topology::{expected_resource_count, generate_template, TopologyDriver};
