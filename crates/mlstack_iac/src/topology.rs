//! Topology driver.
//!
//! Walks zones × instance numbers and adds every resource to a fresh
//! template in a fixed order, so the same configuration always yields the
//! same document.

use mlstack_config::StackConfig;
use tracing::{debug, info};

use crate::error::IacResult;
use crate::factory::{ResourceFactory, VolumeRole};
use crate::resources::Ref;
use crate::template::{Template, TEMPLATE_FORMAT_VERSION};

/// Resources added once per template: two security groups and the load balancer.
pub const SHARED_RESOURCES: usize = 3;

/// Resources added per instance: launch configuration, instance, two volumes,
/// two volume attachments, network interface and its attachment.
pub const RESOURCES_PER_INSTANCE: usize = 8;

/// Number of resources a template for `zones` × `instances_per_zone` holds.
pub fn expected_resource_count(zones: usize, instances_per_zone: u32) -> usize {
    SHARED_RESOURCES + RESOURCES_PER_INSTANCE * zones * instances_per_zone as usize
}

/// Drives the resource factory over the configured cluster topology.
pub struct TopologyDriver<'a> {
    config: &'a StackConfig,
    factory: ResourceFactory<'a>,
}

impl<'a> TopologyDriver<'a> {
    pub fn new(config: &'a StackConfig) -> Self {
        Self {
            config,
            factory: ResourceFactory::new(config),
        }
    }

    /// Build the complete template. On error nothing is returned.
    pub fn build(&self) -> IacResult<Template> {
        let mut template = Template::new().with_version(TEMPLATE_FORMAT_VERSION);

        let cluster_group = template.add_resource(self.factory.cluster_security_group())?;
        let load_balancer_group = template.add_resource(self.factory.load_balancer_security_group())?;
        template.add_resource(self.factory.load_balancer(&[load_balancer_group])?)?;

        let cluster_groups = [cluster_group];
        for zone in self.config.zones() {
            debug!("Generating resources for zone {}", zone);
            for instance in self.config.instance_numbers() {
                self.add_instance_group(&mut template, zone, instance, &cluster_groups)?;
            }
        }

        info!(
            "Generated template with {} resources across {} zone(s)",
            template.len(),
            self.config.zones().len()
        );

        Ok(template)
    }

    /// Add everything belonging to one cluster node; the instance goes last.
    fn add_instance_group(
        &self,
        template: &mut Template,
        zone: &str,
        number: u32,
        security_groups: &[Ref],
    ) -> IacResult<()> {
        let factory = &self.factory;
        debug!("Generating instance {} in zone {}", number, zone);

        template.add_resource(factory.launch_configuration(zone, number, security_groups))?;

        let instance = factory.instance(zone, number)?;

        for role in [VolumeRole::Config, VolumeRole::Data] {
            let volume = factory.volume(role, zone, number);
            let attachment = factory.volume_attachment(role, zone, number, &instance, &volume);
            template.add_resource(volume)?;
            template.add_resource(attachment)?;
        }

        let network_interface = factory.network_interface(zone, number, security_groups)?;
        let attachment =
            factory.network_interface_attachment(zone, number, &instance, &network_interface);
        template.add_resource(network_interface)?;
        template.add_resource(attachment)?;

        template.add_resource(instance)?;
        Ok(())
    }
}

/// Build the template for a loaded configuration.
pub fn generate_template(config: &StackConfig) -> IacResult<Template> {
    TopologyDriver::new(config).build()
}
