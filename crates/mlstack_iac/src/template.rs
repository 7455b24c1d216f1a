//! Template assembly and serialization.

use std::collections::HashSet;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use tracing::debug;

use crate::error::{IacError, IacResult};
use crate::resources::{Named, Ref, ResourceBody};

/// CloudFormation template format version.
pub const TEMPLATE_FORMAT_VERSION: &str = "2010-09-09";

/// An append-only CloudFormation template.
///
/// Resources keep their insertion order when serialized.
#[derive(Debug, Clone)]
pub struct Template {
    version: Option<String>,
    resources: Vec<(String, ResourceBody)>,
    names: HashSet<String>,
}

impl Template {
    pub fn new() -> Self {
        Self {
            version: None,
            resources: Vec::new(),
            names: HashSet::new(),
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Add a resource under its name. Returns a reference to it.
    pub fn add_resource<T: Into<ResourceBody>>(&mut self, resource: Named<T>) -> IacResult<Ref> {
        let Named { name, body } = resource;
        if !self.names.insert(name.clone()) {
            return Err(IacError::DuplicateResource(name));
        }

        let body = body.into();
        debug!("Adding {} {}", body.type_name(), name);

        let reference = Ref {
            logical_id: name.clone(),
        };
        self.resources.push((name, body));
        Ok(reference)
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn get(&self, name: &str) -> Option<&ResourceBody> {
        self.resources
            .iter()
            .find(|(resource_name, _)| resource_name == name)
            .map(|(_, body)| body)
    }

    /// Resources in insertion order.
    pub fn resources(&self) -> impl Iterator<Item = (&str, &ResourceBody)> {
        self.resources.iter().map(|(name, body)| (name.as_str(), body))
    }

    /// Names of resources with the given CloudFormation type, in order.
    pub fn names_of_type(&self, type_name: &str) -> Vec<&str> {
        self.resources()
            .filter(|(_, body)| body.type_name() == type_name)
            .map(|(name, _)| name)
            .collect()
    }

    /// Check that every `Ref` names a resource in this template.
    pub fn validate_references(&self) -> IacResult<()> {
        for (name, body) in self.resources() {
            for reference in body.references() {
                if !self.contains(&reference.logical_id) {
                    return Err(IacError::DanglingReference {
                        resource: name.to_string(),
                        target: reference.logical_id.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Serialize to pretty-printed JSON after checking references.
    pub fn to_json(&self) -> IacResult<String> {
        self.validate_references()?;
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for Template {
    fn default() -> Self {
        Self::new()
    }
}

impl Serialize for Template {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let entries = if self.version.is_some() { 2 } else { 1 };
        let mut map = serializer.serialize_map(Some(entries))?;
        if let Some(version) = &self.version {
            map.serialize_entry("AWSTemplateFormatVersion", version)?;
        }
        map.serialize_entry("Resources", &ResourceMap(&self.resources))?;
        map.end()
    }
}

struct ResourceMap<'a>(&'a [(String, ResourceBody)]);

impl Serialize for ResourceMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, body) in self.0 {
            map.serialize_entry(name, body)?;
        }
        map.end()
    }
}
