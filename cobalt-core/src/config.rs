//! Config - Declarative configuration documents
//!
//! Configuration is a JSON document listing resource blocks. Each block
//! names a resource type, a binding name, its attributes, and optional
//! per-operation timeouts (in seconds).
//!
//! ```json
//! {
//!   "resources": [
//!     {
//!       "type": "resource_group",
//!       "name": "primary",
//!       "attributes": { "name": "primary-rg", "location": "westeurope" },
//!       "timeouts": { "create": 1800 }
//!     }
//!   ]
//! }
//! ```

use std::collections::HashSet;
use std::time::Duration;

use serde::Deserialize;

use crate::executor::OperationTimeouts;
use crate::resource::{Resource, Value};

/// Top-level configuration document
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigDocument {
    pub resources: Vec<ResourceBlock>,
}

/// One declared resource
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResourceBlock {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub name: String,
    #[serde(default)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
    pub timeouts: Option<TimeoutsBlock>,
}

/// Per-operation timeouts in seconds
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimeoutsBlock {
    pub create: Option<u64>,
    pub read: Option<u64>,
    pub update: Option<u64>,
    pub delete: Option<u64>,
}

impl TimeoutsBlock {
    fn to_timeouts(&self) -> OperationTimeouts {
        let defaults = OperationTimeouts::default();
        OperationTimeouts {
            create: self.create.map(Duration::from_secs).unwrap_or(defaults.create),
            read: self.read.map(Duration::from_secs).unwrap_or(defaults.read),
            update: self.update.map(Duration::from_secs).unwrap_or(defaults.update),
            delete: self.delete.map(Duration::from_secs).unwrap_or(defaults.delete),
        }
    }
}

/// A resource together with its declared timeouts
#[derive(Debug, Clone)]
pub struct ConfiguredResource {
    pub resource: Resource,
    pub timeouts: OperationTimeouts,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("configuration is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("resource {resource}: attribute '{attribute}' has no supported representation (null and fractional numbers are not attribute values)")]
    InvalidAttribute { resource: String, attribute: String },

    #[error("resource {0} is declared more than once")]
    DuplicateResource(String),
}

/// Parse a configuration document into resources
pub fn parse(content: &str) -> Result<Vec<ConfiguredResource>, ConfigError> {
    let document: ConfigDocument = serde_json::from_str(content)?;

    let mut seen = HashSet::new();
    let mut configured = Vec::with_capacity(document.resources.len());

    for block in &document.resources {
        let binding = format!("{}.{}", block.resource_type, block.name);
        if !seen.insert(binding.clone()) {
            return Err(ConfigError::DuplicateResource(binding));
        }

        let mut resource = Resource::new(block.resource_type.clone(), block.name.clone());
        for (key, raw) in &block.attributes {
            let value =
                Value::from_json(raw).ok_or_else(|| ConfigError::InvalidAttribute {
                    resource: binding.clone(),
                    attribute: key.clone(),
                })?;
            resource.attributes.insert(key.clone(), value);
        }

        let timeouts = block
            .timeouts
            .as_ref()
            .map(TimeoutsBlock::to_timeouts)
            .unwrap_or_default();

        configured.push(ConfiguredResource { resource, timeouts });
    }

    Ok(configured)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: &str = r#"{
        "resources": [
            {
                "type": "resource_group",
                "name": "primary",
                "attributes": {
                    "name": "primary-rg",
                    "location": "westeurope",
                    "tags": { "environment": "production" }
                },
                "timeouts": { "create": 600, "delete": 1200 }
            },
            {
                "type": "netapp_account",
                "name": "files",
                "attributes": {
                    "name": "files-account",
                    "resource_group": "primary-rg",
                    "location": "westeurope"
                }
            }
        ]
    }"#;

    #[test]
    fn parse_example_document() {
        let configured = parse(EXAMPLE).unwrap();
        assert_eq!(configured.len(), 2);

        let rg = &configured[0];
        assert_eq!(rg.resource.id.resource_type, "resource_group");
        assert_eq!(rg.resource.id.name, "primary");
        assert_eq!(
            rg.resource.attributes.get("location"),
            Some(&Value::String("westeurope".to_string()))
        );
        assert_eq!(rg.timeouts.create, Duration::from_secs(600));
        assert_eq!(rg.timeouts.delete, Duration::from_secs(1200));
        // Unspecified timeouts fall back to defaults
        assert_eq!(rg.timeouts.read, OperationTimeouts::default().read);

        assert_eq!(configured[1].timeouts, OperationTimeouts::default());
    }

    #[test]
    fn unknown_top_level_key_rejected() {
        let result = parse(r#"{ "resources": [], "modules": [] }"#);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn duplicate_resource_rejected() {
        let content = r#"{
            "resources": [
                { "type": "resource_group", "name": "a" },
                { "type": "resource_group", "name": "a" }
            ]
        }"#;
        assert!(matches!(
            parse(content),
            Err(ConfigError::DuplicateResource(binding)) if binding == "resource_group.a"
        ));
    }

    #[test]
    fn fractional_attribute_rejected() {
        let content = r#"{
            "resources": [
                {
                    "type": "netapp_pool",
                    "name": "pool",
                    "attributes": { "size_in_tb": 4.5 }
                }
            ]
        }"#;
        assert!(matches!(
            parse(content),
            Err(ConfigError::InvalidAttribute { attribute, .. }) if attribute == "size_in_tb"
        ));
    }
}
