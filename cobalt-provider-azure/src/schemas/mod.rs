//! Resource schemas
//!
//! One schema config per resource kind: the declarative attribute schema
//! (types, Optional/Computed/ForceNew flags, conflicts) plus the ARM
//! coordinates the provider needs (resource type path, api-version, update
//! verb).

pub mod managed_cluster;
pub mod managed_hsm;
pub mod netapp;
pub mod resource_group;
pub mod role_assignment;

use cobalt_core::schema::{AttributeType, ResourceSchema};

/// HTTP verb used for in-place updates of a resource kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateVerb {
    Put,
    Patch,
}

/// Schema plus ARM coordinates for one resource kind
pub struct AzureSchemaConfig {
    /// Declarative resource type name (e.g. "netapp_volume")
    pub resource_type: &'static str,
    /// ARM resource type path (e.g. "Microsoft.NetApp/netAppAccounts")
    pub arm_type: &'static str,
    pub api_version: &'static str,
    pub update_verb: UpdateVerb,
    pub schema: ResourceSchema,
}

/// All resource kinds supported by the provider
pub fn configs() -> Vec<AzureSchemaConfig> {
    vec![
        resource_group::config(),
        netapp::account_config(),
        netapp::pool_config(),
        netapp::volume_config(),
        managed_hsm::config(),
        managed_cluster::config(),
        role_assignment::config(),
    ]
}

/// Look up the config for a resource type name
pub fn config_for(resource_type: &str) -> Option<AzureSchemaConfig> {
    configs()
        .into_iter()
        .find(|c| c.resource_type == resource_type)
}

/// Free-form string tags
pub fn tags_type() -> AttributeType {
    AttributeType::Map(Box::new(AttributeType::String))
}
