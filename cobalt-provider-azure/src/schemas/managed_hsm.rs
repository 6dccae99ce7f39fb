//! Schema for managed HSM clusters (Microsoft.KeyVault/managedHSMs)

use cobalt_core::resource::Value;
use cobalt_core::schema::{AttributeSchema, AttributeType, ResourceSchema};

use super::{AzureSchemaConfig, UpdateVerb, tags_type};
use crate::validation;

pub fn config() -> AzureSchemaConfig {
    AzureSchemaConfig {
        resource_type: "managed_hsm",
        arm_type: "Microsoft.KeyVault/managedHSMs",
        api_version: "2023-07-01",
        update_verb: UpdateVerb::Patch,
        schema: ResourceSchema::new("managed_hsm")
            .attribute(
                AttributeSchema::new("name", validation::managed_hsm_name())
                    .required()
                    .force_new(),
            )
            .attribute(
                AttributeSchema::new("resource_group", validation::resource_group_name())
                    .required()
                    .force_new(),
            )
            .attribute(
                AttributeSchema::new("location", AttributeType::String)
                    .required()
                    .force_new(),
            )
            .attribute(
                AttributeSchema::new(
                    "sku_name",
                    AttributeType::Enum(vec![
                        "Standard_B1".to_string(),
                        "Custom_B32".to_string(),
                    ]),
                )
                .with_default(Value::String("Standard_B1".to_string()))
                .force_new(),
            )
            .attribute(
                AttributeSchema::new("tenant_id", validation::guid())
                    .required()
                    .force_new(),
            )
            .attribute(
                AttributeSchema::new(
                    "admin_object_ids",
                    AttributeType::List(Box::new(validation::guid())),
                )
                .required(),
            )
            .attribute(
                AttributeSchema::new("soft_delete_retention_days", validation::retention_days())
                    .with_default(Value::Int(90))
                    .force_new(),
            )
            .attribute(
                AttributeSchema::new("purge_protection_enabled", AttributeType::Bool).force_new(),
            )
            .attribute(AttributeSchema::new("hsm_uri", AttributeType::String).computed())
            .attribute(AttributeSchema::new("tags", tags_type())),
    }
}
