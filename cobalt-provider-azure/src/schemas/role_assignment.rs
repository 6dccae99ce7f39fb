//! Schema for role assignments (Microsoft.Authorization/roleAssignments)
//!
//! Role assignments are immutable upstream: every attribute forces
//! recreation. The name is a GUID and may be omitted, in which case one is
//! generated at create time.

use cobalt_core::schema::{AttributeSchema, AttributeType, ResourceSchema};

use super::{AzureSchemaConfig, UpdateVerb};
use crate::validation;

pub fn config() -> AzureSchemaConfig {
    AzureSchemaConfig {
        resource_type: "role_assignment",
        arm_type: "Microsoft.Authorization/roleAssignments",
        api_version: "2022-04-01",
        update_verb: UpdateVerb::Put,
        schema: ResourceSchema::new("role_assignment")
            .attribute(AttributeSchema::new("name", validation::guid()).force_new())
            .attribute(
                AttributeSchema::new("resource_group", validation::resource_group_name())
                    .required()
                    .force_new(),
            )
            .attribute(
                AttributeSchema::new("role_definition_id", validation::role_definition_id())
                    .required()
                    .force_new(),
            )
            .attribute(
                AttributeSchema::new("principal_id", validation::guid())
                    .required()
                    .force_new(),
            )
            .attribute(
                AttributeSchema::new(
                    "principal_type",
                    AttributeType::Enum(vec![
                        "User".to_string(),
                        "Group".to_string(),
                        "ServicePrincipal".to_string(),
                    ]),
                )
                .force_new(),
            ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cobalt_core::resource::Value;
    use std::collections::HashMap;

    #[test]
    fn every_attribute_forces_recreation() {
        let schema = config().schema;
        for name in schema.attributes.keys() {
            assert!(schema.forces_new(name), "{} should force recreation", name);
        }
    }

    #[test]
    fn role_definition_id_must_be_canonical() {
        let schema = config().schema;
        let mut attrs = HashMap::new();
        attrs.insert("resource_group".to_string(), Value::String("rg-1".to_string()));
        attrs.insert(
            "principal_id".to_string(),
            Value::String("11111111-2222-3333-4444-555555555555".to_string()),
        );
        attrs.insert(
            "role_definition_id".to_string(),
            Value::String("Contributor".to_string()),
        );

        assert!(schema.validate(&attrs).is_err());
    }
}
