//! Schema for resource groups (Microsoft.Resources/resourceGroups)

use cobalt_core::schema::{AttributeSchema, AttributeType, ResourceSchema};

use super::{AzureSchemaConfig, UpdateVerb, tags_type};
use crate::validation;

pub fn config() -> AzureSchemaConfig {
    AzureSchemaConfig {
        resource_type: "resource_group",
        arm_type: "Microsoft.Resources/resourceGroups",
        api_version: "2021-04-01",
        update_verb: UpdateVerb::Put,
        schema: ResourceSchema::new("resource_group")
            .with_description("A container that holds related Azure resources.")
            .attribute(
                AttributeSchema::new("name", validation::resource_group_name())
                    .required()
                    .force_new(),
            )
            .attribute(
                AttributeSchema::new("location", AttributeType::String)
                    .required()
                    .force_new(),
            )
            .attribute(AttributeSchema::new("tags", tags_type())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cobalt_core::resource::Value;
    use std::collections::HashMap;

    #[test]
    fn minimal_configuration_validates() {
        let schema = config().schema;
        let mut attrs = HashMap::new();
        attrs.insert("name".to_string(), Value::String("primary-rg".to_string()));
        attrs.insert(
            "location".to_string(),
            Value::String("westeurope".to_string()),
        );
        assert!(schema.validate(&attrs).is_ok());
    }

    #[test]
    fn location_forces_recreation() {
        let schema = config().schema;
        assert!(schema.forces_new("location"));
        assert!(!schema.forces_new("tags"));
    }
}
