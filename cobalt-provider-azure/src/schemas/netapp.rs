//! Schemas for NetApp resources (Microsoft.NetApp)

use cobalt_core::schema::{AttributeSchema, AttributeType, ResourceSchema};

use super::{AzureSchemaConfig, UpdateVerb, tags_type};
use crate::validation;

pub const API_VERSION: &str = "2023-05-01";

fn service_level() -> AttributeType {
    AttributeType::Enum(vec![
        "Standard".to_string(),
        "Premium".to_string(),
        "Ultra".to_string(),
    ])
}

pub fn account_config() -> AzureSchemaConfig {
    AzureSchemaConfig {
        resource_type: "netapp_account",
        arm_type: "Microsoft.NetApp/netAppAccounts",
        api_version: API_VERSION,
        update_verb: UpdateVerb::Patch,
        schema: ResourceSchema::new("netapp_account")
            .attribute(
                AttributeSchema::new("name", validation::netapp_name())
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
            .attribute(AttributeSchema::new("tags", tags_type())),
    }
}

pub fn pool_config() -> AzureSchemaConfig {
    AzureSchemaConfig {
        resource_type: "netapp_pool",
        arm_type: "Microsoft.NetApp/netAppAccounts/capacityPools",
        api_version: API_VERSION,
        update_verb: UpdateVerb::Patch,
        schema: ResourceSchema::new("netapp_pool")
            .attribute(
                AttributeSchema::new("name", validation::netapp_name())
                    .required()
                    .force_new(),
            )
            .attribute(
                AttributeSchema::new("account_name", validation::netapp_name())
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
                AttributeSchema::new("service_level", service_level())
                    .required()
                    .force_new(),
            )
            .attribute(AttributeSchema::new("size_in_tb", validation::pool_size_tb()).required())
            .attribute(AttributeSchema::new("tags", tags_type())),
    }
}

pub fn volume_config() -> AzureSchemaConfig {
    AzureSchemaConfig {
        resource_type: "netapp_volume",
        arm_type: "Microsoft.NetApp/netAppAccounts/capacityPools/volumes",
        api_version: API_VERSION,
        update_verb: UpdateVerb::Patch,
        schema: ResourceSchema::new("netapp_volume")
            .attribute(
                AttributeSchema::new("name", validation::netapp_name())
                    .required()
                    .force_new(),
            )
            .attribute(
                AttributeSchema::new("account_name", validation::netapp_name())
                    .required()
                    .force_new(),
            )
            .attribute(
                AttributeSchema::new("pool_name", validation::netapp_name())
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
                AttributeSchema::new("creation_token", validation::creation_token())
                    .required()
                    .force_new(),
            )
            .attribute(
                AttributeSchema::new("subnet_id", validation::subnet_id())
                    .required()
                    .force_new(),
            )
            .attribute(AttributeSchema::new("service_level", service_level()).force_new())
            .attribute(
                AttributeSchema::new("storage_quota_gb", validation::volume_quota_gb()).required(),
            )
            .attribute(
                AttributeSchema::new(
                    "protocols",
                    AttributeType::List(Box::new(AttributeType::Enum(vec![
                        "NFSv3".to_string(),
                        "NFSv4.1".to_string(),
                        "CIFS".to_string(),
                    ]))),
                )
                .force_new(),
            )
            .attribute(AttributeSchema::new("export_read_only", AttributeType::Bool))
            .attribute(AttributeSchema::new(
                "export_read_write",
                AttributeType::Bool,
            ))
            .attribute(AttributeSchema::new("allowed_clients", AttributeType::String))
            .attribute(AttributeSchema::new("tags", tags_type()))
            .conflict("export_read_only", "export_read_write"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cobalt_core::resource::Value;
    use cobalt_core::schema::TypeError;
    use std::collections::HashMap;

    fn volume_attrs() -> HashMap<String, Value> {
        let mut attrs = HashMap::new();
        for (key, value) in [
            ("name", "vol-1"),
            ("account_name", "files"),
            ("pool_name", "pool-1"),
            ("resource_group", "rg-1"),
            ("location", "westeurope"),
            ("creation_token", "exports-1"),
            ("subnet_id", "/subscriptions/s/resourceGroups/rg/providers/Microsoft.Network/virtualNetworks/vn/subnets/sn"),
        ] {
            attrs.insert(key.to_string(), Value::String(value.to_string()));
        }
        attrs.insert("storage_quota_gb".to_string(), Value::Int(100));
        attrs
    }

    #[test]
    fn volume_configuration_validates() {
        let schema = volume_config().schema;
        assert!(schema.validate(&volume_attrs()).is_ok());
    }

    #[test]
    fn export_modes_are_mutually_exclusive() {
        let schema = volume_config().schema;
        let mut attrs = volume_attrs();
        attrs.insert("export_read_only".to_string(), Value::Bool(true));
        attrs.insert("export_read_write".to_string(), Value::Bool(true));

        let errors = schema.validate(&attrs).unwrap_err();
        assert!(matches!(
            errors.as_slice(),
            [TypeError::ConflictingAttributes { .. }]
        ));
    }

    #[test]
    fn pool_size_is_bounded() {
        let schema = pool_config().schema;
        let mut attrs = HashMap::new();
        for (key, value) in [
            ("name", "pool-1"),
            ("account_name", "files"),
            ("resource_group", "rg-1"),
            ("location", "westeurope"),
            ("service_level", "Premium"),
        ] {
            attrs.insert(key.to_string(), Value::String(value.to_string()));
        }
        attrs.insert("size_in_tb".to_string(), Value::Int(2));

        let errors = schema.validate(&attrs).unwrap_err();
        assert!(
            errors
                .iter()
                .any(|e| matches!(e, TypeError::ValidationFailed { .. }))
        );
    }
}
