//! Schema for managed Kubernetes clusters (Microsoft.ContainerService/managedClusters)

use cobalt_core::resource::Value;
use cobalt_core::schema::{AttributeSchema, AttributeType, ResourceSchema};

use super::{AzureSchemaConfig, UpdateVerb, tags_type};
use crate::validation;

pub fn config() -> AzureSchemaConfig {
    AzureSchemaConfig {
        resource_type: "managed_cluster",
        arm_type: "Microsoft.ContainerService/managedClusters",
        api_version: "2024-05-01",
        update_verb: UpdateVerb::Put,
        schema: ResourceSchema::new("managed_cluster")
            .attribute(
                AttributeSchema::new("name", validation::managed_cluster_name())
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
                AttributeSchema::new("dns_prefix", AttributeType::String)
                    .required()
                    .force_new(),
            )
            .attribute(AttributeSchema::new(
                "kubernetes_version",
                AttributeType::String,
            ))
            .attribute(
                AttributeSchema::new("node_pool_name", validation::node_pool_name())
                    .with_default(Value::String("default".to_string()))
                    .force_new(),
            )
            .attribute(AttributeSchema::new("node_count", validation::node_count()).required())
            .attribute(
                AttributeSchema::new("node_vm_size", AttributeType::String)
                    .required()
                    .force_new(),
            )
            .attribute(
                AttributeSchema::new(
                    "sku_tier",
                    AttributeType::Enum(vec![
                        "Free".to_string(),
                        "Standard".to_string(),
                        "Premium".to_string(),
                    ]),
                )
                .with_default(Value::String("Free".to_string())),
            )
            .attribute(
                AttributeSchema::new(
                    "support_plan",
                    AttributeType::Enum(vec![
                        "KubernetesOfficial".to_string(),
                        "AKSLongTermSupport".to_string(),
                    ]),
                )
                .with_default(Value::String("KubernetesOfficial".to_string())),
            )
            .attribute(
                AttributeSchema::new("rbac_enabled", AttributeType::Bool)
                    .with_default(Value::Bool(true))
                    .force_new(),
            )
            .attribute(
                AttributeSchema::new("node_resource_group", AttributeType::String).computed(),
            )
            .attribute(AttributeSchema::new("fqdn", AttributeType::String).computed())
            .attribute(AttributeSchema::new("tags", tags_type())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn valid_configuration_passes() {
        let mut attrs = HashMap::new();
        for (key, value) in [
            ("name", "workloads"),
            ("resource_group", "rg-1"),
            ("location", "westeurope"),
            ("dns_prefix", "workloads"),
            ("node_vm_size", "Standard_D2s_v3"),
        ] {
            attrs.insert(key.to_string(), Value::String(value.to_string()));
        }
        attrs.insert("node_count".to_string(), Value::Int(3));

        assert!(config().schema.validate(&attrs).is_ok());
    }

    #[test]
    fn sku_tier_rejects_unknown_variant() {
        let schema = config().schema;
        let tier = &schema.attributes["sku_tier"];
        assert!(
            tier.attr_type
                .validate(&Value::String("Basic".to_string()))
                .is_err()
        );
    }
}
