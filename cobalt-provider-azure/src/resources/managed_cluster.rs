//! Managed Kubernetes cluster mapping
//!
//! Carries one value-dependent rule the attribute schema cannot express:
//! the long-term support plan is only available on the Premium tier.

use std::collections::HashMap;

use cobalt_core::provider::{ProviderError, ProviderResult};
use cobalt_core::resource::{Resource, Value};

use super::{
    bad_identifier, decode, encode, flatten_tags, optional_bool, optional_string, require_int,
    require_string, string_map,
};
use crate::models::containerservice::{
    AgentPoolProfile, ManagedCluster, ManagedClusterProperties, ManagedClusterSku,
};
use crate::resource_id::{ManagedClusterId, ParseError};

pub(crate) fn identifier(subscription_id: &str, resource: &Resource) -> ProviderResult<String> {
    let resource_group = require_string(resource, "resource_group")?;
    let name = require_string(resource, "name")?;
    Ok(ManagedClusterId::new(subscription_id, resource_group, name).to_string())
}

pub(crate) fn canonical_identifier(persisted: &str) -> Result<String, ParseError> {
    Ok(ManagedClusterId::parse_insensitively(persisted)?.to_string())
}

pub(crate) fn expand(resource: &Resource) -> ProviderResult<serde_json::Value> {
    let sku_tier = optional_string(resource, "sku_tier").unwrap_or_else(|| "Free".to_string());
    let support_plan = optional_string(resource, "support_plan")
        .unwrap_or_else(|| "KubernetesOfficial".to_string());

    if support_plan == "AKSLongTermSupport" && sku_tier != "Premium" {
        return Err(ProviderError::invalid_config(format!(
            "support_plan \"AKSLongTermSupport\" requires sku_tier \"Premium\", not \"{}\"",
            sku_tier
        )));
    }

    let body = ManagedCluster {
        id: None,
        name: None,
        location: require_string(resource, "location")?,
        sku: Some(ManagedClusterSku {
            name: "Base".to_string(),
            tier: sku_tier,
        }),
        tags: string_map(resource, "tags"),
        properties: ManagedClusterProperties {
            dns_prefix: require_string(resource, "dns_prefix")?,
            kubernetes_version: optional_string(resource, "kubernetes_version"),
            agent_pool_profiles: vec![AgentPoolProfile {
                name: optional_string(resource, "node_pool_name")
                    .unwrap_or_else(|| "default".to_string()),
                count: require_int(resource, "node_count")?,
                vm_size: require_string(resource, "node_vm_size")?,
                mode: Some("System".to_string()),
            }],
            enable_rbac: Some(optional_bool(resource, "rbac_enabled").unwrap_or(true)),
            support_plan: Some(support_plan),
            node_resource_group: None,
            fqdn: None,
            provisioning_state: None,
        },
    };
    encode(&body)
}

pub(crate) fn flatten(
    identifier: &str,
    body: &serde_json::Value,
) -> ProviderResult<HashMap<String, Value>> {
    let id = ManagedClusterId::parse_insensitively(identifier).map_err(bad_identifier)?;
    let cluster: ManagedCluster = decode(body, "managed cluster")?;

    let mut attributes = HashMap::new();
    attributes.insert("name".to_string(), Value::String(id.cluster_name));
    attributes.insert(
        "resource_group".to_string(),
        Value::String(id.resource_group),
    );
    attributes.insert("location".to_string(), Value::String(cluster.location));
    if let Some(sku) = cluster.sku {
        attributes.insert("sku_tier".to_string(), Value::String(sku.tier));
    }

    let properties = cluster.properties;
    attributes.insert(
        "dns_prefix".to_string(),
        Value::String(properties.dns_prefix),
    );
    if let Some(version) = properties.kubernetes_version {
        attributes.insert("kubernetes_version".to_string(), Value::String(version));
    }
    if let Some(pool) = properties.agent_pool_profiles.into_iter().next() {
        attributes.insert("node_pool_name".to_string(), Value::String(pool.name));
        attributes.insert("node_count".to_string(), Value::Int(pool.count));
        attributes.insert("node_vm_size".to_string(), Value::String(pool.vm_size));
    }
    if let Some(rbac) = properties.enable_rbac {
        attributes.insert("rbac_enabled".to_string(), Value::Bool(rbac));
    }
    if let Some(plan) = properties.support_plan {
        attributes.insert("support_plan".to_string(), Value::String(plan));
    }
    if let Some(group) = properties.node_resource_group {
        attributes.insert("node_resource_group".to_string(), Value::String(group));
    }
    if let Some(fqdn) = properties.fqdn {
        attributes.insert("fqdn".to_string(), Value::String(fqdn));
    }
    flatten_tags(cluster.tags, &mut attributes);
    Ok(attributes)
}
