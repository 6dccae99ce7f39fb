//! Managed HSM mapping

use std::collections::HashMap;

use cobalt_core::provider::{ProviderError, ProviderResult};
use cobalt_core::resource::{Resource, Value};

use super::{
    bad_identifier, decode, encode, flatten_tags, optional_bool, optional_int, optional_string,
    require_string, string_list, string_map,
};
use crate::models::keyvault::{ManagedHsm, ManagedHsmProperties, ManagedHsmSku};
use crate::resource_id::{ManagedHsmId, ParseError};

const DEFAULT_SKU: &str = "Standard_B1";
const DEFAULT_RETENTION_DAYS: i64 = 90;

pub(crate) fn identifier(subscription_id: &str, resource: &Resource) -> ProviderResult<String> {
    let resource_group = require_string(resource, "resource_group")?;
    let name = require_string(resource, "name")?;
    Ok(ManagedHsmId::new(subscription_id, resource_group, name).to_string())
}

pub(crate) fn canonical_identifier(persisted: &str) -> Result<String, ParseError> {
    Ok(ManagedHsmId::parse_insensitively(persisted)?.to_string())
}

pub(crate) fn expand(resource: &Resource) -> ProviderResult<serde_json::Value> {
    let admin_object_ids = string_list(resource, "admin_object_ids").ok_or_else(|| {
        ProviderError::invalid_config("attribute 'admin_object_ids' is required")
    })?;

    let body = ManagedHsm {
        id: None,
        name: None,
        location: require_string(resource, "location")?,
        sku: ManagedHsmSku {
            family: "B".to_string(),
            name: optional_string(resource, "sku_name").unwrap_or_else(|| DEFAULT_SKU.to_string()),
        },
        tags: string_map(resource, "tags"),
        properties: ManagedHsmProperties {
            tenant_id: require_string(resource, "tenant_id")?,
            initial_admin_object_ids: admin_object_ids,
            soft_delete_retention_in_days: Some(
                optional_int(resource, "soft_delete_retention_days")
                    .unwrap_or(DEFAULT_RETENTION_DAYS),
            ),
            enable_purge_protection: optional_bool(resource, "purge_protection_enabled"),
            hsm_uri: None,
            provisioning_state: None,
        },
    };
    encode(&body)
}

pub(crate) fn flatten(
    identifier: &str,
    body: &serde_json::Value,
) -> ProviderResult<HashMap<String, Value>> {
    let id = ManagedHsmId::parse_insensitively(identifier).map_err(bad_identifier)?;
    let hsm: ManagedHsm = decode(body, "managed HSM")?;

    let mut attributes = HashMap::new();
    attributes.insert("name".to_string(), Value::String(id.hsm_name));
    attributes.insert(
        "resource_group".to_string(),
        Value::String(id.resource_group),
    );
    attributes.insert("location".to_string(), Value::String(hsm.location));
    attributes.insert("sku_name".to_string(), Value::String(hsm.sku.name));

    let properties = hsm.properties;
    attributes.insert(
        "tenant_id".to_string(),
        Value::String(properties.tenant_id),
    );
    attributes.insert(
        "admin_object_ids".to_string(),
        Value::List(
            properties
                .initial_admin_object_ids
                .into_iter()
                .map(Value::String)
                .collect(),
        ),
    );
    if let Some(days) = properties.soft_delete_retention_in_days {
        attributes.insert("soft_delete_retention_days".to_string(), Value::Int(days));
    }
    if let Some(purge) = properties.enable_purge_protection {
        attributes.insert("purge_protection_enabled".to_string(), Value::Bool(purge));
    }
    if let Some(uri) = properties.hsm_uri {
        attributes.insert("hsm_uri".to_string(), Value::String(uri));
    }
    flatten_tags(hsm.tags, &mut attributes);
    Ok(attributes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hsm_resource() -> Resource {
        Resource::new("managed_hsm", "vault")
            .with_attribute("name", Value::String("prod-hsm".to_string()))
            .with_attribute("resource_group", Value::String("rg-1".to_string()))
            .with_attribute("location", Value::String("westeurope".to_string()))
            .with_attribute(
                "tenant_id",
                Value::String("72f988bf-86f1-41af-91ab-2d7cd011db47".to_string()),
            )
            .with_attribute(
                "admin_object_ids",
                Value::List(vec![Value::String(
                    "11111111-2222-3333-4444-555555555555".to_string(),
                )]),
            )
    }

    #[test]
    fn defaults_are_applied_on_expand() {
        let body = expand(&hsm_resource()).unwrap();
        assert_eq!(body["sku"]["name"], "Standard_B1");
        assert_eq!(body["properties"]["softDeleteRetentionInDays"], 90);
    }

    #[test]
    fn computed_uri_appears_after_flatten() {
        let identifier = identifier("sub-1", &hsm_resource()).unwrap();
        let mut body = expand(&hsm_resource()).unwrap();
        body["properties"]["hsmUri"] = serde_json::json!("https://prod-hsm.managedhsm.azure.net/");

        let attributes = flatten(&identifier, &body).unwrap();
        assert_eq!(
            attributes.get("hsm_uri"),
            Some(&Value::String(
                "https://prod-hsm.managedhsm.azure.net/".to_string()
            ))
        );
    }

    #[test]
    fn missing_admin_object_ids_is_rejected() {
        let mut resource = hsm_resource();
        resource.attributes.remove("admin_object_ids");
        assert!(expand(&resource).is_err());
    }
}
