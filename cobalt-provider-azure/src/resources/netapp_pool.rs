//! NetApp capacity pool mapping
//!
//! The declared size is in whole tebibytes; the wire carries bytes.

use std::collections::HashMap;

use cobalt_core::provider::{ProviderError, ProviderResult};
use cobalt_core::resource::{Resource, Value};

use super::{
    TIB, bad_identifier, decode, encode, flatten_tags, require_int, require_string, string_map,
};
use crate::models::netapp::{CapacityPool, CapacityPoolProperties, ServiceLevel};
use crate::resource_id::{CapacityPoolId, ParseError};

pub(crate) fn service_level_attr(resource: &Resource) -> ProviderResult<ServiceLevel> {
    let name = require_string(resource, "service_level")?;
    ServiceLevel::from_name(&name).ok_or_else(|| {
        ProviderError::invalid_config(format!(
            "service_level must be one of Standard, Premium, Ultra, got '{}'",
            name
        ))
    })
}

pub(crate) fn identifier(subscription_id: &str, resource: &Resource) -> ProviderResult<String> {
    let resource_group = require_string(resource, "resource_group")?;
    let account_name = require_string(resource, "account_name")?;
    let name = require_string(resource, "name")?;
    Ok(CapacityPoolId::new(subscription_id, resource_group, account_name, name).to_string())
}

pub(crate) fn canonical_identifier(persisted: &str) -> Result<String, ParseError> {
    Ok(CapacityPoolId::parse_insensitively(persisted)?.to_string())
}

pub(crate) fn expand(resource: &Resource) -> ProviderResult<serde_json::Value> {
    let body = CapacityPool {
        id: None,
        name: None,
        location: require_string(resource, "location")?,
        tags: string_map(resource, "tags"),
        properties: CapacityPoolProperties {
            service_level: service_level_attr(resource)?,
            size: require_int(resource, "size_in_tb")? * TIB,
            provisioning_state: None,
        },
    };
    encode(&body)
}

pub(crate) fn flatten(
    identifier: &str,
    body: &serde_json::Value,
) -> ProviderResult<HashMap<String, Value>> {
    let id = CapacityPoolId::parse_insensitively(identifier).map_err(bad_identifier)?;
    let pool: CapacityPool = decode(body, "capacity pool")?;

    let mut attributes = HashMap::new();
    attributes.insert("name".to_string(), Value::String(id.pool_name));
    attributes.insert("account_name".to_string(), Value::String(id.account_name));
    attributes.insert(
        "resource_group".to_string(),
        Value::String(id.resource_group),
    );
    attributes.insert("location".to_string(), Value::String(pool.location));
    attributes.insert(
        "service_level".to_string(),
        Value::String(pool.properties.service_level.as_str().to_string()),
    );
    attributes.insert(
        "size_in_tb".to_string(),
        Value::Int(pool.properties.size / TIB),
    );
    flatten_tags(pool.tags, &mut attributes);
    Ok(attributes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool_resource() -> Resource {
        Resource::new("netapp_pool", "pool")
            .with_attribute("name", Value::String("pool-1".to_string()))
            .with_attribute("account_name", Value::String("files".to_string()))
            .with_attribute("resource_group", Value::String("rg-1".to_string()))
            .with_attribute("location", Value::String("westeurope".to_string()))
            .with_attribute("service_level", Value::String("Premium".to_string()))
            .with_attribute("size_in_tb", Value::Int(4))
    }

    #[test]
    fn size_is_expanded_to_bytes() {
        let body = expand(&pool_resource()).unwrap();
        assert_eq!(body["properties"]["size"], 4 * TIB);
        assert_eq!(body["properties"]["serviceLevel"], "Premium");
    }

    #[test]
    fn flatten_converts_bytes_back_to_tebibytes() {
        let identifier = identifier("sub-1", &pool_resource()).unwrap();
        let body = serde_json::json!({
            "location": "westeurope",
            "properties": { "serviceLevel": "Premium", "size": 4 * TIB }
        });

        let attributes = flatten(&identifier, &body).unwrap();
        assert_eq!(attributes.get("size_in_tb"), Some(&Value::Int(4)));
        assert_eq!(
            attributes.get("service_level"),
            Some(&Value::String("Premium".to_string()))
        );
    }

    #[test]
    fn unknown_service_level_is_rejected() {
        let resource = pool_resource()
            .with_attribute("service_level", Value::String("Basic".to_string()));
        assert!(expand(&resource).is_err());
    }
}
