//! Resource group mapping

use std::collections::HashMap;

use cobalt_core::provider::ProviderResult;
use cobalt_core::resource::{Resource, Value};

use super::{bad_identifier, decode, encode, flatten_tags, require_string, string_map};
use crate::models::resources::ResourceGroup;
use crate::resource_id::{ParseError, ResourceGroupId};

pub(crate) fn identifier(subscription_id: &str, resource: &Resource) -> ProviderResult<String> {
    let name = require_string(resource, "name")?;
    Ok(ResourceGroupId::new(subscription_id, name).to_string())
}

pub(crate) fn canonical_identifier(persisted: &str) -> Result<String, ParseError> {
    Ok(ResourceGroupId::parse_insensitively(persisted)?.to_string())
}

pub(crate) fn expand(resource: &Resource) -> ProviderResult<serde_json::Value> {
    let body = ResourceGroup {
        id: None,
        name: None,
        location: require_string(resource, "location")?,
        tags: string_map(resource, "tags"),
        properties: None,
    };
    encode(&body)
}

pub(crate) fn flatten(
    identifier: &str,
    body: &serde_json::Value,
) -> ProviderResult<HashMap<String, Value>> {
    let id = ResourceGroupId::parse_insensitively(identifier).map_err(bad_identifier)?;
    let group: ResourceGroup = decode(body, "resource group")?;

    let mut attributes = HashMap::new();
    attributes.insert(
        "name".to_string(),
        Value::String(group.name.unwrap_or(id.resource_group)),
    );
    attributes.insert("location".to_string(), Value::String(group.location));
    flatten_tags(group.tags, &mut attributes);
    Ok(attributes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_then_flatten_round_trips() {
        let mut tags = HashMap::new();
        tags.insert("environment".to_string(), Value::String("production".to_string()));
        let resource = Resource::new("resource_group", "primary")
            .with_attribute("name", Value::String("primary-rg".to_string()))
            .with_attribute("location", Value::String("westeurope".to_string()))
            .with_attribute("tags", Value::Map(tags));

        let identifier = identifier("sub-1", &resource).unwrap();
        assert_eq!(identifier, "/subscriptions/sub-1/resourceGroups/primary-rg");

        // Simulate the API echoing the body back with its name filled in
        let mut body = expand(&resource).unwrap();
        body["name"] = serde_json::json!("primary-rg");

        let attributes = flatten(&identifier, &body).unwrap();
        assert_eq!(attributes.get("name"), resource.attributes.get("name"));
        assert_eq!(attributes.get("location"), resource.attributes.get("location"));
        assert_eq!(attributes.get("tags"), resource.attributes.get("tags"));
    }

    #[test]
    fn expand_requires_location() {
        let resource = Resource::new("resource_group", "primary")
            .with_attribute("name", Value::String("primary-rg".to_string()));
        assert!(expand(&resource).is_err());
    }
}
