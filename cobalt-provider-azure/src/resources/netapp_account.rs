//! NetApp account mapping

use std::collections::HashMap;

use cobalt_core::provider::ProviderResult;
use cobalt_core::resource::{Resource, Value};

use super::{bad_identifier, decode, encode, flatten_tags, require_string, string_map};
use crate::models::netapp::{NetAppAccount, NetAppAccountProperties};
use crate::resource_id::{NetAppAccountId, ParseError};

pub(crate) fn identifier(subscription_id: &str, resource: &Resource) -> ProviderResult<String> {
    let resource_group = require_string(resource, "resource_group")?;
    let name = require_string(resource, "name")?;
    Ok(NetAppAccountId::new(subscription_id, resource_group, name).to_string())
}

pub(crate) fn canonical_identifier(persisted: &str) -> Result<String, ParseError> {
    Ok(NetAppAccountId::parse_insensitively(persisted)?.to_string())
}

pub(crate) fn expand(resource: &Resource) -> ProviderResult<serde_json::Value> {
    let body = NetAppAccount {
        id: None,
        name: None,
        location: require_string(resource, "location")?,
        tags: string_map(resource, "tags"),
        properties: Some(NetAppAccountProperties::default()),
    };
    encode(&body)
}

pub(crate) fn flatten(
    identifier: &str,
    body: &serde_json::Value,
) -> ProviderResult<HashMap<String, Value>> {
    let id = NetAppAccountId::parse_insensitively(identifier).map_err(bad_identifier)?;
    let account: NetAppAccount = decode(body, "NetApp account")?;

    let mut attributes = HashMap::new();
    attributes.insert("name".to_string(), Value::String(id.account_name));
    attributes.insert(
        "resource_group".to_string(),
        Value::String(id.resource_group),
    );
    attributes.insert("location".to_string(), Value::String(account.location));
    flatten_tags(account.tags, &mut attributes);
    Ok(attributes)
}
