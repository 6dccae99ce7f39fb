//! NetApp volume mapping
//!
//! The declared quota is in gibibytes; the wire carries bytes. The flat
//! export attributes (read-only/read-write/allowed clients) map onto a
//! single export policy rule.

use std::collections::HashMap;

use cobalt_core::provider::ProviderResult;
use cobalt_core::resource::{Resource, Value};

use super::{
    GIB, bad_identifier, decode, encode, flatten_tags, optional_bool, optional_string,
    require_int, require_string, string_list, string_map,
};
use crate::models::netapp::{
    ExportPolicyRule, NetAppVolume, ServiceLevel, VolumeExportPolicy, VolumeProperties,
};
use crate::resource_id::{NetAppVolumeId, ParseError};

pub(crate) fn identifier(subscription_id: &str, resource: &Resource) -> ProviderResult<String> {
    let resource_group = require_string(resource, "resource_group")?;
    let account_name = require_string(resource, "account_name")?;
    let pool_name = require_string(resource, "pool_name")?;
    let name = require_string(resource, "name")?;
    Ok(
        NetAppVolumeId::new(subscription_id, resource_group, account_name, pool_name, name)
            .to_string(),
    )
}

pub(crate) fn canonical_identifier(persisted: &str) -> Result<String, ParseError> {
    Ok(NetAppVolumeId::parse_insensitively(persisted)?.to_string())
}

pub(crate) fn expand(resource: &Resource) -> ProviderResult<serde_json::Value> {
    let service_level = match optional_string(resource, "service_level") {
        Some(_) => Some(super::netapp_pool::service_level_attr(resource)?),
        None => None,
    };

    let body = NetAppVolume {
        id: None,
        name: None,
        location: require_string(resource, "location")?,
        tags: string_map(resource, "tags"),
        properties: VolumeProperties {
            creation_token: require_string(resource, "creation_token")?,
            service_level,
            usage_threshold: require_int(resource, "storage_quota_gb")? * GIB,
            subnet_id: require_string(resource, "subnet_id")?,
            protocol_types: string_list(resource, "protocols"),
            export_policy: expand_export_policy(resource),
            provisioning_state: None,
        },
    };
    encode(&body)
}

fn expand_export_policy(resource: &Resource) -> Option<VolumeExportPolicy> {
    let unix_read_only = optional_bool(resource, "export_read_only");
    let unix_read_write = optional_bool(resource, "export_read_write");
    let allowed_clients = optional_string(resource, "allowed_clients");

    if unix_read_only.is_none() && unix_read_write.is_none() && allowed_clients.is_none() {
        return None;
    }

    Some(VolumeExportPolicy {
        rules: vec![ExportPolicyRule {
            rule_index: 1,
            unix_read_only,
            unix_read_write,
            allowed_clients,
        }],
    })
}

pub(crate) fn flatten(
    identifier: &str,
    body: &serde_json::Value,
) -> ProviderResult<HashMap<String, Value>> {
    let id = NetAppVolumeId::parse_insensitively(identifier).map_err(bad_identifier)?;
    let volume: NetAppVolume = decode(body, "NetApp volume")?;

    let mut attributes = HashMap::new();
    attributes.insert("name".to_string(), Value::String(id.volume_name));
    attributes.insert("pool_name".to_string(), Value::String(id.pool_name));
    attributes.insert("account_name".to_string(), Value::String(id.account_name));
    attributes.insert(
        "resource_group".to_string(),
        Value::String(id.resource_group),
    );
    attributes.insert("location".to_string(), Value::String(volume.location));

    let properties = volume.properties;
    attributes.insert(
        "creation_token".to_string(),
        Value::String(properties.creation_token),
    );
    attributes.insert(
        "storage_quota_gb".to_string(),
        Value::Int(properties.usage_threshold / GIB),
    );
    attributes.insert("subnet_id".to_string(), Value::String(properties.subnet_id));
    if let Some(level) = properties.service_level {
        attributes.insert(
            "service_level".to_string(),
            Value::String(level.as_str().to_string()),
        );
    }
    if let Some(protocols) = properties.protocol_types
        && !protocols.is_empty()
    {
        attributes.insert(
            "protocols".to_string(),
            Value::List(protocols.into_iter().map(Value::String).collect()),
        );
    }
    if let Some(rule) = properties
        .export_policy
        .and_then(|policy| policy.rules.into_iter().next())
    {
        if let Some(read_only) = rule.unix_read_only {
            attributes.insert("export_read_only".to_string(), Value::Bool(read_only));
        }
        if let Some(read_write) = rule.unix_read_write {
            attributes.insert("export_read_write".to_string(), Value::Bool(read_write));
        }
        if let Some(clients) = rule.allowed_clients {
            attributes.insert("allowed_clients".to_string(), Value::String(clients));
        }
    }
    flatten_tags(volume.tags, &mut attributes);
    Ok(attributes)
}
