//! Per-resource mapping between declared attributes and ARM bodies
//!
//! Each resource kind has an `identifier` constructor (configuration plus
//! subscription to canonical ID), a `canonical_identifier` re-parser for
//! persisted IDs, and a paired `expand` (attributes to request body) and
//! `flatten` (response body to attributes). There is no intermediate
//! representation between the two.

pub(crate) mod managed_cluster;
pub(crate) mod managed_hsm;
pub(crate) mod netapp_account;
pub(crate) mod netapp_pool;
pub(crate) mod netapp_volume;
pub(crate) mod resource_group;
pub(crate) mod role_assignment;

use std::collections::HashMap;

use cobalt_core::provider::{ProviderError, ProviderResult};
use cobalt_core::resource::{Resource, Value};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::resource_id::ParseError;

pub(crate) const GIB: i64 = 1 << 30;
pub(crate) const TIB: i64 = 1 << 40;

pub(crate) fn require_string(resource: &Resource, key: &str) -> ProviderResult<String> {
    match resource.attributes.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        _ => Err(ProviderError::invalid_config(format!(
            "attribute '{}' is required",
            key
        ))),
    }
}

pub(crate) fn require_int(resource: &Resource, key: &str) -> ProviderResult<i64> {
    match resource.attributes.get(key) {
        Some(Value::Int(n)) => Ok(*n),
        _ => Err(ProviderError::invalid_config(format!(
            "attribute '{}' is required",
            key
        ))),
    }
}

pub(crate) fn optional_string(resource: &Resource, key: &str) -> Option<String> {
    resource
        .attributes
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
}

pub(crate) fn optional_int(resource: &Resource, key: &str) -> Option<i64> {
    resource.attributes.get(key).and_then(Value::as_int)
}

pub(crate) fn optional_bool(resource: &Resource, key: &str) -> Option<bool> {
    resource.attributes.get(key).and_then(Value::as_bool)
}

/// Tags and other string-to-string maps
pub(crate) fn string_map(resource: &Resource, key: &str) -> Option<HashMap<String, String>> {
    let Some(Value::Map(map)) = resource.attributes.get(key) else {
        return None;
    };
    let mut out = HashMap::new();
    for (k, v) in map {
        if let Value::String(s) = v {
            out.insert(k.clone(), s.clone());
        }
    }
    Some(out)
}

pub(crate) fn string_list(resource: &Resource, key: &str) -> Option<Vec<String>> {
    let Some(Value::List(items)) = resource.attributes.get(key) else {
        return None;
    };
    Some(
        items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
    )
}

/// Put a tags map back into attribute form, dropping empty maps the way the
/// API drops them
pub(crate) fn flatten_tags(
    tags: Option<HashMap<String, String>>,
    attributes: &mut HashMap<String, Value>,
) {
    if let Some(tags) = tags
        && !tags.is_empty()
    {
        let map = tags
            .into_iter()
            .map(|(k, v)| (k, Value::String(v)))
            .collect();
        attributes.insert("tags".to_string(), Value::Map(map));
    }
}

pub(crate) fn encode<T: Serialize>(model: &T) -> ProviderResult<serde_json::Value> {
    serde_json::to_value(model)
        .map_err(|e| ProviderError::new(format!("failed to build request body: {}", e)))
}

pub(crate) fn decode<T: DeserializeOwned>(
    body: &serde_json::Value,
    what: &'static str,
) -> ProviderResult<T> {
    serde_json::from_value(body.clone()).map_err(|e| {
        ProviderError::new(format!("unexpected {} response shape: {}", what, e))
    })
}

pub(crate) fn bad_identifier(error: ParseError) -> ProviderError {
    ProviderError::invalid_config(format!("stored identifier is not valid: {}", error))
}
