//! Validation of user-declared attribute values
//!
//! Name rules and identifier checks that run at plan time, before any API
//! call. Each public function returns an `AttributeType` for use in a
//! resource schema; the underlying string checks are exposed for reuse.

use std::sync::LazyLock;

use cobalt_core::resource::Value;
use cobalt_core::schema::AttributeType;
use regex::Regex;

use crate::resource_id::{RoleDefinitionId, SubnetId};

static GUID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .unwrap()
});

static RESOURCE_GROUP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-\w().]{1,90}$").unwrap());

static CREATION_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9-]{0,79}$").unwrap());

/// Check a hyphenated name: alphanumeric with single interior hyphens,
/// within the given length bounds
pub fn validate_hyphenated_name(name: &str, min: usize, max: usize) -> Result<(), String> {
    if name.len() < min || name.len() > max {
        return Err(format!(
            "must be between {} and {} characters, got {}",
            min,
            max,
            name.len()
        ));
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err("may only contain alphanumeric characters and hyphens".to_string());
    }
    if name.starts_with('-') || name.ends_with('-') {
        return Err("must not start or end with a hyphen".to_string());
    }
    if name.contains("--") {
        return Err("must not contain consecutive hyphens".to_string());
    }
    Ok(())
}

fn hyphenated(name: &'static str, min: usize, max: usize) -> AttributeType {
    // The validate fn must be a plain fn pointer, so the bounds are baked
    // into a small set of concrete rules rather than captured.
    match (min, max) {
        (3, 23) => AttributeType::Custom {
            name: name.to_string(),
            base: Box::new(AttributeType::String),
            validate: |v| expect_string(v).and_then(|s| validate_hyphenated_name(s, 3, 23)),
        },
        (1, 63) => AttributeType::Custom {
            name: name.to_string(),
            base: Box::new(AttributeType::String),
            validate: |v| expect_string(v).and_then(|s| validate_hyphenated_name(s, 1, 63)),
        },
        (1, 64) => AttributeType::Custom {
            name: name.to_string(),
            base: Box::new(AttributeType::String),
            validate: |v| expect_string(v).and_then(|s| validate_hyphenated_name(s, 1, 64)),
        },
        _ => unreachable!("no rule registered for bounds {}..={}", min, max),
    }
}

fn expect_string(value: &Value) -> Result<&str, String> {
    value.as_str().ok_or_else(|| "Expected string".to_string())
}

/// Managed HSM cluster name: 3-23 characters, alphanumeric with single
/// interior hyphens
pub fn managed_hsm_name() -> AttributeType {
    hyphenated("ManagedHsmName", 3, 23)
}

/// Managed cluster name: 1-63 characters, alphanumeric with single interior
/// hyphens
pub fn managed_cluster_name() -> AttributeType {
    hyphenated("ManagedClusterName", 1, 63)
}

/// NetApp account and capacity pool names: 1-64 characters
pub fn netapp_name() -> AttributeType {
    hyphenated("NetAppName", 1, 64)
}

/// Resource group name: 1-90 characters of alphanumerics, hyphens,
/// underscores, periods and parentheses; must not end with a period
pub fn resource_group_name() -> AttributeType {
    AttributeType::Custom {
        name: "ResourceGroupName".to_string(),
        base: Box::new(AttributeType::String),
        validate: |value| {
            let s = expect_string(value)?;
            if !RESOURCE_GROUP_RE.is_match(s) {
                return Err(
                    "must be 1-90 characters of letters, digits, hyphens, underscores, periods and parentheses"
                        .to_string(),
                );
            }
            if s.ends_with('.') {
                return Err("must not end with a period".to_string());
            }
            Ok(())
        },
    }
}

/// NetApp volume creation token (export path): starts with a letter,
/// alphanumeric and hyphens, at most 80 characters
pub fn creation_token() -> AttributeType {
    AttributeType::Custom {
        name: "CreationToken".to_string(),
        base: Box::new(AttributeType::String),
        validate: |value| {
            let s = expect_string(value)?;
            if CREATION_TOKEN_RE.is_match(s) {
                Ok(())
            } else {
                Err(
                    "must start with a letter and contain at most 80 letters, digits or hyphens"
                        .to_string(),
                )
            }
        },
    }
}

/// An integer within an inclusive range
fn int_in_range(value: &Value, min: i64, max: i64) -> Result<(), String> {
    let Some(n) = value.as_int() else {
        return Err("Expected integer".to_string());
    };
    if n < min || n > max {
        return Err(format!("must be between {} and {}, got {}", min, max, n));
    }
    Ok(())
}

/// Capacity pool size in tebibytes: 4-500
pub fn pool_size_tb() -> AttributeType {
    AttributeType::Custom {
        name: "PoolSizeTb".to_string(),
        base: Box::new(AttributeType::Int),
        validate: |v| int_in_range(v, 4, 500),
    }
}

/// Volume quota in gibibytes: 100-102400
pub fn volume_quota_gb() -> AttributeType {
    AttributeType::Custom {
        name: "VolumeQuotaGb".to_string(),
        base: Box::new(AttributeType::Int),
        validate: |v| int_in_range(v, 100, 102_400),
    }
}

/// Soft-delete retention in days: 7-90
pub fn retention_days() -> AttributeType {
    AttributeType::Custom {
        name: "RetentionDays".to_string(),
        base: Box::new(AttributeType::Int),
        validate: |v| int_in_range(v, 7, 90),
    }
}

/// Agent pool node count: 1-1000
pub fn node_count() -> AttributeType {
    AttributeType::Custom {
        name: "NodeCount".to_string(),
        base: Box::new(AttributeType::Int),
        validate: |v| int_in_range(v, 1, 1000),
    }
}

static NODE_POOL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9]{0,11}$").unwrap());

/// Agent pool name: a lowercase letter followed by up to 11 lowercase
/// letters or digits
pub fn node_pool_name() -> AttributeType {
    AttributeType::Custom {
        name: "NodePoolName".to_string(),
        base: Box::new(AttributeType::String),
        validate: |value| {
            let s = expect_string(value)?;
            if NODE_POOL_RE.is_match(s) {
                Ok(())
            } else {
                Err("must start with a lowercase letter and contain at most 12 lowercase letters and digits"
                    .to_string())
            }
        },
    }
}

/// A GUID, as used for role assignment names and principal IDs
pub fn guid() -> AttributeType {
    AttributeType::Custom {
        name: "Guid".to_string(),
        base: Box::new(AttributeType::String),
        validate: |value| {
            let s = expect_string(value)?;
            if GUID_RE.is_match(s) {
                Ok(())
            } else {
                Err(format!("'{}' is not a valid GUID", s))
            }
        },
    }
}

/// A role definition identifier; the value must parse against the canonical
/// template, the parsed result is discarded
pub fn role_definition_id() -> AttributeType {
    AttributeType::Custom {
        name: "RoleDefinitionId".to_string(),
        base: Box::new(AttributeType::String),
        validate: |value| {
            let s = expect_string(value)?;
            RoleDefinitionId::parse(s).map(|_| ()).map_err(|e| e.to_string())
        },
    }
}

/// A subnet identifier; the value must parse against the canonical
/// template, the parsed result is discarded
pub fn subnet_id() -> AttributeType {
    AttributeType::Custom {
        name: "SubnetId".to_string(),
        base: Box::new(AttributeType::String),
        validate: |value| {
            let s = expect_string(value)?;
            SubnetId::parse(s).map(|_| ()).map_err(|e| e.to_string())
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // The 3/23 cluster-name rule, worked end to end

    #[test]
    fn hsm_name_accepts_minimum_length() {
        let t = managed_hsm_name();
        assert!(t.validate(&Value::String("abc".to_string())).is_ok());
    }

    #[test]
    fn hsm_name_accepts_maximum_length() {
        let t = managed_hsm_name();
        assert!(t.validate(&Value::String("a".repeat(23))).is_ok());
    }

    #[test]
    fn hsm_name_rejects_too_short() {
        let t = managed_hsm_name();
        assert!(t.validate(&Value::String("ab".to_string())).is_err());
    }

    #[test]
    fn hsm_name_rejects_too_long() {
        let t = managed_hsm_name();
        assert!(t.validate(&Value::String("a".repeat(24))).is_err());
    }

    #[test]
    fn hsm_name_rejects_consecutive_hyphens() {
        let t = managed_hsm_name();
        assert!(t.validate(&Value::String("hello--world".to_string())).is_err());
    }

    #[test]
    fn hsm_name_accepts_interior_hyphen_at_minimum() {
        let t = managed_hsm_name();
        assert!(t.validate(&Value::String("a-b".to_string())).is_ok());
    }

    #[test]
    fn hyphenated_rejects_leading_and_trailing_hyphen() {
        assert!(validate_hyphenated_name("-abc", 3, 23).is_err());
        assert!(validate_hyphenated_name("abc-", 3, 23).is_err());
    }

    #[test]
    fn hyphenated_rejects_other_characters() {
        assert!(validate_hyphenated_name("abc_def", 3, 23).is_err());
        assert!(validate_hyphenated_name("abc.def", 3, 23).is_err());
    }

    #[test]
    fn resource_group_name_rules() {
        let t = resource_group_name();
        assert!(t.validate(&Value::String("primary-rg".to_string())).is_ok());
        assert!(t.validate(&Value::String("rg.with(parens)_1".to_string())).is_ok());
        assert!(t.validate(&Value::String("ends-with.".to_string())).is_err());
        assert!(t.validate(&Value::String("a".repeat(91))).is_err());
        assert!(t.validate(&Value::String(String::new())).is_err());
    }

    #[test]
    fn creation_token_rules() {
        let t = creation_token();
        assert!(t.validate(&Value::String("exports-1".to_string())).is_ok());
        assert!(t.validate(&Value::String("1-starts-with-digit".to_string())).is_err());
        assert!(t.validate(&Value::String(format!("a{}", "b".repeat(80)))).is_err());
    }

    #[test]
    fn guid_rules() {
        let t = guid();
        assert!(
            t.validate(&Value::String(
                "b24988ac-6180-42a0-ab88-20f7382dd24c".to_string()
            ))
            .is_ok()
        );
        assert!(t.validate(&Value::String("not-a-guid".to_string())).is_err());
        assert!(t.validate(&Value::Int(7)).is_err());
    }

    #[test]
    fn range_rules() {
        assert!(pool_size_tb().validate(&Value::Int(4)).is_ok());
        assert!(pool_size_tb().validate(&Value::Int(3)).is_err());
        assert!(pool_size_tb().validate(&Value::Int(501)).is_err());
        assert!(volume_quota_gb().validate(&Value::Int(100)).is_ok());
        assert!(volume_quota_gb().validate(&Value::Int(99)).is_err());
        assert!(retention_days().validate(&Value::Int(90)).is_ok());
        assert!(retention_days().validate(&Value::Int(91)).is_err());
        assert!(node_count().validate(&Value::String("3".to_string())).is_err());
    }

    #[test]
    fn node_pool_name_rules() {
        let t = node_pool_name();
        assert!(t.validate(&Value::String("default".to_string())).is_ok());
        assert!(t.validate(&Value::String("Default".to_string())).is_err());
        assert!(t.validate(&Value::String("0pool".to_string())).is_err());
        assert!(t.validate(&Value::String("poolnametoolong".to_string())).is_err());
    }

    #[test]
    fn subnet_id_parses_and_discards() {
        let t = subnet_id();
        assert!(
            t.validate(&Value::String(
                "/subscriptions/sub-1/resourceGroups/rg-1/providers/Microsoft.Network/virtualNetworks/vnet-1/subnets/storage"
                    .to_string()
            ))
            .is_ok()
        );
        assert!(t.validate(&Value::String("storage".to_string())).is_err());
    }

    #[test]
    fn role_definition_id_parses_and_discards() {
        let t = role_definition_id();
        assert!(
            t.validate(&Value::String(
                "/subscriptions/sub-1/providers/Microsoft.Authorization/roleDefinitions/b24988ac-6180-42a0-ab88-20f7382dd24c"
                    .to_string()
            ))
            .is_ok()
        );
        // User-typed configuration must match canonical casing exactly
        let err = t
            .validate(&Value::String(
                "/subscriptions/sub-1/providers/microsoft.authorization/roleDefinitions/x".to_string(),
            ))
            .unwrap_err();
        assert!(err.to_string().contains("Microsoft.Authorization"));
    }
}
