//! Role assignment mapping
//!
//! Assignments are named by GUID; when configuration omits the name one is
//! generated at create time and persisted through the identifier.

use std::collections::HashMap;

use cobalt_core::provider::ProviderResult;
use cobalt_core::resource::{Resource, Value};

use super::{bad_identifier, decode, encode, optional_string, require_string};
use crate::models::authorization::{RoleAssignment, RoleAssignmentProperties};
use crate::resource_id::{ParseError, RoleAssignmentId};

pub(crate) fn identifier(subscription_id: &str, resource: &Resource) -> ProviderResult<String> {
    let resource_group = require_string(resource, "resource_group")?;
    let name = optional_string(resource, "name")
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    Ok(RoleAssignmentId::new(subscription_id, resource_group, name).to_string())
}

pub(crate) fn canonical_identifier(persisted: &str) -> Result<String, ParseError> {
    Ok(RoleAssignmentId::parse_insensitively(persisted)?.to_string())
}

pub(crate) fn expand(resource: &Resource) -> ProviderResult<serde_json::Value> {
    let body = RoleAssignment {
        id: None,
        name: None,
        properties: RoleAssignmentProperties {
            role_definition_id: require_string(resource, "role_definition_id")?,
            principal_id: require_string(resource, "principal_id")?,
            principal_type: optional_string(resource, "principal_type"),
            scope: None,
        },
    };
    encode(&body)
}

pub(crate) fn flatten(
    identifier: &str,
    body: &serde_json::Value,
) -> ProviderResult<HashMap<String, Value>> {
    let id = RoleAssignmentId::parse_insensitively(identifier).map_err(bad_identifier)?;
    let assignment: RoleAssignment = decode(body, "role assignment")?;

    let mut attributes = HashMap::new();
    attributes.insert("name".to_string(), Value::String(id.assignment_name));
    attributes.insert(
        "resource_group".to_string(),
        Value::String(id.resource_group),
    );

    let properties = assignment.properties;
    attributes.insert(
        "role_definition_id".to_string(),
        Value::String(properties.role_definition_id),
    );
    attributes.insert(
        "principal_id".to_string(),
        Value::String(properties.principal_id),
    );
    if let Some(principal_type) = properties.principal_type {
        attributes.insert("principal_type".to_string(), Value::String(principal_type));
    }
    Ok(attributes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn omitted_name_generates_a_guid() {
        let resource = Resource::new("role_assignment", "operators")
            .with_attribute("resource_group", Value::String("rg-1".to_string()));

        let identifier = identifier("sub-1", &resource).unwrap();
        let parsed = RoleAssignmentId::parse(&identifier).unwrap();
        // Generated names are GUIDs
        assert_eq!(parsed.assignment_name.len(), 36);
        assert_eq!(parsed.assignment_name.matches('-').count(), 4);
    }

    #[test]
    fn declared_name_is_respected() {
        let resource = Resource::new("role_assignment", "operators")
            .with_attribute("resource_group", Value::String("rg-1".to_string()))
            .with_attribute(
                "name",
                Value::String("8d7331cb-f10f-48b1-a2d8-5f4e4e2dbe47".to_string()),
            );

        let identifier = identifier("sub-1", &resource).unwrap();
        assert!(identifier.ends_with("8d7331cb-f10f-48b1-a2d8-5f4e4e2dbe47"));
    }

    #[test]
    fn flatten_reads_name_from_the_identifier() {
        let identifier =
            "/subscriptions/sub-1/resourceGroups/rg-1/providers/Microsoft.Authorization/roleAssignments/8d7331cb-f10f-48b1-a2d8-5f4e4e2dbe47";
        let body = serde_json::json!({
            "properties": {
                "roleDefinitionId": "/subscriptions/sub-1/providers/Microsoft.Authorization/roleDefinitions/b24988ac-6180-42a0-ab88-20f7382dd24c",
                "principalId": "11111111-2222-3333-4444-555555555555",
                "principalType": "ServicePrincipal"
            }
        });

        let attributes = flatten(identifier, &body).unwrap();
        assert_eq!(
            attributes.get("name"),
            Some(&Value::String(
                "8d7331cb-f10f-48b1-a2d8-5f4e4e2dbe47".to_string()
            ))
        );
        assert_eq!(
            attributes.get("principal_type"),
            Some(&Value::String("ServicePrincipal".to_string()))
        );
    }
}
