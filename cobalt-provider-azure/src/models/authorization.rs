//! Models for Microsoft.Authorization (role assignments)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleAssignment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub properties: RoleAssignmentProperties,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleAssignmentProperties {
    pub role_definition_id: String,
    pub principal_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal_type: Option<String>,
    /// Read-only in responses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_body_has_no_scope() {
        let body = RoleAssignment {
            id: None,
            name: None,
            properties: RoleAssignmentProperties {
                role_definition_id:
                    "/subscriptions/s/providers/Microsoft.Authorization/roleDefinitions/b24988ac-6180-42a0-ab88-20f7382dd24c"
                        .to_string(),
                principal_id: "11111111-2222-3333-4444-555555555555".to_string(),
                principal_type: Some("ServicePrincipal".to_string()),
                scope: None,
            },
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["properties"]["principalType"], "ServicePrincipal");
        assert!(json["properties"].get("scope").is_none());
    }
}
