//! Models for Microsoft.KeyVault (managed HSM clusters)

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManagedHsm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub location: String,
    pub sku: ManagedHsmSku,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<HashMap<String, String>>,
    pub properties: ManagedHsmProperties,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManagedHsmSku {
    pub family: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagedHsmProperties {
    pub tenant_id: String,
    pub initial_admin_object_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub soft_delete_retention_in_days: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_purge_protection: Option<bool>,
    /// Read-only; populated by the service once provisioning finishes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hsm_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_body_uses_wire_names() {
        let body = ManagedHsm {
            id: None,
            name: None,
            location: "westeurope".to_string(),
            sku: ManagedHsmSku {
                family: "B".to_string(),
                name: "Standard_B1".to_string(),
            },
            tags: None,
            properties: ManagedHsmProperties {
                tenant_id: "72f988bf-86f1-41af-91ab-2d7cd011db47".to_string(),
                initial_admin_object_ids: vec!["11111111-2222-3333-4444-555555555555".to_string()],
                soft_delete_retention_in_days: Some(90),
                enable_purge_protection: None,
                hsm_uri: None,
                provisioning_state: None,
            },
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["sku"]["name"], "Standard_B1");
        assert_eq!(
            json["properties"]["initialAdminObjectIds"][0],
            "11111111-2222-3333-4444-555555555555"
        );
        assert_eq!(json["properties"]["softDeleteRetentionInDays"], 90);
        assert!(json["properties"].get("enablePurgeProtection").is_none());
    }
}
