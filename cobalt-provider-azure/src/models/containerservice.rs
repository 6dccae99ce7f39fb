//! Models for Microsoft.ContainerService (managed Kubernetes clusters)

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManagedCluster {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<ManagedClusterSku>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<HashMap<String, String>>,
    pub properties: ManagedClusterProperties,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManagedClusterSku {
    pub name: String,
    pub tier: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagedClusterProperties {
    pub dns_prefix: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kubernetes_version: Option<String>,
    pub agent_pool_profiles: Vec<AgentPoolProfile>,
    #[serde(rename = "enableRBAC", skip_serializing_if = "Option::is_none")]
    pub enable_rbac: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub support_plan: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_resource_group: Option<String>,
    /// Read-only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fqdn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentPoolProfile {
    pub name: String,
    pub count: i64,
    pub vm_size: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rbac_field_uses_upstream_casing() {
        let properties = ManagedClusterProperties {
            dns_prefix: "workloads".to_string(),
            kubernetes_version: None,
            agent_pool_profiles: vec![AgentPoolProfile {
                name: "default".to_string(),
                count: 3,
                vm_size: "Standard_D2s_v3".to_string(),
                mode: Some("System".to_string()),
            }],
            enable_rbac: Some(true),
            support_plan: None,
            node_resource_group: None,
            fqdn: None,
            provisioning_state: None,
        };

        let json = serde_json::to_value(&properties).unwrap();
        assert_eq!(json["enableRBAC"], true);
        assert_eq!(json["dnsPrefix"], "workloads");
        assert_eq!(json["agentPoolProfiles"][0]["vmSize"], "Standard_D2s_v3");
    }
}
