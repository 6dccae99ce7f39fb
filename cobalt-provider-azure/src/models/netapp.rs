//! Models for Microsoft.NetApp (accounts, capacity pools, volumes)

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Service level of a capacity pool or volume
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceLevel {
    Standard,
    Premium,
    Ultra,
}

impl ServiceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceLevel::Standard => "Standard",
            ServiceLevel::Premium => "Premium",
            ServiceLevel::Ultra => "Ultra",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Standard" => Some(ServiceLevel::Standard),
            "Premium" => Some(ServiceLevel::Premium),
            "Ultra" => Some(ServiceLevel::Ultra),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetAppAccount {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<HashMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<NetAppAccountProperties>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetAppAccountProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapacityPool {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<HashMap<String, String>>,
    pub properties: CapacityPoolProperties,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapacityPoolProperties {
    pub service_level: ServiceLevel,
    /// Provisioned size in bytes
    pub size: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetAppVolume {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<HashMap<String, String>>,
    pub properties: VolumeProperties,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeProperties {
    /// Unique export path name for the volume
    pub creation_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_level: Option<ServiceLevel>,
    /// Quota in bytes
    pub usage_threshold: i64,
    pub subnet_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol_types: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_policy: Option<VolumeExportPolicy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolumeExportPolicy {
    pub rules: Vec<ExportPolicyRule>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportPolicyRule {
    pub rule_index: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unix_read_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unix_read_write: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_clients: Option<String>,
}
