//! State file structures for persisting infrastructure state

use std::collections::HashMap;

use cobalt_core::resource::{ResourceId, State, Value};
use serde::{Deserialize, Serialize};

/// The state document that persists to the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateFile {
    /// State file format version
    pub version: u32,
    /// Monotonically increasing number, bumped on each write
    pub serial: u64,
    /// Unique identifier for this state lineage; prevents one state file
    /// from silently overwriting another
    pub lineage: String,
    /// Version of cobalt that last wrote this state
    pub cobalt_version: String,
    /// All managed resources
    pub resources: Vec<ResourceState>,
}

impl StateFile {
    /// Current state file format version
    pub const CURRENT_VERSION: u32 = 1;

    pub fn new() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            serial: 0,
            lineage: uuid::Uuid::new_v4().to_string(),
            cobalt_version: env!("CARGO_PKG_VERSION").to_string(),
            resources: Vec::new(),
        }
    }

    /// Bump the serial and stamp the writing tool version
    pub fn increment_serial(&mut self) {
        self.serial += 1;
        self.cobalt_version = env!("CARGO_PKG_VERSION").to_string();
    }

    pub fn find_resource(&self, id: &ResourceId) -> Option<&ResourceState> {
        self.resources
            .iter()
            .find(|r| r.resource_type == id.resource_type && r.name == id.name)
    }

    /// Add or replace a resource entry
    pub fn upsert_resource(&mut self, resource: ResourceState) {
        if let Some(existing) = self
            .resources
            .iter_mut()
            .find(|r| r.resource_type == resource.resource_type && r.name == resource.name)
        {
            *existing = resource;
        } else {
            self.resources.push(resource);
        }
    }

    pub fn remove_resource(&mut self, id: &ResourceId) -> Option<ResourceState> {
        let position = self
            .resources
            .iter()
            .position(|r| r.resource_type == id.resource_type && r.name == id.name)?;
        Some(self.resources.remove(position))
    }

    /// Identifier lookup table for plan execution
    pub fn identifiers(&self) -> HashMap<ResourceId, String> {
        self.resources
            .iter()
            .map(|r| (r.resource_id(), r.identifier.clone()))
            .collect()
    }
}

impl Default for StateFile {
    fn default() -> Self {
        Self::new()
    }
}

/// State of a single managed resource
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceState {
    /// Resource type (e.g., "netapp_volume")
    pub resource_type: String,
    /// Binding name from configuration
    pub name: String,
    /// Provider name (e.g., "azure")
    pub provider: String,
    /// Canonical identifier of the remote resource
    pub identifier: String,
    /// Flattened attributes as JSON values
    pub attributes: HashMap<String, serde_json::Value>,
}

impl ResourceState {
    /// Capture the state returned by a provider operation
    ///
    /// Returns `None` for states without an identifier (nothing remote to
    /// track).
    pub fn from_remote(state: &State, provider: impl Into<String>) -> Option<Self> {
        let identifier = state.identifier.clone()?;
        let attributes = state
            .attributes
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect();
        Some(Self {
            resource_type: state.id.resource_type.clone(),
            name: state.id.name.clone(),
            provider: provider.into(),
            identifier,
            attributes,
        })
    }

    pub fn resource_id(&self) -> ResourceId {
        ResourceId::new(self.resource_type.clone(), self.name.clone())
    }

    /// Reconstruct attribute values for diffing
    pub fn to_attributes(&self) -> HashMap<String, Value> {
        self.attributes
            .iter()
            .filter_map(|(k, v)| Value::from_json(v).map(|value| (k.clone(), value)))
            .collect()
    }

    /// The remote state this entry represents
    pub fn to_state(&self) -> State {
        State::existing(self.resource_id(), self.to_attributes())
            .with_identifier(self.identifier.clone())
    }
}
