//! Cobalt Azure Provider
//!
//! Azure Resource Manager provider implementation.
//!
//! ## Module Structure
//!
//! - `resource_id` - Canonical identifier templates and typed IDs
//! - `client` / `auth` - ARM REST client and credential handling
//! - `lro` - Long-running operation polling
//! - `schemas` - Declarative schemas per resource kind
//! - `models` - ARM wire models
//! - `resources` - Per-resource expand/flatten mapping
//! - `provider` - AzureProvider implementation
//! - `validation` - Attribute validation rules

pub mod auth;
pub mod client;
pub mod lro;
pub mod models;
pub mod provider;
pub mod resource_id;
pub(crate) mod resources;
pub mod schemas;
pub mod validation;

// Re-export main types
pub use client::{ArmClient, ArmError};
pub use provider::AzureProvider;

use cobalt_core::provider::{BoxFuture, Provider, ProviderResult};
use cobalt_core::resource::{Resource, ResourceId, State};

impl Provider for AzureProvider {
    fn name(&self) -> &'static str {
        "azure"
    }

    fn resource_types(&self) -> Vec<&'static str> {
        schemas::configs().iter().map(|c| c.resource_type).collect()
    }

    fn read(
        &self,
        id: &ResourceId,
        identifier: Option<&str>,
    ) -> BoxFuture<'_, ProviderResult<State>> {
        let id = id.clone();
        let identifier = identifier.map(str::to_string);
        Box::pin(async move { self.read_resource(&id, identifier.as_deref()).await })
    }

    fn create(&self, resource: &Resource) -> BoxFuture<'_, ProviderResult<State>> {
        let resource = resource.clone();
        Box::pin(async move { self.create_resource(&resource).await })
    }

    fn update(
        &self,
        id: &ResourceId,
        identifier: &str,
        _from: &State,
        to: &Resource,
    ) -> BoxFuture<'_, ProviderResult<State>> {
        let id = id.clone();
        let identifier = identifier.to_string();
        let to = to.clone();
        Box::pin(async move { self.update_resource(&id, &identifier, &to).await })
    }

    fn delete(&self, id: &ResourceId, identifier: &str) -> BoxFuture<'_, ProviderResult<()>> {
        let id = id.clone();
        let identifier = identifier.to_string();
        Box::pin(async move { self.delete_resource(&id, &identifier).await })
    }
}
