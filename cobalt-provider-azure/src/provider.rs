//! Azure Resource Manager provider
//!
//! Create builds the canonical identifier from configuration, refuses to
//! adopt a resource that already exists remotely, PUTs the expanded body
//! and waits out the long-running operation. Read parses the persisted
//! identifier leniently and treats a remote 404 as external deletion.
//! Nothing here retries; partial failure is left for the next read.

use std::collections::HashMap;

use cobalt_core::provider::{ProviderError, ProviderResult};
use cobalt_core::resource::{Resource, ResourceId, State, Value};
use tracing::info;

use crate::auth::AuthError;
use crate::client::{ArmClient, ArmError};
use crate::lro::Poller;
use crate::resource_id::ParseError;
use crate::resources;
use crate::schemas::{self, AzureSchemaConfig, UpdateVerb};

/// Dispatch key for the supported resource kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    ResourceGroup,
    NetAppAccount,
    NetAppPool,
    NetAppVolume,
    ManagedHsm,
    ManagedCluster,
    RoleAssignment,
}

impl Kind {
    fn from_type(resource_type: &str) -> Option<Self> {
        match resource_type {
            "resource_group" => Some(Kind::ResourceGroup),
            "netapp_account" => Some(Kind::NetAppAccount),
            "netapp_pool" => Some(Kind::NetAppPool),
            "netapp_volume" => Some(Kind::NetAppVolume),
            "managed_hsm" => Some(Kind::ManagedHsm),
            "managed_cluster" => Some(Kind::ManagedCluster),
            "role_assignment" => Some(Kind::RoleAssignment),
            _ => None,
        }
    }

    fn type_name(self) -> &'static str {
        match self {
            Kind::ResourceGroup => "resource_group",
            Kind::NetAppAccount => "netapp_account",
            Kind::NetAppPool => "netapp_pool",
            Kind::NetAppVolume => "netapp_volume",
            Kind::ManagedHsm => "managed_hsm",
            Kind::ManagedCluster => "managed_cluster",
            Kind::RoleAssignment => "role_assignment",
        }
    }

    fn config(self) -> AzureSchemaConfig {
        // The registry covers every Kind variant
        schemas::config_for(self.type_name())
            .unwrap_or_else(|| unreachable!("no schema registered for {}", self.type_name()))
    }

    fn identifier(self, subscription_id: &str, resource: &Resource) -> ProviderResult<String> {
        match self {
            Kind::ResourceGroup => resources::resource_group::identifier(subscription_id, resource),
            Kind::NetAppAccount => resources::netapp_account::identifier(subscription_id, resource),
            Kind::NetAppPool => resources::netapp_pool::identifier(subscription_id, resource),
            Kind::NetAppVolume => resources::netapp_volume::identifier(subscription_id, resource),
            Kind::ManagedHsm => resources::managed_hsm::identifier(subscription_id, resource),
            Kind::ManagedCluster => {
                resources::managed_cluster::identifier(subscription_id, resource)
            }
            Kind::RoleAssignment => {
                resources::role_assignment::identifier(subscription_id, resource)
            }
        }
    }

    fn canonical_identifier(self, persisted: &str) -> Result<String, ParseError> {
        match self {
            Kind::ResourceGroup => resources::resource_group::canonical_identifier(persisted),
            Kind::NetAppAccount => resources::netapp_account::canonical_identifier(persisted),
            Kind::NetAppPool => resources::netapp_pool::canonical_identifier(persisted),
            Kind::NetAppVolume => resources::netapp_volume::canonical_identifier(persisted),
            Kind::ManagedHsm => resources::managed_hsm::canonical_identifier(persisted),
            Kind::ManagedCluster => resources::managed_cluster::canonical_identifier(persisted),
            Kind::RoleAssignment => resources::role_assignment::canonical_identifier(persisted),
        }
    }

    fn expand(self, resource: &Resource) -> ProviderResult<serde_json::Value> {
        match self {
            Kind::ResourceGroup => resources::resource_group::expand(resource),
            Kind::NetAppAccount => resources::netapp_account::expand(resource),
            Kind::NetAppPool => resources::netapp_pool::expand(resource),
            Kind::NetAppVolume => resources::netapp_volume::expand(resource),
            Kind::ManagedHsm => resources::managed_hsm::expand(resource),
            Kind::ManagedCluster => resources::managed_cluster::expand(resource),
            Kind::RoleAssignment => resources::role_assignment::expand(resource),
        }
    }

    fn flatten(
        self,
        identifier: &str,
        body: &serde_json::Value,
    ) -> ProviderResult<HashMap<String, Value>> {
        match self {
            Kind::ResourceGroup => resources::resource_group::flatten(identifier, body),
            Kind::NetAppAccount => resources::netapp_account::flatten(identifier, body),
            Kind::NetAppPool => resources::netapp_pool::flatten(identifier, body),
            Kind::NetAppVolume => resources::netapp_volume::flatten(identifier, body),
            Kind::ManagedHsm => resources::managed_hsm::flatten(identifier, body),
            Kind::ManagedCluster => resources::managed_cluster::flatten(identifier, body),
            Kind::RoleAssignment => resources::role_assignment::flatten(identifier, body),
        }
    }
}

/// Wrap a client error with the operation and identifier it belongs to
fn wrap(error: ArmError, operation: &'static str, identifier: &str) -> ProviderError {
    ProviderError::new(error.to_string())
        .with_identifier(identifier)
        .during(operation)
        .with_cause(error)
}

/// The ARM provider
pub struct AzureProvider {
    client: ArmClient,
    poller: Poller,
}

impl AzureProvider {
    pub fn new(client: ArmClient) -> Self {
        Self {
            client,
            poller: Poller::default(),
        }
    }

    /// Build a provider from the standard environment variables
    pub fn from_env() -> Result<Self, AuthError> {
        Ok(Self::new(ArmClient::from_env()?))
    }

    /// Override polling cadence (tests)
    pub fn with_poller(mut self, poller: Poller) -> Self {
        self.poller = poller;
        self
    }

    fn kind_for(&self, id: &ResourceId) -> ProviderResult<Kind> {
        Kind::from_type(&id.resource_type).ok_or_else(|| {
            ProviderError::invalid_config(format!(
                "unknown resource type: {}",
                id.resource_type
            ))
        })
    }

    pub(crate) async fn read_resource(
        &self,
        id: &ResourceId,
        identifier: Option<&str>,
    ) -> ProviderResult<State> {
        let kind = self.kind_for(id)?;

        // Without a persisted identifier the resource is unmanaged
        let Some(identifier) = identifier else {
            return Ok(State::not_found(id.clone()));
        };

        let canonical = kind
            .canonical_identifier(identifier)
            .map_err(|e| resources::bad_identifier(e).during("read"))?;
        let config = kind.config();

        let body = self
            .client
            .get(&canonical, config.api_version)
            .await
            .map_err(|e| wrap(e, "read", &canonical))?;

        match body {
            None => {
                info!(identifier = %canonical, "resource no longer exists");
                Ok(State::not_found(id.clone()))
            }
            Some(body) => {
                let attributes = kind
                    .flatten(&canonical, &body)
                    .map_err(|e| e.during("read").with_identifier(canonical.clone()))?;
                Ok(State::existing(id.clone(), attributes).with_identifier(canonical))
            }
        }
    }

    pub(crate) async fn create_resource(&self, resource: &Resource) -> ProviderResult<State> {
        let kind = self.kind_for(&resource.id)?;
        let config = kind.config();

        if let Err(errors) = config.schema.validate(&resource.attributes) {
            let joined: Vec<String> = errors.iter().map(ToString::to_string).collect();
            return Err(
                ProviderError::invalid_config(joined.join("; ")).during("create")
            );
        }

        let identifier = kind.identifier(self.client.subscription_id(), resource)?;

        // A resource already living at this identifier must be imported,
        // not silently adopted
        let existing = self
            .client
            .get(&identifier, config.api_version)
            .await
            .map_err(|e| wrap(e, "create", &identifier))?;
        if existing.is_some() {
            return Err(ProviderError::already_exists(identifier));
        }

        let body = kind.expand(resource)?;
        let response = self
            .client
            .put(&identifier, config.api_version, &body)
            .await
            .map_err(|e| {
                if e.is_conflict() {
                    ProviderError::already_exists(identifier.clone())
                } else {
                    wrap(e, "create", &identifier)
                }
            })?;

        self.poller
            .wait_for_completion(&self.client, &response, &identifier, config.api_version)
            .await
            .map_err(|e| wrap(e, "create", &identifier))?;

        info!(identifier = %identifier, "created");
        self.read_back(&resource.id, kind, &identifier, "create").await
    }

    pub(crate) async fn update_resource(
        &self,
        id: &ResourceId,
        identifier: &str,
        to: &Resource,
    ) -> ProviderResult<State> {
        let kind = self.kind_for(id)?;
        let config = kind.config();

        let canonical = kind
            .canonical_identifier(identifier)
            .map_err(|e| resources::bad_identifier(e).during("update"))?;

        if let Err(errors) = config.schema.validate(&to.attributes) {
            let joined: Vec<String> = errors.iter().map(ToString::to_string).collect();
            return Err(ProviderError::invalid_config(joined.join("; "))
                .with_identifier(canonical)
                .during("update"));
        }

        let body = kind.expand(to)?;
        let result = match config.update_verb {
            UpdateVerb::Put => self.client.put(&canonical, config.api_version, &body).await,
            UpdateVerb::Patch => self.client.patch(&canonical, config.api_version, &body).await,
        };
        let response = result.map_err(|e| wrap(e, "update", &canonical))?;

        self.poller
            .wait_for_completion(&self.client, &response, &canonical, config.api_version)
            .await
            .map_err(|e| wrap(e, "update", &canonical))?;

        info!(identifier = %canonical, "updated");
        self.read_back(id, kind, &canonical, "update").await
    }

    pub(crate) async fn delete_resource(
        &self,
        id: &ResourceId,
        identifier: &str,
    ) -> ProviderResult<()> {
        let kind = self.kind_for(id)?;
        let config = kind.config();

        let canonical = kind
            .canonical_identifier(identifier)
            .map_err(|e| resources::bad_identifier(e).during("delete"))?;

        let response = self
            .client
            .delete(&canonical, config.api_version)
            .await
            .map_err(|e| wrap(e, "delete", &canonical))?;

        match response {
            // Already gone counts as deleted
            None => Ok(()),
            Some(response) => {
                self.poller
                    .wait_for_delete(&self.client, &response, &canonical, config.api_version)
                    .await
                    .map_err(|e| wrap(e, "delete", &canonical))?;
                info!(identifier = %canonical, "deleted");
                Ok(())
            }
        }
    }

    /// Re-read a resource after a mutation to capture computed attributes
    async fn read_back(
        &self,
        id: &ResourceId,
        kind: Kind,
        identifier: &str,
        operation: &'static str,
    ) -> ProviderResult<State> {
        let config = kind.config();
        let body = self
            .client
            .get(identifier, config.api_version)
            .await
            .map_err(|e| wrap(e, operation, identifier))?
            .ok_or_else(|| {
                ProviderError::not_found("resource was not found after the operation completed")
                    .with_identifier(identifier)
                    .during(operation)
            })?;

        let attributes = kind
            .flatten(identifier, &body)
            .map_err(|e| e.during(operation).with_identifier(identifier))?;
        Ok(State::existing(id.clone(), attributes).with_identifier(identifier))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cobalt_core::provider::ErrorKind;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::client::tests::{mock_token_endpoint, test_client};

    const RG_PATH: &str = "/subscriptions/sub-1/resourceGroups/primary-rg";

    fn provider(server: &MockServer) -> AzureProvider {
        AzureProvider::new(test_client(server))
            .with_poller(Poller::new(Duration::from_millis(1), 10))
    }

    fn rg_resource() -> Resource {
        Resource::new("resource_group", "primary")
            .with_attribute("name", Value::String("primary-rg".to_string()))
            .with_attribute("location", Value::String("westeurope".to_string()))
    }

    fn rg_body() -> serde_json::Value {
        serde_json::json!({
            "id": RG_PATH,
            "name": "primary-rg",
            "location": "westeurope",
            "properties": { "provisioningState": "Succeeded" }
        })
    }

    #[tokio::test]
    async fn create_checks_existence_then_puts() {
        let server = MockServer::start().await;
        mock_token_endpoint(&server).await;

        // Existence probe comes back empty, then the read-back succeeds
        Mock::given(method("GET"))
            .and(path(RG_PATH))
            .respond_with(ResponseTemplate::new(404))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path(RG_PATH))
            .and(query_param("api-version", "2021-04-01"))
            .respond_with(ResponseTemplate::new(200).set_body_json(rg_body()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(RG_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(rg_body()))
            .mount(&server)
            .await;

        let state = provider(&server).create_resource(&rg_resource()).await.unwrap();

        assert!(state.exists);
        assert_eq!(state.identifier.as_deref(), Some(RG_PATH));
        assert_eq!(
            state.attributes.get("location"),
            Some(&Value::String("westeurope".to_string()))
        );
    }

    #[tokio::test]
    async fn create_of_existing_resource_requires_import() {
        let server = MockServer::start().await;
        mock_token_endpoint(&server).await;

        Mock::given(method("GET"))
            .and(path(RG_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(rg_body()))
            .mount(&server)
            .await;

        let err = provider(&server)
            .create_resource(&rg_resource())
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::AlreadyExists);
        assert!(err.message.contains("import"));
    }

    #[tokio::test]
    async fn create_rejects_invalid_configuration_before_any_call() {
        let server = MockServer::start().await;
        // No mocks mounted: an API call would fail loudly

        let resource = rg_resource().with_attribute("location", Value::Int(7));
        let err = provider(&server).create_resource(&resource).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidConfig);
    }

    #[tokio::test]
    async fn read_of_vanished_resource_clears_state() {
        let server = MockServer::start().await;
        mock_token_endpoint(&server).await;

        Mock::given(method("GET"))
            .and(path(RG_PATH))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let id = ResourceId::new("resource_group", "primary");
        let state = provider(&server)
            .read_resource(&id, Some(RG_PATH))
            .await
            .unwrap();

        assert!(!state.exists);
        assert!(state.identifier.is_none());
    }

    #[tokio::test]
    async fn read_accepts_case_drifted_identifiers() {
        let server = MockServer::start().await;
        mock_token_endpoint(&server).await;

        Mock::given(method("GET"))
            .and(path(RG_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(rg_body()))
            .mount(&server)
            .await;

        let id = ResourceId::new("resource_group", "primary");
        let drifted = "/SUBSCRIPTIONS/sub-1/resourcegroups/primary-rg";
        let state = provider(&server)
            .read_resource(&id, Some(drifted))
            .await
            .unwrap();

        // The canonical rendering is persisted, with user values untouched
        assert_eq!(state.identifier.as_deref(), Some(RG_PATH));
    }

    #[tokio::test]
    async fn read_without_identifier_is_unmanaged() {
        let server = MockServer::start().await;
        let id = ResourceId::new("resource_group", "primary");
        let state = provider(&server).read_resource(&id, None).await.unwrap();
        assert!(!state.exists);
    }

    #[tokio::test]
    async fn delete_of_absent_resource_succeeds() {
        let server = MockServer::start().await;
        mock_token_endpoint(&server).await;

        Mock::given(method("DELETE"))
            .and(path(RG_PATH))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let id = ResourceId::new("resource_group", "primary");
        provider(&server)
            .delete_resource(&id, RG_PATH)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn api_errors_carry_operation_and_identifier() {
        let server = MockServer::start().await;
        mock_token_endpoint(&server).await;

        Mock::given(method("DELETE"))
            .and(path(RG_PATH))
            .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
                "error": { "code": "InternalServerError", "message": "boom" }
            })))
            .mount(&server)
            .await;

        let id = ResourceId::new("resource_group", "primary");
        let err = provider(&server)
            .delete_resource(&id, RG_PATH)
            .await
            .unwrap_err();

        let rendered = err.to_string();
        assert!(rendered.contains("delete"));
        assert!(rendered.contains(RG_PATH));
        assert!(rendered.contains("boom"));
    }

    #[tokio::test]
    async fn unknown_resource_type_is_invalid_config() {
        let server = MockServer::start().await;
        let id = ResourceId::new("virtual_network", "net");
        let err = provider(&server).read_resource(&id, None).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidConfig);
    }
}
