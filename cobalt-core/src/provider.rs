//! Provider - Trait abstracting resource operations
//!
//! A Provider owns the API calls for one cloud. All operations are async and
//! involve side effects; nothing here retries or rolls back.

use std::future::Future;
use std::pin::Pin;

use crate::resource::{Resource, ResourceId, State};

/// Classification of a provider failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The declared configuration is invalid for this operation
    InvalidConfig,
    /// The remote resource does not exist where one was required
    NotFound,
    /// A resource with the computed identifier already exists remotely;
    /// it must be imported into state before it can be managed
    AlreadyExists,
    /// The operation did not finish within the configured timeout
    Timeout,
    /// Any other remote API failure, propagated verbatim
    Api,
}

/// Error type for Provider operations
#[derive(Debug)]
pub struct ProviderError {
    pub kind: ErrorKind,
    pub message: String,
    /// Canonical identifier of the resource involved, when known
    pub identifier: Option<String>,
    /// Operation being performed ("create", "read", "update", "delete")
    pub operation: Option<&'static str>,
    pub cause: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.operation, self.identifier.as_deref()) {
            (Some(op), Some(id)) => write!(f, "{} {}: {}", op, id, self.message),
            (Some(op), None) => write!(f, "{}: {}", op, self.message),
            (None, Some(id)) => write!(f, "{}: {}", id, self.message),
            (None, None) => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for ProviderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_ref()
            .map(|e| e.as_ref() as &dyn std::error::Error)
    }
}

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Api,
            message: message.into(),
            identifier: None,
            operation: None,
            cause: None,
        }
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::InvalidConfig,
            ..Self::new(message)
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::NotFound,
            ..Self::new(message)
        }
    }

    /// The distinct "requires import" error for create-time conflicts
    pub fn already_exists(identifier: impl Into<String>) -> Self {
        let identifier = identifier.into();
        Self {
            kind: ErrorKind::AlreadyExists,
            message: format!(
                "a resource with the ID \"{}\" already exists; to manage it, import it into state first",
                identifier
            ),
            identifier: Some(identifier),
            operation: Some("create"),
            cause: None,
        }
    }

    pub fn timeout(operation: &'static str, after_secs: u64) -> Self {
        Self {
            kind: ErrorKind::Timeout,
            message: format!("operation did not complete within {}s", after_secs),
            identifier: None,
            operation: Some(operation),
            cause: None,
        }
    }

    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    pub fn during(mut self, operation: &'static str) -> Self {
        self.operation = Some(operation);
        self
    }

    pub fn with_cause(mut self, cause: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }
}

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Return type for async operations
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Main Provider trait
///
/// One async task executes one operation to completion, including any nested
/// poll-until-done wait. The provider handle is the only shared state.
pub trait Provider: Send + Sync {
    /// Name of this Provider (e.g., "azure")
    fn name(&self) -> &'static str;

    /// Resource type names this Provider can handle
    fn resource_types(&self) -> Vec<&'static str>;

    /// Get the current state of a resource
    ///
    /// `identifier` is the persisted canonical ID; without one the resource
    /// is treated as unmanaged and reported as not found. A remote 404 is
    /// not an error: it returns `State::not_found()`.
    fn read(
        &self,
        id: &ResourceId,
        identifier: Option<&str>,
    ) -> BoxFuture<'_, ProviderResult<State>>;

    /// Create a resource
    ///
    /// Returns State with `identifier` set to the canonical ID
    fn create(&self, resource: &Resource) -> BoxFuture<'_, ProviderResult<State>>;

    /// Update a resource in place
    fn update(
        &self,
        id: &ResourceId,
        identifier: &str,
        from: &State,
        to: &Resource,
    ) -> BoxFuture<'_, ProviderResult<State>>;

    /// Delete a resource; deleting an already-absent resource succeeds
    fn delete(&self, id: &ResourceId, identifier: &str) -> BoxFuture<'_, ProviderResult<()>>;
}

impl Provider for Box<dyn Provider> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn resource_types(&self) -> Vec<&'static str> {
        (**self).resource_types()
    }

    fn read(
        &self,
        id: &ResourceId,
        identifier: Option<&str>,
    ) -> BoxFuture<'_, ProviderResult<State>> {
        (**self).read(id, identifier)
    }

    fn create(&self, resource: &Resource) -> BoxFuture<'_, ProviderResult<State>> {
        (**self).create(resource)
    }

    fn update(
        &self,
        id: &ResourceId,
        identifier: &str,
        from: &State,
        to: &Resource,
    ) -> BoxFuture<'_, ProviderResult<State>> {
        (**self).update(id, identifier, from, to)
    }

    fn delete(&self, id: &ResourceId, identifier: &str) -> BoxFuture<'_, ProviderResult<()>> {
        (**self).delete(id, identifier)
    }
}
