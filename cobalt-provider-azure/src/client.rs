//! ARM REST client
//!
//! A thin JSON client for the management endpoint. The canonical resource
//! identifier doubles as the request path; every call carries the resource
//! type's api-version as a query parameter. A 404 on GET/DELETE is surfaced
//! as absence, not as an error; everything else non-2xx becomes an
//! [`ArmError::Api`] carrying the ARM error envelope.

use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;

use crate::auth::{self, AccessToken, AuthError, Credentials, DEFAULT_AUTHORITY};

/// Default management endpoint
pub const DEFAULT_ENDPOINT: &str = "https://management.azure.com";

#[derive(Debug, thiserror::Error)]
pub enum ArmError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned {status} [{code}]: {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error("operation finished with status {status}: {message}")]
    OperationFailed { status: String, message: String },

    #[error("operation did not reach a terminal state after {attempts} polls")]
    OperationTimedOut { attempts: u32 },
}

impl ArmError {
    /// Whether this is a 409 conflict (the identifier already exists)
    pub fn is_conflict(&self) -> bool {
        matches!(self, ArmError::Api { status: 409, .. })
    }
}

/// The ARM error envelope: `{"error": {"code": ..., "message": ...}}`
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    code: Option<String>,
    message: Option<String>,
}

/// Response to a mutating call, carrying what the poller needs
#[derive(Debug)]
pub struct ArmResponse {
    pub status: u16,
    pub body: Option<serde_json::Value>,
    /// `Azure-AsyncOperation` or `Location` header when the operation is async
    pub monitor: Option<String>,
}

impl ArmResponse {
    async fn from_response(response: reqwest::Response) -> Result<Self, ArmError> {
        let status = response.status().as_u16();
        let monitor = response
            .headers()
            .get("azure-asyncoperation")
            .or_else(|| response.headers().get("location"))
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let text = response.text().await?;
        let body = if text.is_empty() {
            None
        } else {
            serde_json::from_str(&text).ok()
        };

        Ok(Self {
            status,
            body,
            monitor,
        })
    }
}

/// JSON client for the ARM management endpoint
pub struct ArmClient {
    http: reqwest::Client,
    endpoint: String,
    authority: String,
    credentials: Credentials,
    token: tokio::sync::Mutex<Option<AccessToken>>,
}

impl ArmClient {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            authority: DEFAULT_AUTHORITY.to_string(),
            credentials,
            token: tokio::sync::Mutex::new(None),
        }
    }

    /// Build a client from the standard environment variables
    pub fn from_env() -> Result<Self, AuthError> {
        Ok(Self::new(Credentials::from_env()?))
    }

    /// Override the management endpoint (tests, sovereign clouds)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    /// Override the token authority
    pub fn with_authority(mut self, authority: impl Into<String>) -> Self {
        self.authority = authority.into().trim_end_matches('/').to_string();
        self
    }

    pub fn subscription_id(&self) -> &str {
        &self.credentials.subscription_id
    }

    async fn bearer(&self) -> Result<String, ArmError> {
        let mut guard = self.token.lock().await;
        if let Some(token) = guard.as_ref()
            && !token.needs_refresh()
        {
            return Ok(token.token.clone());
        }

        let scope = format!("{}/.default", self.endpoint);
        let fresh =
            auth::request_token(&self.http, &self.authority, &self.credentials, &scope).await?;
        let bearer = fresh.token.clone();
        *guard = Some(fresh);
        Ok(bearer)
    }

    fn url(&self, path: &str, api_version: &str) -> String {
        format!("{}{}?api-version={}", self.endpoint, path, api_version)
    }

    /// GET a resource; `None` means the resource does not exist
    pub async fn get(
        &self,
        path: &str,
        api_version: &str,
    ) -> Result<Option<serde_json::Value>, ArmError> {
        debug!(path, api_version, "GET");
        let response = self
            .http
            .get(self.url(path, api_version))
            .bearer_auth(self.bearer().await?)
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => Ok(Some(response.json().await?)),
            status => Err(api_error(status, response).await),
        }
    }

    /// PUT a resource body
    pub async fn put(
        &self,
        path: &str,
        api_version: &str,
        body: &serde_json::Value,
    ) -> Result<ArmResponse, ArmError> {
        debug!(path, api_version, "PUT");
        let response = self
            .http
            .put(self.url(path, api_version))
            .bearer_auth(self.bearer().await?)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(api_error(status, response).await);
        }
        ArmResponse::from_response(response).await
    }

    /// PATCH a resource body
    pub async fn patch(
        &self,
        path: &str,
        api_version: &str,
        body: &serde_json::Value,
    ) -> Result<ArmResponse, ArmError> {
        debug!(path, api_version, "PATCH");
        let response = self
            .http
            .patch(self.url(path, api_version))
            .bearer_auth(self.bearer().await?)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(api_error(status, response).await);
        }
        ArmResponse::from_response(response).await
    }

    /// DELETE a resource; `None` means it was already gone
    pub async fn delete(
        &self,
        path: &str,
        api_version: &str,
    ) -> Result<Option<ArmResponse>, ArmError> {
        debug!(path, api_version, "DELETE");
        let response = self
            .http
            .delete(self.url(path, api_version))
            .bearer_auth(self.bearer().await?)
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => Ok(Some(ArmResponse::from_response(response).await?)),
            status => Err(api_error(status, response).await),
        }
    }

    /// GET an absolute URL (operation monitors hand these out)
    pub(crate) async fn get_absolute(
        &self,
        url: &str,
    ) -> Result<Option<serde_json::Value>, ArmError> {
        let response = self
            .http
            .get(url)
            .bearer_auth(self.bearer().await?)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(api_error(status, response).await);
        }
        let text = response.text().await?;
        if text.is_empty() {
            Ok(None)
        } else {
            Ok(serde_json::from_str(&text).ok())
        }
    }
}

async fn api_error(status: StatusCode, response: reqwest::Response) -> ArmError {
    let text = response.text().await.unwrap_or_default();
    let parsed: ErrorResponse =
        serde_json::from_str(&text).unwrap_or(ErrorResponse { error: None });

    let (code, message) = match parsed.error {
        Some(detail) => (
            detail.code.unwrap_or_else(|| "Unknown".to_string()),
            detail.message.unwrap_or(text),
        ),
        None => ("Unknown".to_string(), text),
    };

    ArmError::Api {
        status: status.as_u16(),
        code,
        message,
    }
}
