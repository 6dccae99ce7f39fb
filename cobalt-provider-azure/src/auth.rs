//! Client-credential authentication
//!
//! Credentials come from the standard environment variables; tokens are
//! acquired with the OAuth2 client-credentials flow and cached until close
//! to expiry.

use std::time::{Duration, Instant};

use serde::Deserialize;

/// Default token authority
pub const DEFAULT_AUTHORITY: &str = "https://login.microsoftonline.com";

/// Tokens are refreshed this long before they actually expire
const EXPIRY_LEEWAY: Duration = Duration::from_secs(300);

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("environment variable {0} is not set")]
    MissingVariable(&'static str),

    #[error("token request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("token endpoint returned {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Service principal credentials
#[derive(Debug, Clone)]
pub struct Credentials {
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
    pub subscription_id: String,
}

impl Credentials {
    /// Read credentials from the standard environment variables
    pub fn from_env() -> Result<Self, AuthError> {
        Ok(Self {
            tenant_id: env_var("AZURE_TENANT_ID")?,
            client_id: env_var("AZURE_CLIENT_ID")?,
            client_secret: env_var("AZURE_CLIENT_SECRET")?,
            subscription_id: env_var("AZURE_SUBSCRIPTION_ID")?,
        })
    }
}

fn env_var(name: &'static str) -> Result<String, AuthError> {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(AuthError::MissingVariable(name)),
    }
}

/// A bearer token with its refresh deadline
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub token: String,
    expires_at: Instant,
}

impl AccessToken {
    pub fn new(token: impl Into<String>, lifetime: Duration) -> Self {
        Self {
            token: token.into(),
            expires_at: Instant::now() + lifetime,
        }
    }

    /// Whether the token is within the refresh leeway of expiring
    pub fn needs_refresh(&self) -> bool {
        Instant::now() + EXPIRY_LEEWAY >= self.expires_at
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

/// Request a token for `scope` with the client-credentials grant
pub async fn request_token(
    http: &reqwest::Client,
    authority: &str,
    credentials: &Credentials,
    scope: &str,
) -> Result<AccessToken, AuthError> {
    let url = format!("{}/{}/oauth2/v2.0/token", authority, credentials.tenant_id);
    let params = [
        ("grant_type", "client_credentials"),
        ("client_id", credentials.client_id.as_str()),
        ("client_secret", credentials.client_secret.as_str()),
        ("scope", scope),
    ];

    let response = http.post(&url).form(&params).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(AuthError::Rejected {
            status: status.as_u16(),
            body: response.text().await.unwrap_or_default(),
        });
    }

    let token: TokenResponse = response.json().await?;
    Ok(AccessToken::new(
        token.access_token,
        Duration::from_secs(token.expires_in),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_token_does_not_need_refresh() {
        let token = AccessToken::new("t", Duration::from_secs(3600));
        assert!(!token.needs_refresh());
    }

    #[test]
    fn token_inside_leeway_needs_refresh() {
        let token = AccessToken::new("t", Duration::from_secs(60));
        assert!(token.needs_refresh());
    }
}
