//! Auth0 auth provider.
//!
//! Plain client credentials grant against the tenant's `/oauth/token`
//! endpoint, with the Management API as the default audience.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::{AuthError, Result};
use super::provider::{AuthProvider, TokenCache};
use crate::config::Auth0SsoConfig;

#[derive(Debug, Serialize)]
struct TokenRequest<'a> {
    grant_type: &'a str,
    client_id: &'a str,
    client_secret: &'a str,
    audience: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    86400
}

/// Auth provider for the `auth0` scheme.
pub struct Auth0AuthProvider {
    config: Auth0SsoConfig,
    http: reqwest::Client,
    cache: TokenCache,
}

impl std::fmt::Debug for Auth0AuthProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Auth0AuthProvider")
            .field("client_id", &self.config.client_id)
            .field("domain", &self.config.domain)
            .finish_non_exhaustive()
    }
}

impl Auth0AuthProvider {
    pub fn new(config: Auth0SsoConfig) -> Self {
        Self { config, http: reqwest::Client::new(), cache: TokenCache::new() }
    }

    /// Tenant domains are commonly configured without a scheme.
    fn origin(&self) -> String {
        let domain = self.config.domain.trim_end_matches('/');
        if domain.starts_with("http://") || domain.starts_with("https://") {
            domain.to_string()
        } else {
            format!("https://{}", domain)
        }
    }

    async fn request_token(&self) -> Result<String> {
        let client_secret = self.config.secret_key.resolve().await?;
        let origin = self.origin();
        let endpoint = format!("{}/oauth/token", origin);
        let audience = format!("{}/api/v2/", origin);

        debug!(client_id = %self.config.client_id, endpoint = %endpoint, "Requesting Auth0 access token");

        let response = self
            .http
            .post(&endpoint)
            .json(&TokenRequest {
                grant_type: "client_credentials",
                client_id: &self.config.client_id,
                client_secret: &client_secret,
                audience: &audience,
            })
            .send()
            .await
            .map_err(|e| AuthError::token_request("auth0", e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::token_request("auth0", format!("{}: {}", status, body)));
        }

        let parsed: TokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::token_request("auth0", format!("bad token response: {}", e)))?;

        self.cache.store(parsed.access_token.clone(), parsed.expires_in).await;
        Ok(parsed.access_token)
    }
}

#[async_trait]
impl AuthProvider for Auth0AuthProvider {
    async fn get_access_token(&self) -> Result<Option<String>> {
        if let Some(token) = self.cache.get_fresh().await {
            return Ok(Some(token));
        }
        Ok(Some(self.request_token().await?))
    }

    fn name(&self) -> &'static str {
        "auth0"
    }
}
