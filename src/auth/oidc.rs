//! Generic OIDC auth provider.
//!
//! Client credentials grant sent as form parameters to an explicitly
//! configured token endpoint; works against Keycloak, Dex, and the like.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::error::{AuthError, Result};
use super::provider::{AuthProvider, TokenCache};
use crate::config::CustomOidcSsoConfig;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    3600
}

/// Auth provider for the `customOidc` scheme.
pub struct CustomOidcAuthProvider {
    config: CustomOidcSsoConfig,
    http: reqwest::Client,
    cache: TokenCache,
}

impl std::fmt::Debug for CustomOidcAuthProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomOidcAuthProvider")
            .field("client_id", &self.config.client_id)
            .field("token_endpoint", &self.config.token_endpoint)
            .finish_non_exhaustive()
    }
}

impl CustomOidcAuthProvider {
    pub fn new(config: CustomOidcSsoConfig) -> Self {
        Self { config, http: reqwest::Client::new(), cache: TokenCache::new() }
    }

    async fn request_token(&self) -> Result<String> {
        let client_secret = self.config.secret_key.resolve().await?;

        debug!(
            client_id = %self.config.client_id,
            endpoint = %self.config.token_endpoint,
            "Requesting OIDC access token"
        );

        let response = self
            .http
            .post(&self.config.token_endpoint)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", client_secret.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AuthError::token_request("customOidc", e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::token_request("customOidc", format!("{}: {}", status, body)));
        }

        let parsed: TokenResponse = response.json().await.map_err(|e| {
            AuthError::token_request("customOidc", format!("bad token response: {}", e))
        })?;

        self.cache.store(parsed.access_token.clone(), parsed.expires_in).await;
        Ok(parsed.access_token)
    }
}

#[async_trait]
impl AuthProvider for CustomOidcAuthProvider {
    async fn get_access_token(&self) -> Result<Option<String>> {
        if let Some(token) = self.cache.get_fresh().await {
            return Ok(Some(token));
        }
        Ok(Some(self.request_token().await?))
    }

    fn name(&self) -> &'static str {
        "customOidc"
    }
}
