//! Google service account auth provider.
//!
//! Signs a JWT with the service account's private key and exchanges it at
//! the account's token URI via the `jwt-bearer` grant, yielding an identity
//! token for the configured audience.

use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::{AuthError, Result};
use super::provider::{AuthProvider, TokenCache};
use crate::config::GoogleSsoConfig;

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const DEFAULT_AUDIENCE: &str = "https://www.googleapis.com/oauth2/v4/token";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Subset of the service account key file this flow needs.
#[derive(Debug, Deserialize)]
struct ServiceAccountKey {
    client_email: String,
    private_key: String,
    #[serde(default = "default_token_uri")]
    token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    aud: &'a str,
    target_audience: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct IdTokenResponse {
    id_token: String,
}

/// Auth provider for the `google` scheme.
pub struct GoogleAuthProvider {
    config: GoogleSsoConfig,
    http: reqwest::Client,
    cache: TokenCache,
}

impl std::fmt::Debug for GoogleAuthProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleAuthProvider")
            .field("audience", &self.config.audience)
            .finish_non_exhaustive()
    }
}

impl GoogleAuthProvider {
    pub fn new(config: GoogleSsoConfig) -> Self {
        Self { config, http: reqwest::Client::new(), cache: TokenCache::new() }
    }

    async fn load_key(&self) -> Result<ServiceAccountKey> {
        // The secret resolves to the path of the key file, not its contents.
        let key_path = self.config.secret_key.resolve().await?;
        let contents = tokio::fs::read_to_string(&key_path).await.map_err(|e| {
            AuthError::invalid_credentials(format!(
                "failed to read service account key '{}': {}",
                key_path, e
            ))
        })?;
        serde_json::from_str(&contents).map_err(|e| {
            AuthError::invalid_credentials(format!(
                "malformed service account key '{}': {}",
                key_path, e
            ))
        })
    }

    async fn request_token(&self) -> Result<String> {
        let key = self.load_key().await?;
        let audience = self.config.audience.as_deref().unwrap_or(DEFAULT_AUDIENCE);

        let now = Utc::now().timestamp();
        let claims = AssertionClaims {
            iss: &key.client_email,
            aud: &key.token_uri,
            target_audience: audience,
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        };

        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|e| AuthError::invalid_credentials(format!("bad RSA private key: {}", e)))?;
        let assertion = jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &encoding_key)
            .map_err(|e| {
                AuthError::invalid_credentials(format!("failed to sign assertion: {}", e))
            })?;

        debug!(issuer = %key.client_email, audience = %audience, "Exchanging Google service account assertion");

        let response = self
            .http
            .post(&key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| AuthError::token_request("google", e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::token_request("google", format!("{}: {}", status, body)));
        }

        let parsed: IdTokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::token_request("google", format!("bad token response: {}", e)))?;

        Ok(parsed.id_token)
    }
}

#[async_trait]
impl AuthProvider for GoogleAuthProvider {
    async fn get_access_token(&self) -> Result<Option<String>> {
        if let Some(token) = self.cache.get_fresh().await {
            return Ok(Some(token));
        }

        let token = self.request_token().await?;
        self.cache.store(token.clone(), ASSERTION_LIFETIME_SECS).await;
        Ok(Some(token))
    }

    fn name(&self) -> &'static str {
        "google"
    }
}
