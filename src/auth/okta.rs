//! Okta auth provider.
//!
//! Client credentials grant with `private_key_jwt` client authentication:
//! the client proves its identity with a short-lived RS256 assertion signed
//! by the app's registered private key.

use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use super::error::{AuthError, Result};
use super::provider::{AuthProvider, TokenCache};
use crate::config::OktaSsoConfig;

const CLIENT_ASSERTION_TYPE: &str = "urn:ietf:params:oauth:client-assertion-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 300;
const DEFAULT_SCOPE: &str = "openid";

#[derive(Debug, Serialize)]
struct ClientAssertionClaims<'a> {
    iss: &'a str,
    sub: &'a str,
    aud: &'a str,
    jti: String,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    3600
}

/// Auth provider for the `okta` scheme.
pub struct OktaAuthProvider {
    config: OktaSsoConfig,
    http: reqwest::Client,
    cache: TokenCache,
}

impl std::fmt::Debug for OktaAuthProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OktaAuthProvider")
            .field("client_id", &self.config.client_id)
            .field("org_url", &self.config.org_url)
            .field("email", &self.config.email)
            .finish_non_exhaustive()
    }
}

impl OktaAuthProvider {
    pub fn new(config: OktaSsoConfig) -> Self {
        Self { config, http: reqwest::Client::new(), cache: TokenCache::new() }
    }

    fn token_endpoint(&self) -> String {
        format!("{}/v1/token", self.config.org_url.trim_end_matches('/'))
    }

    fn scope(&self) -> String {
        if self.config.scopes.is_empty() {
            DEFAULT_SCOPE.to_string()
        } else {
            self.config.scopes.join(" ")
        }
    }

    async fn request_token(&self) -> Result<String> {
        let private_key = self.config.private_key.resolve().await?;
        let endpoint = self.token_endpoint();

        let now = Utc::now().timestamp();
        let claims = ClientAssertionClaims {
            iss: &self.config.client_id,
            sub: &self.config.client_id,
            aud: &endpoint,
            jti: Uuid::new_v4().to_string(),
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        };

        let encoding_key = EncodingKey::from_rsa_pem(private_key.as_bytes())
            .map_err(|e| AuthError::invalid_credentials(format!("bad RSA private key: {}", e)))?;
        let assertion = jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &encoding_key)
            .map_err(|e| {
                AuthError::invalid_credentials(format!("failed to sign client assertion: {}", e))
            })?;

        // email is the catalog-side bot principal the issued token acts as;
        // it never enters the assertion (sub must equal the client id).
        debug!(
            client_id = %self.config.client_id,
            email = %self.config.email,
            endpoint = %endpoint,
            "Requesting Okta access token"
        );

        let response = self
            .http
            .post(&endpoint)
            .form(&[
                ("grant_type", "client_credentials"),
                ("scope", self.scope().as_str()),
                ("client_assertion_type", CLIENT_ASSERTION_TYPE),
                ("client_assertion", assertion.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AuthError::token_request("okta", e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::token_request("okta", format!("{}: {}", status, body)));
        }

        let parsed: TokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::token_request("okta", format!("bad token response: {}", e)))?;

        self.cache.store(parsed.access_token.clone(), parsed.expires_in).await;
        Ok(parsed.access_token)
    }
}

#[async_trait]
impl AuthProvider for OktaAuthProvider {
    async fn get_access_token(&self) -> Result<Option<String>> {
        if let Some(token) = self.cache.get_fresh().await {
            return Ok(Some(token));
        }
        Ok(Some(self.request_token().await?))
    }

    fn name(&self) -> &'static str {
        "okta"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secrets::SecretValue;

    fn config(org_url: &str) -> OktaSsoConfig {
        OktaSsoConfig {
            client_id: "0oa1".to_string(),
            org_url: org_url.to_string(),
            private_key: SecretValue::literal("pem"),
            email: "svc@acme.com".to_string(),
            scopes: Vec::new(),
        }
    }

    #[test]
    fn test_token_endpoint_normalizes_trailing_slash() {
        let provider = OktaAuthProvider::new(config("https://acme.okta.com/"));
        assert_eq!(provider.token_endpoint(), "https://acme.okta.com/v1/token");
    }

    #[test]
    fn test_scope_defaults_to_openid() {
        let provider = OktaAuthProvider::new(config("https://acme.okta.com"));
        assert_eq!(provider.scope(), "openid");

        let mut custom = config("https://acme.okta.com");
        custom.scopes = vec!["openid".to_string(), "profile".to_string()];
        let provider = OktaAuthProvider::new(custom);
        assert_eq!(provider.scope(), "openid profile");
    }

    #[test]
    fn test_debug_names_bot_principal_but_no_key() {
        let provider = OktaAuthProvider::new(config("https://acme.okta.com"));
        let output = format!("{:?}", provider);
        assert!(output.contains("svc@acme.com"));
        assert!(!output.contains("pem"));
    }

    #[tokio::test]
    async fn test_garbage_private_key_is_invalid_credentials() {
        let provider = OktaAuthProvider::new(config("https://acme.okta.com"));
        let err = provider.get_access_token().await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials { .. }));
    }
}
