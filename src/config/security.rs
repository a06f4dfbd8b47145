//! Per-provider security configuration payloads.
//!
//! `securityConfig` in the connection document carries the credential
//! material for the selected `authProvider`. The shape is provider-specific
//! and matched structurally, so the variants here are strict about their
//! fields to keep the untagged match unambiguous.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::secrets::{SecretValue, SecretsBackend};

/// Credentials for Google service account JWT-bearer auth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GoogleSsoConfig {
    /// Path to the service account key file (may be a `secret:` reference)
    pub secret_key: SecretValue,
    /// Target audience for the issued token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audience: Option<String>,
}

/// Credentials for Okta `private_key_jwt` client credentials auth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OktaSsoConfig {
    pub client_id: String,
    /// Okta org base URL, e.g. `https://acme.okta.com`
    #[serde(rename = "orgURL", alias = "orgUrl")]
    pub org_url: String,
    /// PEM-encoded RSA private key for the client assertion
    pub private_key: SecretValue,
    /// Service account email recorded with the app
    pub email: String,
    /// Token scopes; defaults to `openid` when empty
    #[serde(default)]
    pub scopes: Vec<String>,
}

/// Credentials for Auth0 client credentials auth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Auth0SsoConfig {
    pub client_id: String,
    pub secret_key: SecretValue,
    /// Auth0 tenant domain, with or without scheme
    pub domain: String,
}

/// Credentials for a generic OIDC client credentials exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CustomOidcSsoConfig {
    pub client_id: String,
    pub secret_key: SecretValue,
    /// Full URL of the token endpoint
    pub token_endpoint: String,
}

/// A pre-issued bearer token for the `metahub` provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct JwtAuthConfig {
    pub jwt_token: SecretValue,
}

/// Provider-specific credential payload, matched by shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SecurityConfig {
    Okta(OktaSsoConfig),
    Auth0(Auth0SsoConfig),
    CustomOidc(CustomOidcSsoConfig),
    Google(GoogleSsoConfig),
    Jwt(JwtAuthConfig),
}

impl SecurityConfig {
    /// Short name of the variant, for logging and error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Okta(_) => "okta",
            Self::Auth0(_) => "auth0",
            Self::CustomOidc(_) => "customOidc",
            Self::Google(_) => "google",
            Self::Jwt(_) => "jwt",
        }
    }

    /// Bind every deferred secret in this payload to `backend`.
    ///
    /// First bind wins per value; rebinding an already-bound value is a
    /// no-op, matching [`SecretValue::bind`].
    pub fn bind_secrets(&self, backend: &Arc<dyn SecretsBackend>) {
        match self {
            Self::Okta(config) => config.private_key.bind(Arc::clone(backend)),
            Self::Auth0(config) => config.secret_key.bind(Arc::clone(backend)),
            Self::CustomOidc(config) => config.secret_key.bind(Arc::clone(backend)),
            Self::Google(config) => config.secret_key.bind(Arc::clone(backend)),
            Self::Jwt(config) => config.jwt_token.bind(Arc::clone(backend)),
        }
    }
}
