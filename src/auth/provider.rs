//! Auth provider trait, kind enum, and the shared token cache.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use super::error::Result;

/// Auth scheme declared in the connection configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AuthProviderKind {
    /// Unauthenticated requests
    #[default]
    Noop,
    /// Google service account JWT-bearer flow
    Google,
    /// Okta client credentials with `private_key_jwt`
    Okta,
    /// Auth0 client credentials
    Auth0,
    /// Generic OIDC client credentials against an explicit token endpoint
    CustomOidc,
    /// Pre-issued catalog bot JWT
    Metahub,
}

impl AuthProviderKind {
    /// Get the wire representation of this provider kind
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Noop => "noop",
            Self::Google => "google",
            Self::Okta => "okta",
            Self::Auth0 => "auth0",
            Self::CustomOidc => "customOidc",
            Self::Metahub => "metahub",
        }
    }
}

impl FromStr for AuthProviderKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "noop" => Ok(Self::Noop),
            "google" => Ok(Self::Google),
            "okta" => Ok(Self::Okta),
            "auth0" => Ok(Self::Auth0),
            "customOidc" => Ok(Self::CustomOidc),
            "metahub" => Ok(Self::Metahub),
            _ => Err(format!("Unknown auth provider: {}", s)),
        }
    }
}

impl fmt::Display for AuthProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Trait for request authentication.
///
/// `get_access_token` returns `Ok(None)` for schemes that leave requests
/// unsigned; callers attach a bearer header only on `Some`.
#[async_trait]
pub trait AuthProvider: Send + Sync + fmt::Debug {
    /// Produce a bearer token for the next request, or `None` when the
    /// scheme sends requests unauthenticated.
    async fn get_access_token(&self) -> Result<Option<String>>;

    /// Short name for logging
    fn name(&self) -> &'static str;
}

/// Provider for unauthenticated access.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopAuthProvider;

impl NoopAuthProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AuthProvider for NoopAuthProvider {
    async fn get_access_token(&self) -> Result<Option<String>> {
        Ok(None)
    }

    fn name(&self) -> &'static str {
        "noop"
    }
}

/// Margin subtracted from a token's lifetime before it counts as expired.
const REFRESH_MARGIN_SECS: i64 = 60;

#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    expires_at: DateTime<Utc>,
}

/// Single-slot token cache shared by the OAuth-style providers.
///
/// A token is served from cache until sixty seconds before its expiry, so
/// an in-flight request never carries a token about to lapse.
#[derive(Debug, Default)]
pub(crate) struct TokenCache {
    slot: Mutex<Option<CachedToken>>,
}

impl TokenCache {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Return the cached token if it is still comfortably fresh.
    pub(crate) async fn get_fresh(&self) -> Option<String> {
        let slot = self.slot.lock().await;
        slot.as_ref()
            .filter(|cached| {
                cached.expires_at - Duration::seconds(REFRESH_MARGIN_SECS) > Utc::now()
            })
            .map(|cached| cached.token.clone())
    }

    /// Store a token valid for `expires_in_secs` from now.
    pub(crate) async fn store(&self, token: String, expires_in_secs: i64) {
        let mut slot = self.slot.lock().await;
        *slot = Some(CachedToken {
            token,
            expires_at: Utc::now() + Duration::seconds(expires_in_secs),
        });
    }
}
