//! Static JWT auth provider.
//!
//! The `metahub` scheme carries a pre-issued bot token in the security
//! payload; there is no exchange, only resolution of the (possibly
//! deferred) token value.

use async_trait::async_trait;

use super::error::Result;
use super::provider::AuthProvider;
use crate::config::JwtAuthConfig;

/// Auth provider for the `metahub` scheme.
pub struct StaticJwtAuthProvider {
    config: JwtAuthConfig,
}

impl std::fmt::Debug for StaticJwtAuthProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticJwtAuthProvider").finish_non_exhaustive()
    }
}

impl StaticJwtAuthProvider {
    pub fn new(config: JwtAuthConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl AuthProvider for StaticJwtAuthProvider {
    async fn get_access_token(&self) -> Result<Option<String>> {
        // SecretValue memoizes, so repeated calls hit the backend once.
        let token = self.config.jwt_token.resolve().await?;
        Ok(Some(token))
    }

    fn name(&self) -> &'static str {
        "metahub"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secrets::SecretValue;

    #[tokio::test]
    async fn test_returns_literal_token() {
        let provider = StaticJwtAuthProvider::new(JwtAuthConfig {
            jwt_token: SecretValue::literal("eyJ.bot.token"),
        });
        assert_eq!(provider.get_access_token().await.unwrap(), Some("eyJ.bot.token".to_string()));
    }

    #[tokio::test]
    async fn test_unbound_reference_fails() {
        let provider = StaticJwtAuthProvider::new(JwtAuthConfig {
            jwt_token: SecretValue::reference("bot-jwt"),
        });
        assert!(provider.get_access_token().await.is_err());
    }
}
