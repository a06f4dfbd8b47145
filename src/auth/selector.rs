//! Auth provider selection.

use std::sync::Arc;

use tracing::debug;

use super::auth0::Auth0AuthProvider;
use super::error::{AuthError, Result};
use super::google::GoogleAuthProvider;
use super::oidc::CustomOidcAuthProvider;
use super::okta::OktaAuthProvider;
use super::provider::{AuthProvider, AuthProviderKind, NoopAuthProvider};
use super::static_jwt::StaticJwtAuthProvider;
use crate::config::SecurityConfig;

/// Build the auth provider for `kind` from the connection's security
/// payload.
///
/// Every scheme except `noop` requires a payload of the matching shape;
/// an absent or mismatched one fails with `MissingSecurityConfig`.
pub fn select_auth_provider(
    kind: AuthProviderKind,
    security_config: Option<&SecurityConfig>,
) -> Result<Arc<dyn AuthProvider>> {
    debug!(auth_provider = %kind, "Selecting auth provider");

    let provider: Arc<dyn AuthProvider> = match (kind, security_config) {
        (AuthProviderKind::Noop, _) => Arc::new(NoopAuthProvider::new()),
        (AuthProviderKind::Google, Some(SecurityConfig::Google(config))) => {
            Arc::new(GoogleAuthProvider::new(config.clone()))
        }
        (AuthProviderKind::Okta, Some(SecurityConfig::Okta(config))) => {
            Arc::new(OktaAuthProvider::new(config.clone()))
        }
        (AuthProviderKind::Auth0, Some(SecurityConfig::Auth0(config))) => {
            Arc::new(Auth0AuthProvider::new(config.clone()))
        }
        (AuthProviderKind::CustomOidc, Some(SecurityConfig::CustomOidc(config))) => {
            Arc::new(CustomOidcAuthProvider::new(config.clone()))
        }
        (AuthProviderKind::Metahub, Some(SecurityConfig::Jwt(config))) => {
            Arc::new(StaticJwtAuthProvider::new(config.clone()))
        }
        (kind, _) => return Err(AuthError::missing_security_config(kind.as_str())),
    };

    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Auth0SsoConfig, GoogleSsoConfig, JwtAuthConfig};
    use crate::secrets::SecretValue;

    #[test]
    fn test_noop_needs_no_config() {
        let provider = select_auth_provider(AuthProviderKind::Noop, None).unwrap();
        assert_eq!(provider.name(), "noop");
    }

    #[test]
    fn test_matching_config_selects_provider() {
        let config = SecurityConfig::Google(GoogleSsoConfig {
            secret_key: SecretValue::literal("/keys/sa.json"),
            audience: None,
        });
        let provider = select_auth_provider(AuthProviderKind::Google, Some(&config)).unwrap();
        assert_eq!(provider.name(), "google");
    }

    #[test]
    fn test_absent_config_is_missing_security_config() {
        let err = select_auth_provider(AuthProviderKind::Google, None).unwrap_err();
        match err {
            AuthError::MissingSecurityConfig { auth_provider } => {
                assert_eq!(auth_provider, "google")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_wrong_shape_is_missing_security_config() {
        // An auth0 payload cannot satisfy the metahub provider.
        let config = SecurityConfig::Auth0(Auth0SsoConfig {
            client_id: "abc".to_string(),
            secret_key: SecretValue::literal("hunter2"),
            domain: "acme.auth0.com".to_string(),
        });
        let err = select_auth_provider(AuthProviderKind::Metahub, Some(&config)).unwrap_err();
        assert!(matches!(err, AuthError::MissingSecurityConfig { .. }));
    }

    #[test]
    fn test_metahub_with_jwt_config() {
        let config =
            SecurityConfig::Jwt(JwtAuthConfig { jwt_token: SecretValue::literal("eyJ.x.y") });
        let provider = select_auth_provider(AuthProviderKind::Metahub, Some(&config)).unwrap();
        assert_eq!(provider.name(), "metahub");
    }
}
