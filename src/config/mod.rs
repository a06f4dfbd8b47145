//! Connection configuration.
//!
//! The `ConnectionConfig` document is the client's single source of truth:
//! where the catalog service lives, which secrets backend and loader to use,
//! and which auth provider (with its credential payload) signs requests.
//! The wire contract is camelCase JSON/YAML shared with the service.

pub mod security;

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::AuthProviderKind;
use crate::errors::{ClientError, Result};
use crate::secrets::{SecretsBackend, SecretsLoader, SecretsProvider};

pub use security::{
    Auth0SsoConfig, CustomOidcSsoConfig, GoogleSsoConfig, JwtAuthConfig, OktaSsoConfig,
    SecurityConfig,
};

fn default_api_version() -> String {
    "v1".to_string()
}

/// Connection settings for a metadata catalog service.
#[derive(Debug, Clone, PartialEq, Validate, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConnectionConfig {
    /// Base URL of the service, e.g. `http://localhost:8585/api`
    #[validate(url(message = "hostPort must be a valid URL"))]
    pub host_port: String,

    /// API version path segment (default: "v1")
    #[validate(length(min = 1, message = "apiVersion must not be empty"))]
    pub api_version: String,

    /// Which external secrets store holds credential material
    pub secrets_manager_provider: SecretsProvider,

    /// How the backend gathers its own client settings
    pub secrets_manager_loader: SecretsLoader,

    /// Which auth scheme signs outgoing requests
    pub auth_provider: AuthProviderKind,

    /// Credential payload for the auth provider, when one is required
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_config: Option<SecurityConfig>,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host_port: String::new(),
            api_version: default_api_version(),
            secrets_manager_provider: SecretsProvider::default(),
            secrets_manager_loader: SecretsLoader::default(),
            auth_provider: AuthProviderKind::default(),
            security_config: None,
        }
    }
}

impl ConnectionConfig {
    /// Create a configuration pointing at `host_port` with defaults
    /// everywhere else (no secrets manager, no auth).
    pub fn new(host_port: impl Into<String>) -> Self {
        Self { host_port: host_port.into(), ..Self::default() }
    }

    /// Validate the configuration, failing with `ClientError::Validation`
    /// on the first problem found.
    pub fn validate_config(&self) -> Result<()> {
        Validate::validate(self).map_err(|e| ClientError::validation(e.to_string()))?;

        // validator's url check admits any scheme; the catalog only speaks
        // HTTP.
        let url = url::Url::parse(&self.host_port)
            .map_err(|e| ClientError::validation(format!("hostPort is not a valid URL: {}", e)))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ClientError::validation(format!(
                "hostPort must use http or https, got '{}'",
                url.scheme()
            )));
        }

        Ok(())
    }

    /// Load a configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ClientError::config(format!("failed to read '{}': {}", path.display(), e))
        })?;
        serde_yaml::from_str(&contents).map_err(|e| {
            ClientError::config(format!("failed to parse '{}': {}", path.display(), e))
        })
    }

    /// Deserialize a configuration from an in-memory JSON document.
    pub fn from_json_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value)
            .map_err(|e| ClientError::config(format!("invalid connection configuration: {}", e)))
    }

    /// Bind every deferred secret in the security payload to `backend`.
    pub fn bind_secrets(&self, backend: &Arc<dyn SecretsBackend>) {
        if let Some(security_config) = &self.security_config {
            security_config.bind_secrets(backend);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ConnectionConfig::new("http://localhost:8585/api");
        assert_eq!(config.api_version, "v1");
        assert_eq!(config.secrets_manager_provider, SecretsProvider::None);
        assert_eq!(config.secrets_manager_loader, SecretsLoader::Noop);
        assert_eq!(config.auth_provider, AuthProviderKind::Noop);
        assert!(config.security_config.is_none());
        config.validate_config().unwrap();
    }

    #[test]
    fn test_rejects_invalid_host_port() {
        let config = ConnectionConfig::new("not a url");
        assert!(matches!(config.validate_config(), Err(ClientError::Validation { .. })));

        let config = ConnectionConfig::new("ftp://host:21/api");
        assert!(matches!(config.validate_config(), Err(ClientError::Validation { .. })));
    }

    #[test]
    fn test_rejects_empty_api_version() {
        let mut config = ConnectionConfig::new("http://localhost:8585/api");
        config.api_version = String::new();
        assert!(matches!(config.validate_config(), Err(ClientError::Validation { .. })));
    }

    #[test]
    fn test_camel_case_wire_contract() {
        let json = serde_json::json!({
            "hostPort": "http://localhost:8585/api",
            "secretsManagerProvider": "vault",
            "secretsManagerLoader": "env",
            "authProvider": "auth0",
            "securityConfig": {
                "clientId": "abc",
                "secretKey": "secret:auth0-secret",
                "domain": "acme.auth0.com"
            }
        });

        let config = ConnectionConfig::from_json_value(json).unwrap();
        assert_eq!(config.host_port, "http://localhost:8585/api");
        assert_eq!(config.api_version, "v1");
        assert_eq!(config.secrets_manager_provider, SecretsProvider::Vault);
        assert_eq!(config.secrets_manager_loader, SecretsLoader::Env);
        assert_eq!(config.auth_provider, AuthProviderKind::Auth0);
        assert!(matches!(config.security_config, Some(SecurityConfig::Auth0(_))));
    }

    #[test]
    fn test_unknown_enum_value_is_config_error() {
        let json = serde_json::json!({
            "hostPort": "http://localhost:8585/api",
            "secretsManagerProvider": "consul"
        });
        assert!(matches!(
            ConnectionConfig::from_json_value(json),
            Err(ClientError::Config { .. })
        ));
    }

    #[test]
    fn test_serialization_round_trip() {
        let config = ConnectionConfig::new("https://catalog.acme.com/api");
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["hostPort"], "https://catalog.acme.com/api");
        assert_eq!(json["apiVersion"], "v1");
        assert_eq!(json["authProvider"], "noop");

        let parsed = ConnectionConfig::from_json_value(json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_yaml_file_loading() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("connection.yaml");
        std::fs::write(
            &path,
            "hostPort: http://localhost:8585/api\n\
             authProvider: metahub\n\
             securityConfig:\n\
             \x20 jwtToken: secret:bot-jwt\n",
        )
        .unwrap();

        let config = ConnectionConfig::from_yaml_file(&path).unwrap();
        assert_eq!(config.auth_provider, AuthProviderKind::Metahub);
        assert!(matches!(config.security_config, Some(SecurityConfig::Jwt(_))));
    }

    #[test]
    fn test_yaml_file_missing_is_config_error() {
        let err = ConnectionConfig::from_yaml_file("/nonexistent/connection.yaml").unwrap_err();
        assert!(matches!(err, ClientError::Config { .. }));
    }
}
