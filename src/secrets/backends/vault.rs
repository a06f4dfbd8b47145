//! HashiCorp Vault secrets backend.
//!
//! Fetches secrets from the KV v2 engine. The secret identifier is the path
//! below the mount; the plaintext is expected under the `value` key (a
//! single-entry map is also accepted).
//!
//! ## Configuration
//!
//! Environment variables, per loader semantics:
//! - `METAHUB_SECRETS_VAULT_ADDR` (env loader) or `VAULT_ADDR` - required
//! - `METAHUB_SECRETS_VAULT_TOKEN` (env loader) or `VAULT_TOKEN` - required
//! - `METAHUB_SECRETS_VAULT_NAMESPACE` or `VAULT_NAMESPACE` - optional
//! - `METAHUB_SECRETS_VAULT_MOUNT` (default: "secret")

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use vaultrs::client::{VaultClient, VaultClientSettingsBuilder};
use vaultrs::error::ClientError;
use vaultrs::kv2;

use super::backend::{setting_from_env, SecretsBackend, SecretsLoader, SecretsProvider};
use crate::secrets::error::{Result, SecretsError};

/// Configuration for the Vault backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultBackendConfig {
    /// Vault server address
    pub address: String,
    /// Vault authentication token
    pub token: String,
    /// Vault namespace (for Enterprise)
    pub namespace: Option<String>,
    /// KV v2 mount path (default: "secret")
    #[serde(default = "default_kv_mount")]
    pub kv_mount_path: String,
}

fn default_kv_mount() -> String {
    "secret".to_string()
}

impl VaultBackendConfig {
    /// Load configuration from the environment, honoring the loader's
    /// override semantics. Address and token are both required; a missing
    /// one fails `Unavailable` so bootstrap aborts before first access.
    pub fn from_loader(loader: SecretsLoader) -> Result<Self> {
        let address = setting_from_env(loader, "METAHUB_SECRETS_VAULT_ADDR", &["VAULT_ADDR"])
            .ok_or_else(|| {
                SecretsError::unavailable("vault", "VAULT_ADDR is not set in the environment")
            })?;

        let token = setting_from_env(loader, "METAHUB_SECRETS_VAULT_TOKEN", &["VAULT_TOKEN"])
            .ok_or_else(|| {
                SecretsError::unavailable("vault", "VAULT_TOKEN is not set in the environment")
            })?;

        let namespace =
            setting_from_env(loader, "METAHUB_SECRETS_VAULT_NAMESPACE", &["VAULT_NAMESPACE"]);

        let kv_mount_path = setting_from_env(loader, "METAHUB_SECRETS_VAULT_MOUNT", &[])
            .unwrap_or_else(default_kv_mount);

        Ok(Self { address, token, namespace, kv_mount_path })
    }
}

/// HashiCorp Vault secrets backend (KV v2)
pub struct VaultSecretsBackend {
    client: VaultClient,
    kv_mount_path: String,
    request_timeout: Duration,
}

impl std::fmt::Debug for VaultSecretsBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultSecretsBackend")
            .field("kv_mount_path", &self.kv_mount_path)
            .field("request_timeout", &self.request_timeout)
            .field("client", &"[VaultClient]")
            .finish()
    }
}

impl VaultSecretsBackend {
    /// Create a new Vault backend with the given configuration
    pub fn new(config: VaultBackendConfig, request_timeout: Duration) -> Result<Self> {
        let mut settings_builder = VaultClientSettingsBuilder::default();
        settings_builder.address(&config.address);
        settings_builder.token(&config.token);

        if let Some(ref namespace) = config.namespace {
            settings_builder.namespace(Some(namespace.clone()));
        }

        let settings = settings_builder.build().map_err(|e| {
            SecretsError::unavailable("vault", format!("invalid Vault configuration: {}", e))
        })?;

        let client = VaultClient::new(settings).map_err(|e| {
            SecretsError::unavailable("vault", format!("failed to create Vault client: {}", e))
        })?;

        info!(address = %config.address, kv_mount = %config.kv_mount_path, "Initialized Vault secrets backend");

        Ok(Self { client, kv_mount_path: config.kv_mount_path, request_timeout })
    }

    /// Construct the backend from environment configuration for `loader`.
    pub fn connect(loader: SecretsLoader, request_timeout: Duration) -> Result<Self> {
        Self::new(VaultBackendConfig::from_loader(loader)?, request_timeout)
    }

    fn extract_value(secret_id: &str, data: HashMap<String, serde_json::Value>) -> Result<String> {
        if let Some(value) = data.get("value").and_then(|v| v.as_str()) {
            return Ok(value.to_string());
        }
        // A single-entry map is unambiguous; accept it too.
        if data.len() == 1 {
            if let Some(value) = data.values().next().and_then(|v| v.as_str()) {
                return Ok(value.to_string());
            }
        }
        Err(SecretsError::invalid_reference(
            secret_id,
            "expected a string under the 'value' key in the KV v2 payload",
        ))
    }
}

#[async_trait]
impl SecretsBackend for VaultSecretsBackend {
    async fn fetch(&self, secret_id: &str) -> Result<String> {
        debug!(secret_id = %secret_id, kv_mount = %self.kv_mount_path, "Fetching secret from Vault");

        let read = kv2::read::<HashMap<String, serde_json::Value>>(
            &self.client,
            &self.kv_mount_path,
            secret_id,
        );

        let result = tokio::time::timeout(self.request_timeout, read).await.map_err(|_| {
            SecretsError::unavailable(
                "vault",
                format!("fetch of '{}' timed out after {:?}", secret_id, self.request_timeout),
            )
        })?;

        match result {
            Ok(data) => Self::extract_value(secret_id, data),
            Err(ClientError::APIError { code: 404, .. }) => {
                Err(SecretsError::not_found(secret_id))
            }
            Err(e) => Err(SecretsError::unavailable("vault", e.to_string())),
        }
    }

    fn provider(&self) -> SecretsProvider {
        SecretsProvider::Vault
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_value_key() {
        let mut data = HashMap::new();
        data.insert("value".to_string(), serde_json::json!("hunter2"));
        data.insert("note".to_string(), serde_json::json!("rotated 2026-08"));
        assert_eq!(VaultSecretsBackend::extract_value("p", data).unwrap(), "hunter2");
    }

    #[test]
    fn test_extract_single_entry_fallback() {
        let mut data = HashMap::new();
        data.insert("password".to_string(), serde_json::json!("hunter2"));
        assert_eq!(VaultSecretsBackend::extract_value("p", data).unwrap(), "hunter2");
    }

    #[test]
    fn test_extract_rejects_ambiguous_payload() {
        let mut data = HashMap::new();
        data.insert("user".to_string(), serde_json::json!("svc"));
        data.insert("pass".to_string(), serde_json::json!("hunter2"));
        let err = VaultSecretsBackend::extract_value("p", data).unwrap_err();
        assert!(matches!(err, SecretsError::InvalidReference { .. }));
    }

    #[test]
    fn test_extract_rejects_non_string() {
        let mut data = HashMap::new();
        data.insert("value".to_string(), serde_json::json!(42));
        assert!(VaultSecretsBackend::extract_value("p", data).is_err());
    }
}
