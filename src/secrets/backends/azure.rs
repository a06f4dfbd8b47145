//! Azure Key Vault backend.
//!
//! Fetches secrets from a single Key Vault instance. Authentication uses
//! the default Azure credential chain (environment service principal,
//! managed identity, Azure CLI).
//!
//! ## Configuration
//!
//! Environment variables, per loader semantics:
//! - `METAHUB_SECRETS_AZURE_VAULT_URL` (env loader) or `AZURE_KEY_VAULT_URL`
//!   - required, e.g. `https://my-vault.vault.azure.net`

use std::future::IntoFuture;
use std::time::Duration;

use async_trait::async_trait;
use azure_security_keyvault::SecretClient;
use tracing::{debug, info};

use super::backend::{setting_from_env, SecretsBackend, SecretsLoader, SecretsProvider};
use crate::secrets::error::{Result, SecretsError};

/// Azure Key Vault backend
pub struct AzureSecretsBackend {
    client: SecretClient,
    vault_url: String,
    request_timeout: Duration,
}

impl std::fmt::Debug for AzureSecretsBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureSecretsBackend")
            .field("vault_url", &self.vault_url)
            .field("request_timeout", &self.request_timeout)
            .field("client", &"[SecretClient]")
            .finish()
    }
}

impl AzureSecretsBackend {
    /// Construct the backend from environment configuration for `loader`.
    pub async fn connect(loader: SecretsLoader, request_timeout: Duration) -> Result<Self> {
        let vault_url =
            setting_from_env(loader, "METAHUB_SECRETS_AZURE_VAULT_URL", &["AZURE_KEY_VAULT_URL"])
                .ok_or_else(|| {
                    SecretsError::unavailable(
                        "azure",
                        "no Key Vault configured; set AZURE_KEY_VAULT_URL",
                    )
                })?;

        let credential = azure_identity::create_credential().map_err(|e| {
            SecretsError::unavailable("azure", format!("failed to build Azure credential: {}", e))
        })?;

        let client = SecretClient::new(&vault_url, credential).map_err(|e| {
            SecretsError::unavailable("azure", format!("invalid Key Vault URL: {}", e))
        })?;

        info!(vault_url = %vault_url, "Initialized Azure Key Vault backend");

        Ok(Self { client, vault_url, request_timeout })
    }
}

#[async_trait]
impl SecretsBackend for AzureSecretsBackend {
    async fn fetch(&self, secret_id: &str) -> Result<String> {
        debug!(secret_id = %secret_id, vault_url = %self.vault_url, "Fetching secret from Azure Key Vault");

        let request = self.client.get(secret_id);

        let result = tokio::time::timeout(self.request_timeout, request.into_future())
            .await
            .map_err(|_| {
                SecretsError::unavailable(
                    "azure",
                    format!("fetch of '{}' timed out after {:?}", secret_id, self.request_timeout),
                )
            })?;

        match result {
            Ok(secret) => Ok(secret.value),
            Err(e) => {
                let message = e.to_string();
                if message.contains("404") || message.contains("SecretNotFound") {
                    Err(SecretsError::not_found(secret_id))
                } else {
                    Err(SecretsError::unavailable("azure", message))
                }
            }
        }
    }

    fn provider(&self) -> SecretsProvider {
        SecretsProvider::Azure
    }
}
