//! GCP Secret Manager backend.
//!
//! Fetches secret versions by resource path. Authentication uses an
//! explicit service account key from `GOOGLE_APPLICATION_CREDENTIALS`.
//!
//! ## Configuration
//!
//! Environment variables, per loader semantics:
//! - `METAHUB_SECRETS_GCP_PROJECT_ID` (env loader), `GCP_PROJECT_ID` or
//!   `GOOGLE_CLOUD_PROJECT` - required
//! - `GOOGLE_APPLICATION_CREDENTIALS` - path to the service account key
//!
//! ## Reference format
//!
//! - Short form: `my-secret` (latest version)
//! - Versioned: `my-secret@3` or `my-secret@latest`
//! - Full path: `projects/my-project/secrets/my-secret/versions/latest`

use std::time::Duration;

use async_trait::async_trait;
use google_secretmanager1::{hyper_rustls, hyper_util, SecretManager};
use tracing::{debug, info};

use super::backend::{setting_from_env, SecretsBackend, SecretsLoader, SecretsProvider};
use crate::secrets::error::{Result, SecretsError};

/// GCP Secret Manager backend
pub struct GcpSecretsBackend {
    hub: SecretManager<
        hyper_rustls::HttpsConnector<hyper_util::client::legacy::connect::HttpConnector>,
    >,
    project_id: String,
    request_timeout: Duration,
}

impl std::fmt::Debug for GcpSecretsBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GcpSecretsBackend")
            .field("project_id", &self.project_id)
            .field("request_timeout", &self.request_timeout)
            .field("hub", &"[SecretManager]")
            .finish()
    }
}

impl GcpSecretsBackend {
    /// Construct the backend from environment configuration for `loader`.
    pub async fn connect(loader: SecretsLoader, request_timeout: Duration) -> Result<Self> {
        let project_id = setting_from_env(
            loader,
            "METAHUB_SECRETS_GCP_PROJECT_ID",
            &["GCP_PROJECT_ID", "GOOGLE_CLOUD_PROJECT"],
        )
        .ok_or_else(|| {
            SecretsError::unavailable("gcp", "no GCP project configured; set GCP_PROJECT_ID")
        })?;

        let client =
            hyper_util::client::legacy::Client::builder(hyper_util::rt::TokioExecutor::new())
                .build(
                    hyper_rustls::HttpsConnectorBuilder::new()
                        .with_native_roots()
                        .map_err(|e| {
                            SecretsError::unavailable(
                                "gcp",
                                format!("failed to load native TLS roots: {}", e),
                            )
                        })?
                        .https_or_http()
                        .enable_http2()
                        .build(),
                );

        let key_path = std::env::var("GOOGLE_APPLICATION_CREDENTIALS").map_err(|_| {
            SecretsError::unavailable("gcp", "GOOGLE_APPLICATION_CREDENTIALS is not set")
        })?;

        let key = yup_oauth2::read_service_account_key(&key_path).await.map_err(|e| {
            SecretsError::unavailable(
                "gcp",
                format!("failed to read service account key from '{}': {}", key_path, e),
            )
        })?;

        let auth = yup_oauth2::ServiceAccountAuthenticator::builder(key)
            .build()
            .await
            .map_err(|e| {
                SecretsError::unavailable("gcp", format!("failed to build authenticator: {}", e))
            })?;

        let hub = SecretManager::new(client, auth);

        info!(project_id = %project_id, "Initialized GCP Secret Manager backend");

        Ok(Self { hub, project_id, request_timeout })
    }

    /// Build the full secret version resource name.
    ///
    /// `my-secret` -> `projects/{project}/secrets/my-secret/versions/latest`
    /// `my-secret@3` -> `projects/{project}/secrets/my-secret/versions/3`
    /// `projects/...` is used as-is.
    fn build_resource_name(project_id: &str, secret_id: &str) -> String {
        if secret_id.starts_with("projects/") {
            return secret_id.to_string();
        }

        let (name, version) = match secret_id.rfind('@') {
            Some(idx) => (&secret_id[..idx], &secret_id[idx + 1..]),
            None => (secret_id, "latest"),
        };

        format!("projects/{}/secrets/{}/versions/{}", project_id, name, version)
    }
}

#[async_trait]
impl SecretsBackend for GcpSecretsBackend {
    async fn fetch(&self, secret_id: &str) -> Result<String> {
        let resource_name = Self::build_resource_name(&self.project_id, secret_id);

        debug!(secret_id = %secret_id, resource_name = %resource_name, "Fetching secret from GCP Secret Manager");

        let request = self.hub.projects().secrets_versions_access(&resource_name).doit();

        let result = tokio::time::timeout(self.request_timeout, request).await.map_err(|_| {
            SecretsError::unavailable(
                "gcp",
                format!("fetch of '{}' timed out after {:?}", secret_id, self.request_timeout),
            )
        })?;

        match result {
            Ok((_, response)) => {
                let data = response
                    .payload
                    .and_then(|payload| payload.data)
                    .filter(|data| !data.is_empty())
                    .ok_or_else(|| {
                        SecretsError::invalid_reference(secret_id, "secret version has no payload")
                    })?;

                String::from_utf8(data).map_err(|_| {
                    SecretsError::invalid_reference(
                        secret_id,
                        "secret payload is not valid UTF-8",
                    )
                })
            }
            Err(e) => {
                let message = e.to_string();
                if message.contains("NOT_FOUND") || message.contains("404") {
                    Err(SecretsError::not_found(secret_id))
                } else {
                    Err(SecretsError::unavailable("gcp", message))
                }
            }
        }
    }

    fn provider(&self) -> SecretsProvider {
        SecretsProvider::Gcp
    }
}
