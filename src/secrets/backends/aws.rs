//! AWS Secrets Manager backend.
//!
//! Fetches secrets by name or full ARN through the official SDK. Credentials
//! come from the standard AWS chain (environment, shared config, IMDS).
//!
//! ## Configuration
//!
//! Environment variables, per loader semantics:
//! - `METAHUB_SECRETS_AWS_REGION` (env loader) or `AWS_REGION` /
//!   `AWS_DEFAULT_REGION` - a region must resolve from somewhere
//!
//! A build without a resolvable region fails `Unavailable` at construction
//! so misconfiguration surfaces at bootstrap, not on first fetch.

use std::time::Duration;

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_secretsmanager::Client;
use tracing::{debug, info};

use super::backend::{setting_from_env, SecretsBackend, SecretsLoader, SecretsProvider};
use crate::secrets::error::{Result, SecretsError};

/// AWS Secrets Manager backend
pub struct AwsSecretsBackend {
    client: Client,
    region: String,
    request_timeout: Duration,
}

impl std::fmt::Debug for AwsSecretsBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsSecretsBackend")
            .field("region", &self.region)
            .field("request_timeout", &self.request_timeout)
            .field("client", &"[SecretsManagerClient]")
            .finish()
    }
}

impl AwsSecretsBackend {
    /// Construct the backend from environment configuration for `loader`.
    pub async fn connect(loader: SecretsLoader, request_timeout: Duration) -> Result<Self> {
        let mut config_loader = aws_config::defaults(BehaviorVersion::latest());

        // The env loader's override beats the ambient AWS variables the SDK
        // would otherwise read on its own.
        if let Some(region) = setting_from_env(
            loader,
            "METAHUB_SECRETS_AWS_REGION",
            &["AWS_REGION", "AWS_DEFAULT_REGION"],
        ) {
            config_loader = config_loader.region(Region::new(region));
        }

        let sdk_config = config_loader.load().await;
        let region = sdk_config
            .region()
            .map(|r| r.to_string())
            .ok_or_else(|| {
                SecretsError::unavailable(
                    "aws",
                    "no AWS region configured; set AWS_DEFAULT_REGION or METAHUB_SECRETS_AWS_REGION",
                )
            })?;

        let client = Client::new(&sdk_config);

        info!(region = %region, "Initialized AWS Secrets Manager backend");

        Ok(Self { client, region, request_timeout })
    }
}

#[async_trait]
impl SecretsBackend for AwsSecretsBackend {
    async fn fetch(&self, secret_id: &str) -> Result<String> {
        debug!(secret_id = %secret_id, region = %self.region, "Fetching secret from AWS Secrets Manager");

        let request = self.client.get_secret_value().secret_id(secret_id).send();

        let result = tokio::time::timeout(self.request_timeout, request).await.map_err(|_| {
            SecretsError::unavailable(
                "aws",
                format!("fetch of '{}' timed out after {:?}", secret_id, self.request_timeout),
            )
        })?;

        let output = result.map_err(|e| {
            let service_error = e.into_service_error();
            if service_error.is_resource_not_found_exception() {
                SecretsError::not_found(secret_id)
            } else {
                SecretsError::unavailable("aws", service_error.to_string())
            }
        })?;

        if let Some(value) = output.secret_string() {
            return Ok(value.to_string());
        }

        // Binary secrets are accepted when they decode as UTF-8.
        if let Some(blob) = output.secret_binary() {
            return String::from_utf8(blob.as_ref().to_vec()).map_err(|_| {
                SecretsError::invalid_reference(
                    secret_id,
                    "binary secret payload is not valid UTF-8",
                )
            });
        }

        Err(SecretsError::invalid_reference(secret_id, "secret has no string or binary payload"))
    }

    fn provider(&self) -> SecretsProvider {
        SecretsProvider::Aws
    }
}
