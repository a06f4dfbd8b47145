//! Client bootstrap.
//!
//! Turns a validated [`ConnectionConfig`] into a ready [`ClientContext`]:
//! the secrets backend is obtained from the registry, deferred secrets in
//! the security payload are bound to it, and the auth provider is selected.
//! Bootstrap fails fast, so a misconfigured backend or credential payload
//! never survives into request handling.

use std::sync::Arc;

use tracing::info;
use url::Url;

use crate::auth::{select_auth_provider, AuthProvider};
use crate::config::ConnectionConfig;
use crate::errors::{ClientError, Result};
use crate::secrets::{SecretsBackend, SecretsBackendRegistry};

/// Builds [`ClientContext`]s against a shared backend registry.
#[derive(Debug, Clone)]
pub struct ClientBootstrapper {
    registry: Arc<SecretsBackendRegistry>,
}

impl ClientBootstrapper {
    /// Create a bootstrapper over `registry`.
    pub fn new(registry: Arc<SecretsBackendRegistry>) -> Self {
        Self { registry }
    }

    /// The registry this bootstrapper draws backends from.
    pub fn registry(&self) -> &Arc<SecretsBackendRegistry> {
        &self.registry
    }

    /// Bootstrap a client context from `config`.
    ///
    /// Validates the configuration, obtains (or constructs) the secrets
    /// backend for its `(provider, loader)` pair, binds deferred secrets,
    /// and selects the auth provider.
    pub async fn bootstrap(&self, config: &ConnectionConfig) -> Result<ClientContext> {
        config.validate_config()?;

        let backend = self
            .registry
            .get_or_create(config.secrets_manager_provider, config.secrets_manager_loader)
            .await?;

        config.bind_secrets(&backend);

        let auth_provider =
            select_auth_provider(config.auth_provider, config.security_config.as_ref())?;

        // validate_config already proved this parses.
        let host_port = Url::parse(&config.host_port)
            .map_err(|e| ClientError::validation(format!("hostPort is not a valid URL: {}", e)))?;

        info!(
            host_port = %host_port,
            provider = %config.secrets_manager_provider,
            loader = %config.secrets_manager_loader,
            auth_provider = %config.auth_provider,
            "Bootstrapped metadata client"
        );

        Ok(ClientContext {
            host_port,
            api_version: config.api_version.clone(),
            backend,
            auth_provider,
        })
    }
}

/// Everything a request path needs: where to call, how to sign, and the
/// backend for late secret resolution.
pub struct ClientContext {
    host_port: Url,
    api_version: String,
    backend: Arc<dyn SecretsBackend>,
    auth_provider: Arc<dyn AuthProvider>,
}

impl std::fmt::Debug for ClientContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientContext")
            .field("host_port", &self.host_port.as_str())
            .field("api_version", &self.api_version)
            .field("backend", &self.backend.name())
            .field("auth_provider", &self.auth_provider.name())
            .finish()
    }
}

impl ClientContext {
    /// Base URL of the service.
    pub fn host_port(&self) -> &Url {
        &self.host_port
    }

    /// API version path segment.
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// Base URL including the version segment, e.g.
    /// `http://localhost:8585/api/v1`.
    pub fn api_root(&self) -> String {
        format!("{}/{}", self.host_port.as_str().trim_end_matches('/'), self.api_version)
    }

    /// The secrets backend serving this connection.
    pub fn backend(&self) -> &Arc<dyn SecretsBackend> {
        &self.backend
    }

    /// The auth provider signing this connection's requests.
    pub fn auth_provider(&self) -> &Arc<dyn AuthProvider> {
        &self.auth_provider
    }

    /// Fetch a bearer token for the next request, `None` when requests go
    /// unauthenticated.
    pub async fn bearer_token(&self) -> Result<Option<String>> {
        Ok(self.auth_provider.get_access_token().await?)
    }
}
