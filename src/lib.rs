//! # Metahub Client
//!
//! Credentials and bootstrap subsystem for a Metahub metadata-catalog API
//! client. Given a declarative [`ConnectionConfig`] this crate:
//!
//! - selects and constructs exactly one secrets backend (AWS Secrets
//!   Manager, GCP Secret Manager, Azure Key Vault, HashiCorp Vault, or a
//!   plaintext pass-through) via an injectable, process-scoped registry,
//! - binds deferred [`SecretValue`] configuration fields to that backend so
//!   sensitive values are resolved on first access rather than at load time,
//! - selects the authentication provider (Google SSO, Okta, Auth0, custom
//!   OIDC, platform JWT, or none) matching the configuration, and
//! - composes the two into a ready [`ClientContext`] for the REST transport.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use metahub_client::{ClientBootstrapper, ConnectionConfig, SecretsBackendRegistry};
//!
//! # async fn run() -> metahub_client::Result<()> {
//! let registry = Arc::new(SecretsBackendRegistry::with_default_timeout());
//! let bootstrapper = ClientBootstrapper::new(registry);
//!
//! let config = ConnectionConfig::new("http://localhost:8585/api");
//! let context = bootstrapper.bootstrap(&config).await?;
//!
//! // The transport layer attaches this as a bearer header when present.
//! let _token = context.bearer_token().await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Lifecycle guarantees
//!
//! Backends are keyed by `(provider, loader)` and constructed at most once
//! per registry, even under concurrent bootstraps. `clear_all` resets the
//! registry between test cases; secrets already resolved by a
//! [`SecretValue`] keep their cached value across a clear.

pub mod auth;
pub mod bootstrap;
pub mod config;
pub mod errors;
pub mod observability;
pub mod secrets;

// Re-export commonly used types and traits
pub use auth::{AuthProvider, AuthProviderKind};
pub use bootstrap::{ClientBootstrapper, ClientContext};
pub use config::{ConnectionConfig, SecurityConfig};
pub use errors::{ClientError, Result};
pub use secrets::{
    SecretValue, SecretsBackend, SecretsBackendRegistry, SecretsError, SecretsLoader,
    SecretsProvider,
};

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
