//! Secrets management abstraction for secure configuration.
//!
//! This module provides deferred resolution of sensitive configuration
//! values through pluggable secrets backends. Connection configurations
//! carry [`SecretValue`] fields that hold either a plaintext literal or a
//! `secret:<id>` reference; references are bound to a backend at bootstrap
//! and resolved (then memoized) on first access.
//!
//! # Supported Backends
//!
//! - **Pass-through** (`none`): returns the identifier unchanged; used when
//!   the catalog service stores plaintext configuration itself
//! - **HashiCorp Vault** (`vault`): KV v2 engine, always compiled
//! - **AWS Secrets Manager** (`aws`): optional `aws` feature
//! - **GCP Secret Manager** (`gcp`): optional `gcp` feature
//! - **Azure Key Vault** (`azure`): optional `azure` feature
//!
//! Backends are constructed through [`SecretsBackendRegistry`], which
//! guarantees at most one live instance per `(provider, loader)` key and
//! supports a full reset between test cases.
//!
//! # Security Considerations
//!
//! - Secret plaintext never appears in Debug, Display, or serialized output
//! - Backends do not cache plaintext; memoization lives in the resolving
//!   [`SecretValue`] instance only
//! - Missing ambient credentials fail loudly at bootstrap, never silently

pub mod backends;
pub mod error;
pub mod types;
pub mod value;

// Re-export main types
pub use backends::{
    NoopSecretsBackend, SecretsBackend, SecretsBackendRegistry, SecretsLoader, SecretsProvider,
    VaultBackendConfig, VaultSecretsBackend,
};
pub use error::{Result, SecretsError};
pub use types::SecretString;
pub use value::{SecretValue, SECRET_REFERENCE_PREFIX};
