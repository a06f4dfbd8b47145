//! Pluggable secrets backends.
//!
//! Each backend implements [`SecretsBackend`]: an opaque
//! `fetch(secret_id) -> plaintext` against one external store. Backends are
//! selected by the `(provider, loader)` pair from the connection
//! configuration and constructed through [`SecretsBackendRegistry`].
//!
//! Cloud SDK backends (`aws`, `gcp`, `azure`) are compiled only when their
//! cargo feature is enabled; selecting one in a build without the feature
//! fails with `UnsupportedProvider` at bootstrap.

pub mod backend;
pub mod noop;
pub mod registry;
pub mod vault;

#[cfg(feature = "aws")]
pub mod aws;
#[cfg(feature = "azure")]
pub mod azure;
#[cfg(feature = "gcp")]
pub mod gcp;

pub use backend::{SecretsBackend, SecretsLoader, SecretsProvider};
pub use noop::NoopSecretsBackend;
pub use registry::SecretsBackendRegistry;
pub use vault::{VaultBackendConfig, VaultSecretsBackend};

#[cfg(feature = "aws")]
pub use aws::AwsSecretsBackend;
#[cfg(feature = "azure")]
pub use azure::AzureSecretsBackend;
#[cfg(feature = "gcp")]
pub use gcp::GcpSecretsBackend;
