//! Pass-through secrets backend.
//!
//! Used when `secretsManagerProvider` is `none`: the catalog service stores
//! configuration plaintext itself, so a "reference" already carries its
//! value and fetching returns it unchanged.

use super::backend::{SecretsBackend, SecretsProvider};
use crate::secrets::error::Result;
use async_trait::async_trait;

/// Backend that echoes the identifier back as the secret value.
///
/// Always succeeds and performs no I/O of any kind.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSecretsBackend;

impl NoopSecretsBackend {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SecretsBackend for NoopSecretsBackend {
    async fn fetch(&self, secret_id: &str) -> Result<String> {
        Ok(secret_id.to_string())
    }

    fn provider(&self) -> SecretsProvider {
        SecretsProvider::None
    }
}
