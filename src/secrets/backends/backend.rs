//! Secrets backend trait and selection enums.
//!
//! Defines the core interface for pluggable secrets backends and the closed
//! `(provider, loader)` vocabulary of the connection configuration.

use super::super::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Secrets manager provider declared in the connection configuration.
///
/// `none` means the catalog stores plaintext configuration itself and the
/// pass-through backend is used regardless of the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecretsProvider {
    /// No external store; identifiers are returned unchanged
    #[default]
    #[serde(alias = "noop")]
    None,
    /// AWS Secrets Manager
    Aws,
    /// GCP Secret Manager
    Gcp,
    /// Azure Key Vault
    Azure,
    /// HashiCorp Vault KV v2
    Vault,
}

impl SecretsProvider {
    /// Get the wire representation of this provider
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Aws => "aws",
            Self::Gcp => "gcp",
            Self::Azure => "azure",
            Self::Vault => "vault",
        }
    }
}

impl FromStr for SecretsProvider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "none" | "noop" => Ok(Self::None),
            "aws" => Ok(Self::Aws),
            "gcp" => Ok(Self::Gcp),
            "azure" => Ok(Self::Azure),
            "vault" => Ok(Self::Vault),
            _ => Err(format!("Unknown secrets manager provider: {}", s)),
        }
    }
}

impl fmt::Display for SecretsProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a backend gathers its own client settings (addresses, regions,
/// credentials material).
///
/// `noop` relies on the ambient environment the SDKs read by default;
/// `env` additionally honors `METAHUB_SECRETS_*` overrides. `airflow` is
/// part of the closed configuration contract but only meaningful inside an
/// Airflow runtime, so this client rejects it at bootstrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecretsLoader {
    /// Ambient SDK defaults only
    #[default]
    Noop,
    /// `METAHUB_SECRETS_*` environment overrides, then ambient defaults
    Env,
    /// Airflow configuration files (unsupported in this client)
    Airflow,
}

impl SecretsLoader {
    /// Get the wire representation of this loader
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Noop => "noop",
            Self::Env => "env",
            Self::Airflow => "airflow",
        }
    }
}

impl FromStr for SecretsLoader {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "noop" => Ok(Self::Noop),
            "env" => Ok(Self::Env),
            "airflow" => Ok(Self::Airflow),
            _ => Err(format!("Unknown secrets manager loader: {}", s)),
        }
    }
}

impl fmt::Display for SecretsLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Trait for secrets backends.
///
/// Implementations must be Send + Sync for use in async contexts. A backend
/// holds no secret plaintext of its own; memoization belongs to the
/// resolving `SecretValue`.
#[async_trait]
pub trait SecretsBackend: Send + Sync + fmt::Debug {
    /// Fetch a secret's plaintext by backend-specific identifier.
    ///
    /// Network-backed implementations bound the call with the timeout they
    /// were constructed with and fail `Unavailable` on elapse.
    async fn fetch(&self, secret_id: &str) -> Result<String>;

    /// The provider this backend serves
    fn provider(&self) -> SecretsProvider;

    /// Short name for logging
    fn name(&self) -> &'static str {
        self.provider().as_str()
    }
}

/// Look up a backend setting honoring the loader semantics: the `env`
/// loader consults the `METAHUB_SECRETS_*` override first, then both
/// loaders fall back to the ambient variables the SDKs document.
pub(crate) fn setting_from_env(
    loader: SecretsLoader,
    override_key: &str,
    ambient_keys: &[&str],
) -> Option<String> {
    if loader == SecretsLoader::Env {
        if let Ok(value) = std::env::var(override_key) {
            return Some(value);
        }
    }
    ambient_keys.iter().find_map(|key| std::env::var(key).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_roundtrip() {
        for provider in [
            SecretsProvider::None,
            SecretsProvider::Aws,
            SecretsProvider::Gcp,
            SecretsProvider::Azure,
            SecretsProvider::Vault,
        ] {
            let parsed: SecretsProvider = provider.as_str().parse().unwrap();
            assert_eq!(provider, parsed);
        }
    }

    #[test]
    fn test_provider_serialization() {
        let json = serde_json::to_string(&SecretsProvider::Vault).unwrap();
        assert_eq!(json, "\"vault\"");

        let parsed: SecretsProvider = serde_json::from_str("\"aws\"").unwrap();
        assert_eq!(parsed, SecretsProvider::Aws);

        // "noop" is accepted as a legacy alias for "none"
        let parsed: SecretsProvider = serde_json::from_str("\"noop\"").unwrap();
        assert_eq!(parsed, SecretsProvider::None);
    }

    #[test]
    fn test_loader_roundtrip() {
        for loader in [SecretsLoader::Noop, SecretsLoader::Env, SecretsLoader::Airflow] {
            let parsed: SecretsLoader = loader.as_str().parse().unwrap();
            assert_eq!(loader, parsed);
        }
    }

    #[test]
    fn test_unknown_values_rejected() {
        assert!("consul".parse::<SecretsProvider>().is_err());
        assert!("kubernetes".parse::<SecretsLoader>().is_err());
    }

    #[test]
    fn test_defaults() {
        assert_eq!(SecretsProvider::default(), SecretsProvider::None);
        assert_eq!(SecretsLoader::default(), SecretsLoader::Noop);
    }
}
