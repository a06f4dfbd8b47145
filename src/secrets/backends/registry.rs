//! Secrets backend registry.
//!
//! An explicit, injectable store that maps each `(provider, loader)` pair
//! to at most one live backend instance. The composition root owns a
//! registry and passes it to [`crate::ClientBootstrapper`]; test harnesses
//! either take their own instance or call [`SecretsBackendRegistry::clear_all`]
//! between cases.
//!
//! Construction is serialized per key via a `OnceCell` slot, so concurrent
//! bootstraps racing on the same pair all receive the identical instance
//! while unrelated keys proceed independently: the map lock is only held
//! to look up or insert a slot, never across construction. Exclusion
//! between `clear_all` and in-flight construction comes from a dedicated
//! lifecycle lock instead. A failed construction leaves the slot empty and
//! is retried on the next call.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{OnceCell, RwLock};
use tracing::{debug, info};

use super::backend::{SecretsBackend, SecretsLoader, SecretsProvider};
use super::noop::NoopSecretsBackend;
use super::vault::VaultSecretsBackend;
use crate::secrets::error::{Result, SecretsError};

/// Default bound on a single backend fetch call.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

type BackendCell = Arc<OnceCell<Arc<dyn SecretsBackend>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct BackendKey {
    provider: SecretsProvider,
    loader: SecretsLoader,
}

/// Registry of secrets backends with construct-once semantics.
pub struct SecretsBackendRegistry {
    entries: RwLock<HashMap<BackendKey, BackendCell>>,
    // Held shared for the whole of get_or_create and exclusively by
    // clear_all; keeps a clear from interleaving with in-flight
    // construction without ever holding the map lock across an await.
    lifecycle: RwLock<()>,
    fetch_timeout: Duration,
}

impl std::fmt::Debug for SecretsBackendRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let keys: Vec<String> = match self.entries.try_read() {
            Ok(entries) => entries
                .keys()
                .map(|k| format!("{}/{}", k.provider, k.loader))
                .collect(),
            Err(_) => vec!["<locked>".to_string()],
        };
        f.debug_struct("SecretsBackendRegistry")
            .field("entries", &keys)
            .field("fetch_timeout", &self.fetch_timeout)
            .finish()
    }
}

impl SecretsBackendRegistry {
    /// Create a registry whose backends bound each fetch by `fetch_timeout`.
    pub fn new(fetch_timeout: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            lifecycle: RwLock::new(()),
            fetch_timeout,
        }
    }

    /// Create a registry with the default fetch timeout (30 seconds).
    pub fn with_default_timeout() -> Self {
        Self::new(DEFAULT_FETCH_TIMEOUT)
    }

    /// Return the backend for `(provider, loader)`, constructing it on the
    /// first call.
    ///
    /// At most one construction happens per key, even when many callers
    /// race on first access; all of them observe the same instance.
    /// Keys are independent: a slow construction on one key never delays
    /// lookups or construction on another. Construction failures are not
    /// cached: the next call with the same key retries from scratch.
    pub async fn get_or_create(
        &self,
        provider: SecretsProvider,
        loader: SecretsLoader,
    ) -> Result<Arc<dyn SecretsBackend>> {
        let key = BackendKey { provider, loader };
        self.obtain(key, || self.construct(provider, loader)).await
    }

    async fn obtain<F, Fut>(&self, key: BackendKey, build: F) -> Result<Arc<dyn SecretsBackend>>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<Arc<dyn SecretsBackend>>>,
    {
        let _lifecycle = self.lifecycle.read().await;

        // Hold the map lock only long enough to fetch or insert the slot;
        // construction awaits outside it.
        let cell = {
            let entries = self.entries.read().await;
            entries.get(&key).map(Arc::clone)
        };
        let cell = match cell {
            Some(cell) => cell,
            None => {
                let mut entries = self.entries.write().await;
                Arc::clone(entries.entry(key).or_insert_with(|| Arc::new(OnceCell::new())))
            }
        };

        let backend = cell.get_or_try_init(build).await?;
        Ok(Arc::clone(backend))
    }

    /// Drop every stored backend immediately.
    ///
    /// Waits for in-flight `get_or_create` calls before clearing, then lets
    /// subsequent bootstraps construct fresh instances. Values already
    /// resolved against an old backend keep their memoized plaintext.
    pub async fn clear_all(&self) {
        let _lifecycle = self.lifecycle.write().await;
        let mut entries = self.entries.write().await;
        let dropped = entries.len();
        entries.clear();
        info!(dropped = dropped, "Cleared secrets backend registry");
    }

    /// Number of keys with a slot in the registry.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the registry is empty.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Whether a constructed backend exists for the pair.
    pub async fn contains(&self, provider: SecretsProvider, loader: SecretsLoader) -> bool {
        let entries = self.entries.read().await;
        entries
            .get(&BackendKey { provider, loader })
            .map(|cell| cell.initialized())
            .unwrap_or(false)
    }

    /// The fetch timeout applied to backends built by this registry.
    pub fn fetch_timeout(&self) -> Duration {
        self.fetch_timeout
    }

    async fn construct(
        &self,
        provider: SecretsProvider,
        loader: SecretsLoader,
    ) -> Result<Arc<dyn SecretsBackend>> {
        // The airflow loader reads credentials out of an Airflow runtime
        // this client does not run inside.
        if loader == SecretsLoader::Airflow && provider != SecretsProvider::None {
            return Err(SecretsError::unsupported_provider(provider.as_str(), loader.as_str()));
        }

        debug!(provider = %provider, loader = %loader, "Constructing secrets backend");

        let backend: Arc<dyn SecretsBackend> = match provider {
            SecretsProvider::None => Arc::new(NoopSecretsBackend::new()),
            SecretsProvider::Vault => {
                Arc::new(VaultSecretsBackend::connect(loader, self.fetch_timeout)?)
            }
            SecretsProvider::Aws => {
                #[cfg(feature = "aws")]
                {
                    Arc::new(
                        super::aws::AwsSecretsBackend::connect(loader, self.fetch_timeout).await?,
                    )
                }
                #[cfg(not(feature = "aws"))]
                {
                    return Err(SecretsError::unsupported_provider(
                        provider.as_str(),
                        loader.as_str(),
                    ));
                }
            }
            SecretsProvider::Gcp => {
                #[cfg(feature = "gcp")]
                {
                    Arc::new(
                        super::gcp::GcpSecretsBackend::connect(loader, self.fetch_timeout).await?,
                    )
                }
                #[cfg(not(feature = "gcp"))]
                {
                    return Err(SecretsError::unsupported_provider(
                        provider.as_str(),
                        loader.as_str(),
                    ));
                }
            }
            SecretsProvider::Azure => {
                #[cfg(feature = "azure")]
                {
                    Arc::new(
                        super::azure::AzureSecretsBackend::connect(loader, self.fetch_timeout)
                            .await?,
                    )
                }
                #[cfg(not(feature = "azure"))]
                {
                    return Err(SecretsError::unsupported_provider(
                        provider.as_str(),
                        loader.as_str(),
                    ));
                }
            }
        };

        info!(provider = %provider, loader = %loader, "Constructed secrets backend");
        Ok(backend)
    }
}

impl Default for SecretsBackendRegistry {
    fn default() -> Self {
        Self::with_default_timeout()
    }
}
