//! Deferred-resolution wrapper for sensitive configuration values.
//!
//! A [`SecretValue`] holds either a plaintext literal or a reference to an
//! identifier in an external secret store. Construction never performs I/O;
//! a reference is bound to a [`SecretsBackend`] during bootstrap and the
//! plaintext is fetched on the first [`SecretValue::resolve`] call, then
//! memoized for the lifetime of the instance.
//!
//! References are written as `secret:<id>` in configuration files; any
//! other string is treated as a literal. Literals never touch a backend.

use std::fmt;
use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tokio::sync::OnceCell;
use tracing::debug;

use super::backends::SecretsBackend;
use super::error::{Result, SecretsError};
use super::types::SecretString;

/// Prefix marking a configuration string as a deferred secret reference.
pub const SECRET_REFERENCE_PREFIX: &str = "secret:";

#[derive(Clone, PartialEq)]
enum Source {
    Literal(SecretString),
    Reference { secret_id: String },
}

/// A sensitive configuration value with deferred, memoized resolution.
pub struct SecretValue {
    source: Source,
    backend: OnceLock<Arc<dyn SecretsBackend>>,
    resolved: OnceCell<String>,
}

impl SecretValue {
    /// Create a value holding plaintext directly. Never touches a backend.
    pub fn literal(value: impl Into<String>) -> Self {
        Self {
            source: Source::Literal(SecretString::new(value)),
            backend: OnceLock::new(),
            resolved: OnceCell::new(),
        }
    }

    /// Create a deferred reference to `secret_id` in a secrets backend.
    pub fn reference(secret_id: impl Into<String>) -> Self {
        Self {
            source: Source::Reference { secret_id: secret_id.into() },
            backend: OnceLock::new(),
            resolved: OnceCell::new(),
        }
    }

    /// Parse a raw configuration string: `secret:<id>` becomes a reference,
    /// anything else a literal.
    pub fn parse(raw: &str) -> Self {
        match raw.strip_prefix(SECRET_REFERENCE_PREFIX) {
            Some(secret_id) => Self::reference(secret_id),
            None => Self::literal(raw),
        }
    }

    /// Whether this value holds plaintext directly.
    pub fn is_literal(&self) -> bool {
        matches!(self.source, Source::Literal(_))
    }

    /// The referenced secret identifier, if this is a reference.
    pub fn secret_id(&self) -> Option<&str> {
        match &self.source {
            Source::Reference { secret_id } => Some(secret_id),
            Source::Literal(_) => None,
        }
    }

    /// Whether `resolve` would return without calling a backend.
    pub fn is_resolved(&self) -> bool {
        self.is_literal() || self.resolved.initialized()
    }

    /// Bind a reference to the backend that will serve it.
    ///
    /// The first bind wins; re-binding after a registry clear is a no-op so
    /// an already-captured value stays consistent with its cache. Binding a
    /// literal does nothing.
    pub fn bind(&self, backend: Arc<dyn SecretsBackend>) {
        if !self.is_literal() {
            let _ = self.backend.set(backend);
        }
    }

    /// Whether a reference has a backend attached.
    pub fn is_bound(&self) -> bool {
        self.is_literal() || self.backend.get().is_some()
    }

    /// Resolve the plaintext value.
    ///
    /// Literals return their plaintext immediately. References fetch from
    /// the bound backend exactly once, even under concurrent first access,
    /// and return the memoized plaintext afterwards. Fetch failures are not
    /// memoized; a later call retries.
    pub async fn resolve(&self) -> Result<String> {
        match &self.source {
            Source::Literal(value) => Ok(value.expose_secret().to_string()),
            Source::Reference { secret_id } => {
                let value = self
                    .resolved
                    .get_or_try_init(|| async {
                        let backend = self.backend.get().ok_or_else(|| {
                            SecretsError::unavailable(
                                "unbound",
                                format!(
                                    "secret reference '{}' is not bound to a backend; \
                                     bootstrap the configuration first",
                                    secret_id
                                ),
                            )
                        })?;
                        debug!(
                            secret_id = %secret_id,
                            backend = backend.name(),
                            "Resolving deferred secret"
                        );
                        backend.fetch(secret_id).await
                    })
                    .await?;
                Ok(value.clone())
            }
        }
    }
}

impl Clone for SecretValue {
    fn clone(&self) -> Self {
        let backend = OnceLock::new();
        if let Some(b) = self.backend.get() {
            let _ = backend.set(Arc::clone(b));
        }
        Self {
            source: self.source.clone(),
            backend,
            resolved: OnceCell::new_with(self.resolved.get().cloned()),
        }
    }
}

// Equality compares the declared source only; resolved plaintext and
// backend identity never participate.
impl PartialEq for SecretValue {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Source::Literal(_) => write!(f, "SecretValue(Literal([REDACTED]))"),
            Source::Reference { secret_id } => f
                .debug_struct("SecretValue")
                .field("secret_id", secret_id)
                .field("bound", &self.backend.get().is_some())
                .field("resolved", &self.resolved.initialized())
                .finish(),
        }
    }
}

impl fmt::Display for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl Serialize for SecretValue {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match &self.source {
            // The reference form is not sensitive and round-trips.
            Source::Reference { secret_id } => serializer
                .serialize_str(&format!("{}{}", SECRET_REFERENCE_PREFIX, secret_id)),
            // Literal plaintext never leaves through serialization.
            Source::Literal(_) => serializer.serialize_str("[REDACTED]"),
        }
    }
}

impl<'de> Deserialize<'de> for SecretValue {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

impl From<&str> for SecretValue {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}
