//! Error types for secrets resolution operations.

use thiserror::Error;

/// Result type for secrets operations.
pub type Result<T> = std::result::Result<T, SecretsError>;

/// Errors that can occur while selecting a backend or resolving a secret.
#[derive(Error, Debug)]
pub enum SecretsError {
    /// The backend reached its store but the identifier does not exist.
    /// Fatal for the resolving value; never retried automatically.
    #[error("Secret not found: {secret_id}")]
    NotFound { secret_id: String },

    /// The backend's dependency (ambient credentials, network) cannot be
    /// reached, or a fetch timed out. Transient; the caller may retry.
    #[error("Secrets backend '{backend}' unavailable: {message}")]
    Unavailable { backend: String, message: String },

    /// The `(provider, loader)` pair does not map to a backend in this
    /// build. Fatal, surfaced at bootstrap rather than at first access.
    #[error("Unsupported secrets manager selection: provider '{provider}' with loader '{loader}'")]
    UnsupportedProvider { provider: String, loader: String },

    /// The stored secret exists but its payload cannot be interpreted.
    #[error("Invalid secret reference '{reference}': {reason}")]
    InvalidReference { reference: String, reason: String },
}

impl SecretsError {
    /// Create a not found error.
    pub fn not_found(secret_id: impl Into<String>) -> Self {
        Self::NotFound { secret_id: secret_id.into() }
    }

    /// Create a backend unavailable error.
    pub fn unavailable(backend: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Unavailable { backend: backend.into(), message: message.into() }
    }

    /// Create an unsupported provider error.
    pub fn unsupported_provider(provider: impl Into<String>, loader: impl Into<String>) -> Self {
        Self::UnsupportedProvider { provider: provider.into(), loader: loader.into() }
    }

    /// Create an invalid reference error.
    pub fn invalid_reference(reference: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidReference { reference: reference.into(), reason: reason.into() }
    }

    /// Whether a retry of the same operation could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}
