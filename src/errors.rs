//! # Error Types
//!
//! Top-level error type for client bootstrap, wrapping the per-area error
//! enums from [`crate::secrets`] and [`crate::auth`].

use thiserror::Error;

/// Custom result type for bootstrap operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Main error type surfaced by [`crate::ClientBootstrapper`]
#[derive(Debug, Error)]
pub enum ClientError {
    /// Configuration shape or content errors detected before bootstrap
    #[error("Configuration validation failed: {message}")]
    Validation { message: String },

    /// Configuration could not be loaded or parsed
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Secrets backend selection, construction, or resolution errors
    #[error(transparent)]
    Secrets(#[from] crate::secrets::SecretsError),

    /// Authentication provider selection or token errors
    #[error(transparent)]
    Auth(#[from] crate::auth::AuthError),
}

impl ClientError {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation { message: message.into() }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config { message: message.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secrets::SecretsError;

    #[test]
    fn test_error_constructors() {
        let err = ClientError::validation("hostPort is empty");
        assert!(matches!(err, ClientError::Validation { .. }));
        assert!(err.to_string().contains("hostPort is empty"));

        let err = ClientError::config("unreadable file");
        assert!(matches!(err, ClientError::Config { .. }));
    }

    #[test]
    fn test_secrets_error_passthrough() {
        let err: ClientError = SecretsError::not_found("db-password").into();
        // Taxonomy entries propagate unmodified, not re-worded.
        assert_eq!(err.to_string(), "Secret not found: db-password");
    }
}
