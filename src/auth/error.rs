//! Authentication error types.

use crate::secrets::SecretsError;

/// Errors raised while selecting an auth provider or acquiring a token.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The configured auth provider needs a credential payload it did not get
    #[error("Auth provider '{auth_provider}' requires a matching securityConfig")]
    MissingSecurityConfig { auth_provider: String },

    /// The identity provider rejected or failed the token request
    #[error("Token request to {provider} failed: {message}")]
    TokenRequest { provider: String, message: String },

    /// Credential material could not be used (bad key, malformed SA file)
    #[error("Invalid credentials: {message}")]
    InvalidCredentials { message: String },

    /// Resolving a deferred credential failed
    #[error(transparent)]
    Secrets(#[from] SecretsError),
}

impl AuthError {
    pub fn missing_security_config(auth_provider: impl Into<String>) -> Self {
        Self::MissingSecurityConfig { auth_provider: auth_provider.into() }
    }

    pub fn token_request(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::TokenRequest { provider: provider.into(), message: message.into() }
    }

    pub fn invalid_credentials(message: impl Into<String>) -> Self {
        Self::InvalidCredentials { message: message.into() }
    }
}

/// Result type alias for authentication operations
pub type Result<T> = std::result::Result<T, AuthError>;
