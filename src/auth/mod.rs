//! Request authentication.
//!
//! Each supported scheme is an [`AuthProvider`]: a source of bearer tokens
//! for outgoing catalog requests. Providers are selected at bootstrap from
//! the connection's `authProvider` field and its `securityConfig` payload,
//! and the OAuth-style ones cache issued tokens until shortly before
//! expiry.

pub mod auth0;
pub mod error;
pub mod google;
pub mod oidc;
pub mod okta;
pub mod provider;
pub mod selector;
pub mod static_jwt;

pub use auth0::Auth0AuthProvider;
pub use error::AuthError;
pub use google::GoogleAuthProvider;
pub use oidc::CustomOidcAuthProvider;
pub use okta::OktaAuthProvider;
pub use provider::{AuthProvider, AuthProviderKind, NoopAuthProvider};
pub use selector::select_auth_provider;
pub use static_jwt::StaticJwtAuthProvider;
