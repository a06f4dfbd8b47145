//! End-to-end bootstrap scenarios: registry lifecycle, backend selection,
//! and auth provider wiring against full connection configurations.

mod common;

use std::sync::Arc;

use tokio_test::assert_ok;

use metahub_client::secrets::{SecretsLoader, SecretsProvider};
use metahub_client::{
    AuthProviderKind, ClientBootstrapper, ClientError, ConnectionConfig, SecretsBackendRegistry,
    SecretsError,
};

use common::{env_lock, EnvVarGuard};

fn bootstrapper() -> ClientBootstrapper {
    ClientBootstrapper::new(Arc::new(SecretsBackendRegistry::with_default_timeout()))
}

#[tokio::test]
async fn sequential_bootstraps_share_one_backend() {
    let bootstrapper = bootstrapper();
    let config = ConnectionConfig::new("http://localhost:8585/api");

    let first = bootstrapper.bootstrap(&config).await.unwrap();
    let second = bootstrapper.bootstrap(&config).await.unwrap();

    assert!(Arc::ptr_eq(first.backend(), second.backend()));
    assert_eq!(bootstrapper.registry().len().await, 1);
}

#[tokio::test]
async fn clear_all_yields_fresh_backend() {
    let bootstrapper = bootstrapper();
    let config = ConnectionConfig::new("http://localhost:8585/api");

    let before = bootstrapper.bootstrap(&config).await.unwrap();
    bootstrapper.registry().clear_all().await;
    let after = bootstrapper.bootstrap(&config).await.unwrap();

    assert!(!Arc::ptr_eq(before.backend(), after.backend()));
}

#[tokio::test]
async fn none_provider_works_with_every_loader() {
    let bootstrapper = bootstrapper();

    for loader in [SecretsLoader::Noop, SecretsLoader::Env, SecretsLoader::Airflow] {
        let mut config = ConnectionConfig::new("http://localhost:8585/api");
        config.secrets_manager_loader = loader;
        let context = assert_ok!(bootstrapper.bootstrap(&config).await);
        assert_eq!(context.backend().name(), "none");
    }
    // Distinct loaders are distinct registry keys even for the pass-through.
    assert_eq!(bootstrapper.registry().len().await, 3);
}

#[tokio::test]
async fn none_backend_passes_identifiers_through() {
    let config = ConnectionConfig::new("http://localhost:8585/api");
    let context = bootstrapper().bootstrap(&config).await.unwrap();

    let fetched = context.backend().fetch("plaintext-password").await.unwrap();
    assert_eq!(fetched, "plaintext-password");
}

#[tokio::test]
async fn noop_auth_leaves_requests_unsigned() {
    let config = ConnectionConfig::new("http://localhost:8585/api");
    let context = bootstrapper().bootstrap(&config).await.unwrap();

    assert_eq!(context.bearer_token().await.unwrap(), None);
    assert_eq!(context.api_root(), "http://localhost:8585/api/v1");
}

#[tokio::test]
async fn auth_provider_without_security_config_fails() {
    for kind in [
        AuthProviderKind::Google,
        AuthProviderKind::Okta,
        AuthProviderKind::Auth0,
        AuthProviderKind::CustomOidc,
        AuthProviderKind::Metahub,
    ] {
        let mut config = ConnectionConfig::new("http://localhost:8585/api");
        config.auth_provider = kind;
        let err = bootstrapper().bootstrap(&config).await.unwrap_err();
        assert!(matches!(err, ClientError::Auth(_)), "{kind} should require securityConfig");
    }
}

#[tokio::test]
async fn google_auth_selected_with_matching_config() {
    // Selection never performs I/O; the exchange happens on first token use.
    let json = serde_json::json!({
        "hostPort": "http://localhost:8585/api",
        "authProvider": "google",
        "securityConfig": { "secretKey": "/keys/sa.json" }
    });
    let config = ConnectionConfig::from_json_value(json).unwrap();
    let context = bootstrapper().bootstrap(&config).await.unwrap();

    assert_eq!(context.auth_provider().name(), "google");
}

#[tokio::test]
async fn metahub_auth_resolves_static_token() {
    let json = serde_json::json!({
        "hostPort": "http://localhost:8585/api",
        "authProvider": "metahub",
        "securityConfig": { "jwtToken": "eyJ.pre.issued" }
    });
    let config = ConnectionConfig::from_json_value(json).unwrap();
    let context = bootstrapper().bootstrap(&config).await.unwrap();

    assert_eq!(context.bearer_token().await.unwrap(), Some("eyJ.pre.issued".to_string()));
}

#[tokio::test]
async fn secret_references_bind_to_selected_backend() {
    // With the pass-through backend a reference resolves to its own id,
    // which makes binding observable without an external store.
    let json = serde_json::json!({
        "hostPort": "http://localhost:8585/api",
        "authProvider": "metahub",
        "securityConfig": { "jwtToken": "secret:bot/jwt" }
    });
    let config = ConnectionConfig::from_json_value(json).unwrap();
    let context = bootstrapper().bootstrap(&config).await.unwrap();

    assert_eq!(context.bearer_token().await.unwrap(), Some("bot/jwt".to_string()));
}

#[tokio::test]
async fn airflow_loader_rejected_for_vault() {
    let mut config = ConnectionConfig::new("http://localhost:8585/api");
    config.secrets_manager_provider = SecretsProvider::Vault;
    config.secrets_manager_loader = SecretsLoader::Airflow;

    let err = bootstrapper().bootstrap(&config).await.unwrap_err();
    match err {
        ClientError::Secrets(SecretsError::UnsupportedProvider { provider, loader }) => {
            assert_eq!(provider, "vault");
            assert_eq!(loader, "airflow");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn vault_without_environment_fails_unavailable() {
    let _lock = env_lock();
    let _addr = EnvVarGuard::unset("VAULT_ADDR");
    let _token = EnvVarGuard::unset("VAULT_TOKEN");

    let mut config = ConnectionConfig::new("http://localhost:8585/api");
    config.secrets_manager_provider = SecretsProvider::Vault;

    let err = bootstrapper().bootstrap(&config).await.unwrap_err();
    assert!(matches!(err, ClientError::Secrets(SecretsError::Unavailable { .. })));
}

#[tokio::test]
async fn failed_construction_does_not_poison_registry() {
    let _lock = env_lock();

    let bootstrapper = bootstrapper();
    let mut config = ConnectionConfig::new("http://localhost:8585/api");
    config.secrets_manager_provider = SecretsProvider::Vault;

    {
        let _addr = EnvVarGuard::unset("VAULT_ADDR");
        let _token = EnvVarGuard::unset("VAULT_TOKEN");
        assert!(bootstrapper.bootstrap(&config).await.is_err());
    }

    // Same registry, same key, environment now present: construction retries
    // and succeeds instead of replaying the earlier failure.
    let _addr = EnvVarGuard::set("VAULT_ADDR", "http://127.0.0.1:8200");
    let _token = EnvVarGuard::set("VAULT_TOKEN", "dev-root");

    let context = bootstrapper.bootstrap(&config).await.unwrap();
    assert_eq!(context.backend().name(), "vault");
}

#[tokio::test]
async fn env_loader_override_beats_ambient_vault_settings() {
    let _lock = env_lock();
    let _ambient_addr = EnvVarGuard::unset("VAULT_ADDR");
    let _ambient_token = EnvVarGuard::unset("VAULT_TOKEN");
    let _addr = EnvVarGuard::set("METAHUB_SECRETS_VAULT_ADDR", "http://127.0.0.1:8200");
    let _token = EnvVarGuard::set("METAHUB_SECRETS_VAULT_TOKEN", "dev-root");

    let mut config = ConnectionConfig::new("http://localhost:8585/api");
    config.secrets_manager_provider = SecretsProvider::Vault;

    // The noop loader ignores METAHUB_SECRETS_* and fails.
    config.secrets_manager_loader = SecretsLoader::Noop;
    assert!(bootstrapper().bootstrap(&config).await.is_err());

    // The env loader picks the overrides up.
    config.secrets_manager_loader = SecretsLoader::Env;
    let context = bootstrapper().bootstrap(&config).await.unwrap();
    assert_eq!(context.backend().name(), "vault");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_bootstraps_converge_on_one_backend() {
    let bootstrapper = Arc::new(bootstrapper());

    let mut handles = Vec::new();
    for _ in 0..50 {
        let bootstrapper = Arc::clone(&bootstrapper);
        handles.push(tokio::spawn(async move {
            let config = ConnectionConfig::new("http://localhost:8585/api");
            bootstrapper.bootstrap(&config).await.unwrap()
        }));
    }

    let mut contexts = Vec::new();
    for handle in handles {
        contexts.push(handle.await.unwrap());
    }

    let first = contexts[0].backend();
    assert!(contexts.iter().all(|c| Arc::ptr_eq(first, c.backend())));
    assert_eq!(bootstrapper.registry().len().await, 1);
}

#[cfg(feature = "aws")]
mod aws_scenarios {
    use super::*;

    #[tokio::test]
    async fn aws_without_region_fails_unavailable() {
        let _lock = env_lock();
        let _region = EnvVarGuard::unset("AWS_REGION");
        let _default_region = EnvVarGuard::unset("AWS_DEFAULT_REGION");

        let mut config = ConnectionConfig::new("http://localhost:8585/api");
        config.secrets_manager_provider = SecretsProvider::Aws;

        let err = bootstrapper().bootstrap(&config).await.unwrap_err();
        assert!(matches!(err, ClientError::Secrets(SecretsError::Unavailable { .. })));
    }

    #[tokio::test]
    async fn aws_env_loader_accepts_region_override() {
        let _lock = env_lock();
        let _region = EnvVarGuard::unset("AWS_REGION");
        let _default_region = EnvVarGuard::unset("AWS_DEFAULT_REGION");
        let _override = EnvVarGuard::set("METAHUB_SECRETS_AWS_REGION", "eu-west-1");

        let mut config = ConnectionConfig::new("http://localhost:8585/api");
        config.secrets_manager_provider = SecretsProvider::Aws;
        config.secrets_manager_loader = SecretsLoader::Env;

        let context = bootstrapper().bootstrap(&config).await.unwrap();
        assert_eq!(context.backend().name(), "aws");
    }
}

#[cfg(not(feature = "aws"))]
#[tokio::test]
async fn aws_without_feature_is_unsupported() {
    let mut config = ConnectionConfig::new("http://localhost:8585/api");
    config.secrets_manager_provider = SecretsProvider::Aws;

    let err = bootstrapper().bootstrap(&config).await.unwrap_err();
    assert!(matches!(err, ClientError::Secrets(SecretsError::UnsupportedProvider { .. })));
}
