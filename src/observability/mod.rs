//! Logging initialization.
//!
//! The client is a library, so logging setup is opt-in: embedding
//! applications that already install a subscriber skip this entirely.

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::APP_NAME;

/// Default level when neither `METAHUB_LOG` nor `RUST_LOG` is set.
const DEFAULT_DIRECTIVE: &str = "metahub_client=info";

/// Initialize structured logging for standalone use.
///
/// The filter comes from `METAHUB_LOG`, then `RUST_LOG`, then a default of
/// `metahub_client=info`. Set `json` for machine-readable output.
/// Idempotent: a subscriber installed elsewhere wins silently.
pub fn init_logging(json: bool) {
    let filter = std::env::var("METAHUB_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .map(|directives| EnvFilter::new(directives))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    let installed = if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().try_init().is_ok()
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).try_init().is_ok()
    };

    if installed {
        info!(app = APP_NAME, json = json, "Logging initialized");
    }
}

// `test_init_is_idempotent` lives in `tests/observability.rs`: it installs a
// global subscriber, which cannot coexist in one test process with the
// `#[traced_test]`-based unit tests (both race to `set_global_default`).
