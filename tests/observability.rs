//! Logging initialization tests.
//!
//! Kept in a dedicated integration-test binary: `init_logging` installs a
//! global tracing subscriber, which cannot coexist in the same test process
//! as the `#[traced_test]`-based unit tests (both race to set the global
//! default dispatcher).

use metahub_client::observability::init_logging;

#[test]
fn test_init_is_idempotent() {
    init_logging(false);
    // Second call must not panic even though a subscriber exists.
    init_logging(true);
}
