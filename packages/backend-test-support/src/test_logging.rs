//! Unified logging initialization for tests.
//!
//! Safe to call from multiple test binaries and multiple times within one
//! process; only the first call installs a subscriber.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Initialize a compact test subscriber honoring RUST_LOG.
/// Defaults to warn-level so passing suites stay quiet.
pub fn init() {
    INIT.call_once(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_test_writer()
            .try_init();
    });
}
