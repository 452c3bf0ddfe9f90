//! Tracing setup for test binaries

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "PODSQL_LOG";

/// Filter used when `PODSQL_LOG` is unset or invalid
pub const DEFAULT_FILTER: &str = "podsql=info";

/// Install a fmt subscriber routed through the test writer
///
/// Only the first call in a process installs anything; later calls and
/// calls after another subscriber was set are ignored.
pub fn init_test_tracing() {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
