//! Access to a real database pod for the `#[ignore]`d live tests.
//!
//! Configure with `PODSQL_NAMESPACE` / `PODSQL_POD` (and optionally
//! `PODSQL_CONTAINER`, `PODSQL_CLIENT`). Credentials come from
//! `PODSQL_PASSWORD` / `PODSQL_PASSWORD_FILE` when set, otherwise the root
//! password is read from the pod environment.

use podsql::config::CredentialsConfig;
use podsql::logging::init_test_tracing;
use podsql::{KubectlExecutor, MySqlTestHelper, PodTarget};

/// Build an executor for the configured pod.
///
/// # Panics
/// Panics with setup instructions when no pod is configured.
pub fn live_executor() -> KubectlExecutor {
    init_test_tracing();

    let target = PodTarget::from_env().unwrap_or_else(|e| {
        panic!(
            "Live tests need a running database pod ({e}).\n\
             Set PODSQL_NAMESPACE and PODSQL_POD, then run:\n\
             \tcargo test --test live_cluster -- --ignored"
        )
    });

    match CredentialsConfig::from_env().resolve() {
        Ok(credentials) => KubectlExecutor::new(target, credentials),
        Err(_) => KubectlExecutor::connect_as_root(target)
            .unwrap_or_else(|e| panic!("Failed to read root password from pod: {e}")),
    }
}

/// Fixture helper bound to the configured pod.
pub fn live_helper() -> MySqlTestHelper<KubectlExecutor> {
    MySqlTestHelper::new(live_executor())
}
