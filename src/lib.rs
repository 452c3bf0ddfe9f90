//! podsql - black-box fixtures and assertions for a MySQL database in Kubernetes
//!
//! Tests check live database state without a database connection:
//! - SQL is executed by `kubectl exec` into the database container,
//!   running the `mysql` client there
//! - Existence checks parse the client's plain text output
//! - Fixtures verify every change and abort the test when they cannot
//!
//! ```no_run
//! use podsql::{KubectlExecutor, MySqlTestHelper, PodTarget};
//!
//! let executor = KubectlExecutor::connect_as_root(PodTarget::new("e2e", "mysql-0"))
//!     .expect("read root password");
//! let helper = MySqlTestHelper::new(executor);
//!
//! helper.ensure_db_table_value("testdb", "t1", "id", "abc");
//! assert!(helper.has_db_table_value("testdb", "t1", "id", "abc"));
//! ```

pub mod config;
pub mod credentials;
pub mod exec;
pub mod fixture;
pub mod logging;
pub mod output;

pub use config::{ConfigError, PodTarget};
pub use credentials::{mysql_root_password, remote_env_var, CredentialError, Credentials};
pub use exec::{
    ExecError, ExecResult, KubectlExecutor, KubectlShell, Reply, ScriptedExecutor, ShellExecutor,
    SqlExecutor,
};
pub use fixture::{unique_name, MySqlTestHelper};
pub use output::has_row_value;
