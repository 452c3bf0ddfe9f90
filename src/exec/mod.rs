//! SQL execution transport
//!
//! The fixture helper never talks to the database directly. It hands SQL
//! statements to a `SqlExecutor`, which decides how the statement reaches
//! the database process and returns whatever text the client printed:
//! - `KubectlExecutor`: `kubectl exec` into the database container and run
//!   the `mysql` client there
//! - `ScriptedExecutor`: canned replies for unit tests, no processes
//!
//! Statements and identifiers are concatenated into the remote shell
//! command without any escaping. Callers must not pass values containing
//! quotes or newlines.

pub mod command;
pub mod error;
pub mod kubectl;
pub mod scripted;

use std::sync::Arc;

pub use command::RemoteCommand;
pub use error::{ExecError, ExecResult};
pub use kubectl::{KubectlExecutor, KubectlShell};
pub use scripted::{ExecCall, Reply, ScriptedExecutor};

/// Execute SQL statements against a database server
pub trait SqlExecutor: Send + Sync {
    /// Execute a statement with no database selected
    ///
    /// Returns the combined output of the client. SQL errors and transport
    /// failures are both returned as errors, with the output preserved.
    fn execute_sql(&self, sql: &str) -> ExecResult<String>;

    /// Execute a statement with `db` selected as the current database
    fn execute_sql_for_db(&self, db: &str, sql: &str) -> ExecResult<String>;
}

/// Execute arbitrary shell commands next to the database process
pub trait ShellExecutor: Send + Sync {
    /// Run `cmd` through the remote shell and return its combined output
    fn execute_cmd(&self, cmd: &str) -> ExecResult<String>;
}

impl<E: SqlExecutor + ?Sized> SqlExecutor for &E {
    fn execute_sql(&self, sql: &str) -> ExecResult<String> {
        (**self).execute_sql(sql)
    }

    fn execute_sql_for_db(&self, db: &str, sql: &str) -> ExecResult<String> {
        (**self).execute_sql_for_db(db, sql)
    }
}

impl<E: SqlExecutor + ?Sized> SqlExecutor for Box<E> {
    fn execute_sql(&self, sql: &str) -> ExecResult<String> {
        (**self).execute_sql(sql)
    }

    fn execute_sql_for_db(&self, db: &str, sql: &str) -> ExecResult<String> {
        (**self).execute_sql_for_db(db, sql)
    }
}

impl<E: SqlExecutor + ?Sized> SqlExecutor for Arc<E> {
    fn execute_sql(&self, sql: &str) -> ExecResult<String> {
        (**self).execute_sql(sql)
    }

    fn execute_sql_for_db(&self, db: &str, sql: &str) -> ExecResult<String> {
        (**self).execute_sql_for_db(db, sql)
    }
}

impl<E: ShellExecutor + ?Sized> ShellExecutor for &E {
    fn execute_cmd(&self, cmd: &str) -> ExecResult<String> {
        (**self).execute_cmd(cmd)
    }
}

impl<E: ShellExecutor + ?Sized> ShellExecutor for Box<E> {
    fn execute_cmd(&self, cmd: &str) -> ExecResult<String> {
        (**self).execute_cmd(cmd)
    }
}

impl<E: ShellExecutor + ?Sized> ShellExecutor for Arc<E> {
    fn execute_cmd(&self, cmd: &str) -> ExecResult<String> {
        (**self).execute_cmd(cmd)
    }
}
