//! `kubectl exec` based transport
//!
//! Every call becomes one invocation of the shape
//!
//! ```text
//! kubectl -n <namespace> exec <pod> -c <container> -- bash -c "<command>"
//! ```
//!
//! where `<command>` is either a caller-supplied shell command or a client
//! call `<client> -u<user> -p<password> [-D<db>] -e '<sql>'`. The statement
//! is wrapped in single quotes and nothing else; a statement that contains
//! a single quote produces a malformed command.

use crate::config::PodTarget;
use crate::credentials::{mysql_root_password, CredentialResult, Credentials};

use super::command::{RemoteCommand, REDACTED};
use super::error::ExecResult;
use super::{ShellExecutor, SqlExecutor};

/// Runs shell commands in the database container
#[derive(Debug, Clone)]
pub struct KubectlShell {
    target: PodTarget,
}

impl KubectlShell {
    pub fn new(target: PodTarget) -> Self {
        Self { target }
    }

    pub fn target(&self) -> &PodTarget {
        &self.target
    }

    /// Build the remote-exec invocation for a shell command
    pub fn command(&self, cmd: impl Into<String>) -> RemoteCommand {
        let t = &self.target;
        RemoteCommand::new(t.kubectl.as_str())
            .args(["-n", t.namespace.as_str(), "exec", t.pod.as_str()])
            .args(["-c", t.container.as_str(), "--", t.shell.as_str(), "-c"])
            .arg(cmd)
    }
}

impl ShellExecutor for KubectlShell {
    fn execute_cmd(&self, cmd: &str) -> ExecResult<String> {
        self.command(cmd).run()
    }
}

/// Runs SQL through the client binary in the database container
#[derive(Debug, Clone)]
pub struct KubectlExecutor {
    shell: KubectlShell,
    credentials: Credentials,
}

impl KubectlExecutor {
    pub fn new(target: PodTarget, credentials: Credentials) -> Self {
        Self {
            shell: KubectlShell::new(target),
            credentials,
        }
    }

    /// Connect as `root`, reading the root password from the pod environment
    pub fn connect_as_root(target: PodTarget) -> CredentialResult<Self> {
        let shell = KubectlShell::new(target);
        let password = mysql_root_password(&shell)?;
        tracing::debug!(pod = %shell.target().pod, "Read root password from pod environment");
        Ok(Self {
            shell,
            credentials: Credentials::new("root", password),
        })
    }

    pub fn target(&self) -> &PodTarget {
        self.shell.target()
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Build the client invocation run inside the container
    pub fn client_command(&self, db: Option<&str>, sql: &str) -> String {
        let mut cmd = format!(
            "{} -u{} -p{}",
            self.target().client,
            self.credentials.username,
            self.credentials.password
        );
        if let Some(db) = db {
            cmd.push_str(" -D");
            cmd.push_str(db);
        }
        cmd.push_str(" -e '");
        cmd.push_str(sql);
        cmd.push('\'');
        cmd
    }

    /// Build the full remote-exec invocation for a statement
    pub fn sql_command(&self, db: Option<&str>, sql: &str) -> RemoteCommand {
        self.shell
            .command(self.client_command(db, sql))
            .redact(
                format!("-p{}", self.credentials.password),
                format!("-p{}", REDACTED),
            )
    }

    fn run_sql(&self, db: Option<&str>, sql: &str) -> ExecResult<String> {
        if sql.contains('\'') {
            tracing::warn!(
                sql,
                "Statement contains a single quote; the remote command will be malformed"
            );
        }

        let cmd = self.sql_command(db, sql);
        cmd.run().map_err(|e| {
            tracing::error!(command = %cmd, error = %e, "Error executing command");
            e
        })
    }
}

impl SqlExecutor for KubectlExecutor {
    fn execute_sql(&self, sql: &str) -> ExecResult<String> {
        self.run_sql(None, sql)
    }

    fn execute_sql_for_db(&self, db: &str, sql: &str) -> ExecResult<String> {
        self.run_sql(Some(db), sql)
    }
}

impl ShellExecutor for KubectlExecutor {
    fn execute_cmd(&self, cmd: &str) -> ExecResult<String> {
        self.shell.execute_cmd(cmd)
    }
}
