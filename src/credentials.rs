//! Database credentials and their retrieval from a running pod
//!
//! The database image exposes its root password in the container
//! environment. `remote_env_var` reads it with `env | grep <name>` through
//! a `ShellExecutor`, so the password never has to be configured on the
//! test host.

use std::fmt;

use thiserror::Error;

use crate::exec::{ExecError, ShellExecutor};

/// Variable holding the root password in MySQL images
pub const MYSQL_ROOT_PASSWORD: &str = "MYSQL_ROOT_PASSWORD";

/// Credential retrieval errors
#[derive(Error, Debug)]
pub enum CredentialError {
    /// The remote command failed
    #[error("Failed to read remote environment: {0}")]
    Exec(#[from] ExecError),

    /// No `name=value` line in the remote environment
    #[error("Variable {name} not found in remote environment")]
    NotFound { name: String },
}

/// Result type for credential retrieval
pub type CredentialResult<T> = Result<T, CredentialError>;

/// Username and password passed to the database client
///
/// Both are opaque to the harness and never validated.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"****")
            .finish()
    }
}

/// Read the value of `name` from the remote environment
pub fn remote_env_var<S>(shell: &S, name: &str) -> CredentialResult<String>
where
    S: ShellExecutor + ?Sized,
{
    let output = shell
        .execute_cmd(&format!("env | grep {}", name))
        .map_err(|e| {
            tracing::error!(variable = name, error = %e, "Failed to read remote environment");
            e
        })?;

    parse_env_value(&output, name).ok_or_else(|| CredentialError::NotFound {
        name: name.to_string(),
    })
}

/// Read the MySQL root password from the remote environment
pub fn mysql_root_password<S>(shell: &S) -> CredentialResult<String>
where
    S: ShellExecutor + ?Sized,
{
    remote_env_var(shell, MYSQL_ROOT_PASSWORD)
}

/// Extract the value assigned to `name` from `env` output
///
/// `grep` also matches variables that merely contain `name`
/// (`MYSQL_ROOT_PASSWORD_FILE`), so only a line whose key is exactly `name`
/// is used. The value is everything after the first `=`, trimmed.
pub fn parse_env_value(output: &str, name: &str) -> Option<String> {
    output
        .lines()
        .filter_map(|line| line.split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| value.trim().to_string())
}
