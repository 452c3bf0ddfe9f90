//! Harness configuration
//!
//! Tests usually build a `PodTarget` and `Credentials` in code. For suites
//! that run against whatever cluster CI provisioned, both can be read from
//! the environment instead.
//!
//! Environment Variables:
//! - `PODSQL_NAMESPACE` - Namespace of the database pod (default `default`)
//! - `PODSQL_POD` - Name of the database pod (required)
//! - `PODSQL_CONTAINER` - Container running the database (default `mysql`)
//! - `PODSQL_CLIENT` - Path of the client binary inside the container
//! - `PODSQL_KUBECTL` - Remote-exec program on the test host
//! - `PODSQL_SHELL` - Shell used inside the container
//! - `PODSQL_USER` - Database user (default `root`)
//! - `PODSQL_PASSWORD` - Database password
//! - `PODSQL_PASSWORD_FILE` - Read the password from a file instead

use std::env;
use std::fs;

use thiserror::Error;

use crate::credentials::Credentials;

/// Default remote-exec program
pub const DEFAULT_KUBECTL: &str = "kubectl";

/// Default namespace
pub const DEFAULT_NAMESPACE: &str = "default";

/// Default database container name
pub const DEFAULT_CONTAINER: &str = "mysql";

/// Default client binary inside the container
pub const DEFAULT_CLIENT: &str = "/bin/mysql";

/// Default shell inside the container
pub const DEFAULT_SHELL: &str = "bash";

/// Default database user
pub const DEFAULT_USER: &str = "root";

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),
    #[error("No password configured. Set PODSQL_PASSWORD or PODSQL_PASSWORD_FILE")]
    NoPassword,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Where remote commands are executed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PodTarget {
    /// Remote-exec program on the test host
    pub kubectl: String,
    pub namespace: String,
    pub pod: String,
    pub container: String,
    /// Client binary invoked inside the container
    pub client: String,
    /// Shell that interprets the client invocation
    pub shell: String,
}

impl PodTarget {
    /// Target `pod` in `namespace` with default container, client and shell
    pub fn new(namespace: impl Into<String>, pod: impl Into<String>) -> Self {
        Self {
            kubectl: DEFAULT_KUBECTL.to_string(),
            namespace: namespace.into(),
            pod: pod.into(),
            container: DEFAULT_CONTAINER.to_string(),
            client: DEFAULT_CLIENT.to_string(),
            shell: DEFAULT_SHELL.to_string(),
        }
    }

    /// Set the container name
    pub fn with_container(mut self, container: impl Into<String>) -> Self {
        self.container = container.into();
        self
    }

    /// Set the client binary path
    pub fn with_client(mut self, client: impl Into<String>) -> Self {
        self.client = client.into();
        self
    }

    /// Set the remote-exec program
    pub fn with_kubectl(mut self, kubectl: impl Into<String>) -> Self {
        self.kubectl = kubectl.into();
        self
    }

    /// Set the shell used inside the container
    pub fn with_shell(mut self, shell: impl Into<String>) -> Self {
        self.shell = shell.into();
        self
    }

    /// Read the target from the environment
    pub fn from_env() -> Result<Self, ConfigError> {
        TargetConfig::from_env().resolve()
    }
}

/// Target settings as read from the environment
#[derive(Debug, Default)]
pub struct TargetConfig {
    pub namespace: Option<String>,
    pub pod: Option<String>,
    pub container: Option<String>,
    pub client: Option<String>,
    pub kubectl: Option<String>,
    pub shell: Option<String>,
}

impl TargetConfig {
    /// Read configuration from environment variables
    pub fn from_env() -> Self {
        TargetConfig {
            namespace: env::var("PODSQL_NAMESPACE").ok(),
            pod: env::var("PODSQL_POD").ok(),
            container: env::var("PODSQL_CONTAINER").ok(),
            client: env::var("PODSQL_CLIENT").ok(),
            kubectl: env::var("PODSQL_KUBECTL").ok(),
            shell: env::var("PODSQL_SHELL").ok(),
        }
    }

    /// Build the target, filling unset values with defaults
    pub fn resolve(self) -> Result<PodTarget, ConfigError> {
        let pod = self.pod.ok_or(ConfigError::Missing("PODSQL_POD"))?;
        let namespace = self
            .namespace
            .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());

        let mut target = PodTarget::new(namespace, pod);
        if let Some(container) = self.container {
            target = target.with_container(container);
        }
        if let Some(client) = self.client {
            target = target.with_client(client);
        }
        if let Some(kubectl) = self.kubectl {
            target = target.with_kubectl(kubectl);
        }
        if let Some(shell) = self.shell {
            target = target.with_shell(shell);
        }
        Ok(target)
    }
}

/// Credential settings as read from the environment
#[derive(Debug, Default)]
pub struct CredentialsConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub password_file: Option<String>,
}

impl CredentialsConfig {
    /// Read configuration from environment variables
    pub fn from_env() -> Self {
        CredentialsConfig {
            username: env::var("PODSQL_USER").ok(),
            password: env::var("PODSQL_PASSWORD").ok(),
            password_file: env::var("PODSQL_PASSWORD_FILE").ok(),
        }
    }

    /// The configured password
    ///
    /// `PODSQL_PASSWORD` wins over `PODSQL_PASSWORD_FILE`; file content is
    /// trimmed so a trailing newline from a mounted secret is dropped.
    pub fn determine_password(&self) -> Result<String, ConfigError> {
        match (&self.password, &self.password_file) {
            (Some(password), _) => Ok(password.clone()),
            (None, Some(path)) => Ok(fs::read_to_string(path)?.trim().to_string()),
            (None, None) => Err(ConfigError::NoPassword),
        }
    }

    /// Build credentials, defaulting the user to `root`
    pub fn resolve(&self) -> Result<Credentials, ConfigError> {
        let password = self.determine_password()?;
        let username = self
            .username
            .clone()
            .unwrap_or_else(|| DEFAULT_USER.to_string());
        Ok(Credentials::new(username, password))
    }
}
