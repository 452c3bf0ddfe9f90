//! Transport error types

use thiserror::Error;

/// Remote execution errors
///
/// SQL errors reported by the database client and failures of the
/// remote-exec tool itself both surface as `NonZeroExit`; the two are not
/// distinguished.
#[derive(Error, Debug)]
pub enum ExecError {
    /// The remote-exec program could not be started
    #[error("Failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The remote invocation ran but did not succeed
    #[error("Command `{command}` failed ({}): {}", describe_exit(.code), trimmed(.output))]
    NonZeroExit {
        command: String,
        code: Option<i32>,
        output: String,
    },
}

impl ExecError {
    /// Combined output captured before the failure (empty for spawn errors)
    pub fn output(&self) -> &str {
        match self {
            ExecError::Spawn { .. } => "",
            ExecError::NonZeroExit { output, .. } => output,
        }
    }

    /// Rendered command that failed (password redacted)
    pub fn command(&self) -> &str {
        match self {
            ExecError::Spawn { command, .. } | ExecError::NonZeroExit { command, .. } => command,
        }
    }
}

fn describe_exit(code: &Option<i32>) -> String {
    match *code {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    }
}

fn trimmed(output: &str) -> &str {
    output.trim_end()
}

/// Result type for transport operations
pub type ExecResult<T> = Result<T, ExecError>;
