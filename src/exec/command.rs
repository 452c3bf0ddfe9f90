//! Remote command construction and execution
//!
//! A `RemoteCommand` is an argv for the remote-exec program plus an optional
//! secret word (such as `-p<password>`) that must never appear in logs or
//! error messages. Running it spawns exactly one child process and waits
//! for it.

use std::fmt;
use std::process::Command;

use super::error::{ExecError, ExecResult};

/// Placeholder rendered in place of a secret
pub const REDACTED: &str = "****";

/// A whitespace-delimited word and what to show instead
#[derive(Clone)]
struct Redaction {
    word: String,
    shown_as: String,
}

/// A fully built remote-exec invocation
#[derive(Clone)]
pub struct RemoteCommand {
    program: String,
    args: Vec<String>,
    redaction: Option<Redaction>,
}

impl RemoteCommand {
    /// Start a command for the given program
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            redaction: None,
        }
    }

    /// Append one argument
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Show `word` as `shown_as` whenever the command is rendered
    ///
    /// Only whole whitespace-delimited words equal to `word` are replaced,
    /// so a password that also occurs inside a pod or path name leaves
    /// those untouched. An empty `word` is ignored.
    pub fn redact(mut self, word: impl Into<String>, shown_as: impl Into<String>) -> Self {
        let word = word.into();
        if !word.is_empty() {
            self.redaction = Some(Redaction {
                word,
                shown_as: shown_as.into(),
            });
        }
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    /// Run the command and return stdout followed by stderr
    ///
    /// A non-zero exit is an error that still carries the combined output.
    pub fn run(&self) -> ExecResult<String> {
        tracing::debug!(command = %self, "Executing remote command");

        let output = Command::new(&self.program)
            .args(&self.args)
            .output()
            .map_err(|source| {
                let err = ExecError::Spawn {
                    command: self.to_string(),
                    source,
                };
                tracing::debug!(error = %err, "Remote command did not start");
                err
            })?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        if output.status.success() {
            Ok(combined)
        } else {
            let err = ExecError::NonZeroExit {
                command: self.to_string(),
                code: output.status.code(),
                output: combined,
            };
            tracing::debug!(code = ?output.status.code(), "Remote command exited unsuccessfully");
            Err(err)
        }
    }

    fn render(&self, part: &str) -> String {
        let part = match self.redaction {
            Some(ref r) => part
                .split(' ')
                .map(|w| if w == r.word { r.shown_as.as_str() } else { w })
                .collect::<Vec<_>>()
                .join(" "),
            None => part.to_string(),
        };
        if part.is_empty() || part.contains(char::is_whitespace) {
            format!("{:?}", part)
        } else {
            part
        }
    }
}

impl fmt::Display for RemoteCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render(&self.program))?;
        for arg in &self.args {
            write!(f, " {}", self.render(arg))?;
        }
        Ok(())
    }
}

impl fmt::Debug for RemoteCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteCommand")
            .field("command", &self.to_string())
            .finish()
    }
}
