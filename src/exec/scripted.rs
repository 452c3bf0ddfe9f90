//! In-memory transport with canned replies
//!
//! `ScriptedExecutor` answers statements from queues of scripted replies
//! and records every call, so the fixture helper can be exercised without
//! a cluster. Replies are keyed by `(database, statement)`; successive calls
//! pop successive replies and the last reply of a queue repeats forever.

use std::collections::{HashMap, VecDeque};

use parking_lot::Mutex;

use super::error::{ExecError, ExecResult};
use super::{ShellExecutor, SqlExecutor};

/// A canned reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Successful execution with the given output
    Output(String),
    /// Failed execution with exit code and output
    Fail { code: i32, output: String },
}

impl Reply {
    pub fn output(output: impl Into<String>) -> Self {
        Reply::Output(output.into())
    }

    pub fn fail(code: i32, output: impl Into<String>) -> Self {
        Reply::Fail {
            code,
            output: output.into(),
        }
    }

    /// Output of `show databases;` listing the given databases
    pub fn databases(names: &[&str]) -> Self {
        Reply::Output(tabular("Database", names))
    }

    /// Output of `show tables;` in `db` listing the given tables
    pub fn tables(db: &str, names: &[&str]) -> Self {
        Reply::Output(tabular(&format!("Tables_in_{}", db), names))
    }

    /// Output of a single-column `select`
    pub fn column(column: &str, values: &[&str]) -> Self {
        Reply::Output(tabular(column, values))
    }
}

fn tabular(header: &str, rows: &[&str]) -> String {
    let mut out = String::from(header);
    out.push('\n');
    for row in rows {
        out.push_str(row);
        out.push('\n');
    }
    out
}

/// One recorded SQL call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecCall {
    /// Selected database, `None` for unscoped statements
    pub database: Option<String>,
    pub statement: String,
}

impl ExecCall {
    /// True unless the statement is a `show` or `select`
    pub fn is_mutating(&self) -> bool {
        let head = self
            .statement
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        head != "show" && head != "select"
    }
}

type SqlKey = (Option<String>, String);

#[derive(Default)]
struct Script {
    sql: HashMap<SqlKey, VecDeque<Reply>>,
    cmds: HashMap<String, VecDeque<Reply>>,
    calls: Vec<ExecCall>,
    commands: Vec<String>,
}

/// Test double answering from scripted replies
#[derive(Default)]
pub struct ScriptedExecutor {
    script: Mutex<Script>,
}

impl ScriptedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply for an unscoped statement
    pub fn on_sql(self, sql: &str, reply: Reply) -> Self {
        self.script
            .lock()
            .sql
            .entry((None, sql.to_string()))
            .or_default()
            .push_back(reply);
        self
    }

    /// Queue a reply for a statement run against `db`
    pub fn on_sql_for_db(self, db: &str, sql: &str, reply: Reply) -> Self {
        self.script
            .lock()
            .sql
            .entry((Some(db.to_string()), sql.to_string()))
            .or_default()
            .push_back(reply);
        self
    }

    /// Queue a reply for a shell command
    pub fn on_cmd(self, cmd: &str, reply: Reply) -> Self {
        self.script
            .lock()
            .cmds
            .entry(cmd.to_string())
            .or_default()
            .push_back(reply);
        self
    }

    /// SQL calls received so far, in order
    pub fn calls(&self) -> Vec<ExecCall> {
        self.script.lock().calls.clone()
    }

    /// SQL calls that were neither `show` nor `select`
    pub fn mutating_calls(&self) -> Vec<ExecCall> {
        self.calls().into_iter().filter(ExecCall::is_mutating).collect()
    }

    /// Shell commands received so far, in order
    pub fn commands(&self) -> Vec<String> {
        self.script.lock().commands.clone()
    }

    fn answer(key: &str, queue: Option<&mut VecDeque<Reply>>) -> ExecResult<String> {
        let reply = match queue {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        };

        match reply {
            Some(Reply::Output(output)) => Ok(output),
            Some(Reply::Fail { code, output }) => Err(ExecError::NonZeroExit {
                command: key.to_string(),
                code: Some(code),
                output,
            }),
            None => Err(ExecError::NonZeroExit {
                command: key.to_string(),
                code: Some(1),
                output: format!("no scripted reply for `{}`\n", key),
            }),
        }
    }

    fn run_sql(&self, db: Option<&str>, sql: &str) -> ExecResult<String> {
        let mut script = self.script.lock();
        script.calls.push(ExecCall {
            database: db.map(str::to_string),
            statement: sql.to_string(),
        });

        let key = (db.map(str::to_string), sql.to_string());
        let rendered = match db {
            Some(db) => format!("[{}] {}", db, sql),
            None => sql.to_string(),
        };
        Self::answer(&rendered, script.sql.get_mut(&key))
    }
}

impl SqlExecutor for ScriptedExecutor {
    fn execute_sql(&self, sql: &str) -> ExecResult<String> {
        self.run_sql(None, sql)
    }

    fn execute_sql_for_db(&self, db: &str, sql: &str) -> ExecResult<String> {
        self.run_sql(Some(db), sql)
    }
}

impl ShellExecutor for ScriptedExecutor {
    fn execute_cmd(&self, cmd: &str) -> ExecResult<String> {
        let mut script = self.script.lock();
        script.commands.push(cmd.to_string());
        Self::answer(cmd, script.cmds.get_mut(cmd))
    }
}
