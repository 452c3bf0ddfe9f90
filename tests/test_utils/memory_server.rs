//! In-memory stand-in for the database container.
//!
//! Answers the statements `MySqlTestHelper` issues the way the `mysql`
//! client prints them in batch mode: a header line followed by one line per
//! row, and nothing at all for an empty result. It only recognises the
//! exact statement shapes the helper emits.

use std::collections::{BTreeMap, BTreeSet};

use parking_lot::Mutex;
use podsql::exec::{ExecError, ExecResult, ShellExecutor, SqlExecutor};

type Table = (String, Vec<String>); // (column, rows)

#[derive(Default)]
struct ServerState {
    databases: BTreeMap<String, BTreeMap<String, Table>>,
    env: BTreeMap<String, String>,
    statements: Vec<String>,
    fail_matching: Option<String>,
    ignore_writes: bool,
}

/// Simulated database server reachable only through executor calls.
#[derive(Default)]
pub struct MemoryServer {
    state: Mutex<ServerState>,
}

impl MemoryServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expose `name=value` in the container environment.
    pub fn with_env(self, name: &str, value: &str) -> Self {
        self.state
            .lock()
            .env
            .insert(name.to_string(), value.to_string());
        self
    }

    /// Fail every statement containing `fragment` as a broken transport would.
    pub fn fail_statements_containing(&self, fragment: &str) {
        self.state.lock().fail_matching = Some(fragment.to_string());
    }

    /// Accept writes without applying them.
    pub fn ignore_writes(&self) {
        self.state.lock().ignore_writes = true;
    }

    /// Every statement received, in order.
    pub fn statements(&self) -> Vec<String> {
        self.state.lock().statements.clone()
    }

    /// Statements other than `show` and `select`.
    pub fn writes(&self) -> Vec<String> {
        self.statements()
            .into_iter()
            .filter(|s| !s.starts_with("show") && !s.starts_with("select"))
            .collect()
    }

    /// Rows currently stored in `db.table`.
    pub fn rows(&self, db: &str, table: &str) -> Vec<String> {
        self.state
            .lock()
            .databases
            .get(db)
            .and_then(|tables| tables.get(table))
            .map(|(_, rows)| rows.clone())
            .unwrap_or_default()
    }

    fn execute(&self, db: Option<&str>, sql: &str) -> ExecResult<String> {
        let mut state = self.state.lock();
        state.statements.push(sql.to_string());

        if let Some(ref fragment) = state.fail_matching {
            if sql.contains(fragment.as_str()) {
                return Err(failure(
                    sql,
                    "error: unable to upgrade connection: container not found (\"mysql\")",
                ));
            }
        }

        match db {
            None => Self::server_statement(&mut state, sql),
            Some(db) => Self::database_statement(&mut state, db, sql),
        }
    }

    fn server_statement(state: &mut ServerState, sql: &str) -> ExecResult<String> {
        if sql == "show databases;" {
            return Ok(listing("Database", state.databases.keys()));
        }

        if let Some(name) = statement_arg(sql, "create database ") {
            if state.databases.contains_key(name) {
                return Err(failure(
                    sql,
                    &format!("ERROR 1007 (HY000) at line 1: Can't create database '{name}'; database exists"),
                ));
            }
            if !state.ignore_writes {
                state.databases.insert(name.to_string(), BTreeMap::new());
            }
            return Ok(String::new());
        }

        if let Some(name) = statement_arg(sql, "drop database ") {
            if !state.databases.contains_key(name) {
                return Err(failure(
                    sql,
                    &format!("ERROR 1008 (HY000) at line 1: Can't drop database '{name}'; database doesn't exist"),
                ));
            }
            if !state.ignore_writes {
                state.databases.remove(name);
            }
            return Ok(String::new());
        }

        Err(syntax_error(sql))
    }

    fn database_statement(state: &mut ServerState, db: &str, sql: &str) -> ExecResult<String> {
        let ignore_writes = state.ignore_writes;
        let Some(tables) = state.databases.get_mut(db) else {
            return Err(failure(
                sql,
                &format!("ERROR 1049 (42000): Unknown database '{db}'"),
            ));
        };

        if sql == "show tables;" {
            return Ok(listing(&format!("Tables_in_{db}"), tables.keys()));
        }

        if let Some(rest) = statement_arg(sql, "create table ") {
            let (table, column) = rest
                .strip_suffix(" varchar(256) NOT NULL PRIMARY KEY)")
                .and_then(|r| r.split_once(" ("))
                .ok_or_else(|| syntax_error(sql))?;
            if tables.contains_key(table) {
                return Err(failure(
                    sql,
                    &format!("ERROR 1050 (42S01) at line 1: Table '{table}' already exists"),
                ));
            }
            if !ignore_writes {
                tables.insert(table.to_string(), (column.to_string(), Vec::new()));
            }
            return Ok(String::new());
        }

        if let Some(rest) = statement_arg(sql, "insert into ") {
            let (target, value) = rest
                .strip_suffix("\")")
                .and_then(|r| r.split_once(" values(\""))
                .ok_or_else(|| syntax_error(sql))?;
            let (table, column) = target
                .strip_suffix(')')
                .and_then(|t| t.split_once(" ("))
                .ok_or_else(|| syntax_error(sql))?;
            let (table_column, rows) = tables
                .get_mut(table)
                .ok_or_else(|| missing_table(sql, db, table))?;
            if table_column != column {
                return Err(unknown_column(sql, column));
            }
            if rows.iter().any(|r| r == value) {
                return Err(failure(
                    sql,
                    &format!("ERROR 1062 (23000) at line 1: Duplicate entry '{value}' for key 'PRIMARY'"),
                ));
            }
            if !ignore_writes {
                rows.push(value.to_string());
            }
            return Ok(String::new());
        }

        if let Some(rest) = statement_arg(sql, "select ") {
            let (column, table) = rest.split_once(" from ").ok_or_else(|| syntax_error(sql))?;
            let (table_column, rows) = tables
                .get(table)
                .ok_or_else(|| missing_table(sql, db, table))?;
            if table_column != column {
                return Err(unknown_column(sql, column));
            }
            return Ok(listing(column, rows.iter()));
        }

        Err(syntax_error(sql))
    }
}

impl SqlExecutor for MemoryServer {
    fn execute_sql(&self, sql: &str) -> ExecResult<String> {
        self.execute(None, sql)
    }

    fn execute_sql_for_db(&self, db: &str, sql: &str) -> ExecResult<String> {
        self.execute(Some(db), sql)
    }
}

impl ShellExecutor for MemoryServer {
    fn execute_cmd(&self, cmd: &str) -> ExecResult<String> {
        let state = self.state.lock();
        let pattern = cmd
            .strip_prefix("env | grep ")
            .ok_or_else(|| failure(cmd, &format!("bash: {cmd}: command not found")))?;

        let matched: String = state
            .env
            .iter()
            .map(|(k, v)| format!("{k}={v}\n"))
            .filter(|line| line.contains(pattern))
            .collect();
        if matched.is_empty() {
            // grep exits 1 without output when nothing matches
            return Err(failure(cmd, ""));
        }
        Ok(matched)
    }
}

/// `sql` minus `prefix` and the trailing `;`.
fn statement_arg<'a>(sql: &'a str, prefix: &str) -> Option<&'a str> {
    sql.strip_prefix(prefix)?.strip_suffix(';')
}

fn listing<'a>(header: &str, rows: impl Iterator<Item = &'a String>) -> String {
    let body: String = rows.map(|r| format!("{r}\n")).collect();
    if body.is_empty() {
        body
    } else {
        format!("{header}\n{body}")
    }
}

fn failure(command: &str, output: &str) -> ExecError {
    ExecError::NonZeroExit {
        command: command.to_string(),
        code: Some(1),
        output: if output.is_empty() {
            String::new()
        } else {
            format!("{output}\n")
        },
    }
}

fn syntax_error(sql: &str) -> ExecError {
    failure(
        sql,
        "ERROR 1064 (42000) at line 1: You have an error in your SQL syntax",
    )
}

fn missing_table(sql: &str, db: &str, table: &str) -> ExecError {
    failure(
        sql,
        &format!("ERROR 1146 (42S02) at line 1: Table '{db}.{table}' doesn't exist"),
    )
}

fn unknown_column(sql: &str, column: &str) -> ExecError {
    failure(
        sql,
        &format!("ERROR 1054 (42S22) at line 1: Unknown column '{column}' in 'field list'"),
    )
}
