//! Database fixtures and assertions for black-box tests
//!
//! `MySqlTestHelper` sets up and checks databases, single-column tables and
//! values through a `SqlExecutor`. Every mutating operation re-queries the
//! server afterwards to confirm the change took effect.
//!
//! Any failure aborts the calling test: it is logged and the helper panics.
//! A test must never carry on against state it could not verify, so there
//! is no `Result` to ignore. Nothing is rolled back either; a failed
//! `create_db_table` leaves the database in place.
//!
//! Names and values are spliced into SQL without escaping. They must not
//! contain quotes or newlines.

pub mod error;

use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::exec::{ExecError, SqlExecutor};
use crate::output::has_row_value;

pub use error::{Action, Entity, FixtureError, FixtureResult};

/// Length of the random suffix added by `unique_name`
pub const UNIQUE_SUFFIX_LEN: usize = 6;

/// Idempotent, fail-fast fixtures over a SQL executor
pub struct MySqlTestHelper<E> {
    executor: E,
}

impl<E: SqlExecutor> MySqlTestHelper<E> {
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Create database `db` and verify it exists
    #[track_caller]
    pub fn create_db(&self, db: &str) {
        abort_on_error(self.try_create_db(db))
    }

    /// True if database `db` exists
    #[track_caller]
    pub fn has_db(&self, db: &str) -> bool {
        abort_on_error(self.try_has_db(db))
    }

    /// Drop database `db` if it exists and verify it is gone
    #[track_caller]
    pub fn delete_db(&self, db: &str) {
        abort_on_error(self.try_delete_db(db))
    }

    /// Create `table` in `db` with one `varchar(256)` primary key `column`
    #[track_caller]
    pub fn create_db_table(&self, db: &str, table: &str, column: &str) {
        abort_on_error(self.try_create_db_table(db, table, column))
    }

    /// True if `table` exists in `db`
    #[track_caller]
    pub fn has_db_table(&self, db: &str, table: &str) -> bool {
        abort_on_error(self.try_has_db_table(db, table))
    }

    /// Insert `value` into `column` of `db.table` and verify it is there
    #[track_caller]
    pub fn create_db_table_value(&self, db: &str, table: &str, column: &str, value: &str) {
        abort_on_error(self.try_create_db_table_value(db, table, column, value))
    }

    /// True if some row of `db.table` holds exactly `value` in `column`
    #[track_caller]
    pub fn has_db_table_value(&self, db: &str, table: &str, column: &str, value: &str) -> bool {
        abort_on_error(self.try_has_db_table_value(db, table, column, value))
    }

    /// Recreate `db` from scratch holding `table` with a single row `value`
    ///
    /// An existing `db` is dropped first, so repeated calls always leave
    /// exactly one row behind.
    #[track_caller]
    pub fn ensure_db_table_value(&self, db: &str, table: &str, column: &str, value: &str) {
        abort_on_error(self.try_ensure_db_table_value(db, table, column, value))
    }

    fn try_create_db(&self, db: &str) -> FixtureResult<()> {
        let entity = Entity::database(db);
        self.executor
            .execute_sql(&format!("create database {};", db))
            .map_err(transport(Action::Create, &entity))?;

        if !self.try_has_db(db)? {
            return Err(FixtureError::NotCreated(entity));
        }
        tracing::debug!(db, "Created database");
        Ok(())
    }

    fn try_has_db(&self, db: &str) -> FixtureResult<bool> {
        let out = self
            .executor
            .execute_sql("show databases;")
            .map_err(transport(Action::Check, &Entity::database(db)))?;
        Ok(has_row_value(&out, db))
    }

    fn try_delete_db(&self, db: &str) -> FixtureResult<()> {
        if !self.try_has_db(db)? {
            return Ok(());
        }

        let entity = Entity::database(db);
        self.executor
            .execute_sql(&format!("drop database {};", db))
            .map_err(transport(Action::Delete, &entity))?;

        if self.try_has_db(db)? {
            return Err(FixtureError::NotDeleted(entity));
        }
        tracing::debug!(db, "Dropped database");
        Ok(())
    }

    fn try_create_db_table(&self, db: &str, table: &str, column: &str) -> FixtureResult<()> {
        let entity = Entity::table(db, table);
        let sql = format!(
            "create table {} ({} varchar(256) NOT NULL PRIMARY KEY);",
            table, column
        );
        self.executor
            .execute_sql_for_db(db, &sql)
            .map_err(transport(Action::Create, &entity))?;

        if !self.try_has_db_table(db, table)? {
            return Err(FixtureError::NotCreated(entity));
        }
        tracing::debug!(db, table, "Created table");
        Ok(())
    }

    fn try_has_db_table(&self, db: &str, table: &str) -> FixtureResult<bool> {
        let out = self
            .executor
            .execute_sql_for_db(db, "show tables;")
            .map_err(transport(Action::Check, &Entity::table(db, table)))?;
        Ok(has_row_value(&out, table))
    }

    fn try_create_db_table_value(
        &self,
        db: &str,
        table: &str,
        column: &str,
        value: &str,
    ) -> FixtureResult<()> {
        let entity = Entity::value(db, table, column, value);
        let sql = format!("insert into {} ({}) values(\"{}\");", table, column, value);
        self.executor
            .execute_sql_for_db(db, &sql)
            .map_err(transport(Action::Create, &entity))?;

        if !self.try_has_db_table_value(db, table, column, value)? {
            return Err(FixtureError::NotCreated(entity));
        }
        tracing::debug!(db, table, column, value, "Inserted value");
        Ok(())
    }

    fn try_has_db_table_value(
        &self,
        db: &str,
        table: &str,
        column: &str,
        value: &str,
    ) -> FixtureResult<bool> {
        let out = self
            .executor
            .execute_sql_for_db(db, &format!("select {} from {};", column, table))
            .map_err(transport(
                Action::Check,
                &Entity::value(db, table, column, value),
            ))?;
        Ok(has_row_value(&out, value))
    }

    fn try_ensure_db_table_value(
        &self,
        db: &str,
        table: &str,
        column: &str,
        value: &str,
    ) -> FixtureResult<()> {
        if self.try_has_db(db)? {
            self.try_delete_db(db)?;
        }
        self.try_create_db(db)?;
        self.try_create_db_table(db, table, column)?;
        self.try_create_db_table_value(db, table, column, value)
    }
}

/// `base` followed by an underscore and a random lowercase suffix
///
/// Lets tests sharing one server pick database and table names that do not
/// collide. Work against a single name still has to be serialised.
pub fn unique_name(base: &str) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(UNIQUE_SUFFIX_LEN)
        .map(char::from)
        .collect();
    format!("{}_{}", base, suffix.to_lowercase())
}

fn transport(action: Action, entity: &Entity) -> impl FnOnce(ExecError) -> FixtureError + '_ {
    move |source| FixtureError::Transport {
        action,
        entity: entity.clone(),
        source,
    }
}

#[track_caller]
fn abort_on_error<T>(result: FixtureResult<T>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            tracing::error!(error = %e, "Fixture operation failed");
            panic!("{}", e);
        }
    }
}
