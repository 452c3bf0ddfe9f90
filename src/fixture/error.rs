//! Fixture failure types

use std::fmt;

use thiserror::Error;

use crate::exec::ExecError;

/// Database object a fixture operation works on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entity {
    Database {
        db: String,
    },
    Table {
        db: String,
        table: String,
    },
    Value {
        db: String,
        table: String,
        column: String,
        value: String,
    },
}

impl Entity {
    pub fn database(db: &str) -> Self {
        Entity::Database { db: db.to_string() }
    }

    pub fn table(db: &str, table: &str) -> Self {
        Entity::Table {
            db: db.to_string(),
            table: table.to_string(),
        }
    }

    pub fn value(db: &str, table: &str, column: &str, value: &str) -> Self {
        Entity::Value {
            db: db.to_string(),
            table: table.to_string(),
            column: column.to_string(),
            value: value.to_string(),
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::Database { db } => write!(f, "database '{}'", db),
            Entity::Table { db, table } => write!(f, "database table '{}.{}'", db, table),
            Entity::Value {
                db,
                table,
                column,
                value,
            } => write!(f, "value '{}' in '{}.{}.{}'", value, db, table, column),
        }
    }
}

/// What the helper was doing when the transport failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    Check,
    Delete,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Create => write!(f, "creating"),
            Action::Check => write!(f, "checking"),
            Action::Delete => write!(f, "deleting"),
        }
    }
}

/// Reasons a fixture operation aborts the test
#[derive(Error, Debug)]
pub enum FixtureError {
    /// The statement could not be executed
    #[error("Error {action} {entity}: {source}")]
    Transport {
        action: Action,
        entity: Entity,
        #[source]
        source: ExecError,
    },

    /// The statement ran but the object is absent afterwards
    #[error("Error {0} was not created")]
    NotCreated(Entity),

    /// The statement ran but the object is still present afterwards
    #[error("Error {0} was not deleted")]
    NotDeleted(Entity),
}

/// Result type for fixture operations
pub type FixtureResult<T> = Result<T, FixtureError>;
