//! Repository layer contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define read-side data access for customers and accounts.
//! - Isolate SQLite query details from report orchestration.
//!
//! # Invariants
//! - Navigation between customers and accounts always goes through the
//!   `Conta.id_cliente` foreign key; nothing caches the link in memory.
//! - Repository APIs return semantic errors (`NotFound`, `InvalidData`) in
//!   addition to DB transport errors.

use crate::db::DbError;
use crate::schema::Entity;
use rusqlite::{Connection, Params};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod account_repo;
pub mod customer_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for record persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound { table: &'static str, id: i64 },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { table, id } => write!(f, "{table} row not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound { .. } | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Builds `?, ?, ...` for an `IN (...)` list of `count` values.
pub(crate) fn in_placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

/// Runs `sql` and decodes every row as `E`.
pub(crate) fn query_entities<E: Entity, P: Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> RepoResult<Vec<E>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params)?;
    let mut items = Vec::new();
    while let Some(row) = rows.next()? {
        items.push(E::from_row(row)?);
    }
    Ok(items)
}
