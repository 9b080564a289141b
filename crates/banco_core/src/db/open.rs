//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections.
//! - Resolve `sqlite://` connection strings into a store target.
//! - Create the registered schema before returning a usable connection.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON`.
//! - Returned connections have the schema fully applied.

use super::migrations::apply_schema;
use super::{DbError, DbResult};
use crate::schema::Schema;
use log::{error, info};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

const SQLITE_URL_PREFIX: &str = "sqlite://";

/// Where a connection string points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreTarget {
    /// Ephemeral store that lives as long as the connection.
    Memory,
    File(PathBuf),
}

impl StoreTarget {
    /// Parses `sqlite://` (memory) or `sqlite:///<path>` (file).
    ///
    /// # Errors
    /// - `UnsupportedUrl` for any other scheme.
    pub fn parse(url: &str) -> DbResult<Self> {
        let rest = url
            .trim()
            .strip_prefix(SQLITE_URL_PREFIX)
            .ok_or_else(|| DbError::UnsupportedUrl(url.to_string()))?;

        match rest.strip_prefix('/') {
            None if rest.is_empty() => Ok(Self::Memory),
            Some(":memory:") => Ok(Self::Memory),
            Some(path) if !path.is_empty() => Ok(Self::File(PathBuf::from(path))),
            _ => Err(DbError::UnsupportedUrl(url.to_string())),
        }
    }

    fn mode(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::File(_) => "file",
        }
    }
}

/// Opens the store named by a `sqlite://` connection string.
pub fn open_url(url: &str, schema: &Schema) -> DbResult<Connection> {
    match StoreTarget::parse(url)? {
        StoreTarget::Memory => open_db_in_memory(schema),
        StoreTarget::File(path) => open_db(path, schema),
    }
}

/// Opens a SQLite database file and creates the schema when missing.
///
/// # Side effects
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>, schema: &Schema) -> DbResult<Connection> {
    let target = StoreTarget::File(path.as_ref().to_path_buf());
    open_target(&target, schema, || Connection::open(path))
}

/// Opens a fresh in-memory database and creates the schema.
///
/// The data disappears when the returned connection is dropped.
pub fn open_db_in_memory(schema: &Schema) -> DbResult<Connection> {
    open_target(&StoreTarget::Memory, schema, Connection::open_in_memory)
}

fn open_target(
    target: &StoreTarget,
    schema: &Schema,
    connect: impl FnOnce() -> rusqlite::Result<Connection>,
) -> DbResult<Connection> {
    let started_at = Instant::now();
    let mode = target.mode();
    info!("event=db_open module=db status=start mode={mode}");

    let mut conn = match connect() {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={} duration_ms={} error_code=db_open_failed error={}",
                mode,
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    match bootstrap_connection(&mut conn, schema) {
        Ok(()) => {
            info!(
                "event=db_open module=db status=ok mode={} duration_ms={}",
                mode,
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={} duration_ms={} error_code=db_bootstrap_failed error={}",
                mode,
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn bootstrap_connection(conn: &mut Connection, schema: &Schema) -> DbResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_secs(5))?;
    apply_schema(conn, schema)?;
    Ok(())
}
