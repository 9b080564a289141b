//! Versioned schema creation.
//!
//! # Responsibility
//! - Create every registered table on a fresh database in one transaction.
//! - Leave databases already at the current version untouched.
//!
//! # Invariants
//! - Applied version is mirrored to `PRAGMA user_version`.
//! - Databases stamped with a newer version are rejected, never downgraded.

use crate::db::{DbError, DbResult};
use crate::schema::Schema;
use log::info;
use rusqlite::Connection;
use std::time::Instant;

/// Version stamped after `create_all` succeeds.
pub const SCHEMA_VERSION: u32 = 1;

/// Returns the latest schema version known by this binary.
pub fn latest_version() -> u32 {
    SCHEMA_VERSION
}

/// Creates all tables of `schema` unless the database is already current.
pub fn apply_schema(conn: &mut Connection, schema: &Schema) -> DbResult<()> {
    let current_version = current_user_version(conn)?;
    let latest = latest_version();

    if current_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current_version,
            latest_supported: latest,
        });
    }

    if current_version == latest {
        return Ok(());
    }

    let started_at = Instant::now();
    let tx = conn.transaction()?;
    for statement in schema.create_statements() {
        tx.execute_batch(&statement)?;
    }
    tx.execute_batch(&format!("PRAGMA user_version = {latest};"))?;
    tx.commit()?;

    info!(
        "event=schema_create module=db status=ok tables={} version={} duration_ms={}",
        schema.tables().len(),
        latest,
        started_at.elapsed().as_millis()
    );
    Ok(())
}

fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
