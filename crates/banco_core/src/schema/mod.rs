//! Explicit schema registry for mapped record types.
//!
//! # Responsibility
//! - Collect table declarations from `Entity` implementations.
//! - Validate foreign keys and named relationships at registration time.
//! - Produce the DDL applied by store bootstrap.
//!
//! # Invariants
//! - A registry is a plain value owned by the caller; there is no
//!   process-wide metadata, so independent schemas never share state.
//! - Table names are unique (case-insensitive, like SQLite).
//! - Tables are created in registration order, parents before children.

use crate::repo::RepoResult;
use rusqlite::Row;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod table;

pub use table::{quote_ident, ColumnDef, ColumnType, ForeignKey, TableDef};

pub type SchemaResult<T> = Result<T, SchemaError>;

/// Registration-time schema conflicts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    DuplicateTable(String),
    UnknownTable(String),
    UnknownColumn { table: String, column: String },
    /// Foreign key or relationship does not point at a valid key column.
    InvalidForeignKey { table: String, column: String },
}

impl Display for SchemaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateTable(name) => write!(f, "table `{name}` is already registered"),
            Self::UnknownTable(name) => write!(f, "table `{name}` is not registered"),
            Self::UnknownColumn { table, column } => {
                write!(f, "column `{column}` does not exist on table `{table}`")
            }
            Self::InvalidForeignKey { table, column } => {
                write!(f, "invalid foreign key `{table}.{column}`")
            }
        }
    }
}

impl Error for SchemaError {}

/// A record type whose fields double as column declarations.
pub trait Entity: Sized {
    /// Table the entity is mapped to.
    const TABLE: &'static str;

    /// Column declarations for `TABLE`.
    fn table_def() -> TableDef;

    /// Decodes one row selected with this entity's columns.
    fn from_row(row: &Row<'_>) -> RepoResult<Self>;
}

/// Named one-to-many link derived from a child foreign key.
///
/// The foreign key is the only stored state; both navigation directions are
/// answered by queries built from this declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relationship {
    /// Parent-side navigation name ("has many").
    pub has_many: &'static str,
    pub parent: &'static str,
    pub parent_key: &'static str,
    /// Child-side navigation name ("belongs to").
    pub belongs_to: &'static str,
    pub child: &'static str,
    pub foreign_key: &'static str,
}

impl Relationship {
    /// Renders the child-to-parent join used by projection queries.
    pub fn join_parent_sql(&self) -> String {
        format!(
            "INNER JOIN {parent} ON {parent}.{key} = {child}.{fk}",
            parent = quote_ident(self.parent),
            key = quote_ident(self.parent_key),
            child = quote_ident(self.child),
            fk = quote_ident(self.foreign_key),
        )
    }
}

/// Registry of tables and relationships for one database.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    tables: Vec<TableDef>,
    relationships: Vec<Relationship>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the table declared by `E`.
    pub fn register<E: Entity>(&mut self) -> SchemaResult<&mut Self> {
        self.register_table(E::table_def())
    }

    /// Registers one table declaration.
    ///
    /// # Errors
    /// - `DuplicateTable` when the name is already taken.
    /// - `UnknownTable`/`InvalidForeignKey` when a foreign key points at a
    ///   table that is not registered yet or at a non-key column.
    pub fn register_table(&mut self, table: TableDef) -> SchemaResult<&mut Self> {
        if self.table(table.name).is_some() {
            return Err(SchemaError::DuplicateTable(table.name.to_string()));
        }

        for (column, fk) in table.foreign_keys() {
            let target = if fk.table.eq_ignore_ascii_case(table.name) {
                &table
            } else {
                self.table(fk.table)
                    .ok_or_else(|| SchemaError::UnknownTable(fk.table.to_string()))?
            };
            if target.primary_key().map(|pk| pk.name) != Some(fk.column) {
                return Err(SchemaError::InvalidForeignKey {
                    table: table.name.to_string(),
                    column: column.name.to_string(),
                });
            }
        }

        self.tables.push(table);
        Ok(self)
    }

    /// Declares a named parent/child relationship.
    ///
    /// The child's `foreign_key` column must already reference the parent's
    /// `parent_key`.
    pub fn relate(&mut self, relationship: Relationship) -> SchemaResult<&mut Self> {
        let parent = self
            .table(relationship.parent)
            .ok_or_else(|| SchemaError::UnknownTable(relationship.parent.to_string()))?;
        if parent.column(relationship.parent_key).is_none() {
            return Err(SchemaError::UnknownColumn {
                table: relationship.parent.to_string(),
                column: relationship.parent_key.to_string(),
            });
        }

        let child = self
            .table(relationship.child)
            .ok_or_else(|| SchemaError::UnknownTable(relationship.child.to_string()))?;
        let fk_column = child.column(relationship.foreign_key).ok_or_else(|| {
            SchemaError::UnknownColumn {
                table: relationship.child.to_string(),
                column: relationship.foreign_key.to_string(),
            }
        })?;

        let points_at_parent = fk_column.references.is_some_and(|fk| {
            fk.table.eq_ignore_ascii_case(relationship.parent)
                && fk.column == relationship.parent_key
        });
        if !points_at_parent {
            return Err(SchemaError::InvalidForeignKey {
                table: relationship.child.to_string(),
                column: relationship.foreign_key.to_string(),
            });
        }

        self.relationships.push(relationship);
        Ok(self)
    }

    pub fn tables(&self) -> &[TableDef] {
        &self.tables
    }

    /// Looks up a table by name, ignoring ASCII case.
    pub fn table(&self, name: &str) -> Option<&TableDef> {
        self.tables
            .iter()
            .find(|table| table.name.eq_ignore_ascii_case(name))
    }

    /// Looks up a relationship by either of its navigation names.
    pub fn relationship(&self, name: &str) -> Option<&Relationship> {
        self.relationships
            .iter()
            .find(|rel| rel.has_many == name || rel.belongs_to == name)
    }

    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    /// Returns one `CREATE TABLE IF NOT EXISTS` statement per table.
    pub fn create_statements(&self) -> Vec<String> {
        self.tables.iter().map(TableDef::create_sql).collect()
    }
}
