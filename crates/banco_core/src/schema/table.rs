//! Table and column declarations plus DDL rendering.
//!
//! # Responsibility
//! - Describe one table as an ordered list of typed columns.
//! - Render `CREATE TABLE IF NOT EXISTS` statements for SQLite.
//!
//! # Invariants
//! - Column order is declaration order; DDL keeps it.
//! - Declared widths (`VARCHAR(n)`) are emitted as-is and are not enforced by
//!   SQLite.

/// Declared storage type for a mapped column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    /// Text column with optional declared width.
    Text { max_len: Option<u32> },
    Float,
}

impl ColumnType {
    /// Returns the SQL type name used in DDL.
    pub fn sql_name(&self) -> String {
        match self {
            Self::Integer => "INTEGER".to_string(),
            Self::Text { max_len: Some(len) } => format!("VARCHAR({len})"),
            Self::Text { max_len: None } => "VARCHAR".to_string(),
            Self::Float => "FLOAT".to_string(),
        }
    }
}

/// Target of a foreign-key column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForeignKey {
    pub table: &'static str,
    pub column: &'static str,
}

/// One mapped column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: &'static str,
    pub kind: ColumnType,
    pub primary_key: bool,
    pub references: Option<ForeignKey>,
}

impl ColumnDef {
    /// Declares a store-generated integer primary key.
    pub const fn primary_key(name: &'static str) -> Self {
        Self {
            name,
            kind: ColumnType::Integer,
            primary_key: true,
            references: None,
        }
    }

    pub const fn new(name: &'static str, kind: ColumnType) -> Self {
        Self {
            name,
            kind,
            primary_key: false,
            references: None,
        }
    }

    /// Marks this column as a foreign key to `table.column`.
    pub const fn references(mut self, table: &'static str, column: &'static str) -> Self {
        self.references = Some(ForeignKey { table, column });
        self
    }

    fn render(&self) -> String {
        let mut sql = format!("{} {}", quote_ident(self.name), self.kind.sql_name());
        if self.primary_key {
            // INTEGER PRIMARY KEY aliases the rowid, so ids are store-generated.
            sql.push_str(" PRIMARY KEY");
        }
        sql
    }
}

/// Declared shape of one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDef {
    pub name: &'static str,
    pub columns: Vec<ColumnDef>,
}

impl TableDef {
    pub fn new(name: &'static str, columns: Vec<ColumnDef>) -> Self {
        Self { name, columns }
    }

    /// Looks up a column by exact name.
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn primary_key(&self) -> Option<&ColumnDef> {
        self.columns.iter().find(|column| column.primary_key)
    }

    /// Iterates over columns that carry a foreign key.
    pub fn foreign_keys(&self) -> impl Iterator<Item = (&ColumnDef, ForeignKey)> {
        self.columns
            .iter()
            .filter_map(|column| column.references.map(|fk| (column, fk)))
    }

    /// Renders an idempotent `CREATE TABLE` statement.
    pub fn create_sql(&self) -> String {
        let mut parts: Vec<String> = self.columns.iter().map(ColumnDef::render).collect();
        for (column, fk) in self.foreign_keys() {
            parts.push(format!(
                "FOREIGN KEY({}) REFERENCES {} ({})",
                quote_ident(column.name),
                quote_ident(fk.table),
                quote_ident(fk.column)
            ));
        }

        format!(
            "CREATE TABLE IF NOT EXISTS {} (\n    {}\n);",
            quote_ident(self.name),
            parts.join(",\n    ")
        )
    }
}

/// Double-quotes an SQL identifier, escaping embedded quotes.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
