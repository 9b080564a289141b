//! Core library for banco: customers, accounts and their SQLite mapping.
//!
//! The flow is linear: build a `Schema`, open a store with it, seed drafts
//! through a `Session`, then read back with the repositories.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod schema;
pub mod service;
pub mod session;

pub use config::AppConfig;
pub use db::{open_db, open_db_in_memory, open_url, DbError, DbResult};
pub use logging::{default_log_level, init_logging, init_logging_from, logging_status};
pub use model::account::{Account, AccountDraft, AccountId, BalanceRow, CUSTOMER_ACCOUNTS};
pub use model::customer::{Customer, CustomerDraft, CustomerId, CustomerWithAccounts};
pub use repo::account_repo::{AccountRepository, SqliteAccountRepository};
pub use repo::customer_repo::{CustomerRepository, SqliteCustomerRepository};
pub use repo::{RepoError, RepoResult};
pub use schema::{Entity, Relationship, Schema, SchemaError, SchemaResult};
pub use service::report_service::{Report, ReportService};
pub use service::seed_service::{sample_customers, seed, seed_sample_data};
pub use session::Session;

/// Builds the registry for `Cliente`, `Conta` and their `contas`/`cliente`
/// relationship.
pub fn banking_schema() -> SchemaResult<Schema> {
    let mut schema = Schema::new();
    schema
        .register::<Customer>()?
        .register::<Account>()?
        .relate(CUSTOMER_ACCOUNTS)?;
    Ok(schema)
}

#[cfg(test)]
mod tests {
    use super::banking_schema;

    #[test]
    fn banking_schema_registers_parent_before_child() {
        let schema = banking_schema().unwrap();
        let names: Vec<_> = schema.tables().iter().map(|table| table.name).collect();
        assert_eq!(names, vec!["Cliente", "Conta"]);
        assert!(schema.relationship("contas").is_some());
        assert!(schema.relationship("cliente").is_some());
    }

    #[test]
    fn cpf_column_keeps_declared_width() {
        let schema = banking_schema().unwrap();
        let ddl = schema.table("Cliente").unwrap().create_sql();
        assert!(ddl.contains("\"cpf\" VARCHAR(9)"));
    }
}
