//! Customer repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Read customers by id or by a set of exact names.
//! - Answer the parent-side `contas` navigation by querying the foreign key.

use crate::model::account::{Account, CUSTOMER_ACCOUNTS};
use crate::model::customer::{Customer, CustomerId};
use crate::repo::account_repo::account_select_sql;
use crate::repo::{in_placeholders, query_entities, RepoResult};
use crate::schema::{quote_ident, Entity};
use rusqlite::{params_from_iter, Connection};

/// Repository interface for customer reads.
pub trait CustomerRepository {
    fn get_customer(&self, id: CustomerId) -> RepoResult<Option<Customer>>;
    /// Returns customers whose name is one of `names`. Empty input yields an
    /// empty result.
    fn find_by_names(&self, names: &[&str]) -> RepoResult<Vec<Customer>>;
    /// Returns every account whose foreign key points at `id`.
    fn accounts_of(&self, id: CustomerId) -> RepoResult<Vec<Account>>;
}

/// SQLite-backed customer repository.
pub struct SqliteCustomerRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCustomerRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl CustomerRepository for SqliteCustomerRepository<'_> {
    fn get_customer(&self, id: CustomerId) -> RepoResult<Option<Customer>> {
        let sql = format!("{} WHERE \"id\" = ?1;", customer_select_sql());
        let mut found = query_entities::<Customer, _>(self.conn, &sql, [id])?;
        Ok(found.pop())
    }

    fn find_by_names(&self, names: &[&str]) -> RepoResult<Vec<Customer>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "{} WHERE \"nome\" IN ({}) ORDER BY \"id\" ASC;",
            customer_select_sql(),
            in_placeholders(names.len())
        );
        query_entities(self.conn, &sql, params_from_iter(names.iter()))
    }

    fn accounts_of(&self, id: CustomerId) -> RepoResult<Vec<Account>> {
        let sql = format!(
            "{} WHERE {} = ?1 ORDER BY \"id\" ASC;",
            account_select_sql(),
            quote_ident(CUSTOMER_ACCOUNTS.foreign_key)
        );
        query_entities(self.conn, &sql, [id])
    }
}

pub(crate) fn customer_select_sql() -> String {
    format!(
        "SELECT \"id\", \"nome\", \"cpf\", \"endereco\" FROM {}",
        quote_ident(Customer::TABLE)
    )
}
