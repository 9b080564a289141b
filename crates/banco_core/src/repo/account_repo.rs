//! Account repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Read accounts by id or by a set of type labels.
//! - Answer the child-side `cliente` navigation and the owner/balance
//!   projection through the declared relationship.
//!
//! # Invariants
//! - The balance projection is an inner join: accounts without an owner are
//!   not reported.

use crate::model::account::{Account, AccountId, BalanceRow, CUSTOMER_ACCOUNTS};
use crate::model::customer::Customer;
use crate::repo::customer_repo::{CustomerRepository, SqliteCustomerRepository};
use crate::repo::{in_placeholders, query_entities, RepoError, RepoResult};
use crate::schema::{quote_ident, Entity};
use rusqlite::{params_from_iter, Connection};

/// Repository interface for account reads.
pub trait AccountRepository {
    fn get_account(&self, id: AccountId) -> RepoResult<Option<Account>>;
    /// Returns accounts whose type label is one of `kinds`. Empty input
    /// yields an empty result.
    fn find_by_types(&self, kinds: &[&str]) -> RepoResult<Vec<Account>>;
    /// Resolves the customer that owns `account`.
    ///
    /// Returns `Ok(None)` for an account without a foreign key.
    fn owner_of(&self, account: &Account) -> RepoResult<Option<Customer>>;
    /// Projects `(customer name, balance, type)` for every owned account.
    fn balance_rows(&self) -> RepoResult<Vec<BalanceRow>>;
}

/// SQLite-backed account repository.
pub struct SqliteAccountRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAccountRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl AccountRepository for SqliteAccountRepository<'_> {
    fn get_account(&self, id: AccountId) -> RepoResult<Option<Account>> {
        let sql = format!("{} WHERE \"id\" = ?1;", account_select_sql());
        let mut found = query_entities::<Account, _>(self.conn, &sql, [id])?;
        Ok(found.pop())
    }

    fn find_by_types(&self, kinds: &[&str]) -> RepoResult<Vec<Account>> {
        if kinds.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "{} WHERE \"tipo\" IN ({}) ORDER BY \"id\" ASC;",
            account_select_sql(),
            in_placeholders(kinds.len())
        );
        query_entities(self.conn, &sql, params_from_iter(kinds.iter()))
    }

    fn owner_of(&self, account: &Account) -> RepoResult<Option<Customer>> {
        let Some(customer_id) = account.customer_id else {
            return Ok(None);
        };

        // The foreign key guarantees the parent row exists.
        match SqliteCustomerRepository::new(self.conn).get_customer(customer_id)? {
            Some(customer) => Ok(Some(customer)),
            None => Err(RepoError::NotFound {
                table: Customer::TABLE,
                id: customer_id,
            }),
        }
    }

    fn balance_rows(&self) -> RepoResult<Vec<BalanceRow>> {
        let sql = format!(
            "SELECT
                {parent}.\"nome\" AS nome,
                {child}.\"saldo\" AS saldo,
                {child}.\"tipo\" AS tipo
             FROM {child}
             {join}
             ORDER BY {child}.\"id\" ASC;",
            parent = quote_ident(CUSTOMER_ACCOUNTS.parent),
            child = quote_ident(CUSTOMER_ACCOUNTS.child),
            join = CUSTOMER_ACCOUNTS.join_parent_sql(),
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([])?;
        let mut balances = Vec::new();
        while let Some(row) = rows.next()? {
            balances.push(BalanceRow {
                customer_name: row.get("nome")?,
                balance: row.get("saldo")?,
                kind: row.get("tipo")?,
            });
        }

        Ok(balances)
    }
}

pub(crate) fn account_select_sql() -> String {
    format!(
        "SELECT \"id\", \"tipo\", \"agencia\", \"num\", \"saldo\", \"id_cliente\" FROM {}",
        quote_ident(Account::TABLE)
    )
}
