//! Unit of work that persists customer drafts with their accounts.
//!
//! # Responsibility
//! - Collect `CustomerDraft`s in memory until an explicit commit.
//! - Translate each draft into parent and child inserts inside one
//!   transaction, wiring `Conta.id_cliente` from the generated parent id.
//!
//! # Invariants
//! - A commit is all-or-nothing: any failed insert rolls back every row.
//! - A session holds the connection exclusively and releases it on drop;
//!   drafts still pending at that point are discarded.

use crate::model::account::Account;
use crate::model::customer::{Customer, CustomerDraft, CustomerWithAccounts};
use crate::repo::customer_repo::{CustomerRepository, SqliteCustomerRepository};
use crate::repo::{RepoError, RepoResult};
use crate::schema::{quote_ident, Entity};
use log::{debug, error, info};
use rusqlite::{params, Connection, Transaction, TransactionBehavior};
use std::time::Instant;

/// Scoped unit of work over one connection.
pub struct Session<'conn> {
    conn: &'conn mut Connection,
    pending: Vec<CustomerDraft>,
}

impl<'conn> Session<'conn> {
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self {
            conn,
            pending: Vec::new(),
        }
    }

    /// Stages one customer and its accounts.
    pub fn add(&mut self, draft: CustomerDraft) {
        self.pending.push(draft);
    }

    pub fn add_all(&mut self, drafts: impl IntoIterator<Item = CustomerDraft>) {
        self.pending.extend(drafts);
    }

    /// Drafts staged since the last successful commit.
    pub fn pending(&self) -> &[CustomerDraft] {
        &self.pending
    }

    /// Persists every staged draft in a single transaction.
    ///
    /// Returns the stored records as read back inside the transaction, in
    /// staging order. On error nothing is written and the drafts stay staged.
    pub fn commit(&mut self) -> RepoResult<Vec<CustomerWithAccounts>> {
        if self.pending.is_empty() {
            return Ok(Vec::new());
        }

        let started_at = Instant::now();
        let result = insert_all(self.conn, &self.pending);
        match result {
            Ok(persisted) => {
                let accounts: usize = persisted.iter().map(|item| item.accounts.len()).sum();
                info!(
                    "event=session_commit module=session status=ok customers={} accounts={} duration_ms={}",
                    persisted.len(),
                    accounts,
                    started_at.elapsed().as_millis()
                );
                self.pending.clear();
                Ok(persisted)
            }
            Err(err) => {
                error!(
                    "event=session_commit module=session status=error customers={} duration_ms={} error={}",
                    self.pending.len(),
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }
}

impl Drop for Session<'_> {
    fn drop(&mut self) {
        if !self.pending.is_empty() {
            debug!(
                "event=session_close module=session status=discarded pending={}",
                self.pending.len()
            );
        }
    }
}

fn insert_all(
    conn: &mut Connection,
    drafts: &[CustomerDraft],
) -> RepoResult<Vec<CustomerWithAccounts>> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let mut customer_ids = Vec::with_capacity(drafts.len());
    for draft in drafts {
        customer_ids.push(insert_customer(&tx, draft)?);
    }

    let persisted = {
        let repo = SqliteCustomerRepository::new(&tx);
        let mut persisted = Vec::with_capacity(customer_ids.len());
        for id in customer_ids {
            let customer = repo.get_customer(id)?.ok_or(RepoError::NotFound {
                table: Customer::TABLE,
                id,
            })?;
            let accounts = repo.accounts_of(id)?;
            persisted.push(CustomerWithAccounts { customer, accounts });
        }
        persisted
    };

    tx.commit()?;
    Ok(persisted)
}

fn insert_customer(tx: &Transaction<'_>, draft: &CustomerDraft) -> RepoResult<i64> {
    tx.execute(
        &format!(
            "INSERT INTO {} (\"nome\", \"cpf\", \"endereco\") VALUES (?1, ?2, ?3);",
            quote_ident(Customer::TABLE)
        ),
        params![draft.name, draft.cpf, draft.address],
    )?;
    let customer_id = tx.last_insert_rowid();

    let account_sql = format!(
        "INSERT INTO {} (\"tipo\", \"agencia\", \"num\", \"saldo\", \"id_cliente\")
         VALUES (?1, ?2, ?3, ?4, ?5);",
        quote_ident(Account::TABLE)
    );
    for account in &draft.accounts {
        tx.execute(
            &account_sql,
            params![
                account.kind,
                account.branch,
                account.number,
                account.balance,
                customer_id
            ],
        )?;
    }

    Ok(customer_id)
}
