//! Customer (`Cliente`) record.
//!
//! # Invariants
//! - `cpf` is stored as supplied. The column is declared `VARCHAR(9)` but the
//!   width is not enforced, so longer tax ids are kept unchanged.

use crate::model::account::{Account, AccountDraft};
use crate::repo::RepoResult;
use crate::schema::{ColumnDef, ColumnType, Entity, TableDef};
use rusqlite::Row;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Store-generated customer identifier.
pub type CustomerId = i64;

/// Persisted customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    /// Brazilian tax id (CPF).
    pub cpf: String,
    pub address: String,
}

impl Display for Customer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Cliente('{}', '{}', '{}')", self.name, self.cpf, self.address)
    }
}

impl Entity for Customer {
    const TABLE: &'static str = "Cliente";

    fn table_def() -> TableDef {
        TableDef::new(
            Self::TABLE,
            vec![
                ColumnDef::primary_key("id"),
                ColumnDef::new("nome", ColumnType::Text { max_len: None }),
                ColumnDef::new("cpf", ColumnType::Text { max_len: Some(9) }),
                ColumnDef::new("endereco", ColumnType::Text { max_len: None }),
            ],
        )
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("nome")?,
            cpf: row.get("cpf")?,
            address: row.get("endereco")?,
        })
    }
}

/// Unsaved customer with the accounts it will own once committed.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerDraft {
    pub name: String,
    pub cpf: String,
    pub address: String,
    pub accounts: Vec<AccountDraft>,
}

impl CustomerDraft {
    pub fn new(
        name: impl Into<String>,
        cpf: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            cpf: cpf.into(),
            address: address.into(),
            accounts: Vec::new(),
        }
    }

    /// Attaches one account to be inserted under this customer.
    pub fn with_account(mut self, account: AccountDraft) -> Self {
        self.accounts.push(account);
        self
    }
}

/// Customer together with the accounts persisted for it in one commit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerWithAccounts {
    pub customer: Customer,
    pub accounts: Vec<Account>,
}
