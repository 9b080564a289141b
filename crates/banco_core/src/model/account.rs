//! Account (`Conta`) record and the customer/account relationship.
//!
//! # Invariants
//! - `num` is declared `INTEGER` but seeded with text. SQLite integer
//!   affinity stores numeric text as an integer, so reads accept either
//!   storage class and expose the number as text.
//! - `id_cliente` is nullable in the schema; committed accounts always
//!   carry it.

use crate::model::customer::{Customer, CustomerId};
use crate::model::format_balance;
use crate::repo::{RepoError, RepoResult};
use crate::schema::{ColumnDef, ColumnType, Entity, Relationship, TableDef};
use rusqlite::types::ValueRef;
use rusqlite::Row;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Store-generated account identifier.
pub type AccountId = i64;

/// `Cliente` has many `Conta`; each `Conta` belongs to one `Cliente`.
pub const CUSTOMER_ACCOUNTS: Relationship = Relationship {
    has_many: "contas",
    parent: Customer::TABLE,
    parent_key: "id",
    belongs_to: "cliente",
    child: Account::TABLE,
    foreign_key: "id_cliente",
};

/// Persisted account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    /// Free-form label such as "Conta Corrente".
    pub kind: String,
    pub branch: String,
    pub number: String,
    pub balance: f64,
    pub customer_id: Option<CustomerId>,
}

impl Display for Account {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Conta('{}', '{}', '{}', '{}', '{}')",
            self.id,
            self.kind,
            self.branch,
            self.number,
            format_balance(self.balance)
        )
    }
}

impl Entity for Account {
    const TABLE: &'static str = "Conta";

    fn table_def() -> TableDef {
        TableDef::new(
            Self::TABLE,
            vec![
                ColumnDef::primary_key("id"),
                ColumnDef::new("tipo", ColumnType::Text { max_len: None }),
                ColumnDef::new("agencia", ColumnType::Text { max_len: None }),
                ColumnDef::new("num", ColumnType::Integer),
                ColumnDef::new("saldo", ColumnType::Float),
                ColumnDef::new("id_cliente", ColumnType::Integer)
                    .references(Customer::TABLE, "id"),
            ],
        )
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        Ok(Self {
            id: row.get("id")?,
            kind: row.get("tipo")?,
            branch: row.get("agencia")?,
            number: account_number(row)?,
            balance: row.get("saldo")?,
            customer_id: row.get("id_cliente")?,
        })
    }
}

fn account_number(row: &Row<'_>) -> RepoResult<String> {
    match row.get_ref("num")? {
        ValueRef::Integer(value) => Ok(value.to_string()),
        ValueRef::Text(bytes) => std::str::from_utf8(bytes)
            .map(str::to_string)
            .map_err(|_| RepoError::InvalidData("non-UTF-8 text in Conta.num".to_string())),
        ValueRef::Real(value) => Ok(value.to_string()),
        ValueRef::Null => Err(RepoError::InvalidData("missing Conta.num".to_string())),
        ValueRef::Blob(_) => Err(RepoError::InvalidData("blob value in Conta.num".to_string())),
    }
}

/// Unsaved account attached to a `CustomerDraft`.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountDraft {
    pub kind: String,
    pub branch: String,
    /// Bound as text against the integer `num` column.
    pub number: String,
    pub balance: f64,
}

impl AccountDraft {
    pub fn new(
        kind: impl Into<String>,
        branch: impl Into<String>,
        number: impl Into<String>,
        balance: f64,
    ) -> Self {
        Self {
            kind: kind.into(),
            branch: branch.into(),
            number: number.into(),
            balance,
        }
    }
}

/// Projection row of the account/owner join.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceRow {
    pub customer_name: String,
    pub balance: f64,
    pub kind: String,
}

impl Display for BalanceRow {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Nome: {}, Saldo: {}, Tipo de Conta {}",
            self.customer_name,
            format_balance(self.balance),
            self.kind
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{Account, BalanceRow};

    #[test]
    fn account_display_quotes_every_field() {
        let account = Account {
            id: 2,
            kind: "Conta Poupança".to_string(),
            branch: "0013".to_string(),
            number: "136564".to_string(),
            balance: 2467.23,
            customer_id: Some(2),
        };
        assert_eq!(
            account.to_string(),
            "Conta('2', 'Conta Poupança', '0013', '136564', '2467.23')"
        );
    }

    #[test]
    fn balance_row_display_matches_report_line() {
        let row = BalanceRow {
            customer_name: "Rafael Ribeiro".to_string(),
            balance: 1000.23,
            kind: "Conta Corrente".to_string(),
        };
        assert_eq!(
            row.to_string(),
            "Nome: Rafael Ribeiro, Saldo: 1000.23, Tipo de Conta Conta Corrente"
        );
    }
}
