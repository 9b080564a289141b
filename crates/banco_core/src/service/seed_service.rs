//! Seed use-case service.
//!
//! # Responsibility
//! - Provide the fixed sample customers and accounts.
//! - Persist drafts through one scoped `Session` and a single commit.

use crate::model::account::AccountDraft;
use crate::model::customer::{CustomerDraft, CustomerWithAccounts};
use crate::repo::RepoResult;
use crate::session::Session;
use rusqlite::Connection;

/// Returns the two sample customers, each with one account.
pub fn sample_customers() -> Vec<CustomerDraft> {
    vec![
        CustomerDraft::new("Rafael Ribeiro", "657438674", "Belo Horizonte/MG").with_account(
            AccountDraft::new("Conta Corrente", "0001", "876564", 1000.23),
        ),
        CustomerDraft::new("Carlos Roberto", "657435632", "Pará de Minas/MG").with_account(
            AccountDraft::new("Conta Poupança", "0013", "136564", 2467.23),
        ),
    ]
}

/// Persists `drafts` atomically and returns the stored records.
///
/// The session is released when this function returns, whether or not the
/// commit succeeded.
pub fn seed(
    conn: &mut Connection,
    drafts: impl IntoIterator<Item = CustomerDraft>,
) -> RepoResult<Vec<CustomerWithAccounts>> {
    let mut session = Session::new(conn);
    session.add_all(drafts);
    session.commit()
}

/// Persists `sample_customers()`.
pub fn seed_sample_data(conn: &mut Connection) -> RepoResult<Vec<CustomerWithAccounts>> {
    seed(conn, sample_customers())
}
