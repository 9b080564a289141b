//! Report use-case service.
//!
//! # Responsibility
//! - Run the three read-only report queries against seeded data.
//! - Render results as three blocks of text lines.
//!
//! # Invariants
//! - Queries never write.
//! - Blocks are rendered in order: customers, accounts, balances.

use crate::model::account::{Account, BalanceRow};
use crate::model::customer::Customer;
use crate::repo::account_repo::AccountRepository;
use crate::repo::customer_repo::CustomerRepository;
use crate::repo::RepoResult;
use log::info;
use serde::Serialize;
use std::io::{self, Write};
use std::time::Instant;

/// Customer names selected by the default report.
pub const REPORT_CUSTOMER_NAMES: [&str; 2] = ["Rafael Ribeiro", "Carlos Roberto"];
/// Account types selected by the default report.
pub const REPORT_ACCOUNT_TYPES: [&str; 2] = ["Conta Corrente", "Conta Poupança"];

/// Results of one report run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub customers: Vec<Customer>,
    pub accounts: Vec<Account>,
    pub balances: Vec<BalanceRow>,
}

impl Report {
    /// Returns every output line in block order.
    pub fn lines(&self) -> Vec<String> {
        self.customers
            .iter()
            .map(ToString::to_string)
            .chain(self.accounts.iter().map(ToString::to_string))
            .chain(self.balances.iter().map(ToString::to_string))
            .collect()
    }

    /// Writes one line per record to `out`.
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for line in self.lines() {
            writeln!(out, "{line}")?;
        }
        out.flush()
    }
}

/// Use-case service over customer and account repositories.
pub struct ReportService<C: CustomerRepository, A: AccountRepository> {
    customers: C,
    accounts: A,
}

impl<C: CustomerRepository, A: AccountRepository> ReportService<C, A> {
    pub fn new(customers: C, accounts: A) -> Self {
        Self {
            customers,
            accounts,
        }
    }

    /// Runs the report with the default name and type sets.
    pub fn run(&self) -> RepoResult<Report> {
        self.run_with(&REPORT_CUSTOMER_NAMES, &REPORT_ACCOUNT_TYPES)
    }

    /// Runs the report for caller-provided name and type sets.
    pub fn run_with(&self, names: &[&str], kinds: &[&str]) -> RepoResult<Report> {
        let started_at = Instant::now();
        let customers = self.customers.find_by_names(names)?;
        log_query("customers_by_name", customers.len(), started_at);

        let started_at = Instant::now();
        let accounts = self.accounts.find_by_types(kinds)?;
        log_query("accounts_by_type", accounts.len(), started_at);

        let started_at = Instant::now();
        let balances = self.accounts.balance_rows()?;
        log_query("balances_by_owner", balances.len(), started_at);

        Ok(Report {
            customers,
            accounts,
            balances,
        })
    }
}

fn log_query(name: &str, rows: usize, started_at: Instant) {
    info!(
        "event=query module=report status=ok name={} rows={} duration_ms={}",
        name,
        rows,
        started_at.elapsed().as_millis()
    );
}
