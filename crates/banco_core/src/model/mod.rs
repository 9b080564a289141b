//! Banking domain model: customers (`Cliente`) and their accounts (`Conta`).
//!
//! # Responsibility
//! - Define persisted records and the in-memory drafts used to seed them.
//! - Declare each record's table through `Entity`.
//!
//! # Invariants
//! - Ids are assigned by the store; drafts never carry one.
//! - `Conta.id_cliente` is the only stored link between the two records.

pub mod account;
pub mod customer;

/// Formats a balance the way float values are printed in reports.
///
/// Integral values keep one decimal (`1000.0`); anything else uses the
/// shortest representation that round-trips (`1000.23`).
pub fn format_balance(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}
