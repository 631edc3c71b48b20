//! Display formatting for terminal output
//!
//! Fixed-width text tables for the `ledger` binary.

pub mod account;
pub mod budget;
pub mod transaction;

pub use account::format_account_table;
pub use budget::format_budget_table;
pub use transaction::{format_transaction_page, format_transaction_row};
