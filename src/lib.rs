//! Ledger Engine - consistency engine for a personal and business ledger
//!
//! Keeps an in-memory ledger of accounts, categories, transactions, budgets
//! and budget expenses consistent under concurrent commands. Deletes that
//! would orphan a record are blocked, deleting a budget cascades to its
//! expenses, and every budget carries spend and item rollups that always
//! equal the sum of its expenses.
//!
//! # Architecture
//!
//! - `models`: Entity records, ids and the `Money` type
//! - `storage`: In-memory tables keyed by id
//! - `services`: Integrity guard, rollup maintenance, commands and queries
//! - `ledger`: The thread-safe command API
//! - `audit`: Append-only audit log of committed commands
//! - `config`: Path resolution and user settings
//! - `cli`, `display`: The `ledger` binary's script replay and tables
//!
//! # Example
//!
//! ```rust
//! use ledger_engine::models::{AccountType, Money, MoneyMovement, NewBudget, NewBudgetExpense};
//! use ledger_engine::Ledger;
//!
//! let ledger = Ledger::new();
//! let budget = ledger
//!     .create_budget(NewBudget::new("Groceries", Money::from_units(500), AccountType::Personal))
//!     .unwrap();
//! ledger
//!     .create_budget_expense(NewBudgetExpense::new(
//!         budget,
//!         MoneyMovement::new("Market", Money::from_units(400)),
//!     ))
//!     .unwrap();
//!
//! let progress = ledger.budget_progress(budget).unwrap();
//! assert_eq!(progress.percent, 80.0);
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod ledger;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{LedgerError, LedgerResult};
pub use ledger::Ledger;
