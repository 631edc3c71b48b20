//! Storage layer for the ledger
//!
//! Holds the authoritative in-memory collections. Nothing here checks
//! referential integrity or maintains rollups; that belongs to the guard and
//! the aggregate maintainer in the service layer.

pub mod table;

pub use table::{Record, Table};

use crate::models::{Account, Budget, BudgetExpense, Category, Transaction};

/// Every entity table of one ledger
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    pub accounts: Table<Account>,
    pub categories: Table<Category>,
    pub transactions: Table<Transaction>,
    pub budgets: Table<Budget>,
    pub budget_expenses: Table<BudgetExpense>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored records across all tables
    pub fn record_count(&self) -> usize {
        self.accounts.len()
            + self.categories.len()
            + self.transactions.len()
            + self.budgets.len()
            + self.budget_expenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.record_count() == 0
    }
}
