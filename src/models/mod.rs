//! Core data models for the ledger
//!
//! Two independent families live here: accounts, categories and
//! transactions (an ownership chain), and budgets with their expenses (a flat
//! parent/child pair). Both record money through the shared `MoneyMovement`
//! shape.

pub mod account;
pub mod budget;
pub mod category;
pub mod ids;
pub mod money;
pub mod movement;
pub mod transaction;

pub use account::{Account, AccountType, NewAccount};
pub use budget::{Budget, BudgetExpense, NewBudget, NewBudgetExpense};
pub use category::{Category, NewCategory};
pub use ids::{AccountId, BudgetExpenseId, BudgetId, CategoryId, LedgerId, TransactionId};
pub use money::Money;
pub use movement::{validate_name, MoneyMovement, MAX_NAME_LEN};
pub use transaction::{NewTransaction, Transaction, TransactionKind};
