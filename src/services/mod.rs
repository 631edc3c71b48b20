//! Service layer for the ledger
//!
//! The guard decides whether a command may run, the entity services apply
//! it to the store, and the aggregate maintainer keeps budget rollups in
//! step. Queries and the consistency check are read-only.

pub mod account;
pub mod aggregate;
pub mod budget;
pub mod category;
pub mod consistency;
pub mod guard;
pub mod query;
pub mod transaction;

pub use account::AccountService;
pub use aggregate::{
    AggregateMaintainer, ProgressTier, CRITICAL_THRESHOLD_PERCENT, MAX_PROGRESS_PERCENT,
    WARNING_THRESHOLD_PERCENT,
};
pub use budget::{BudgetDeletion, BudgetService};
pub use category::CategoryService;
pub use consistency::{verify, ConsistencyIssue};
pub use guard::IntegrityGuard;
pub use query::{AccountSummary, BudgetProgress, LedgerQuery, Page};
pub use transaction::TransactionService;
