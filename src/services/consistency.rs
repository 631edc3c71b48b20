//! Whole-store consistency check
//!
//! Walks every table and reports each broken reference or drifted rollup.
//! A ledger that only ever changed through the command API reports nothing.

use serde::Serialize;
use std::fmt;

use super::aggregate::AggregateMaintainer;
use crate::models::{AccountId, BudgetExpenseId, BudgetId, CategoryId, Money, TransactionId};
use crate::storage::EntityStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum ConsistencyIssue {
    CategoryWithoutAccount {
        category_id: CategoryId,
        account_id: AccountId,
    },
    TransactionWithoutAccount {
        transaction_id: TransactionId,
        account_id: AccountId,
    },
    TransactionWithoutCategory {
        transaction_id: TransactionId,
        category_id: CategoryId,
    },
    /// The transaction's category belongs to another account
    TransactionCategoryMismatch {
        transaction_id: TransactionId,
        account_id: AccountId,
        category_account_id: AccountId,
    },
    ExpenseWithoutBudget {
        expense_id: BudgetExpenseId,
        budget_id: BudgetId,
    },
    RollupDrift {
        budget_id: BudgetId,
        stored_spend: Money,
        actual_spend: Money,
        stored_items: u32,
        actual_items: u32,
    },
}

impl fmt::Display for ConsistencyIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CategoryWithoutAccount {
                category_id,
                account_id,
            } => write!(f, "{} references missing {}", category_id, account_id),
            Self::TransactionWithoutAccount {
                transaction_id,
                account_id,
            } => write!(f, "{} references missing {}", transaction_id, account_id),
            Self::TransactionWithoutCategory {
                transaction_id,
                category_id,
            } => write!(f, "{} references missing {}", transaction_id, category_id),
            Self::TransactionCategoryMismatch {
                transaction_id,
                account_id,
                category_account_id,
            } => write!(
                f,
                "{} is on {} but its category is on {}",
                transaction_id, account_id, category_account_id
            ),
            Self::ExpenseWithoutBudget {
                expense_id,
                budget_id,
            } => write!(f, "{} references missing {}", expense_id, budget_id),
            Self::RollupDrift {
                budget_id,
                stored_spend,
                actual_spend,
                stored_items,
                actual_items,
            } => write!(
                f,
                "{} stores {} over {} items, expenses sum to {} over {}",
                budget_id, stored_spend, stored_items, actual_spend, actual_items
            ),
        }
    }
}

/// Every violation currently present in the store
pub fn verify(store: &EntityStore) -> Vec<ConsistencyIssue> {
    let mut issues = Vec::new();

    for category in store.categories.iter() {
        if !store.accounts.contains(category.account_id) {
            issues.push(ConsistencyIssue::CategoryWithoutAccount {
                category_id: category.id,
                account_id: category.account_id,
            });
        }
    }

    for txn in store.transactions.iter() {
        if !store.accounts.contains(txn.account_id) {
            issues.push(ConsistencyIssue::TransactionWithoutAccount {
                transaction_id: txn.id,
                account_id: txn.account_id,
            });
        }
        match store.categories.get(txn.category_id) {
            None => issues.push(ConsistencyIssue::TransactionWithoutCategory {
                transaction_id: txn.id,
                category_id: txn.category_id,
            }),
            Some(category) if category.account_id != txn.account_id => {
                issues.push(ConsistencyIssue::TransactionCategoryMismatch {
                    transaction_id: txn.id,
                    account_id: txn.account_id,
                    category_account_id: category.account_id,
                })
            }
            Some(_) => {}
        }
    }

    for expense in store.budget_expenses.iter() {
        if !store.budgets.contains(expense.budget_id) {
            issues.push(ConsistencyIssue::ExpenseWithoutBudget {
                expense_id: expense.id,
                budget_id: expense.budget_id,
            });
        }
    }

    for budget in store.budgets.iter() {
        let (actual_spend, actual_items) =
            AggregateMaintainer::recompute(budget.id, &store.budget_expenses);
        if budget.total_spend != actual_spend || budget.total_items != actual_items {
            issues.push(ConsistencyIssue::RollupDrift {
                budget_id: budget.id,
                stored_spend: budget.total_spend,
                actual_spend,
                stored_items: budget.total_items,
                actual_items,
            });
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        AccountType, MoneyMovement, NewAccount, NewBudget, NewBudgetExpense, NewCategory,
        NewTransaction, TransactionKind,
    };

    #[test]
    fn test_empty_store_is_consistent() {
        assert!(verify(&EntityStore::new()).is_empty());
    }

    #[test]
    fn test_reports_broken_references() {
        let mut store = EntityStore::new();
        let personal = store
            .accounts
            .insert_with(|id| NewAccount::new("Personal", AccountType::Personal).into_account(id));
        let business = store
            .accounts
            .insert_with(|id| NewAccount::new("Studio", AccountType::Business).into_account(id));
        let groceries = store
            .categories
            .insert_with(|id| NewCategory::new("Groceries", personal).into_category(id));
        let txn = store.transactions.insert_with(|id| {
            NewTransaction::new(
                TransactionKind::Expense,
                business,
                groceries,
                MoneyMovement::new("Wrong side", Money::from_cents(100)),
            )
            .into_transaction(id)
        });
        store.accounts.remove(personal);

        let issues = verify(&store);
        assert_eq!(
            issues,
            vec![
                ConsistencyIssue::CategoryWithoutAccount {
                    category_id: groceries,
                    account_id: personal,
                },
                ConsistencyIssue::TransactionCategoryMismatch {
                    transaction_id: txn,
                    account_id: business,
                    category_account_id: personal,
                },
            ]
        );
    }

    #[test]
    fn test_reports_rollup_drift_and_orphans() {
        let mut store = EntityStore::new();
        let budget = store.budgets.insert_with(|id| {
            NewBudget::new("Groceries", Money::from_units(500), AccountType::Personal)
                .into_budget(id)
        });
        store.budget_expenses.insert_with(|id| {
            NewBudgetExpense::new(budget, MoneyMovement::new("Milk", Money::from_cents(300)))
                .into_expense(id)
        });
        let orphan = store.budget_expenses.insert_with(|id| {
            NewBudgetExpense::new(
                BudgetId::from_raw(40),
                MoneyMovement::new("Lost", Money::from_cents(1)),
            )
            .into_expense(id)
        });

        let issues = verify(&store);
        assert_eq!(issues.len(), 2);
        assert!(issues.contains(&ConsistencyIssue::ExpenseWithoutBudget {
            expense_id: orphan,
            budget_id: BudgetId::from_raw(40),
        }));
        assert!(issues[1].to_string().contains("bud-1 stores $0.00 over 0 items"));
    }
}
