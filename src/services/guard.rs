//! Referential integrity guard
//!
//! Decides whether a pending command may run, from the current store and the
//! candidate alone. Checks never mutate and always return a typed rejection,
//! so a rejected command leaves the store exactly as it found it.

use crate::error::{IntegrityViolation, LedgerError, LedgerResult, ValidationReason};
use crate::models::{
    validate_name, AccountId, CategoryId, NewAccount, NewBudget, NewBudgetExpense, NewCategory,
    NewTransaction,
};
use crate::storage::EntityStore;

/// Read-only precondition checks over an entity store
pub struct IntegrityGuard<'a> {
    store: &'a EntityStore,
}

fn check_name(name: &str) -> LedgerResult<()> {
    validate_name(name).map_err(|reason| LedgerError::validation("name", reason))
}

impl<'a> IntegrityGuard<'a> {
    pub fn new(store: &'a EntityStore) -> Self {
        Self { store }
    }

    pub fn can_create_account(&self, account: &NewAccount) -> LedgerResult<()> {
        check_name(&account.name)
    }

    /// Blocks while any category or transaction still references the account
    ///
    /// Categories are checked first, so an account with both kinds of
    /// dependents reports `HasDependentCategory`.
    pub fn can_delete_account(&self, account_id: AccountId) -> LedgerResult<()> {
        let blocked = |kind| LedgerError::ReferentialIntegrity {
            entity_type: "Account",
            identifier: account_id.to_string(),
            kind,
        };

        if self
            .store
            .categories
            .any(|c| c.account_id == account_id)
        {
            return Err(blocked(IntegrityViolation::HasDependentCategory));
        }
        if self
            .store
            .transactions
            .any(|t| t.account_id == account_id)
        {
            return Err(blocked(IntegrityViolation::HasDependentTransaction));
        }
        Ok(())
    }

    pub fn can_create_category(&self, category: &NewCategory) -> LedgerResult<()> {
        if !self.store.accounts.contains(category.account_id) {
            return Err(LedgerError::validation(
                "account_id",
                ValidationReason::UnknownAccount,
            ));
        }
        check_name(&category.name)
    }

    pub fn can_delete_category(&self, category_id: CategoryId) -> LedgerResult<()> {
        if self
            .store
            .transactions
            .any(|t| t.category_id == category_id)
        {
            return Err(LedgerError::ReferentialIntegrity {
                entity_type: "Category",
                identifier: category_id.to_string(),
                kind: IntegrityViolation::HasDependentTransaction,
            });
        }
        Ok(())
    }

    /// References first, then the movement itself
    pub fn can_create_transaction(&self, txn: &NewTransaction) -> LedgerResult<()> {
        if !self.store.accounts.contains(txn.account_id) {
            return Err(LedgerError::validation(
                "account_id",
                ValidationReason::UnknownAccount,
            ));
        }

        let category = self.store.categories.get(txn.category_id).ok_or_else(|| {
            LedgerError::validation("category_id", ValidationReason::UnknownCategory)
        })?;
        if category.account_id != txn.account_id {
            return Err(LedgerError::validation(
                "category_id",
                ValidationReason::CategoryAccountMismatch,
            ));
        }

        txn.movement
            .validate()
            .map_err(|(field, reason)| LedgerError::validation(field, reason))
    }

    pub fn can_create_budget(&self, budget: &NewBudget) -> LedgerResult<()> {
        check_name(&budget.name)?;
        if !budget.amount.is_positive() {
            return Err(LedgerError::validation(
                "amount",
                ValidationReason::InvalidAmount,
            ));
        }
        Ok(())
    }

    /// Also rejects an amount the budget's rollups could not absorb
    pub fn can_create_budget_expense(&self, expense: &NewBudgetExpense) -> LedgerResult<()> {
        let budget = self.store.budgets.get(expense.budget_id).ok_or_else(|| {
            LedgerError::validation("budget_id", ValidationReason::UnknownBudget)
        })?;
        expense
            .movement
            .validate()
            .map_err(|(field, reason)| LedgerError::validation(field, reason))?;

        let fits = budget.total_spend.checked_add(expense.movement.amount).is_some()
            && budget.total_items.checked_add(1).is_some();
        if !fits {
            return Err(LedgerError::validation(
                "amount",
                ValidationReason::InvalidAmount,
            ));
        }
        Ok(())
    }
}
