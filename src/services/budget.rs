//! Budget service
//!
//! Budgets own their expenses. Adding or removing an expense updates the
//! budget's rollups in the same command; deleting a budget removes all of its
//! expenses with it. Every precondition is checked before the first mutation,
//! so a failed command never leaves a half-applied change behind.

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Budget, BudgetExpense, BudgetExpenseId, BudgetId, NewBudget, NewBudgetExpense};
use crate::storage::EntityStore;

use super::aggregate::AggregateMaintainer;
use super::guard::IntegrityGuard;

/// Everything removed by one budget delete
#[derive(Debug, Clone)]
pub struct BudgetDeletion {
    pub budget: Budget,
    /// Cascaded expenses, in id order
    pub expenses: Vec<BudgetExpense>,
}

/// Service for budget and budget expense commands
pub struct BudgetService<'a> {
    store: &'a mut EntityStore,
}

impl<'a> BudgetService<'a> {
    pub fn new(store: &'a mut EntityStore) -> Self {
        Self { store }
    }

    pub fn create(&mut self, budget: NewBudget) -> LedgerResult<Budget> {
        IntegrityGuard::new(self.store).can_create_budget(&budget)?;

        let budget = self
            .store
            .budgets
            .insert_and_get(|id| budget.into_budget(id));
        tracing::debug!(budget_id = %budget.id, limit = %budget.amount, "budget created");
        Ok(budget)
    }

    /// Delete a budget and cascade to its expenses
    pub fn delete(&mut self, id: BudgetId) -> LedgerResult<BudgetDeletion> {
        self.store.budgets.require(id)?;

        let expenses = self.store.budget_expenses.remove_where(|e| e.budget_id == id);
        let budget = self
            .store
            .budgets
            .remove(id)
            .ok_or_else(|| LedgerError::budget_not_found(id.to_string()))?;

        tracing::info!(
            budget_id = %id,
            cascaded = expenses.len(),
            "budget deleted with its expenses"
        );
        Ok(BudgetDeletion { budget, expenses })
    }

    pub fn add_expense(&mut self, expense: NewBudgetExpense) -> LedgerResult<BudgetExpense> {
        IntegrityGuard::new(self.store).can_create_budget_expense(&expense)?;

        let store = &mut *self.store;
        let budget = store
            .budgets
            .get_mut(expense.budget_id)
            .ok_or_else(|| LedgerError::budget_not_found(expense.budget_id.to_string()))?;

        let amount = expense.movement.amount;
        let expense = store
            .budget_expenses
            .insert_and_get(|id| expense.into_expense(id));
        AggregateMaintainer::on_budget_expense_added(budget, amount);

        tracing::debug!(
            expense_id = %expense.id,
            budget_id = %budget.id,
            amount = %amount,
            total_spend = %budget.total_spend,
            total_items = budget.total_items,
            "budget expense added"
        );
        Ok(expense)
    }

    /// Remove one expense and subtract it from its budget's rollups
    pub fn remove_expense(&mut self, id: BudgetExpenseId) -> LedgerResult<BudgetExpense> {
        let store = &mut *self.store;
        let budget_id = store.budget_expenses.require(id)?.budget_id;
        let budget = store
            .budgets
            .get_mut(budget_id)
            .ok_or_else(|| LedgerError::budget_not_found(budget_id.to_string()))?;

        let expense = store
            .budget_expenses
            .remove(id)
            .ok_or_else(|| LedgerError::budget_expense_not_found(id.to_string()))?;
        AggregateMaintainer::on_budget_expense_removed(budget, expense.amount());

        tracing::debug!(
            expense_id = %id,
            budget_id = %budget_id,
            total_spend = %budget.total_spend,
            total_items = budget.total_items,
            "budget expense removed"
        );
        Ok(expense)
    }

    /// Recompute every budget's rollups from its expenses
    ///
    /// Returns the ids of budgets whose stored rollups were wrong.
    pub fn rebuild_totals(&mut self) -> Vec<BudgetId> {
        let store = &mut *self.store;
        let mut corrected = Vec::new();

        let ids: Vec<BudgetId> = store.budgets.iter().map(|b| b.id).collect();
        for id in ids {
            let (spend, items) = AggregateMaintainer::recompute(id, &store.budget_expenses);
            if let Some(budget) = store.budgets.get_mut(id) {
                if budget.total_spend != spend || budget.total_items != items {
                    tracing::warn!(
                        budget_id = %id,
                        stored_spend = %budget.total_spend,
                        actual_spend = %spend,
                        stored_items = budget.total_items,
                        actual_items = items,
                        "budget rollup corrected"
                    );
                    budget.total_spend = spend;
                    budget.total_items = items;
                    corrected.push(id);
                }
            }
        }

        corrected
    }
}
