//! Budget rollup maintenance
//!
//! `Budget::total_spend` and `Budget::total_items` are denormalized over the
//! budget's expenses. They are updated incrementally on every expense insert
//! and removal; `recompute` exists for verification and repair only.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ConfigurationIssue, LedgerError, LedgerResult};
use crate::models::{Budget, BudgetExpense, BudgetId, Money};
use crate::storage::Table;

/// Progress at or above this percentage is shown as a warning
pub const WARNING_THRESHOLD_PERCENT: f64 = 70.0;

/// Progress at or above this percentage is shown as critical
pub const CRITICAL_THRESHOLD_PERCENT: f64 = 90.0;

/// Progress is reported as at most this percentage
pub const MAX_PROGRESS_PERCENT: f64 = 100.0;

/// Color tier for a budget progress bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressTier {
    Nominal,
    Warning,
    Critical,
}

impl fmt::Display for ProgressTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nominal => write!(f, "nominal"),
            Self::Warning => write!(f, "warning"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

/// Incremental rollup updates and progress formulas
pub struct AggregateMaintainer;

impl AggregateMaintainer {
    /// The guard has already checked that the new totals fit
    pub fn on_budget_expense_added(budget: &mut Budget, amount: Money) {
        budget.total_spend = budget.total_spend.saturating_add(amount);
        budget.total_items = budget.total_items.saturating_add(1);
    }

    /// Subtract an expense from the rollups, flooring both at zero
    ///
    /// Returns `true` if either floor was hit. A correct command sequence
    /// never hits it, so the caller logs it as a consistency warning.
    pub fn on_budget_expense_removed(budget: &mut Budget, amount: Money) -> bool {
        let (spend, spend_clamped) = budget.total_spend.sub_floor_zero(amount);
        let items_clamped = budget.total_items == 0;

        budget.total_spend = spend;
        budget.total_items = budget.total_items.saturating_sub(1);

        if spend_clamped || items_clamped {
            tracing::warn!(
                budget_id = %budget.id,
                removed = %amount,
                "budget rollup would have gone negative; clamped to zero"
            );
        }
        spend_clamped || items_clamped
    }

    /// Spent share of the limit, capped at 100
    pub fn progress_percent(budget: &Budget) -> LedgerResult<f64> {
        let percent = budget.total_spend.percent_of(budget.amount).ok_or_else(|| {
            LedgerError::Configuration(ConfigurationIssue::DivisionByZeroBudget {
                budget_id: budget.id.to_string(),
            })
        })?;
        Ok(percent.clamp(0.0, MAX_PROGRESS_PERCENT))
    }

    pub fn progress_color_tier(percent: f64) -> ProgressTier {
        if percent >= CRITICAL_THRESHOLD_PERCENT {
            ProgressTier::Critical
        } else if percent >= WARNING_THRESHOLD_PERCENT {
            ProgressTier::Warning
        } else {
            ProgressTier::Nominal
        }
    }

    /// Rollups computed from scratch over the current expenses
    pub fn recompute(budget_id: BudgetId, expenses: &Table<BudgetExpense>) -> (Money, u32) {
        expenses
            .iter()
            .filter(|e| e.budget_id == budget_id)
            .fold((Money::zero(), 0), |(spend, items), e| {
                (spend.saturating_add(e.amount()), items.saturating_add(1))
            })
    }
}
