//! Budget and budget expense models
//!
//! A budget is a spending limit for an account-type partition. It owns its
//! expenses outright and carries two denormalized rollups over them,
//! `total_spend` and `total_items`, which the aggregate maintainer keeps in
//! step with every expense insert and removal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::account::AccountType;
use super::ids::{BudgetExpenseId, BudgetId};
use super::money::Money;
use super::movement::MoneyMovement;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    pub id: BudgetId,

    pub name: String,

    /// Spending limit, always positive once committed
    pub amount: Money,

    #[serde(default)]
    pub icon: String,

    pub account_type: AccountType,

    pub created_at: DateTime<Utc>,

    /// Sum of the amounts of this budget's expenses
    #[serde(default)]
    pub total_spend: Money,

    /// Number of this budget's expenses
    #[serde(default)]
    pub total_items: u32,
}

impl Budget {
    /// Amount left before the limit is reached, never negative
    pub fn remaining(&self) -> Money {
        self.amount.sub_floor_zero(self.total_spend).0
    }

    pub fn is_over_limit(&self) -> bool {
        self.total_spend > self.amount
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} of {})", self.name, self.total_spend, self.amount)
    }
}

/// Fields needed to create a budget
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBudget {
    pub name: String,
    pub amount: Money,
    #[serde(default)]
    pub account_type: AccountType,
    #[serde(default)]
    pub icon: String,
}

impl NewBudget {
    pub fn new(name: impl Into<String>, amount: Money, account_type: AccountType) -> Self {
        Self {
            name: name.into(),
            amount,
            account_type,
            icon: String::new(),
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    /// Rollups always start empty
    pub fn into_budget(self, id: BudgetId) -> Budget {
        Budget {
            id,
            name: self.name.trim().to_string(),
            amount: self.amount,
            icon: self.icon,
            account_type: self.account_type,
            created_at: Utc::now(),
            total_spend: Money::zero(),
            total_items: 0,
        }
    }
}

/// An expense recorded against a budget
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetExpense {
    pub id: BudgetExpenseId,

    pub budget_id: BudgetId,

    #[serde(flatten)]
    pub movement: MoneyMovement,
}

impl BudgetExpense {
    pub fn amount(&self) -> Money {
        self.movement.amount
    }
}

/// A candidate budget expense before the guard has accepted it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBudgetExpense {
    pub budget_id: BudgetId,
    #[serde(flatten)]
    pub movement: MoneyMovement,
}

impl NewBudgetExpense {
    pub fn new(budget_id: BudgetId, movement: MoneyMovement) -> Self {
        Self {
            budget_id,
            movement,
        }
    }

    pub fn into_expense(self, id: BudgetExpenseId) -> BudgetExpense {
        BudgetExpense {
            id,
            budget_id: self.budget_id,
            movement: self.movement,
        }
    }
}
