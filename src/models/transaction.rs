//! Transaction model
//!
//! Income and expense records tied to an account and one of that account's
//! categories.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{AccountId, CategoryId, TransactionId};
use super::movement::MoneyMovement;

/// Direction of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    #[default]
    Expense,
}

impl TransactionKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" => Some(Self::Income),
            "expense" => Some(Self::Expense),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => write!(f, "Income"),
            Self::Expense => write!(f, "Expense"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,

    #[serde(default)]
    pub kind: TransactionKind,

    pub account_id: AccountId,

    /// Must be owned by `account_id`
    pub category_id: CategoryId,

    #[serde(flatten)]
    pub movement: MoneyMovement,
}

impl Transaction {
    pub fn name(&self) -> &str {
        &self.movement.name
    }

    pub fn amount(&self) -> super::Money {
        self.movement.amount
    }
}

/// A candidate transaction before the guard has accepted it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTransaction {
    #[serde(default)]
    pub kind: TransactionKind,
    pub account_id: AccountId,
    pub category_id: CategoryId,
    #[serde(flatten)]
    pub movement: MoneyMovement,
}

impl NewTransaction {
    pub fn new(
        kind: TransactionKind,
        account_id: AccountId,
        category_id: CategoryId,
        movement: MoneyMovement,
    ) -> Self {
        Self {
            kind,
            account_id,
            category_id,
            movement,
        }
    }

    pub fn into_transaction(self, id: TransactionId) -> Transaction {
        Transaction {
            id,
            kind: self.kind,
            account_id: self.account_id,
            category_id: self.category_id,
            movement: self.movement,
        }
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.kind, self.movement.name, self.movement.amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;

    #[test]
    fn test_flattened_serialization() {
        let txn = NewTransaction::new(
            TransactionKind::Expense,
            AccountId::from_raw(1),
            CategoryId::from_raw(2),
            MoneyMovement::new("Groceries run", Money::from_cents(8550)),
        )
        .into_transaction(TransactionId::from_raw(5));

        let value = serde_json::to_value(&txn).unwrap();
        assert_eq!(value["amount"], 8550);
        assert_eq!(value["name"], "Groceries run");
        assert_eq!(value["kind"], "expense");

        let back: Transaction = serde_json::from_value(value).unwrap();
        assert_eq!(back, txn);
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!(TransactionKind::parse("Income"), Some(TransactionKind::Income));
        assert_eq!(TransactionKind::parse("refund"), None);
    }
}
