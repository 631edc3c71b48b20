//! Audit entry data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::LedgerId;

/// Types of operations that can be audited
///
/// Ledger records have no update path; they are created and deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Delete,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Create => write!(f, "CREATE"),
            Operation::Delete => write!(f, "DELETE"),
        }
    }
}

/// Types of entities that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Account,
    Category,
    Transaction,
    Budget,
    BudgetExpense,
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityType::Account => write!(f, "Account"),
            EntityType::Category => write!(f, "Category"),
            EntityType::Transaction => write!(f, "Transaction"),
            EntityType::Budget => write!(f, "Budget"),
            EntityType::BudgetExpense => write!(f, "BudgetExpense"),
        }
    }
}

/// A single committed change to one record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,

    /// Ledger the change was committed to
    pub ledger_id: LedgerId,

    pub operation: Operation,

    pub entity_type: EntityType,

    pub entity_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,

    /// Record as it was before a delete
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<serde_json::Value>,

    /// Record as it was after a create
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<serde_json::Value>,

    /// Set on records removed by a cascade, naming the deleted parent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cascaded_from: Option<String>,
}

impl AuditEntry {
    pub fn create<T: Serialize>(
        ledger_id: LedgerId,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            ledger_id,
            operation: Operation::Create,
            entity_type,
            entity_id: entity_id.into(),
            entity_name,
            before: None,
            after: serde_json::to_value(entity).ok(),
            cascaded_from: None,
        }
    }

    pub fn delete<T: Serialize>(
        ledger_id: LedgerId,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            ledger_id,
            operation: Operation::Delete,
            entity_type,
            entity_id: entity_id.into(),
            entity_name,
            before: serde_json::to_value(entity).ok(),
            after: None,
            cascaded_from: None,
        }
    }

    /// Mark this entry as part of a parent's cascade
    pub fn cascaded_from(mut self, parent_id: impl Into<String>) -> Self {
        self.cascaded_from = Some(parent_id.into());
        self
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {} {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.ledger_id,
            self.operation,
            self.entity_type,
            self.entity_id
        );

        if let Some(name) = &self.entity_name {
            output.push_str(&format!(" ({})", name));
        }
        if let Some(parent) = &self.cascaded_from {
            output.push_str(&format!(" via {}", parent));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_entry() {
        let ledger = LedgerId::new();
        let entry = AuditEntry::create(
            ledger,
            EntityType::Budget,
            "bud-1",
            Some("Groceries".to_string()),
            &json!({"name": "Groceries", "amount": 50000}),
        );

        assert_eq!(entry.ledger_id, ledger);
        assert_eq!(entry.operation, Operation::Create);
        assert!(entry.before.is_none());
        assert_eq!(entry.after.unwrap()["amount"], 50000);
    }

    #[test]
    fn test_cascaded_delete_entry() {
        let entry = AuditEntry::delete(
            LedgerId::new(),
            EntityType::BudgetExpense,
            "bex-3",
            None,
            &json!({"amount": 300}),
        )
        .cascaded_from("bud-1");

        assert_eq!(entry.operation, Operation::Delete);
        assert!(entry.after.is_none());
        assert!(entry.format_human_readable().ends_with("DELETE BudgetExpense bex-3 via bud-1"));
    }

    #[test]
    fn test_entity_type_serialization() {
        let json = serde_json::to_string(&EntityType::BudgetExpense).unwrap();
        assert_eq!(json, "\"budget_expense\"");
    }
}
