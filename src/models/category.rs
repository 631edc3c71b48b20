//! Category model
//!
//! A category labels transactions and belongs to exactly one account.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{AccountId, CategoryId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,

    pub name: String,

    #[serde(default)]
    pub color: String,

    /// The owning account
    pub account_id: AccountId,

    pub created_at: DateTime<Utc>,
}

/// Fields needed to create a category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
    pub account_id: AccountId,
    #[serde(default)]
    pub color: String,
}

impl NewCategory {
    pub fn new(name: impl Into<String>, account_id: AccountId) -> Self {
        Self {
            name: name.into(),
            account_id,
            color: String::new(),
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn into_category(self, id: CategoryId) -> Category {
        Category {
            id,
            name: self.name.trim().to_string(),
            color: self.color,
            account_id: self.account_id,
            created_at: Utc::now(),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_category_keeps_owner() {
        let category = NewCategory::new("Groceries ", AccountId::from_raw(3))
            .with_color("orange")
            .into_category(CategoryId::from_raw(9));
        assert_eq!(category.id, CategoryId::from_raw(9));
        assert_eq!(category.account_id, AccountId::from_raw(3));
        assert_eq!(category.name, "Groceries");
        assert_eq!(category.color, "orange");
    }
}
