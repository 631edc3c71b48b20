//! Account model
//!
//! Accounts are the root partition of the ledger. Categories and
//! transactions hang off exactly one account.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::AccountId;

/// Which side of the product an account (or budget) belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    #[default]
    Personal,
    Business,
}

impl AccountType {
    /// Parse account type from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "personal" => Some(Self::Personal),
            "business" => Some(Self::Business),
            _ => None,
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Personal => write!(f, "Personal"),
            Self::Business => write!(f, "Business"),
        }
    }
}

/// A ledger account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,

    /// Account name (e.g., "Personal", "Studio LLC")
    pub name: String,

    #[serde(rename = "type")]
    pub account_type: AccountType,

    /// Display color tag
    #[serde(default)]
    pub color: String,

    pub created_at: DateTime<Utc>,
}

/// Fields needed to create an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAccount {
    pub name: String,
    pub account_type: AccountType,
    #[serde(default)]
    pub color: String,
}

impl NewAccount {
    pub fn new(name: impl Into<String>, account_type: AccountType) -> Self {
        Self {
            name: name.into(),
            account_type,
            color: String::new(),
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Build the stored record under an assigned id
    pub fn into_account(self, id: AccountId) -> Account {
        Account {
            id,
            name: self.name.trim().to_string(),
            account_type: self.account_type,
            color: self.color,
            created_at: Utc::now(),
        }
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.account_type)
    }
}
