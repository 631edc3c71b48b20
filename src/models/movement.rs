//! Money movement value shape
//!
//! Transactions and budget expenses are separate aggregates with different
//! ownership rules, but both record the same thing: a named, positive amount
//! at a point in time with an optional description.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::money::Money;
use crate::error::ValidationReason;

/// Longest name accepted for any ledger entity
pub const MAX_NAME_LEN: usize = 100;

/// Check an entity name after trimming
pub fn validate_name(name: &str) -> Result<(), ValidationReason> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationReason::EmptyName);
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationReason::NameTooLong);
    }
    Ok(())
}

/// A named, positive amount recorded at a point in time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoneyMovement {
    pub name: String,

    /// Always strictly positive once committed
    pub amount: Money,

    #[serde(default)]
    pub description: String,

    pub created_at: DateTime<Utc>,
}

impl MoneyMovement {
    /// Create a movement stamped with the current time
    pub fn new(name: impl Into<String>, amount: Money) -> Self {
        Self {
            name: name.into().trim().to_string(),
            amount,
            description: String::new(),
            created_at: Utc::now(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Returns the offending field and reason on failure
    pub fn validate(&self) -> Result<(), (&'static str, ValidationReason)> {
        validate_name(&self.name).map_err(|reason| ("name", reason))?;
        if !self.amount.is_positive() {
            return Err(("amount", ValidationReason::InvalidAmount));
        }
        Ok(())
    }
}
