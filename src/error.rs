//! Custom error types for the ledger engine
//!
//! Every rejected command surfaces one of these values. Guard checks and
//! aggregate queries return them instead of panicking so callers get a
//! deterministic message and a stable machine-readable code.

use std::fmt;

use thiserror::Error;

/// Why a delete was blocked by a live dependent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrityViolation {
    /// A Category still references the Account
    HasDependentCategory,
    /// A Transaction still references the Account or Category
    HasDependentTransaction,
}

impl IntegrityViolation {
    pub fn code(&self) -> &'static str {
        match self {
            Self::HasDependentCategory => "HAS_DEPENDENT_CATEGORY",
            Self::HasDependentTransaction => "HAS_DEPENDENT_TRANSACTION",
        }
    }
}

impl fmt::Display for IntegrityViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HasDependentCategory => write!(f, "a category still references it"),
            Self::HasDependentTransaction => write!(f, "a transaction still references it"),
        }
    }
}

/// Why a field on a candidate record was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationReason {
    UnknownAccount,
    UnknownCategory,
    /// The category belongs to a different account than the transaction
    CategoryAccountMismatch,
    /// Amount must be strictly positive
    InvalidAmount,
    UnknownBudget,
    EmptyName,
    NameTooLong,
}

impl ValidationReason {
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownAccount => "UNKNOWN_ACCOUNT",
            Self::UnknownCategory => "UNKNOWN_CATEGORY",
            Self::CategoryAccountMismatch => "CATEGORY_ACCOUNT_MISMATCH",
            Self::InvalidAmount => "INVALID_AMOUNT",
            Self::UnknownBudget => "UNKNOWN_BUDGET",
            Self::EmptyName => "EMPTY_NAME",
            Self::NameTooLong => "NAME_TOO_LONG",
        }
    }
}

impl fmt::Display for ValidationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownAccount => write!(f, "account does not exist"),
            Self::UnknownCategory => write!(f, "category does not exist"),
            Self::CategoryAccountMismatch => {
                write!(f, "category belongs to a different account")
            }
            Self::InvalidAmount => write!(f, "amount must be greater than zero"),
            Self::UnknownBudget => write!(f, "budget does not exist"),
            Self::EmptyName => write!(f, "name cannot be empty"),
            Self::NameTooLong => write!(f, "name is too long"),
        }
    }
}

/// A ledger whose data cannot answer a query without producing garbage
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationIssue {
    /// A budget limit of zero would make progress NaN or infinite
    DivisionByZeroBudget { budget_id: String },
}

impl ConfigurationIssue {
    pub fn code(&self) -> &'static str {
        match self {
            Self::DivisionByZeroBudget { .. } => "DIVISION_BY_ZERO_BUDGET",
        }
    }
}

impl fmt::Display for ConfigurationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DivisionByZeroBudget { budget_id } => {
                write!(f, "budget {} has a zero limit", budget_id)
            }
        }
    }
}

/// The main error type for ledger operations
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Delete blocked by a live dependent
    #[error("Cannot delete {entity_type} {identifier}: {kind}")]
    ReferentialIntegrity {
        entity_type: &'static str,
        identifier: String,
        kind: IntegrityViolation,
    },

    /// Validation errors for candidate records
    #[error("Validation error on '{field}': {reason}")]
    Validation {
        field: &'static str,
        reason: ValidationReason,
    },

    /// Ledger data that cannot produce a meaningful answer
    #[error("Configuration error: {0}")]
    Configuration(ConfigurationIssue),

    /// Settings-related errors
    #[error("Settings error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Command script errors
    #[error("Script error: {0}")]
    Script(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl LedgerError {
    /// Create a "not found" error for accounts
    pub fn account_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Account",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for categories
    pub fn category_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Category",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for transactions
    pub fn transaction_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Transaction",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for budgets
    pub fn budget_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Budget",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for budget expenses
    pub fn budget_expense_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Budget Expense",
            identifier: identifier.into(),
        }
    }

    pub fn validation(field: &'static str, reason: ValidationReason) -> Self {
        Self::Validation { field, reason }
    }

    /// Stable machine-readable code for domain rejections
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::ReferentialIntegrity { kind, .. } => kind.code(),
            Self::Validation { reason, .. } => reason.code(),
            Self::Configuration(issue) => issue.code(),
            Self::Config(_) => "SETTINGS",
            Self::Io(_) => "IO",
            Self::Json(_) => "JSON",
            Self::Script(_) => "SCRIPT",
            Self::Storage(_) => "STORAGE",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Check if this is a blocked delete
    pub fn is_integrity(&self) -> bool {
        matches!(self, Self::ReferentialIntegrity { .. })
    }
}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<serde_yaml::Error> for LedgerError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Script(err.to_string())
    }
}

/// Result type alias for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
