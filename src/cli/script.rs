//! Command scripts for `ledger replay`
//!
//! A script is a list of steps that refer to entities by name. Each step is
//! resolved against the ledger as it stands at that point and then submitted
//! as one command, so a script exercises exactly the same guard checks and
//! rollup updates as library callers do.
//!
//! ```yaml
//! steps:
//!   - op: create_account
//!     name: Personal
//!   - op: create_category
//!     account: Personal
//!     name: Groceries
//!   - op: create_transaction
//!     account: Personal
//!     category: Groceries
//!     name: Market
//!     amount: 85.50
//! ```

use std::fmt;
use std::path::Path;

use serde::Deserialize;

use crate::error::{LedgerError, LedgerResult, ValidationReason};
use crate::models::{
    Account, AccountType, Budget, Money, MoneyMovement, NewAccount, NewBudget, NewBudgetExpense,
    NewCategory, NewTransaction, TransactionKind,
};
use crate::Ledger;

/// An amount as written in a script: `500`, `85.50` or `"$1,200.00"`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ScriptAmount {
    Whole(i64),
    Decimal(f64),
    Text(String),
}

impl ScriptAmount {
    pub fn to_money(&self) -> LedgerResult<Money> {
        let parsed = match self {
            Self::Whole(units) => {
                return Money::checked_from_units(*units).ok_or_else(|| {
                    LedgerError::Script(format!("Amount out of range: {}", units))
                })
            }
            Self::Decimal(value) => Money::parse(&value.to_string()),
            Self::Text(text) => Money::parse(text),
        };
        parsed.map_err(|e| LedgerError::Script(e.to_string()))
    }
}

/// One command in a script
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    CreateAccount {
        name: String,
        #[serde(default, rename = "type")]
        account_type: AccountType,
        #[serde(default)]
        color: Option<String>,
    },
    DeleteAccount {
        name: String,
    },
    CreateCategory {
        account: String,
        name: String,
        #[serde(default)]
        color: Option<String>,
    },
    DeleteCategory {
        account: String,
        name: String,
    },
    CreateTransaction {
        account: String,
        category: String,
        name: String,
        amount: ScriptAmount,
        #[serde(default)]
        kind: TransactionKind,
        #[serde(default)]
        description: String,
    },
    DeleteTransaction {
        account: String,
        name: String,
    },
    CreateBudget {
        name: String,
        amount: ScriptAmount,
        #[serde(default, rename = "type")]
        account_type: AccountType,
        #[serde(default)]
        icon: Option<String>,
    },
    DeleteBudget {
        name: String,
    },
    CreateBudgetExpense {
        budget: String,
        name: String,
        amount: ScriptAmount,
        #[serde(default)]
        description: String,
    },
    DeleteBudgetExpense {
        budget: String,
        name: String,
    },
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::CreateAccount { name, .. } => write!(f, "create_account {}", name),
            Step::DeleteAccount { name } => write!(f, "delete_account {}", name),
            Step::CreateCategory { account, name, .. } => {
                write!(f, "create_category {}/{}", account, name)
            }
            Step::DeleteCategory { account, name } => {
                write!(f, "delete_category {}/{}", account, name)
            }
            Step::CreateTransaction { account, name, .. } => {
                write!(f, "create_transaction {}/{}", account, name)
            }
            Step::DeleteTransaction { account, name } => {
                write!(f, "delete_transaction {}/{}", account, name)
            }
            Step::CreateBudget { name, .. } => write!(f, "create_budget {}", name),
            Step::DeleteBudget { name } => write!(f, "delete_budget {}", name),
            Step::CreateBudgetExpense { budget, name, .. } => {
                write!(f, "create_budget_expense {}/{}", budget, name)
            }
            Step::DeleteBudgetExpense { budget, name } => {
                write!(f, "delete_budget_expense {}/{}", budget, name)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Script {
    pub steps: Vec<Step>,
}

impl Script {
    /// Load a script, choosing YAML or JSON by file extension
    pub fn load(path: &Path) -> LedgerResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            LedgerError::Io(format!("Failed to read script {}: {}", path.display(), e))
        })?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());
        match extension.as_deref() {
            Some("yaml") | Some("yml") => Ok(serde_yaml::from_str(&contents)?),
            Some("json") => serde_json::from_str(&contents)
                .map_err(|e| LedgerError::Script(format!("Invalid JSON script: {}", e))),
            _ => Err(LedgerError::Script(format!(
                "Unsupported script extension for {} (use .yaml, .yml or .json)",
                path.display()
            ))),
        }
    }
}

/// A step the ledger refused
#[derive(Debug)]
pub struct Rejection {
    /// 1-indexed position in the script
    pub index: usize,
    pub step: String,
    pub error: LedgerError,
}

/// Outcome of replaying a whole script
#[derive(Debug, Default)]
pub struct ReplayReport {
    pub applied: usize,
    pub rejections: Vec<Rejection>,
}

/// Apply every step in order
///
/// A rejected step is recorded and replay moves on. With `strict` the first
/// rejection ends the replay with an error instead.
pub fn replay(ledger: &Ledger, script: &Script, strict: bool) -> LedgerResult<ReplayReport> {
    let mut report = ReplayReport::default();

    for (i, step) in script.steps.iter().enumerate() {
        match apply_step(ledger, step) {
            Ok(()) => report.applied += 1,
            Err(error) if strict => {
                return Err(LedgerError::Script(format!(
                    "step {} ({}) rejected: {}",
                    i + 1,
                    step,
                    error
                )));
            }
            Err(error) => report.rejections.push(Rejection {
                index: i + 1,
                step: step.to_string(),
                error,
            }),
        }
    }

    Ok(report)
}

fn account_named(ledger: &Ledger, name: &str) -> LedgerResult<Option<Account>> {
    ledger.find_account_by_name(name)
}

fn budget_named(ledger: &Ledger, name: &str) -> LedgerResult<Option<Budget>> {
    ledger.find_budget_by_name(name)
}

/// Resolve names and submit one command
pub fn apply_step(ledger: &Ledger, step: &Step) -> LedgerResult<()> {
    match step {
        Step::CreateAccount {
            name,
            account_type,
            color,
        } => {
            let mut account = NewAccount::new(name.as_str(), *account_type);
            if let Some(color) = color {
                account = account.with_color(color.as_str());
            }
            ledger.create_account(account)?;
        }

        Step::DeleteAccount { name } => {
            let account = account_named(ledger, name)?
                .ok_or_else(|| LedgerError::account_not_found(name.as_str()))?;
            ledger.delete_account(account.id)?;
        }

        Step::CreateCategory {
            account,
            name,
            color,
        } => {
            let account = account_named(ledger, account)?
                .ok_or_else(|| LedgerError::validation("account_id", ValidationReason::UnknownAccount))?;
            let mut category = NewCategory::new(name.as_str(), account.id);
            if let Some(color) = color {
                category = category.with_color(color.as_str());
            }
            ledger.create_category(category)?;
        }

        Step::DeleteCategory { account, name } => {
            let account = account_named(ledger, account)?
                .ok_or_else(|| LedgerError::account_not_found(account.as_str()))?;
            let category = ledger
                .find_category_by_name(account.id, name)?
                .ok_or_else(|| LedgerError::category_not_found(name.as_str()))?;
            ledger.delete_category(category.id)?;
        }

        Step::CreateTransaction {
            account,
            category,
            name,
            amount,
            kind,
            description,
        } => {
            let account = account_named(ledger, account)?
                .ok_or_else(|| LedgerError::validation("account_id", ValidationReason::UnknownAccount))?;
            let category = ledger
                .find_category_by_name(account.id, category)?
                .ok_or_else(|| {
                    LedgerError::validation("category_id", ValidationReason::UnknownCategory)
                })?;
            let movement = MoneyMovement::new(name.as_str(), amount.to_money()?)
                .with_description(description.as_str());
            ledger.create_transaction(NewTransaction::new(*kind, account.id, category.id, movement))?;
        }

        Step::DeleteTransaction { account, name } => {
            let account = account_named(ledger, account)?
                .ok_or_else(|| LedgerError::account_not_found(account.as_str()))?;
            let txn = ledger
                .transactions_for_account(account.id)?
                .into_iter()
                .find(|t| t.name().eq_ignore_ascii_case(name.trim()))
                .ok_or_else(|| LedgerError::transaction_not_found(name.as_str()))?;
            ledger.delete_transaction(txn.id)?;
        }

        Step::CreateBudget {
            name,
            amount,
            account_type,
            icon,
        } => {
            let mut budget = NewBudget::new(name.as_str(), amount.to_money()?, *account_type);
            if let Some(icon) = icon {
                budget = budget.with_icon(icon.as_str());
            }
            ledger.create_budget(budget)?;
        }

        Step::DeleteBudget { name } => {
            let budget = budget_named(ledger, name)?
                .ok_or_else(|| LedgerError::budget_not_found(name.as_str()))?;
            ledger.delete_budget(budget.id)?;
        }

        Step::CreateBudgetExpense {
            budget,
            name,
            amount,
            description,
        } => {
            let budget = budget_named(ledger, budget)?
                .ok_or_else(|| LedgerError::validation("budget_id", ValidationReason::UnknownBudget))?;
            let movement = MoneyMovement::new(name.as_str(), amount.to_money()?)
                .with_description(description.as_str());
            ledger.create_budget_expense(NewBudgetExpense::new(budget.id, movement))?;
        }

        Step::DeleteBudgetExpense { budget, name } => {
            let budget = budget_named(ledger, budget)?
                .ok_or_else(|| LedgerError::budget_not_found(budget.as_str()))?;
            let expense = ledger
                .budget_expenses(budget.id)?
                .into_iter()
                .find(|e| e.movement.name.eq_ignore_ascii_case(name.trim()))
                .ok_or_else(|| LedgerError::budget_expense_not_found(name.as_str()))?;
            ledger.delete_budget_expense(expense.id)?;
        }
    }

    Ok(())
}
