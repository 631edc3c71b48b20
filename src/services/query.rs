//! Read-side projections over the entity store
//!
//! All derived numbers shown to callers (progress, account totals, filtered
//! lists) come from here so there is exactly one formula for each.

use serde::{Deserialize, Serialize};

use super::aggregate::{AggregateMaintainer, ProgressTier};
use crate::error::LedgerResult;
use crate::models::{
    Account, AccountId, AccountType, Budget, BudgetExpense, BudgetExpenseId, BudgetId, Category,
    CategoryId, Money, Transaction, TransactionId, TransactionKind,
};
use crate::storage::EntityStore;

/// Progress of one budget against its limit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetProgress {
    pub budget_id: BudgetId,
    pub limit: Money,
    pub total_spend: Money,
    pub total_items: u32,
    /// Limit minus spend, never negative
    pub remaining: Money,
    /// Capped at 100
    pub percent: f64,
    pub tier: ProgressTier,
}

/// Income and expense totals for one account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSummary {
    pub account: Account,
    pub income_total: Money,
    pub expense_total: Money,
    /// Income minus expenses
    pub net: Money,
    pub category_count: usize,
    pub transaction_count: usize,
}

/// One page of a longer listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-indexed
    pub page: u32,
    pub page_size: u32,
    /// Items across all pages
    pub total: usize,
}

impl<T> Page<T> {
    /// Slice `all` down to the requested page
    pub fn from_vec(all: Vec<T>, page: u32, page_size: u32) -> Self {
        let page = page.max(1);
        let page_size = page_size.max(1);
        let total = all.len();
        let offset = (page as usize - 1).saturating_mul(page_size as usize);
        let items = all
            .into_iter()
            .skip(offset)
            .take(page_size as usize)
            .collect();
        Self {
            items,
            page,
            page_size,
            total,
        }
    }

    pub fn total_pages(&self) -> u32 {
        if self.total == 0 {
            1
        } else {
            self.total.div_ceil(self.page_size as usize) as u32
        }
    }
}

/// Pure queries over a store
pub struct LedgerQuery<'a> {
    store: &'a EntityStore,
}

impl<'a> LedgerQuery<'a> {
    pub fn new(store: &'a EntityStore) -> Self {
        Self { store }
    }

    pub fn account(&self, id: AccountId) -> LedgerResult<Account> {
        self.store.accounts.require(id).cloned()
    }

    pub fn category(&self, id: CategoryId) -> LedgerResult<Category> {
        self.store.categories.require(id).cloned()
    }

    pub fn transaction(&self, id: TransactionId) -> LedgerResult<Transaction> {
        self.store.transactions.require(id).cloned()
    }

    pub fn budget(&self, id: BudgetId) -> LedgerResult<Budget> {
        self.store.budgets.require(id).cloned()
    }

    pub fn budget_expense(&self, id: BudgetExpenseId) -> LedgerResult<BudgetExpense> {
        self.store.budget_expenses.require(id).cloned()
    }

    pub fn accounts(&self) -> Vec<Account> {
        self.store.accounts.list_where(|_| true)
    }

    /// Find an account by name (case-insensitive)
    pub fn find_account_by_name(&self, name: &str) -> Option<Account> {
        let name = name.trim().to_lowercase();
        self.store
            .accounts
            .iter()
            .find(|a| a.name.to_lowercase() == name)
            .cloned()
    }

    /// Categories owned by an account; errors if the account is unknown
    pub fn categories_for_account(&self, account_id: AccountId) -> LedgerResult<Vec<Category>> {
        self.store.accounts.require(account_id)?;
        Ok(self
            .store
            .categories
            .list_where(|c| c.account_id == account_id))
    }

    /// Find one of an account's categories by name (case-insensitive)
    pub fn find_category_by_name(&self, account_id: AccountId, name: &str) -> Option<Category> {
        let name = name.trim().to_lowercase();
        self.store
            .categories
            .iter()
            .find(|c| c.account_id == account_id && c.name.to_lowercase() == name)
            .cloned()
    }

    /// Transactions of an account, in creation order
    pub fn transactions_for_account(
        &self,
        account_id: AccountId,
    ) -> LedgerResult<Vec<Transaction>> {
        self.store.accounts.require(account_id)?;
        Ok(self
            .store
            .transactions
            .list_where(|t| t.account_id == account_id))
    }

    /// Only the income or only the expense transactions of an account
    pub fn transactions_for_account_by_kind(
        &self,
        account_id: AccountId,
        kind: TransactionKind,
    ) -> LedgerResult<Vec<Transaction>> {
        self.store.accounts.require(account_id)?;
        Ok(self
            .store
            .transactions
            .list_where(|t| t.account_id == account_id && t.kind == kind))
    }

    pub fn transactions_for_category(
        &self,
        category_id: CategoryId,
    ) -> LedgerResult<Vec<Transaction>> {
        self.store.categories.require(category_id)?;
        Ok(self
            .store
            .transactions
            .list_where(|t| t.category_id == category_id))
    }

    /// Newest-first page of an account's transactions
    pub fn transaction_page(
        &self,
        account_id: AccountId,
        page: u32,
        page_size: u32,
    ) -> LedgerResult<Page<Transaction>> {
        let mut transactions = self.transactions_for_account(account_id)?;
        transactions.sort_by(|a, b| {
            b.movement
                .created_at
                .cmp(&a.movement.created_at)
                .then(b.id.cmp(&a.id))
        });
        Ok(Page::from_vec(transactions, page, page_size))
    }

    pub fn account_summary(&self, account_id: AccountId) -> LedgerResult<AccountSummary> {
        let account = self.account(account_id)?;

        let mut income_total = Money::zero();
        let mut expense_total = Money::zero();
        let mut transaction_count = 0;
        for txn in self
            .store
            .transactions
            .iter()
            .filter(|t| t.account_id == account_id)
        {
            match txn.kind {
                TransactionKind::Income => {
                    income_total = income_total.saturating_add(txn.amount())
                }
                TransactionKind::Expense => {
                    expense_total = expense_total.saturating_add(txn.amount())
                }
            }
            transaction_count += 1;
        }

        let category_count = self
            .store
            .categories
            .iter()
            .filter(|c| c.account_id == account_id)
            .count();

        Ok(AccountSummary {
            account,
            income_total,
            expense_total,
            net: income_total - expense_total,
            category_count,
            transaction_count,
        })
    }

    pub fn budgets(&self) -> Vec<Budget> {
        self.store.budgets.list_where(|_| true)
    }

    pub fn budgets_for_account_type(&self, account_type: AccountType) -> Vec<Budget> {
        self.store
            .budgets
            .list_where(|b| b.account_type == account_type)
    }

    /// Find a budget by name (case-insensitive)
    pub fn find_budget_by_name(&self, name: &str) -> Option<Budget> {
        let name = name.trim().to_lowercase();
        self.store
            .budgets
            .iter()
            .find(|b| b.name.to_lowercase() == name)
            .cloned()
    }

    /// Expenses of a budget; errors if the budget is unknown
    pub fn budget_expenses(&self, budget_id: BudgetId) -> LedgerResult<Vec<BudgetExpense>> {
        self.store.budgets.require(budget_id)?;
        Ok(self
            .store
            .budget_expenses
            .list_where(|e| e.budget_id == budget_id))
    }

    pub fn budget_progress(&self, budget_id: BudgetId) -> LedgerResult<BudgetProgress> {
        let budget = self.store.budgets.require(budget_id)?;
        progress_of(budget)
    }
}

/// Progress for a budget record already in hand
pub fn progress_of(budget: &Budget) -> LedgerResult<BudgetProgress> {
    let percent = AggregateMaintainer::progress_percent(budget)?;
    Ok(BudgetProgress {
        budget_id: budget.id,
        limit: budget.amount,
        total_spend: budget.total_spend,
        total_items: budget.total_items,
        remaining: budget.remaining(),
        percent,
        tier: AggregateMaintainer::progress_color_tier(percent),
    })
}
