//! Command API over one ledger
//!
//! `Ledger` owns its entity store behind a single lock. A command holds the
//! write lock from its first guard check until the last rollup update, so no
//! reader ever sees a budget whose totals disagree with its expenses, and two
//! racing deletes of the same budget cascade exactly once. Queries take the
//! read lock and return owned copies of the committed state.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Serialize;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    Account, AccountId, AccountType, Budget, BudgetExpense, BudgetExpenseId, BudgetId, Category,
    CategoryId, LedgerId, NewAccount, NewBudget, NewBudgetExpense, NewCategory, NewTransaction,
    Transaction, TransactionId, TransactionKind,
};
use crate::services::{
    verify, AccountService, AccountSummary, BudgetProgress, BudgetService, CategoryService,
    ConsistencyIssue, LedgerQuery, Page, TransactionService,
};
use crate::storage::EntityStore;

/// An independent ledger: its own store, ids and optional audit log
pub struct Ledger {
    id: LedgerId,
    store: RwLock<EntityStore>,
    audit: Option<AuditLogger>,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

fn log_rejection<T>(command: &'static str, result: LedgerResult<T>) -> LedgerResult<T> {
    if let Err(err) = &result {
        tracing::warn!(command, code = err.code(), error = %err, "command rejected");
    }
    result
}

impl Ledger {
    pub fn new() -> Self {
        Self::from_store(EntityStore::new())
    }

    /// Wrap an existing store, e.g. one assembled by a test
    pub fn from_store(store: EntityStore) -> Self {
        let id = LedgerId::new();
        tracing::debug!(ledger_id = %id, "ledger opened");
        Self {
            id,
            store: RwLock::new(store),
            audit: None,
        }
    }

    /// Record every committed command to an audit log
    pub fn with_audit(mut self, logger: AuditLogger) -> Self {
        self.audit = Some(logger);
        self
    }

    pub fn id(&self) -> LedgerId {
        self.id
    }

    fn read(&self) -> LedgerResult<RwLockReadGuard<'_, EntityStore>> {
        self.store
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> LedgerResult<RwLockWriteGuard<'_, EntityStore>> {
        self.store
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    /// Run one command under the write lock
    ///
    /// Audit entries are written before the lock is released, so the log
    /// lists commands in commit order. A lock that cannot be taken is
    /// reported and logged like any other rejection.
    fn run<T>(
        &self,
        command: &'static str,
        apply: impl FnOnce(&mut EntityStore) -> LedgerResult<T>,
        entries: impl FnOnce(&T) -> Vec<AuditEntry>,
    ) -> LedgerResult<T> {
        let result = self.write().and_then(|mut store| {
            let value = apply(&mut *store)?;
            if self.audit.is_some() {
                self.audit(&entries(&value));
            }
            Ok(value)
        });
        log_rejection(command, result)
    }

    /// Write audit entries for a command that has already committed
    ///
    /// The command cannot be rolled back at this point, so a failed write is
    /// logged and dropped.
    fn audit(&self, entries: &[AuditEntry]) {
        if let Some(logger) = &self.audit {
            if let Err(err) = logger.log_batch(entries) {
                tracing::warn!(
                    ledger_id = %self.id,
                    path = %logger.path().display(),
                    error = %err,
                    "failed to write audit entries"
                );
            }
        }
    }

    fn created<T: Serialize>(
        &self,
        entity_type: EntityType,
        id: String,
        name: &str,
        record: &T,
    ) -> Vec<AuditEntry> {
        vec![AuditEntry::create(self.id, entity_type, id, Some(name.to_string()), record)]
    }

    fn deleted<T: Serialize>(
        &self,
        entity_type: EntityType,
        id: String,
        name: &str,
        record: &T,
    ) -> Vec<AuditEntry> {
        vec![AuditEntry::delete(self.id, entity_type, id, Some(name.to_string()), record)]
    }

    // === Commands ===

    pub fn create_account(&self, account: NewAccount) -> LedgerResult<AccountId> {
        let account = self.run(
            "create_account",
            |store| AccountService::new(store).create(account),
            |a| self.created(EntityType::Account, a.id.to_string(), &a.name, a),
        )?;
        Ok(account.id)
    }

    pub fn delete_account(&self, id: AccountId) -> LedgerResult<()> {
        self.run(
            "delete_account",
            |store| AccountService::new(store).delete(id),
            |a| self.deleted(EntityType::Account, id.to_string(), &a.name, a),
        )?;
        Ok(())
    }

    pub fn create_category(&self, category: NewCategory) -> LedgerResult<CategoryId> {
        let category = self.run(
            "create_category",
            |store| CategoryService::new(store).create(category),
            |c| self.created(EntityType::Category, c.id.to_string(), &c.name, c),
        )?;
        Ok(category.id)
    }

    pub fn delete_category(&self, id: CategoryId) -> LedgerResult<()> {
        self.run(
            "delete_category",
            |store| CategoryService::new(store).delete(id),
            |c| self.deleted(EntityType::Category, id.to_string(), &c.name, c),
        )?;
        Ok(())
    }

    pub fn create_transaction(&self, txn: NewTransaction) -> LedgerResult<TransactionId> {
        let txn = self.run(
            "create_transaction",
            |store| TransactionService::new(store).create(txn),
            |t| self.created(EntityType::Transaction, t.id.to_string(), t.name(), t),
        )?;
        Ok(txn.id)
    }

    pub fn delete_transaction(&self, id: TransactionId) -> LedgerResult<()> {
        self.run(
            "delete_transaction",
            |store| TransactionService::new(store).delete(id),
            |t| self.deleted(EntityType::Transaction, id.to_string(), t.name(), t),
        )?;
        Ok(())
    }

    pub fn create_budget(&self, budget: NewBudget) -> LedgerResult<BudgetId> {
        let budget = self.run(
            "create_budget",
            |store| BudgetService::new(store).create(budget),
            |b| self.created(EntityType::Budget, b.id.to_string(), &b.name, b),
        )?;
        Ok(budget.id)
    }

    /// Delete a budget together with all of its expenses
    pub fn delete_budget(&self, id: BudgetId) -> LedgerResult<()> {
        self.run(
            "delete_budget",
            |store| BudgetService::new(store).delete(id),
            |deletion| {
                let parent = id.to_string();
                let mut entries: Vec<AuditEntry> = deletion
                    .expenses
                    .iter()
                    .map(|e| {
                        AuditEntry::delete(
                            self.id,
                            EntityType::BudgetExpense,
                            e.id.to_string(),
                            Some(e.movement.name.clone()),
                            e,
                        )
                        .cascaded_from(parent.clone())
                    })
                    .collect();
                entries.extend(self.deleted(
                    EntityType::Budget,
                    parent,
                    &deletion.budget.name,
                    &deletion.budget,
                ));
                entries
            },
        )?;
        Ok(())
    }

    pub fn create_budget_expense(&self, expense: NewBudgetExpense) -> LedgerResult<BudgetExpenseId> {
        let expense = self.run(
            "create_budget_expense",
            |store| BudgetService::new(store).add_expense(expense),
            |e| {
                self.created(
                    EntityType::BudgetExpense,
                    e.id.to_string(),
                    &e.movement.name,
                    e,
                )
            },
        )?;
        Ok(expense.id)
    }

    pub fn delete_budget_expense(&self, id: BudgetExpenseId) -> LedgerResult<()> {
        self.run(
            "delete_budget_expense",
            |store| BudgetService::new(store).remove_expense(id),
            |e| self.deleted(EntityType::BudgetExpense, id.to_string(), &e.movement.name, e),
        )?;
        Ok(())
    }

    /// Recompute every budget rollup from scratch; returns corrected budgets
    pub fn rebuild_budget_totals(&self) -> LedgerResult<Vec<BudgetId>> {
        self.run(
            "rebuild_budget_totals",
            |store| Ok(BudgetService::new(store).rebuild_totals()),
            |_| Vec::new(),
        )
    }

    // === Queries ===

    pub fn account(&self, id: AccountId) -> LedgerResult<Account> {
        LedgerQuery::new(&*self.read()?).account(id)
    }

    pub fn category(&self, id: CategoryId) -> LedgerResult<Category> {
        LedgerQuery::new(&*self.read()?).category(id)
    }

    pub fn transaction(&self, id: TransactionId) -> LedgerResult<Transaction> {
        LedgerQuery::new(&*self.read()?).transaction(id)
    }

    pub fn budget(&self, id: BudgetId) -> LedgerResult<Budget> {
        LedgerQuery::new(&*self.read()?).budget(id)
    }

    pub fn budget_expense(&self, id: BudgetExpenseId) -> LedgerResult<BudgetExpense> {
        LedgerQuery::new(&*self.read()?).budget_expense(id)
    }

    pub fn accounts(&self) -> LedgerResult<Vec<Account>> {
        Ok(LedgerQuery::new(&*self.read()?).accounts())
    }

    pub fn find_account_by_name(&self, name: &str) -> LedgerResult<Option<Account>> {
        Ok(LedgerQuery::new(&*self.read()?).find_account_by_name(name))
    }

    pub fn categories_for_account(&self, account_id: AccountId) -> LedgerResult<Vec<Category>> {
        LedgerQuery::new(&*self.read()?).categories_for_account(account_id)
    }

    pub fn find_category_by_name(
        &self,
        account_id: AccountId,
        name: &str,
    ) -> LedgerResult<Option<Category>> {
        Ok(LedgerQuery::new(&*self.read()?).find_category_by_name(account_id, name))
    }

    pub fn transactions_for_account(&self, account_id: AccountId) -> LedgerResult<Vec<Transaction>> {
        LedgerQuery::new(&*self.read()?).transactions_for_account(account_id)
    }

    pub fn transactions_for_account_by_kind(
        &self,
        account_id: AccountId,
        kind: TransactionKind,
    ) -> LedgerResult<Vec<Transaction>> {
        LedgerQuery::new(&*self.read()?).transactions_for_account_by_kind(account_id, kind)
    }

    pub fn transactions_for_category(
        &self,
        category_id: CategoryId,
    ) -> LedgerResult<Vec<Transaction>> {
        LedgerQuery::new(&*self.read()?).transactions_for_category(category_id)
    }

    pub fn transaction_page(
        &self,
        account_id: AccountId,
        page: u32,
        page_size: u32,
    ) -> LedgerResult<Page<Transaction>> {
        LedgerQuery::new(&*self.read()?).transaction_page(account_id, page, page_size)
    }

    pub fn account_summary(&self, account_id: AccountId) -> LedgerResult<AccountSummary> {
        LedgerQuery::new(&*self.read()?).account_summary(account_id)
    }

    pub fn budgets(&self) -> LedgerResult<Vec<Budget>> {
        Ok(LedgerQuery::new(&*self.read()?).budgets())
    }

    pub fn budgets_for_account_type(&self, account_type: AccountType) -> LedgerResult<Vec<Budget>> {
        Ok(LedgerQuery::new(&*self.read()?).budgets_for_account_type(account_type))
    }

    pub fn find_budget_by_name(&self, name: &str) -> LedgerResult<Option<Budget>> {
        Ok(LedgerQuery::new(&*self.read()?).find_budget_by_name(name))
    }

    pub fn budget_expenses(&self, budget_id: BudgetId) -> LedgerResult<Vec<BudgetExpense>> {
        LedgerQuery::new(&*self.read()?).budget_expenses(budget_id)
    }

    pub fn budget_progress(&self, budget_id: BudgetId) -> LedgerResult<BudgetProgress> {
        LedgerQuery::new(&*self.read()?).budget_progress(budget_id)
    }

    /// Check every invariant against the committed state
    pub fn verify(&self) -> LedgerResult<Vec<ConsistencyIssue>> {
        Ok(verify(&*self.read()?))
    }

    /// Owned copy of the committed state
    pub fn snapshot(&self) -> LedgerResult<EntityStore> {
        Ok(self.read()?.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Operation;
    use crate::models::{Money, MoneyMovement};
    use std::sync::Arc;
    use std::thread;
    use tempfile::TempDir;

    fn personal_with_groceries(ledger: &Ledger) -> (AccountId, CategoryId) {
        let account = ledger
            .create_account(NewAccount::new("Personal", AccountType::Personal))
            .unwrap();
        let category = ledger
            .create_category(NewCategory::new("Groceries", account))
            .unwrap();
        (account, category)
    }

    #[test]
    fn test_transaction_scenario() {
        let ledger = Ledger::new();
        let (account, category) = personal_with_groceries(&ledger);

        ledger
            .create_transaction(NewTransaction::new(
                TransactionKind::Expense,
                account,
                category,
                MoneyMovement::new("Market", Money::from_cents(8550)),
            ))
            .unwrap();

        let transactions = ledger.transactions_for_account(account).unwrap();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].amount(), Money::from_cents(8550));
    }

    #[test]
    fn test_block_not_cascade() {
        let ledger = Ledger::new();
        let (account, _) = personal_with_groceries(&ledger);
        let before = ledger.snapshot().unwrap();

        let err = ledger.delete_account(account).unwrap_err();
        assert_eq!(err.code(), "HAS_DEPENDENT_CATEGORY");

        let after = ledger.snapshot().unwrap();
        assert_eq!(before.record_count(), after.record_count());
        assert!(ledger.account(account).is_ok());
    }

    #[test]
    fn test_independent_ledgers() {
        let first = Ledger::new();
        let second = Ledger::new();
        first
            .create_account(NewAccount::new("Personal", AccountType::Personal))
            .unwrap();

        assert_ne!(first.id(), second.id());
        assert_eq!(first.accounts().unwrap().len(), 1);
        assert!(second.accounts().unwrap().is_empty());
    }

    #[test]
    fn test_audit_records_cascade() {
        let temp_dir = TempDir::new().unwrap();
        let logger = AuditLogger::new(temp_dir.path().join("audit.log"));
        let ledger = Ledger::new().with_audit(logger.clone());

        let budget = ledger
            .create_budget(NewBudget::new("Groceries", Money::from_units(500), AccountType::Personal))
            .unwrap();
        for cents in [30000, 25000] {
            ledger
                .create_budget_expense(NewBudgetExpense::new(
                    budget,
                    MoneyMovement::new("Shop", Money::from_cents(cents)),
                ))
                .unwrap();
        }
        ledger.delete_budget(budget).unwrap();

        // Rejected commands are not audited
        assert!(ledger.delete_budget(budget).is_err());

        let entries = logger.read_for_ledger(ledger.id()).unwrap();
        assert_eq!(entries.len(), 6);
        let cascaded: Vec<_> = entries
            .iter()
            .filter(|e| e.cascaded_from.as_deref() == Some("bud-1"))
            .collect();
        assert_eq!(cascaded.len(), 2);
        assert!(cascaded.iter().all(|e| e.operation == Operation::Delete));
        assert_eq!(entries[5].entity_type, EntityType::Budget);
    }

    #[test]
    fn test_audit_failure_does_not_fail_command() {
        let temp_dir = TempDir::new().unwrap();
        // A directory where the log file should be makes every append fail
        let ledger = Ledger::new().with_audit(AuditLogger::new(temp_dir.path()));

        let id = ledger
            .create_account(NewAccount::new("Personal", AccountType::Personal))
            .unwrap();
        assert!(ledger.account(id).is_ok());
    }

    #[test]
    fn test_overflowing_expense_rejected_without_mutation() {
        let ledger = Ledger::new();
        let budget = ledger
            .create_budget(NewBudget::new("Huge", Money::from_units(500), AccountType::Personal))
            .unwrap();
        let half = Money::from_cents(i64::MAX / 2 + 1);
        ledger
            .create_budget_expense(NewBudgetExpense::new(budget, MoneyMovement::new("First", half)))
            .unwrap();
        let before = ledger.budget(budget).unwrap();

        let err = ledger
            .create_budget_expense(NewBudgetExpense::new(budget, MoneyMovement::new("Second", half)))
            .unwrap_err();
        assert_eq!(err.code(), "INVALID_AMOUNT");

        let store = ledger.snapshot().unwrap();
        assert_eq!(store.budget_expenses.len(), 1);
        let after = ledger.budget(budget).unwrap();
        assert_eq!(after.total_spend, before.total_spend);
        assert_eq!(after.total_items, 1);

        // The lock is still usable
        ledger
            .create_budget_expense(NewBudgetExpense::new(
                budget,
                MoneyMovement::new("Small", Money::from_cents(100)),
            ))
            .unwrap();
        assert_eq!(ledger.budget(budget).unwrap().total_items, 2);
        assert!(ledger.verify().unwrap().is_empty());
    }

    #[test]
    fn test_poisoned_lock_is_storage_error() {
        let ledger = Arc::new(Ledger::new());
        let holder = Arc::clone(&ledger);
        let _ = thread::spawn(move || {
            let _store = holder.store.write().unwrap();
            panic!("command panicked while holding the lock");
        })
        .join();

        let err = ledger
            .create_account(NewAccount::new("Personal", AccountType::Personal))
            .unwrap_err();
        assert_eq!(err.code(), "STORAGE");
        assert!(err.to_string().contains("write lock"));
        assert_eq!(ledger.accounts().unwrap_err().code(), "STORAGE");
    }

    #[test]
    fn test_audit_log_follows_commit_order() {
        let temp_dir = TempDir::new().unwrap();
        let logger = AuditLogger::new(temp_dir.path().join("audit.log"));
        let ledger = Arc::new(Ledger::new().with_audit(logger.clone()));
        let budget = ledger
            .create_budget(NewBudget::new("Shared", Money::from_units(1000), AccountType::Personal))
            .unwrap();

        let mut handles: Vec<_> = (0..3)
            .map(|_| {
                let ledger = Arc::clone(&ledger);
                thread::spawn(move || {
                    for _ in 0..20 {
                        let _ = ledger.create_budget_expense(NewBudgetExpense::new(
                            budget,
                            MoneyMovement::new("Item", Money::from_cents(100)),
                        ));
                    }
                })
            })
            .collect();
        let remover = Arc::clone(&ledger);
        handles.push(thread::spawn(move || {
            for _ in 0..20 {
                for expense in remover.budget_expenses(budget).unwrap_or_default() {
                    let _ = remover.delete_budget_expense(expense.id);
                }
            }
            remover.delete_budget(budget).unwrap();
        }));
        for handle in handles {
            handle.join().unwrap();
        }

        // Every delete follows the create of the same record
        let entries = logger.read_for_ledger(ledger.id()).unwrap();
        for (i, entry) in entries.iter().enumerate() {
            if entry.operation == Operation::Delete {
                let created_earlier = entries[..i].iter().any(|e| {
                    e.operation == Operation::Create
                        && e.entity_type == entry.entity_type
                        && e.entity_id == entry.entity_id
                });
                assert!(created_earlier, "{} logged before its create", entry.entity_id);
            }
        }
        assert_eq!(entries.last().unwrap().entity_type, EntityType::Budget);
    }

    #[test]
    fn test_concurrent_expenses_keep_rollups_exact() {
        let ledger = Arc::new(Ledger::new());
        let budget = ledger
            .create_budget(NewBudget::new("Shared", Money::from_units(1000), AccountType::Business))
            .unwrap();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let ledger = Arc::clone(&ledger);
                thread::spawn(move || {
                    for _ in 0..25 {
                        let id = ledger
                            .create_budget_expense(NewBudgetExpense::new(
                                budget,
                                MoneyMovement::new("Item", Money::from_cents(100)),
                            ))
                            .unwrap();
                        let progress = ledger.budget_progress(budget).unwrap();
                        let expenses = ledger.budget_expenses(budget).unwrap();
                        assert!(progress.total_items as usize <= 100);
                        assert!(expenses.iter().any(|e| e.id == id));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let budget = ledger.budget(budget).unwrap();
        assert_eq!(budget.total_items, 100);
        assert_eq!(budget.total_spend, Money::from_units(100));
        assert!(ledger.verify().unwrap().is_empty());
    }

    #[test]
    fn test_racing_budget_deletes_cascade_once() {
        let ledger = Arc::new(Ledger::new());
        let budget = ledger
            .create_budget(NewBudget::new("Trip", Money::from_units(800), AccountType::Personal))
            .unwrap();
        for _ in 0..10 {
            ledger
                .create_budget_expense(NewBudgetExpense::new(
                    budget,
                    MoneyMovement::new("Ticket", Money::from_units(20)),
                ))
                .unwrap();
        }

        let handles: Vec<_> = (0..2)
            .map(|_| {
                let ledger = Arc::clone(&ledger);
                thread::spawn(move || ledger.delete_budget(budget).is_ok())
            })
            .collect();
        let successes = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();

        assert_eq!(successes, 1);
        assert!(ledger.snapshot().unwrap().budget_expenses.is_empty());
    }
}
