//! Transaction service
//!
//! Transactions have no dependents, so deletion is unconditional. Creation
//! goes through the guard's reference checks. This family carries no
//! rollups; account totals are computed on read by the query layer.

use crate::error::{LedgerError, LedgerResult};
use crate::models::{NewTransaction, Transaction, TransactionId};
use crate::storage::EntityStore;

use super::guard::IntegrityGuard;

/// Service for transaction commands
pub struct TransactionService<'a> {
    store: &'a mut EntityStore,
}

impl<'a> TransactionService<'a> {
    pub fn new(store: &'a mut EntityStore) -> Self {
        Self { store }
    }

    pub fn create(&mut self, txn: NewTransaction) -> LedgerResult<Transaction> {
        IntegrityGuard::new(self.store).can_create_transaction(&txn)?;

        let txn = self
            .store
            .transactions
            .insert_and_get(|id| txn.into_transaction(id));
        tracing::debug!(
            transaction_id = %txn.id,
            account_id = %txn.account_id,
            category_id = %txn.category_id,
            kind = %txn.kind,
            amount = %txn.amount(),
            "transaction created"
        );
        Ok(txn)
    }

    pub fn delete(&mut self, id: TransactionId) -> LedgerResult<Transaction> {
        let txn = self
            .store
            .transactions
            .remove(id)
            .ok_or_else(|| LedgerError::transaction_not_found(id.to_string()))?;
        tracing::info!(transaction_id = %id, amount = %txn.amount(), "transaction deleted");
        Ok(txn)
    }
}
