//! Account service
//!
//! Create and delete accounts. Deletion is blocked, never cascaded, while a
//! category or transaction still references the account.

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Account, AccountId, NewAccount};
use crate::storage::EntityStore;

use super::guard::IntegrityGuard;

/// Service for account commands
pub struct AccountService<'a> {
    store: &'a mut EntityStore,
}

impl<'a> AccountService<'a> {
    pub fn new(store: &'a mut EntityStore) -> Self {
        Self { store }
    }

    pub fn create(&mut self, account: NewAccount) -> LedgerResult<Account> {
        IntegrityGuard::new(self.store).can_create_account(&account)?;

        let account = self
            .store
            .accounts
            .insert_and_get(|id| account.into_account(id));
        tracing::debug!(account_id = %account.id, name = %account.name, "account created");
        Ok(account)
    }

    /// Returns the removed account
    pub fn delete(&mut self, id: AccountId) -> LedgerResult<Account> {
        self.store.accounts.require(id)?;
        IntegrityGuard::new(self.store).can_delete_account(id)?;

        let account = self
            .store
            .accounts
            .remove(id)
            .ok_or_else(|| LedgerError::account_not_found(id.to_string()))?;
        tracing::info!(account_id = %id, name = %account.name, "account deleted");
        Ok(account)
    }
}
