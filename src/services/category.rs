//! Category service
//!
//! Categories are created under an existing account and can only be deleted
//! once no transaction references them.

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Category, CategoryId, NewCategory};
use crate::storage::EntityStore;

use super::guard::IntegrityGuard;

/// Service for category commands
pub struct CategoryService<'a> {
    store: &'a mut EntityStore,
}

impl<'a> CategoryService<'a> {
    pub fn new(store: &'a mut EntityStore) -> Self {
        Self { store }
    }

    pub fn create(&mut self, category: NewCategory) -> LedgerResult<Category> {
        IntegrityGuard::new(self.store).can_create_category(&category)?;

        let category = self
            .store
            .categories
            .insert_and_get(|id| category.into_category(id));
        tracing::debug!(
            category_id = %category.id,
            account_id = %category.account_id,
            name = %category.name,
            "category created"
        );
        Ok(category)
    }

    pub fn delete(&mut self, id: CategoryId) -> LedgerResult<Category> {
        self.store.categories.require(id)?;
        IntegrityGuard::new(self.store).can_delete_category(id)?;

        let category = self
            .store
            .categories
            .remove(id)
            .ok_or_else(|| LedgerError::category_not_found(id.to_string()))?;
        tracing::info!(category_id = %id, name = %category.name, "category deleted");
        Ok(category)
    }
}
