//! Keyed in-memory table with monotonic id assignment
//!
//! A table is a dumb container: it assigns ids, stores records and answers
//! predicate scans. It never validates the records it holds.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    Account, AccountId, Budget, BudgetExpense, BudgetExpenseId, BudgetId, Category, CategoryId,
    Transaction, TransactionId,
};

/// A record that can live in a [`Table`]
pub trait Record: Clone {
    type Id: Copy + Ord + fmt::Display + From<u64>;

    /// Human-readable entity name used in errors
    const ENTITY: &'static str;

    fn id(&self) -> Self::Id;
}

macro_rules! impl_record {
    ($record:ty, $id:ty, $entity:literal) => {
        impl Record for $record {
            type Id = $id;
            const ENTITY: &'static str = $entity;

            fn id(&self) -> Self::Id {
                self.id
            }
        }
    };
}

impl_record!(Account, AccountId, "Account");
impl_record!(Category, CategoryId, "Category");
impl_record!(Transaction, TransactionId, "Transaction");
impl_record!(Budget, BudgetId, "Budget");
impl_record!(BudgetExpense, BudgetExpenseId, "Budget Expense");

/// Records of one entity type, ordered by id (which is creation order)
#[derive(Debug, Clone)]
pub struct Table<R: Record> {
    rows: BTreeMap<R::Id, R>,
    /// Last id handed out; ids are never reused, even after removal
    last_id: u64,
}

impl<R: Record> Default for Table<R> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            last_id: 0,
        }
    }
}

impl<R: Record> Table<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign the next id, build the record under it and store it
    ///
    /// # Panics
    ///
    /// Panics if the builder returns a record with a different id or the id
    /// is already taken. Both mean the table's counter has been corrupted.
    pub fn insert_with(&mut self, build: impl FnOnce(R::Id) -> R) -> R::Id {
        self.last_id += 1;
        let id = R::Id::from(self.last_id);
        let record = build(id);
        assert!(
            record.id() == id,
            "{} built with id {} but {} was assigned",
            R::ENTITY,
            record.id(),
            id
        );
        let previous = self.rows.insert(id, record);
        assert!(
            previous.is_none(),
            "{} identifier collision on {}",
            R::ENTITY,
            id
        );
        id
    }

    /// Like [`Table::insert_with`] but hands back a copy of the stored record
    pub fn insert_and_get(&mut self, build: impl FnOnce(R::Id) -> R) -> R {
        let id = self.insert_with(build);
        self.rows[&id].clone()
    }

    pub fn get(&self, id: R::Id) -> Option<&R> {
        self.rows.get(&id)
    }

    /// Get a record or a `NotFound` error naming the entity
    pub fn require(&self, id: R::Id) -> LedgerResult<&R> {
        self.rows.get(&id).ok_or_else(|| LedgerError::NotFound {
            entity_type: R::ENTITY,
            identifier: id.to_string(),
        })
    }

    pub fn get_mut(&mut self, id: R::Id) -> Option<&mut R> {
        self.rows.get_mut(&id)
    }

    pub fn contains(&self, id: R::Id) -> bool {
        self.rows.contains_key(&id)
    }

    pub fn remove(&mut self, id: R::Id) -> Option<R> {
        self.rows.remove(&id)
    }

    /// Remove every record matching the predicate, returning them in id order
    pub fn remove_where(&mut self, predicate: impl Fn(&R) -> bool) -> Vec<R> {
        let ids: Vec<R::Id> = self
            .rows
            .values()
            .filter(|r| predicate(r))
            .map(|r| r.id())
            .collect();
        ids.into_iter()
            .filter_map(|id| self.rows.remove(&id))
            .collect()
    }

    /// Clone every record matching the predicate, in id order
    pub fn list_where(&self, predicate: impl Fn(&R) -> bool) -> Vec<R> {
        self.rows.values().filter(|r| predicate(r)).cloned().collect()
    }

    pub fn any(&self, predicate: impl Fn(&R) -> bool) -> bool {
        self.rows.values().any(predicate)
    }

    pub fn iter(&self) -> impl Iterator<Item = &R> {
        self.rows.values()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
