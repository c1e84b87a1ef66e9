//! In-memory table for one record kind
//!
//! Records are keyed by id and reachable through the secondary indexes their
//! kind declares. Reads always reflect every earlier put and delete.

use std::collections::{BTreeSet, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::PennywiseError;

use super::record::{IndexName, Record};

struct TableInner<R: Record> {
    records: HashMap<R::Id, R>,
    indexes: HashMap<(IndexName, String), BTreeSet<R::Id>>,
}

impl<R: Record> TableInner<R> {
    fn new() -> Self {
        Self {
            records: HashMap::new(),
            indexes: HashMap::new(),
        }
    }

    fn unindex(&mut self, record: &R) {
        for key in record.index_keys() {
            if let Some(ids) = self.indexes.get_mut(&key) {
                ids.remove(&record.id());
                if ids.is_empty() {
                    self.indexes.remove(&key);
                }
            }
        }
    }

    fn insert(&mut self, record: R) {
        if let Some(previous) = self.records.remove(&record.id()) {
            self.unindex(&previous);
        }
        for key in record.index_keys() {
            self.indexes.entry(key).or_default().insert(record.id());
        }
        self.records.insert(record.id(), record);
    }

    fn remove(&mut self, id: &R::Id) -> Option<R> {
        let removed = self.records.remove(id)?;
        self.unindex(&removed);
        Some(removed)
    }
}

/// Keyed storage for one record kind with secondary indexes
pub struct Table<R: Record> {
    inner: RwLock<TableInner<R>>,
}

impl<R: Record> Default for Table<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> Table<R> {
    /// Create an empty table
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(TableInner::new()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, TableInner<R>>, PennywiseError> {
        self.inner.read().map_err(|e| {
            PennywiseError::Storage(format!("Failed to acquire {} read lock: {}", R::KIND, e))
        })
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, TableInner<R>>, PennywiseError> {
        self.inner.write().map_err(|e| {
            PennywiseError::Storage(format!("Failed to acquire {} write lock: {}", R::KIND, e))
        })
    }

    /// Get a record by id
    pub fn get(&self, id: R::Id) -> Result<Option<R>, PennywiseError> {
        Ok(self.read()?.records.get(&id).cloned())
    }

    /// Get all records, oldest first
    pub fn get_all(&self) -> Result<Vec<R>, PennywiseError> {
        let inner = self.read()?;
        let mut list: Vec<_> = inner.records.values().cloned().collect();
        sort_records(&mut list);
        Ok(list)
    }

    /// Get every record reachable under an index key, oldest first
    pub fn get_by_index(&self, index: IndexName, key: &str) -> Result<Vec<R>, PennywiseError> {
        let inner = self.read()?;
        let mut list: Vec<_> = inner
            .indexes
            .get(&(index, key.to_string()))
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| inner.records.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default();
        sort_records(&mut list);
        Ok(list)
    }

    /// Insert or replace a record by id
    pub fn put(&self, record: R) -> Result<(), PennywiseError> {
        self.write()?.insert(record);
        Ok(())
    }

    /// Delete a record, returning it if it existed
    pub fn delete(&self, id: R::Id) -> Result<Option<R>, PennywiseError> {
        Ok(self.write()?.remove(&id))
    }

    /// Delete every record reachable under an index key
    pub fn delete_by_index(&self, index: IndexName, key: &str) -> Result<usize, PennywiseError> {
        let mut inner = self.write()?;
        let ids: Vec<R::Id> = inner
            .indexes
            .get(&(index, key.to_string()))
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default();
        for id in &ids {
            inner.remove(id);
        }
        Ok(ids.len())
    }

    /// Check whether a record exists
    pub fn contains(&self, id: R::Id) -> Result<bool, PennywiseError> {
        Ok(self.read()?.records.contains_key(&id))
    }

    /// Count records
    pub fn count(&self) -> Result<usize, PennywiseError> {
        Ok(self.read()?.records.len())
    }

    /// Remove every record
    pub fn clear(&self) -> Result<(), PennywiseError> {
        *self.write()? = TableInner::new();
        Ok(())
    }

    /// Replace the whole table contents
    pub fn replace_all(&self, records: Vec<R>) -> Result<(), PennywiseError> {
        let mut fresh = TableInner::new();
        for record in records {
            fresh.insert(record);
        }
        *self.write()? = fresh;
        Ok(())
    }
}

fn sort_records<R: Record>(list: &mut [R]) {
    list.sort_by(|a, b| {
        a.created_at()
            .cmp(&b.created_at())
            .then_with(|| a.id().cmp(&b.id()))
    });
}
