//! [`StorageEngine`] over a [`DashMap`].

use dashmap::DashMap;

use crate::storage::engine::StorageEngine;
use crate::storage::record::Record;

/// Default table engine.
///
/// Reads of committed records go straight to the map without touching the
/// database write lock; writes only ever come from a committing transaction.
#[derive(Default)]
pub struct HashMapStorage {
    records: DashMap<String, Record>,
}

impl HashMapStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageEngine for HashMapStorage {
    fn put(&self, key: &str, record: Record) -> Option<Record> {
        self.records.insert(key.to_owned(), record)
    }

    fn get(&self, key: &str) -> Option<Record> {
        self.records.get(key).map(|entry| entry.value().clone())
    }

    fn remove(&self, key: &str) -> Option<Record> {
        self.records.remove(key).map(|(_, record)| record)
    }

    fn len(&self) -> usize {
        self.records.len()
    }

    fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
