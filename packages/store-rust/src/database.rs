//! The database handle: named tables, write serialization, hook registration.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::ReentrantMutex;
use tablegate_core::{Fields, HookHost, MutationHook, TransactionId};
use tracing::{debug, info};

use crate::config::DatabaseConfig;
use crate::error::StoreError;
use crate::storage::Table;
use crate::transaction::Transaction;

/// In-memory transactional table store.
///
/// All writes, including hook evaluation, run under one database-wide
/// re-entrant write lock. Reads of committed data take no lock. Calling a
/// write method on the same `Database` from inside a
/// [`transaction`](Database::transaction) closure does not deadlock, but the
/// nested write commits on its own, independently of the outer transaction.
/// If it touched a key the outer transaction had already staged, the outer
/// commit fails with [`StoreError::KeyExists`] or
/// [`StoreError::WriteConflict`] instead of overwriting it.
pub struct Database {
    name: String,
    tables: DashMap<String, Arc<Table>>,
    write_lock: ReentrantMutex<()>,
    next_txn_id: AtomicU64,
}

impl Database {
    /// Creates an empty database with no tables.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tables: DashMap::new(),
            write_lock: ReentrantMutex::new(()),
            next_txn_id: AtomicU64::new(1),
        }
    }

    /// Opens a database and creates the tables declared in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TableExists`] if `config` declares a table twice.
    pub fn open(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let db = Self::new(config.name.clone());
        for table in &config.tables {
            db.create_table(table)?;
        }
        info!(db = %db.name, tables = db.tables.len(), "database opened");
        Ok(db)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Creates an empty table.
    ///
    /// Hooks installed before this call are not attached to the new table;
    /// use [`tablegate_core::install_table`] to cover it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TableExists`] if the name is taken.
    pub fn create_table(&self, name: &str) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock();
        if self.tables.contains_key(name) {
            return Err(StoreError::TableExists(name.to_string()));
        }
        self.tables
            .insert(name.to_string(), Arc::new(Table::new(name)));
        debug!(db = %self.name, table = name, "table created");
        Ok(())
    }

    #[must_use]
    pub fn has_table(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// Names of all tables, sorted.
    #[must_use]
    pub fn table_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tables.iter().map(|t| t.key().clone()).collect();
        names.sort_unstable();
        names
    }

    /// Returns a handle to the named table.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TableNotFound`] if there is no such table.
    pub fn table(&self, name: &str) -> Result<Arc<Table>, StoreError> {
        self.tables
            .get(name)
            .map(|t| Arc::clone(t.value()))
            .ok_or_else(|| StoreError::TableNotFound(name.to_string()))
    }

    /// Committed body of `key`, if present.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TableNotFound`] if there is no such table.
    pub fn get(&self, table: &str, key: &str) -> Result<Option<Fields>, StoreError> {
        Ok(self.table(table)?.get(key).map(|record| record.fields))
    }

    /// Number of committed records in `table`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TableNotFound`] if there is no such table.
    pub fn len(&self, table: &str) -> Result<usize, StoreError> {
        Ok(self.table(table)?.len())
    }

    /// Creates a record under `key` in its own transaction.
    ///
    /// # Errors
    ///
    /// See [`Transaction::add`].
    pub fn add(&self, table: &str, key: &str, fields: Fields) -> Result<(), StoreError> {
        self.run(None, |txn| txn.add(table, key, fields))
    }

    /// Applies `delta` to the record under `key` in its own transaction and
    /// returns the committed body.
    ///
    /// # Errors
    ///
    /// See [`Transaction::update`].
    pub fn update(&self, table: &str, key: &str, delta: Fields) -> Result<Fields, StoreError> {
        self.run(None, |txn| txn.update(table, key, delta))
    }

    /// Deletes the record under `key` in its own transaction.
    ///
    /// # Errors
    ///
    /// See [`Transaction::delete`].
    pub fn delete(&self, table: &str, key: &str) -> Result<bool, StoreError> {
        self.run(None, |txn| txn.delete(table, key))
    }

    /// Runs `f` in a new transaction and commits its writes if it returns `Ok`.
    ///
    /// If `f` returns `Err`, or a hook rejected any write, nothing is applied.
    ///
    /// # Errors
    ///
    /// Returns the error from `f`, [`StoreError::TransactionAborted`] if `f`
    /// returned `Ok` after a hook rejection, or [`StoreError::KeyExists`] /
    /// [`StoreError::WriteConflict`] if a nested write changed a staged key.
    pub fn transaction<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut Transaction<'_>) -> Result<T, StoreError>,
    {
        let id = self.next_txn_id.fetch_add(1, Ordering::Relaxed);
        self.run(Some(id), f)
    }

    fn run<T, F>(&self, id: Option<TransactionId>, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut Transaction<'_>) -> Result<T, StoreError>,
    {
        let _guard = self.write_lock.lock();
        let mut txn = Transaction::new(self, id);

        match f(&mut txn) {
            Ok(value) => {
                let written = txn.commit().inspect_err(|err| {
                    debug!(txn_id = id, error = %err, "transaction aborted after hook rejection");
                })?;
                debug!(txn_id = id, written, "transaction committed");
                Ok(value)
            }
            Err(err) => {
                debug!(txn_id = id, error = %err, "transaction rolled back");
                Err(err)
            }
        }
    }
}

impl HookHost for Database {
    fn table_names(&self) -> Vec<String> {
        Database::table_names(self)
    }

    fn register_hook(&self, table: &str, hook: Arc<dyn MutationHook>) -> anyhow::Result<()> {
        self.table(table)?.register_hook(hook);
        debug!(db = %self.name, table, "hook registered");
        Ok(())
    }
}
