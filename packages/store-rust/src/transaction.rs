//! Write transactions.
//!
//! A [`Transaction`] stages creates, updates and deletes against one
//! [`Database`]. Hooks run when a write is staged, while the database write
//! lock is held, so the record they see is exactly what the write builds on.
//! Nothing reaches the tables until the transaction commits.
//!
//! Each staged key remembers the committed record metadata it was staged
//! against. Commit refuses to apply if a write outside the transaction (a
//! nested [`Database::add`] from inside the closure, for instance) changed
//! that record in the meantime.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::sync::Arc;

use tablegate_core::{merge, Fields, MutationContext, TransactionId, ValidationError};

use crate::database::Database;
use crate::error::StoreError;
use crate::storage::{PendingWrite, RecordMetadata, Table};

/// A staged write and the committed state it was based on.
struct Staged {
    write: PendingWrite,
    base: Option<RecordMetadata>,
}

/// Writes staged for one table.
struct TableWrites {
    table: Arc<Table>,
    writes: BTreeMap<String, Staged>,
}

/// An in-flight write transaction.
///
/// Obtained through [`Database::transaction`]. Later operations see the
/// effects of earlier ones in the same transaction. Once a hook rejects a
/// write the transaction is poisoned: every further call returns
/// [`StoreError::TransactionAborted`] and nothing is committed, even if the
/// closure swallows the original error.
pub struct Transaction<'db> {
    db: &'db Database,
    id: Option<TransactionId>,
    pending: BTreeMap<String, TableWrites>,
    aborted: Option<String>,
}

impl<'db> Transaction<'db> {
    pub(crate) fn new(db: &'db Database, id: Option<TransactionId>) -> Self {
        Self {
            db,
            id,
            pending: BTreeMap::new(),
            aborted: None,
        }
    }

    /// Identifier passed to hooks. `None` for the implicit single-write
    /// transactions behind [`Database::add`] and friends.
    #[must_use]
    pub fn id(&self) -> Option<TransactionId> {
        self.id
    }

    /// Whether a hook has rejected a write in this transaction.
    #[must_use]
    pub fn is_aborted(&self) -> bool {
        self.aborted.is_some()
    }

    /// Reads `key` as this transaction currently sees it.
    ///
    /// # Errors
    ///
    /// [`StoreError::TableNotFound`] or [`StoreError::TransactionAborted`].
    pub fn get(&self, table: &str, key: &str) -> Result<Option<Fields>, StoreError> {
        self.ensure_active()?;
        let table = self.db.table(table)?;
        Ok(self.current(&table, key))
    }

    /// Creates a record under `key`.
    ///
    /// # Errors
    ///
    /// [`StoreError::KeyExists`] if `key` is present, [`StoreError::Validation`]
    /// if a hook rejects the record (which also aborts the transaction),
    /// [`StoreError::TableNotFound`] or [`StoreError::TransactionAborted`].
    pub fn add(&mut self, table: &str, key: &str, fields: Fields) -> Result<(), StoreError> {
        self.ensure_active()?;
        let table = self.db.table(table)?;
        if self.current(&table, key).is_some() {
            return Err(StoreError::KeyExists {
                table: table.name().to_string(),
                key: key.to_string(),
            });
        }

        let ctx = MutationContext::new(table.name(), key, self.id);
        if let Err(err) = table.check_create(&ctx, &fields) {
            return Err(self.abort(err));
        }

        self.stage(table, key, PendingWrite::Create(fields));
        Ok(())
    }

    /// Applies `delta` to the record under `key` and returns the merged body.
    ///
    /// # Errors
    ///
    /// [`StoreError::KeyNotFound`] if `key` is absent, [`StoreError::Validation`]
    /// if a hook rejects the update (which also aborts the transaction),
    /// [`StoreError::TableNotFound`] or [`StoreError::TransactionAborted`].
    pub fn update(&mut self, table: &str, key: &str, delta: Fields) -> Result<Fields, StoreError> {
        self.ensure_active()?;
        let table = self.db.table(table)?;
        let Some(existing) = self.current(&table, key) else {
            return Err(StoreError::KeyNotFound {
                table: table.name().to_string(),
                key: key.to_string(),
            });
        };

        let ctx = MutationContext::new(table.name(), key, self.id);
        if let Err(err) = table.check_update(&ctx, &delta, &existing) {
            return Err(self.abort(err));
        }

        let merged = merge(&existing, &delta);
        // a record created earlier in this transaction stays a create
        let write = if self.staged_create(&table, key) {
            PendingWrite::Create(merged.clone())
        } else {
            PendingWrite::Update(merged.clone())
        };
        self.stage(table, key, write);
        Ok(merged)
    }

    /// Deletes the record under `key`. Returns whether it existed.
    ///
    /// Deletes do not run hooks.
    ///
    /// # Errors
    ///
    /// [`StoreError::TableNotFound`] or [`StoreError::TransactionAborted`].
    pub fn delete(&mut self, table: &str, key: &str) -> Result<bool, StoreError> {
        self.ensure_active()?;
        let table = self.db.table(table)?;
        if self.current(&table, key).is_none() {
            return Ok(false);
        }
        self.stage(table, key, PendingWrite::Delete);
        Ok(true)
    }

    /// Applies all staged writes. Returns the number of keys written.
    ///
    /// Nothing is applied if any staged key's committed record changed since
    /// it was staged. Must be called with the database write lock held.
    pub(crate) fn commit(self) -> Result<usize, StoreError> {
        if let Some(reason) = self.aborted {
            return Err(StoreError::TransactionAborted { reason });
        }

        for TableWrites { table, writes } in self.pending.values() {
            for (key, staged) in writes {
                let committed = table.metadata(key);
                if committed == staged.base {
                    continue;
                }
                let (table, key) = (table.name().to_string(), key.clone());
                return Err(match (&staged.base, &staged.write) {
                    (None, PendingWrite::Create(_)) => StoreError::KeyExists { table, key },
                    _ => StoreError::WriteConflict { table, key },
                });
            }
        }

        let mut written = 0;
        for TableWrites { table, writes } in self.pending.into_values() {
            for (key, staged) in writes {
                table.apply(&key, staged.write);
                written += 1;
            }
        }
        Ok(written)
    }

    fn ensure_active(&self) -> Result<(), StoreError> {
        match &self.aborted {
            Some(reason) => Err(StoreError::TransactionAborted {
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }

    fn abort(&mut self, err: ValidationError) -> StoreError {
        self.aborted = Some(err.to_string());
        StoreError::Validation(err)
    }

    fn current(&self, table: &Table, key: &str) -> Option<Fields> {
        let staged = self
            .pending
            .get(table.name())
            .and_then(|t| t.writes.get(key));
        match staged {
            Some(staged) => staged.write.fields().cloned(),
            None => table.get(key).map(|record| record.fields),
        }
    }

    fn staged_create(&self, table: &Table, key: &str) -> bool {
        self.pending
            .get(table.name())
            .and_then(|t| t.writes.get(key))
            .is_some_and(|staged| matches!(staged.write, PendingWrite::Create(_)))
    }

    fn stage(&mut self, table: Arc<Table>, key: &str, write: PendingWrite) {
        let base = table.metadata(key);
        let writes = &mut self
            .pending
            .entry(table.name().to_string())
            .or_insert_with(|| TableWrites {
                table,
                writes: BTreeMap::new(),
            })
            .writes;
        match writes.entry(key.to_string()) {
            Entry::Occupied(mut entry) => entry.get_mut().write = write,
            Entry::Vacant(entry) => {
                entry.insert(Staged { write, base });
            }
        }
    }
}
