//! Per-table storage: engine plus pre-commit hooks.
//!
//! A [`Table`] owns its [`StorageEngine`] and the [`CompositeMutationHook`]
//! consulted before every create and update. It does not decide when writes
//! happen; [`Transaction`](crate::Transaction) stages them and applies them
//! through [`Table::apply`] on commit.

use std::sync::Arc;

use tablegate_core::{Fields, MutationContext, MutationHook, ValidationError};

use super::engine::StorageEngine;
use super::engines::HashMapStorage;
use super::hooks::CompositeMutationHook;
use super::record::{now_millis, Record, RecordMetadata};

/// Final state of one key after a transaction, applied on commit.
#[derive(Debug, Clone, PartialEq)]
pub enum PendingWrite {
    /// Store a new record with fresh metadata, replacing any record the
    /// transaction deleted earlier under the same key.
    Create(Fields),
    /// Replace the fields of the committed record and bump its version.
    Update(Fields),
    /// Remove the record.
    Delete,
}

impl PendingWrite {
    /// Body this write leaves behind, or `None` for a delete.
    #[must_use]
    pub fn fields(&self) -> Option<&Fields> {
        match self {
            PendingWrite::Create(fields) | PendingWrite::Update(fields) => Some(fields),
            PendingWrite::Delete => None,
        }
    }
}

/// One named table.
pub struct Table {
    name: String,
    engine: Box<dyn StorageEngine>,
    hooks: CompositeMutationHook,
}

impl Table {
    /// Creates an empty table backed by [`HashMapStorage`].
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            engine: Box::new(HashMapStorage::new()),
            hooks: CompositeMutationHook::default(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attaches a pre-commit hook to this table's create and update paths.
    pub fn register_hook(&self, hook: Arc<dyn MutationHook>) {
        self.hooks.add(hook);
    }

    /// Number of hooks attached to this table.
    #[must_use]
    pub fn hook_count(&self) -> usize {
        self.hooks.len()
    }

    /// Committed record for `key`, including metadata.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Record> {
        self.engine.get(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.engine.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.engine.is_empty()
    }

    /// Runs the creating hooks for `record`.
    pub(crate) fn check_create(
        &self,
        ctx: &MutationContext<'_>,
        record: &Fields,
    ) -> Result<(), ValidationError> {
        self.hooks.creating(ctx, record)
    }

    /// Runs the updating hooks for `delta` over `existing`.
    pub(crate) fn check_update(
        &self,
        ctx: &MutationContext<'_>,
        delta: &Fields,
        existing: &Fields,
    ) -> Result<(), ValidationError> {
        self.hooks.updating(ctx, delta, existing)
    }

    /// Metadata of the committed record under `key`.
    pub(crate) fn metadata(&self, key: &str) -> Option<RecordMetadata> {
        self.engine.get(key).map(|record| record.metadata)
    }

    /// Applies a committed write to the engine, maintaining metadata.
    pub(crate) fn apply(&self, key: &str, write: PendingWrite) {
        let now = now_millis();
        match write {
            PendingWrite::Create(fields) => {
                let metadata = RecordMetadata::new(now);
                self.engine.put(key, Record { fields, metadata });
            }
            PendingWrite::Update(fields) => {
                let metadata = match self.metadata(key) {
                    Some(mut metadata) => {
                        metadata.on_update(now);
                        metadata
                    }
                    None => RecordMetadata::new(now),
                };
                self.engine.put(key, Record { fields, metadata });
            }
            PendingWrite::Delete => {
                self.engine.remove(key);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use tablegate_core::Value;

    use super::*;

    fn body(n: i64) -> Fields {
        let mut fields = Fields::new();
        fields.insert("n".to_string(), Value::Int(n));
        fields
    }

    #[test]
    fn apply_update_bumps_version() {
        let table = Table::new("t");

        table.apply("k", PendingWrite::Create(body(1)));
        let created = table.get("k").unwrap();
        assert_eq!(created.metadata.version, 1);

        table.apply("k", PendingWrite::Update(body(2)));
        let updated = table.get("k").unwrap();
        assert_eq!(updated.metadata.version, 2);
        assert_eq!(updated.metadata.creation_time, created.metadata.creation_time);
        assert_eq!(updated.fields, body(2));
    }

    #[test]
    fn apply_create_over_existing_resets_metadata() {
        let table = Table::new("t");
        table.apply("k", PendingWrite::Create(body(1)));
        table.apply("k", PendingWrite::Update(body(2)));

        table.apply("k", PendingWrite::Create(body(3)));

        let record = table.get("k").unwrap();
        assert_eq!(record.metadata.version, 1);
        assert_eq!(record.metadata.creation_time, record.metadata.last_update_time);
        assert_eq!(record.fields, body(3));
    }

    #[test]
    fn apply_delete_removes() {
        let table = Table::new("t");
        table.apply("k", PendingWrite::Create(body(1)));
        table.apply("k", PendingWrite::Delete);

        assert!(table.get("k").is_none());
        assert!(table.metadata("k").is_none());
        assert!(table.is_empty());
        assert_eq!(table.len(), 0);
    }

    #[test]
    fn table_without_hooks_accepts_everything() {
        let table = Table::new("t");
        let ctx = MutationContext::new("t", "k", None);

        assert_eq!(table.hook_count(), 0);
        assert!(table.check_create(&ctx, &body(-1)).is_ok());
        assert!(table.check_update(&ctx, &body(-1), &body(1)).is_ok());
    }
}
