//! Record storage behind a [`Table`](crate::Table).
//!
//! A [`StorageEngine`] only maps keys to committed [`Record`]s. It knows
//! nothing about hooks or transactions: a table calls it from
//! [`Table::apply`](crate::Table) while the database write lock is held.

use super::record::Record;

/// Key to record map for one table.
///
/// Methods take `&self` so an engine can sit in a `Box<dyn StorageEngine>`
/// shared by readers and the committing writer. No method may block.
pub trait StorageEngine: Send + Sync + 'static {
    /// Stores `record` under `key` and returns the record it replaced.
    fn put(&self, key: &str, record: Record) -> Option<Record>;

    /// Committed record under `key`.
    fn get(&self, key: &str) -> Option<Record>;

    /// Drops the record under `key` and returns it.
    fn remove(&self, key: &str) -> Option<Record>;

    /// Number of committed records.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool;
}
