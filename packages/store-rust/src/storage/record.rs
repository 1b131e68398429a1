//! Record types for the storage layer.
//!
//! Defines the unit stored in a [`StorageEngine`](super::StorageEngine):
//! [`Record`] and its [`RecordMetadata`].

use std::time::{SystemTime, UNIX_EPOCH};

use tablegate_core::Fields;

/// Returns the current wall-clock time as milliseconds since the Unix epoch.
///
/// Millisecond timestamps fit comfortably in i64 until the year 292 million.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}

/// Metadata tracked for every stored record.
///
/// Store-internal: never passed to hooks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordMetadata {
    /// Record version, incremented on every committed update.
    pub version: u32,
    /// Wall-clock time (millis since epoch) when this record was created.
    pub creation_time: i64,
    /// Wall-clock time of the last committed write.
    pub last_update_time: i64,
}

impl RecordMetadata {
    /// Creates metadata for a freshly created record.
    ///
    /// Version starts at 1; both timestamps are set to `now`.
    #[must_use]
    pub fn new(now: i64) -> Self {
        Self {
            version: 1,
            creation_time: now,
            last_update_time: now,
        }
    }

    /// Records a committed write: increments `version` and updates `last_update_time`.
    pub fn on_update(&mut self, now: i64) {
        self.version = self.version.saturating_add(1);
        self.last_update_time = now;
    }
}

/// A complete record: field values plus store-internal metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// The record body as seen by applications and hooks.
    pub fields: Fields,
    /// Store-internal metadata.
    pub metadata: RecordMetadata,
}
