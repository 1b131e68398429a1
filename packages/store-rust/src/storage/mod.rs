//! Table storage for the `Tablegate` store.
//!
//! Provides the layers below the transaction machinery:
//!
//! - [`StorageEngine`]: low-level in-memory key-value storage per table
//! - [`Table`]: engine plus the [`CompositeMutationHook`] consulted before
//!   every create and update
//! - [`Record`] / [`RecordMetadata`]: the stored unit

pub mod engine;
pub mod engines;
pub mod hooks;
pub mod record;
pub mod table;

pub use engine::*;
pub use engines::HashMapStorage;
pub use hooks::*;
pub use record::{Record, RecordMetadata};
pub use table::*;
