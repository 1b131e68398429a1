//! Concrete [`StorageEngine`](crate::storage::StorageEngine) implementations.

pub mod hashmap;

pub use hashmap::HashMapStorage;
