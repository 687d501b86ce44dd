//! Casefile — durable key-value storage.
//!
//! Persists saved progress and player preferences between runs.

pub mod file_store;

pub use file_store::FileKeyValueStore;
