//! Test stores — mock `KeyValueStore` implementations for tests.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use casefile_core::error::DomainError;
use casefile_core::storage::KeyValueStore;

/// One call made against a `RecordingKeyValueStore`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOperation {
    /// `save(key, value)`.
    Save {
        /// Key written.
        key: String,
        /// Value written.
        value: String,
    },
    /// `load(key)`.
    Load {
        /// Key read.
        key: String,
    },
    /// `clear(key)`.
    Clear {
        /// Key deleted.
        key: String,
    },
}

/// An in-memory store that records every call made against it.
#[derive(Debug, Default)]
pub struct RecordingKeyValueStore {
    entries: Mutex<BTreeMap<String, String>>,
    operations: Mutex<Vec<StoreOperation>>,
}

impl RecordingKeyValueStore {
    /// Create an empty recording store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a value before the test runs. Seeding is not recorded.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn with_entry(self, key: &str, value: &str) -> Self {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_owned(), value.to_owned());
        self
    }

    /// Current value stored under `key`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn value(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    /// Returns a snapshot of all recorded calls.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn operations(&self) -> Vec<StoreOperation> {
        self.operations.lock().unwrap().clone()
    }

    /// Returns only the recorded `save` calls.
    pub fn saves(&self) -> Vec<(String, String)> {
        self.operations()
            .into_iter()
            .filter_map(|op| match op {
                StoreOperation::Save { key, value } => Some((key, value)),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl KeyValueStore for RecordingKeyValueStore {
    async fn save(&self, key: &str, value: &str) -> Result<(), DomainError> {
        self.operations.lock().unwrap().push(StoreOperation::Save {
            key: key.to_owned(),
            value: value.to_owned(),
        });
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn load(&self, key: &str) -> Result<Option<String>, DomainError> {
        self.operations.lock().unwrap().push(StoreOperation::Load {
            key: key.to_owned(),
        });
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn clear(&self, key: &str) -> Result<(), DomainError> {
        self.operations.lock().unwrap().push(StoreOperation::Clear {
            key: key.to_owned(),
        });
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}

/// A store that always returns an infrastructure error. Useful for testing
/// best-effort persistence paths.
#[derive(Debug)]
pub struct FailingKeyValueStore;

#[async_trait]
impl KeyValueStore for FailingKeyValueStore {
    async fn save(&self, _key: &str, _value: &str) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("disk full".into()))
    }

    async fn load(&self, _key: &str) -> Result<Option<String>, DomainError> {
        Err(DomainError::Infrastructure("storage unavailable".into()))
    }

    async fn clear(&self, _key: &str) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("storage unavailable".into()))
    }
}
