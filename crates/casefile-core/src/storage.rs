//! Key-value store abstraction.
//!
//! Progress and preferences are persisted as text values under a small set
//! of well-known keys. Implementations decide where the bytes live.

use async_trait::async_trait;

use crate::error::DomainError;

/// Asynchronous string key-value store.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Store `value` under `key`, overwriting any previous value.
    async fn save(&self, key: &str, value: &str) -> Result<(), DomainError>;

    /// Load the value stored under `key`, or `None` if absent.
    async fn load(&self, key: &str) -> Result<Option<String>, DomainError>;

    /// Delete the value stored under `key`. Clearing an absent key succeeds.
    async fn clear(&self, key: &str) -> Result<(), DomainError>;
}
