//! JSON-file implementation of the `KeyValueStore` trait.
//!
//! All keys live in one JSON object. Every write replaces the whole file by
//! writing a sibling temporary file and renaming it over the original, so a
//! crash mid-write leaves either the old or the new contents.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;

use casefile_core::error::DomainError;
use casefile_core::storage::KeyValueStore;

type Entries = BTreeMap<String, String>;

/// File-backed key-value store.
#[derive(Debug)]
pub struct FileKeyValueStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileKeyValueStore {
    /// Creates a store backed by `path`. The file is created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// The backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_entries(&self) -> Result<Entries, DomainError> {
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Entries::new()),
            Err(e) => {
                return Err(DomainError::Infrastructure(format!(
                    "failed to read {}: {e}",
                    self.path.display()
                )));
            }
        };
        if text.trim().is_empty() {
            return Ok(Entries::new());
        }
        match serde_json::from_str(&text) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "store file is unreadable; starting empty");
                Ok(Entries::new())
            }
        }
    }

    async fn write_entries(&self, entries: &Entries) -> Result<(), DomainError> {
        let text = serde_json::to_string_pretty(entries)
            .map_err(|e| DomainError::Infrastructure(format!("store encoding failed: {e}")))?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| io_error("create directory", parent, &e))?;
        }

        let temp = self.temp_path();
        tokio::fs::write(&temp, text)
            .await
            .map_err(|e| io_error("write", &temp, &e))?;
        tokio::fs::rename(&temp, &self.path)
            .await
            .map_err(|e| io_error("replace", &self.path, &e))
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".tmp");
        PathBuf::from(name)
    }
}

fn io_error(action: &str, path: &Path, error: &std::io::Error) -> DomainError {
    DomainError::Infrastructure(format!("failed to {action} {}: {error}", path.display()))
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn save(&self, key: &str, value: &str) -> Result<(), DomainError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_entries().await?;
        entries.insert(key.to_owned(), value.to_owned());
        self.write_entries(&entries).await?;
        tracing::debug!(key, path = %self.path.display(), "stored value");
        Ok(())
    }

    async fn load(&self, key: &str) -> Result<Option<String>, DomainError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_entries().await?;
        Ok(entries.remove(key))
    }

    async fn clear(&self, key: &str) -> Result<(), DomainError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_entries().await?;
        if entries.remove(key).is_some() {
            self.write_entries(&entries).await?;
            tracing::debug!(key, path = %self.path.display(), "cleared value");
        }
        Ok(())
    }
}
