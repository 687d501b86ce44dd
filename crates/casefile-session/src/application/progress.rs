//! Saved progress and player preferences.
//!
//! Values are JSON text under fixed keys. A value that cannot be decoded is
//! treated as absent so that a corrupt save never blocks play.

use std::fmt;
use std::sync::Arc;

use casefile_core::error::DomainError;
use casefile_core::storage::KeyValueStore;

use crate::domain::state::GameState;

/// Key under which the in-progress `GameState` is stored.
pub const GAME_STATE_KEY: &str = "detective_game_save";

/// Key under which the accessibility preference is stored.
pub const ACCESSIBILITY_KEY: &str = "detective_accessibility_mode";

/// Typed access to the key-value store.
#[derive(Clone)]
pub struct ProgressStore {
    store: Arc<dyn KeyValueStore>,
}

impl fmt::Debug for ProgressStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressStore").finish_non_exhaustive()
    }
}

impl ProgressStore {
    /// Wraps a key-value store.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Writes the current game state.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if encoding or the write fails.
    pub async fn save_game_state(&self, state: &GameState) -> Result<(), DomainError> {
        let value = serde_json::to_string(state)
            .map_err(|e| DomainError::Infrastructure(format!("game state encoding failed: {e}")))?;
        self.store.save(GAME_STATE_KEY, &value).await
    }

    /// Reads the saved game state. A missing or undecodable value yields
    /// `None`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the store cannot be read.
    pub async fn load_game_state(&self) -> Result<Option<GameState>, DomainError> {
        let Some(value) = self.store.load(GAME_STATE_KEY).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&value) {
            Ok(state) => Ok(Some(state)),
            Err(e) => {
                tracing::warn!(key = GAME_STATE_KEY, error = %e, "discarding unreadable saved game");
                Ok(None)
            }
        }
    }

    /// Deletes the saved game state.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the store cannot be written.
    pub async fn clear_game_state(&self) -> Result<(), DomainError> {
        self.store.clear(GAME_STATE_KEY).await
    }

    /// Writes the accessibility preference.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the write fails.
    pub async fn save_accessibility_mode(&self, enabled: bool) -> Result<(), DomainError> {
        let value = if enabled { "true" } else { "false" };
        self.store.save(ACCESSIBILITY_KEY, value).await
    }

    /// Reads the accessibility preference. Missing or undecodable values
    /// read as `false`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the store cannot be read.
    pub async fn load_accessibility_mode(&self) -> Result<bool, DomainError> {
        let Some(value) = self.store.load(ACCESSIBILITY_KEY).await? else {
            return Ok(false);
        };
        match serde_json::from_str::<bool>(&value) {
            Ok(enabled) => Ok(enabled),
            Err(e) => {
                tracing::warn!(key = ACCESSIBILITY_KEY, error = %e, "ignoring unreadable accessibility preference");
                Ok(false)
            }
        }
    }
}
