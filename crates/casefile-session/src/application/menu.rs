//! Main-menu queries.

use std::sync::Arc;

use casefile_core::error::DomainError;
use casefile_mission::MissionRepository;

use crate::application::progress::ProgressStore;
use crate::domain::commands::StartMission;
use crate::domain::state::GameState;

/// Answers the questions the main menu asks before a session exists.
#[derive(Debug, Clone)]
pub struct MainMenu {
    missions: Arc<MissionRepository>,
    progress: ProgressStore,
}

impl MainMenu {
    /// Creates a menu over the loaded missions and the progress store.
    #[must_use]
    pub fn new(missions: Arc<MissionRepository>, progress: ProgressStore) -> Self {
        Self { missions, progress }
    }

    /// The saved game, if it is readable and its mission is still loaded.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the store cannot be read.
    pub async fn saved_progress(&self) -> Result<Option<GameState>, DomainError> {
        let saved = self.progress.load_game_state().await?;
        Ok(saved.filter(|state| {
            let known = self.missions.get(state.mission_id.as_str()).is_some();
            if !known {
                tracing::warn!(mission_id = %state.mission_id, "saved progress names an unknown mission");
            }
            known
        }))
    }

    /// Whether "Continue" should be offered.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the store cannot be read.
    pub async fn has_saved_progress(&self) -> Result<bool, DomainError> {
        Ok(self.saved_progress().await?.is_some())
    }

    /// Command that resumes the saved mission, if any.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the store cannot be read.
    pub async fn continue_command(&self) -> Result<Option<StartMission>, DomainError> {
        Ok(self
            .saved_progress()
            .await?
            .map(|state| StartMission::resume(state.mission_id.as_str())))
    }

    /// Command that starts the first mission from scratch.
    #[must_use]
    pub fn new_game_command(&self) -> StartMission {
        StartMission::new_game(self.missions.first().id().as_str())
    }

    /// Current accessibility preference; `false` when it cannot be read.
    pub async fn accessibility_mode(&self) -> bool {
        self.progress
            .load_accessibility_mode()
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "could not read accessibility preference");
                false
            })
    }

    /// Flips and persists the accessibility preference, returning the new
    /// value.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the preference cannot be
    /// written.
    pub async fn toggle_accessibility(&self) -> Result<bool, DomainError> {
        let enabled = !self.accessibility_mode().await;
        self.progress.save_accessibility_mode(enabled).await?;
        Ok(enabled)
    }
}
