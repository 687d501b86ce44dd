//! Shared application state.

use std::fmt;
use std::sync::Arc;

use casefile_core::clock::{Clock, SystemClock};
use casefile_core::storage::KeyValueStore;
use casefile_mission::{
    CatalogConfig, EmbeddedMission, MissionFormat, MissionRepository, ValidationMode,
};
use casefile_session::{MainMenu, ProgressStore, SessionOptions};
use casefile_store::FileKeyValueStore;

use crate::config::AppConfig;
use crate::error::AppError;

/// Missions bundled into the binary, played when no catalogue is configured.
pub const BUNDLED_MISSIONS: &[EmbeddedMission] = &[EmbeddedMission::new(
    include_str!("../missions/the-first-case.json"),
    MissionFormat::Json,
)
.with_assets(
    &["OIG1.jpg", "OIG4.jpg", "OIG5.jpg"],
    &[
        "audio/study.mp3",
        "audio/study-extended.mp3",
        "audio/pantry.mp3",
        "audio/garden.mp3",
        "audio/rain.mp3",
        "audio/jazz.mp3",
    ],
)];

/// Everything a play loop needs.
#[derive(Clone)]
pub struct AppState {
    /// Loaded missions.
    pub missions: Arc<MissionRepository>,
    /// Saved progress and preferences.
    pub progress: ProgressStore,
    /// Time source for traversal events.
    pub clock: Arc<dyn Clock>,
    /// Session tunables.
    pub options: SessionOptions,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("missions", &self.missions.len())
            .field("progress", &self.progress)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        missions: Arc<MissionRepository>,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        options: SessionOptions,
    ) -> Self {
        Self {
            missions,
            progress: ProgressStore::new(store),
            clock,
            options,
        }
    }

    /// Loads missions and opens the save file described by `config`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Domain` if the catalogue or a mission cannot be
    /// loaded.
    pub async fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let missions = match &config.catalog {
            Some(path) => {
                tracing::info!(catalog = %path.display(), "loading mission catalogue");
                MissionRepository::load(&CatalogConfig::load(path).await?).await?
            }
            None => {
                tracing::info!("no catalogue configured; using bundled missions");
                MissionRepository::from_documents(BUNDLED_MISSIONS, ValidationMode::Lenient)?
            }
        };
        let store = Arc::new(FileKeyValueStore::new(&config.save_file));

        Ok(Self::new(
            Arc::new(missions),
            store,
            Arc::new(SystemClock),
            SessionOptions {
                feedback_delay: config.feedback_delay,
            },
        ))
    }

    /// Main-menu queries over this state.
    #[must_use]
    pub fn menu(&self) -> MainMenu {
        MainMenu::new(Arc::clone(&self.missions), self.progress.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use casefile_test_support::LogCapture;

    #[test]
    fn test_bundled_missions_load_cleanly() {
        let missions = MissionRepository::from_documents(BUNDLED_MISSIONS, ValidationMode::Strict)
            .unwrap();

        let first = missions.first();
        assert_eq!(first.id().as_str(), "mission-1");
        assert_eq!(first.title(), "The First Case");
        assert_eq!(first.graph().scenes().len(), 3);
    }

    #[test]
    fn test_bundled_missions_resolve_every_asset() {
        let missions = MissionRepository::from_documents(BUNDLED_MISSIONS, ValidationMode::Lenient)
            .unwrap();

        let first = missions.first();
        assert!(first.unresolved_assets().is_empty());
        assert_eq!(
            first.background_track_choices(),
            vec!["audio/jazz.mp3", "audio/rain.mp3"]
        );
    }

    #[test]
    fn test_missing_assets_are_reported_once_at_load() {
        // Arrange
        let without_assets = [EmbeddedMission::new(
            BUNDLED_MISSIONS[0].document,
            MissionFormat::Json,
        )];
        let logs = LogCapture::default();

        // Act
        let missions = logs
            .capture(|| MissionRepository::from_documents(&without_assets, ValidationMode::Lenient))
            .unwrap();

        // Assert: three images and four narration tracks.
        assert_eq!(logs.warnings(), 7);
        assert_eq!(missions.first().unresolved_assets().len(), 7);
    }
}
