//! The mission repository.
//!
//! Built once at start-up from a catalogue manifest or an embedded table of
//! documents, then shared read-only for the lifetime of the application.

use std::collections::HashSet;
use std::sync::Arc;

use casefile_core::error::DomainError;

use crate::application::config::{CatalogConfig, MissionEntry};
use crate::domain::assets::AssetCatalog;
use crate::domain::model::{Mission, SceneId};
use crate::domain::source::{EmbeddedMission, MissionFormat, MissionSource};
use crate::domain::validation::ValidationMode;

/// The set of playable missions, in catalogue order.
#[derive(Debug, Clone)]
pub struct MissionRepository {
    missions: Vec<Arc<Mission>>,
}

impl MissionRepository {
    /// Creates a repository from already-built missions.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `missions` is empty or two
    /// missions share an id.
    pub fn new(missions: Vec<Mission>) -> Result<Self, DomainError> {
        if missions.is_empty() {
            return Err(DomainError::Validation(
                "mission catalogue lists no missions".to_owned(),
            ));
        }
        let mut seen = HashSet::new();
        for mission in &missions {
            if !seen.insert(mission.id().clone()) {
                return Err(DomainError::Validation(format!(
                    "duplicate mission id {}",
                    mission.id()
                )));
            }
        }
        Ok(Self {
            missions: missions.into_iter().map(Arc::new).collect(),
        })
    }

    /// Builds a repository from an embedded resource table.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if a document is malformed, fails
    /// `mode`, or the table is empty.
    pub fn from_documents(
        documents: &[EmbeddedMission],
        mode: ValidationMode,
    ) -> Result<Self, DomainError> {
        let missions = documents
            .iter()
            .map(|embedded| mode.check(embedded.into_mission()?))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(missions)
    }

    /// Loads every mission listed in `config`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if a document or asset directory
    /// cannot be read, and `DomainError::Validation` if a document is
    /// malformed or fails the configured validation mode.
    pub async fn load(config: &CatalogConfig) -> Result<Self, DomainError> {
        let mut missions = Vec::with_capacity(config.missions.len());
        for entry in &config.missions {
            let mission = load_entry(entry).await?;
            let mission = config.validation.check(mission)?;
            tracing::info!(
                mission_id = %mission.id(),
                scenes = mission.graph().scenes().len(),
                connections = mission.graph().connections().len(),
                "loaded mission"
            );
            missions.push(mission);
        }
        Self::new(missions)
    }

    /// Looks up a mission by id.
    #[must_use]
    pub fn get(&self, mission_id: &str) -> Option<Arc<Mission>> {
        self.missions
            .iter()
            .find(|m| m.id().as_str() == mission_id)
            .cloned()
    }

    /// Looks up a mission by id, failing if it is unknown.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MissionNotFound` if no mission has this id.
    pub fn require(&self, mission_id: &str) -> Result<Arc<Mission>, DomainError> {
        self.get(mission_id)
            .ok_or_else(|| DomainError::MissionNotFound(mission_id.to_owned()))
    }

    /// The mission "New Game" starts.
    #[must_use]
    pub fn first(&self) -> Arc<Mission> {
        // Non-empty by construction.
        Arc::clone(&self.missions[0])
    }

    /// All missions in catalogue order.
    pub fn missions(&self) -> impl Iterator<Item = &Arc<Mission>> {
        self.missions.iter()
    }

    /// Number of missions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.missions.len()
    }

    /// Returns `true` if the repository holds no missions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.missions.is_empty()
    }

    /// Start scene of the given mission.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MissionNotFound` if no mission has this id.
    pub fn start_scene(&self, mission_id: &str) -> Result<SceneId, DomainError> {
        Ok(self.require(mission_id)?.resolve_start_scene())
    }

    /// Background tracks of the given mission.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MissionNotFound` if no mission has this id.
    pub fn unused_audio_tracks(&self, mission_id: &str) -> Result<Vec<String>, DomainError> {
        Ok(self.require(mission_id)?.unused_audio_tracks())
    }
}

async fn load_entry(entry: &MissionEntry) -> Result<Mission, DomainError> {
    let text = tokio::fs::read_to_string(&entry.document).await.map_err(|e| {
        DomainError::Infrastructure(format!(
            "failed to read mission document {}: {e}",
            entry.document.display()
        ))
    })?;
    let source = MissionSource::parse(&text, MissionFormat::from_path(&entry.document))?;
    let assets = match &entry.assets {
        Some(dir) => AssetCatalog::scan(dir).await?,
        None => AssetCatalog::default(),
    };
    source.into_mission(assets)
}
