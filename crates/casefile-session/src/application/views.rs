//! Read model handed to the presentation layer.

use casefile_mission::{AssetHandle, MissionId, NarrationChannel, Scene, SceneId};

use crate::domain::traversal::{Traversal, TraversalStatus};

/// Everything needed to draw the current screen.
#[derive(Debug, Clone)]
pub struct SessionView {
    /// Mission being played.
    pub mission_id: MissionId,
    /// Mission title, shown on the completion screen.
    pub mission_title: String,
    /// Current phase.
    pub status: TraversalStatus,
    /// Current scene. `None` only if saved state points past the graph.
    pub scene: Option<Scene>,
    /// Visited scenes, oldest first.
    pub history: Vec<SceneId>,
    /// Narration channel chosen by the accessibility preference.
    pub narration: NarrationChannel,
    /// Narration key for the current scene on that channel.
    pub narration_track: Option<String>,
    /// Resolved narration handle; `None` when absent or unresolvable.
    pub narration_handle: Option<AssetHandle>,
    /// Resolved scene image; `None` means render a placeholder.
    pub image: Option<AssetHandle>,
    /// Background track currently selected.
    pub background_track: Option<String>,
    /// Tracks selectable as background music.
    pub background_choices: Vec<String>,
}

impl SessionView {
    pub(crate) fn build(
        traversal: &Traversal,
        narration: NarrationChannel,
        background_track: Option<String>,
    ) -> Self {
        let mission = traversal.mission();
        let scene = traversal.current_scene().cloned();
        let narration_track = scene
            .as_ref()
            .and_then(|s| s.narration(narration))
            .map(str::to_owned);
        let narration_handle = narration_track
            .as_deref()
            .and_then(|track| mission.resolve_audio(track));
        let image = scene
            .as_ref()
            .map(|s| s.image.as_str())
            .filter(|reference| !reference.is_empty())
            .and_then(|reference| mission.resolve_image(reference));

        Self {
            mission_id: mission.id().clone(),
            mission_title: mission.title().to_owned(),
            status: traversal.status().clone(),
            scene,
            history: traversal.state().history.clone(),
            narration,
            narration_track,
            narration_handle,
            image,
            background_track,
            background_choices: mission.background_track_choices(),
        }
    }

    /// `true` once the mission has ended.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self.status, TraversalStatus::Complete(_))
    }
}
