//! The serializable traversal cursor.

use casefile_mission::{MissionId, SceneId};
use serde::{Deserialize, Serialize};

/// Current scene and visit history of one in-progress mission.
///
/// This is the value round-tripped through the key-value store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    /// Mission being played.
    pub mission_id: MissionId,
    /// Scene the player is looking at.
    pub current_scene_id: SceneId,
    /// Every scene visited, in order, including the current one.
    pub history: Vec<SceneId>,
}

impl GameState {
    /// State at the very start of a mission.
    #[must_use]
    pub fn new(mission_id: MissionId, start: SceneId) -> Self {
        Self {
            mission_id,
            current_scene_id: start,
            history: vec![start],
        }
    }

    /// Moves to `scene_id`, appending it to the history.
    pub(crate) fn advance(&mut self, scene_id: SceneId) {
        self.current_scene_id = scene_id;
        self.history.push(scene_id);
    }

    /// `true` when the history ends with the current scene.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.history.last() == Some(&self.current_scene_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_field_names() {
        // Arrange
        let mut state = GameState::new(MissionId::new("mission-1"), SceneId(1_771_194_709_306));
        state.advance(SceneId(1_771_194_711_777));

        // Act
        let json = serde_json::to_value(&state).unwrap();

        // Assert
        assert_eq!(
            json,
            serde_json::json!({
                "missionId": "mission-1",
                "currentSceneId": 1_771_194_711_777_i64,
                "history": [1_771_194_709_306_i64, 1_771_194_711_777_i64],
            })
        );
        let back: GameState = serde_json::from_value(json).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn test_advance_appends_duplicates_on_revisit() {
        let mut state = GameState::new(MissionId::new("m"), SceneId(1));

        state.advance(SceneId(2));
        state.advance(SceneId(1));

        assert_eq!(state.history, vec![SceneId(1), SceneId(2), SceneId(1)]);
        assert_eq!(state.current_scene_id, SceneId(1));
        assert!(state.is_consistent());
    }

    #[test]
    fn test_inconsistent_history() {
        let state = GameState {
            mission_id: MissionId::new("m"),
            current_scene_id: SceneId(2),
            history: vec![SceneId(1)],
        };

        assert!(!state.is_consistent());
    }
}
