//! The immutable scene graph of one mission.

use std::collections::{BTreeSet, HashMap, HashSet};

use casefile_core::error::DomainError;

use super::model::{Connection, OptionId, Scene, SceneId};

/// Scenes and option-keyed connections, indexed for lookup.
///
/// Definition order is preserved. When ids collide, lookups resolve to the
/// first occurrence.
#[derive(Debug, Clone)]
pub struct MissionGraph {
    scenes: Vec<Scene>,
    connections: Vec<Connection>,
    scene_index: HashMap<SceneId, usize>,
    connection_index: HashMap<(SceneId, OptionId), usize>,
}

impl MissionGraph {
    /// Builds a graph from scenes and connections in definition order.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `scenes` is empty.
    pub fn new(scenes: Vec<Scene>, connections: Vec<Connection>) -> Result<Self, DomainError> {
        if scenes.is_empty() {
            return Err(DomainError::Validation(
                "mission graph must contain at least one scene".to_owned(),
            ));
        }

        let mut scene_index = HashMap::with_capacity(scenes.len());
        for (position, scene) in scenes.iter().enumerate() {
            scene_index.entry(scene.id).or_insert(position);
        }

        let mut connection_index = HashMap::with_capacity(connections.len());
        for (position, connection) in connections.iter().enumerate() {
            connection_index
                .entry((connection.from_scene_id, connection.from_option_id))
                .or_insert(position);
        }

        Ok(Self {
            scenes,
            connections,
            scene_index,
            connection_index,
        })
    }

    /// Scenes in definition order.
    #[must_use]
    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    /// Connections in definition order.
    #[must_use]
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// The first scene in definition order.
    #[must_use]
    pub fn first_scene(&self) -> &Scene {
        // Non-empty by construction.
        &self.scenes[0]
    }

    /// Looks up a scene by id. Absence is an expected outcome.
    #[must_use]
    pub fn find_scene(&self, scene_id: SceneId) -> Option<&Scene> {
        self.scene_index
            .get(&scene_id)
            .map(|&position| &self.scenes[position])
    }

    /// Returns `true` if a scene with this id exists.
    #[must_use]
    pub fn contains_scene(&self, scene_id: SceneId) -> bool {
        self.scene_index.contains_key(&scene_id)
    }

    /// Looks up the connection keyed on exactly `(scene_id, option_id)`.
    ///
    /// `None` is the normal signal for a terminal choice.
    #[must_use]
    pub fn find_connection(&self, scene_id: SceneId, option_id: OptionId) -> Option<&Connection> {
        self.connection_index
            .get(&(scene_id, option_id))
            .map(|&position| &self.connections[position])
    }

    /// Ids of every scene targeted by at least one connection.
    #[must_use]
    pub fn target_set(&self) -> HashSet<SceneId> {
        self.connections.iter().map(|c| c.to_scene_id).collect()
    }

    /// Scenes no connection targets, in definition order.
    #[must_use]
    pub fn unreferenced_scenes(&self) -> Vec<SceneId> {
        let targets = self.target_set();
        self.scenes
            .iter()
            .map(|s| s.id)
            .filter(|id| !targets.contains(id))
            .collect()
    }

    /// The first scene in definition order that no connection targets.
    #[must_use]
    pub fn first_unreferenced_scene(&self) -> Option<SceneId> {
        let targets = self.target_set();
        self.scenes
            .iter()
            .map(|s| s.id)
            .find(|id| !targets.contains(id))
    }

    /// Every audio reference used as scene narration, standard or extended.
    #[must_use]
    pub fn narration_tracks(&self) -> BTreeSet<&str> {
        self.scenes
            .iter()
            .flat_map(|s| [s.audio.as_deref(), s.extended_audio.as_deref()])
            .flatten()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_branch_graph() -> MissionGraph {
        MissionGraph::new(
            vec![
                Scene::new(1, "S1").with_option(100, "A").with_option(101, "B"),
                Scene::new(2, "S2").with_option(200, "Done"),
                Scene::new(3, "S3"),
            ],
            vec![Connection::new(10, 1, 100, 2), Connection::new(11, 1, 101, 3)],
        )
        .unwrap()
    }

    #[test]
    fn test_new_rejects_empty_scene_list() {
        let result = MissionGraph::new(vec![], vec![]);

        match result.unwrap_err() {
            DomainError::Validation(msg) => assert!(msg.contains("at least one scene")),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_find_scene_returns_scene_or_none() {
        let graph = two_branch_graph();

        assert_eq!(graph.find_scene(SceneId(2)).unwrap().label, "S2");
        assert!(graph.find_scene(SceneId(42)).is_none());
    }

    #[test]
    fn test_find_connection_matches_both_fields() {
        let graph = two_branch_graph();

        let connection = graph.find_connection(SceneId(1), OptionId(101)).unwrap();
        assert_eq!(connection.to_scene_id, SceneId(3));

        assert!(graph.find_connection(SceneId(2), OptionId(101)).is_none());
        assert!(graph.find_connection(SceneId(2), OptionId(200)).is_none());
    }

    #[test]
    fn test_duplicate_ids_resolve_to_first_occurrence() {
        // Arrange
        let graph = MissionGraph::new(
            vec![Scene::new(1, "first"), Scene::new(1, "second"), Scene::new(2, "S2")],
            vec![Connection::new(10, 1, 100, 2), Connection::new(11, 1, 100, 1)],
        )
        .unwrap();

        // Act / Assert
        assert_eq!(graph.find_scene(SceneId(1)).unwrap().label, "first");
        assert_eq!(
            graph.find_connection(SceneId(1), OptionId(100)).unwrap().id.0,
            10
        );
    }

    #[test]
    fn test_unreferenced_scenes_in_definition_order() {
        let graph = MissionGraph::new(
            vec![Scene::new(3, "S3"), Scene::new(1, "S1"), Scene::new(2, "S2")],
            vec![Connection::new(10, 1, 100, 2)],
        )
        .unwrap();

        assert_eq!(graph.unreferenced_scenes(), vec![SceneId(3), SceneId(1)]);
        assert_eq!(graph.first_unreferenced_scene(), Some(SceneId(3)));
    }

    #[test]
    fn test_narration_tracks_collects_both_channels() {
        let graph = MissionGraph::new(
            vec![
                Scene::new(1, "S1").with_audio("a.mp3"),
                Scene::new(2, "S2")
                    .with_audio("b.mp3")
                    .with_extended_audio("b-long.mp3"),
            ],
            vec![],
        )
        .unwrap();

        let tracks: Vec<&str> = graph.narration_tracks().into_iter().collect();
        assert_eq!(tracks, vec!["a.mp3", "b-long.mp3", "b.mp3"]);
    }
}
