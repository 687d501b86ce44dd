//! Mission data model: scenes, options, connections and the mission itself.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::assets::{AssetCatalog, AssetHandle, AssetKind};
use super::graph::MissionGraph;

/// Stable identifier of a mission.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MissionId(pub String);

impl MissionId {
    /// Creates a mission identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a scene, unique within its mission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SceneId(pub i64);

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of an option, unique within its owning scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionId(pub i64);

impl fmt::Display for OptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(pub i64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A labeled choice offered by a scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneOption {
    /// Option identifier.
    pub id: OptionId,
    /// Display label.
    #[serde(default)]
    pub text: String,
}

impl SceneOption {
    /// Creates an option.
    pub fn new(id: i64, text: impl Into<String>) -> Self {
        Self {
            id: OptionId(id),
            text: text.into(),
        }
    }
}

/// One screen of a mission: an image, a question and the options answering it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    /// Scene identifier.
    pub id: SceneId,
    /// Display name.
    #[serde(default)]
    pub label: String,
    /// Image reference (asset key or remote URL).
    #[serde(default)]
    pub image: String,
    /// Prompt text.
    #[serde(default)]
    pub question: String,
    /// Options in display order.
    #[serde(default)]
    pub options: Vec<SceneOption>,
    /// Standard narration track.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<String>,
    /// Extended narration track for accessibility mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extended_audio: Option<String>,
}

impl Scene {
    /// Creates a scene with no options and no narration.
    pub fn new(id: i64, label: impl Into<String>) -> Self {
        Self {
            id: SceneId(id),
            label: label.into(),
            image: String::new(),
            question: String::new(),
            options: Vec::new(),
            audio: None,
            extended_audio: None,
        }
    }

    /// Set the image reference.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    /// Set the question text.
    #[must_use]
    pub fn with_question(mut self, question: impl Into<String>) -> Self {
        self.question = question.into();
        self
    }

    /// Add an option.
    #[must_use]
    pub fn with_option(mut self, id: i64, text: impl Into<String>) -> Self {
        self.options.push(SceneOption::new(id, text));
        self
    }

    /// Set the standard narration track.
    #[must_use]
    pub fn with_audio(mut self, audio: impl Into<String>) -> Self {
        self.audio = Some(audio.into());
        self
    }

    /// Set the extended narration track.
    #[must_use]
    pub fn with_extended_audio(mut self, audio: impl Into<String>) -> Self {
        self.extended_audio = Some(audio.into());
        self
    }

    /// Returns the option with the given id, if this scene offers it.
    #[must_use]
    pub fn option(&self, option_id: OptionId) -> Option<&SceneOption> {
        self.options.iter().find(|o| o.id == option_id)
    }
}

/// A directed edge from a `(scene, option)` pair to a destination scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    /// Connection identifier.
    pub id: ConnectionId,
    /// Scene owning the option.
    #[serde(alias = "fromBoxId")]
    pub from_scene_id: SceneId,
    /// Option the edge is keyed on.
    pub from_option_id: OptionId,
    /// Destination scene.
    #[serde(alias = "toBoxId")]
    pub to_scene_id: SceneId,
}

impl Connection {
    /// Creates a connection.
    #[must_use]
    pub fn new(id: i64, from_scene_id: i64, from_option_id: i64, to_scene_id: i64) -> Self {
        Self {
            id: ConnectionId(id),
            from_scene_id: SceneId(from_scene_id),
            from_option_id: OptionId(from_option_id),
            to_scene_id: SceneId(to_scene_id),
        }
    }
}

/// A complete mission: metadata, scene graph and the assets it may reference.
///
/// Missions are built once at load time and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Mission {
    id: MissionId,
    title: String,
    description: String,
    graph: MissionGraph,
    starting_scene_id: Option<SceneId>,
    background_audio: Option<String>,
    assets: AssetCatalog,
}

impl Mission {
    /// Creates a mission with no start override, no background audio and an
    /// empty asset catalogue.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        graph: MissionGraph,
    ) -> Self {
        Self {
            id: MissionId::new(id),
            title: title.into(),
            description: description.into(),
            graph,
            starting_scene_id: None,
            background_audio: None,
            assets: AssetCatalog::default(),
        }
    }

    /// Set an explicit starting scene.
    #[must_use]
    pub fn with_starting_scene(mut self, scene_id: SceneId) -> Self {
        self.starting_scene_id = Some(scene_id);
        self
    }

    /// Set the default background track.
    #[must_use]
    pub fn with_background_audio(mut self, track: impl Into<String>) -> Self {
        self.background_audio = Some(track.into());
        self
    }

    /// Attach the asset catalogue.
    #[must_use]
    pub fn with_assets(mut self, assets: AssetCatalog) -> Self {
        self.assets = assets;
        self
    }

    /// Mission identifier.
    #[must_use]
    pub fn id(&self) -> &MissionId {
        &self.id
    }

    /// Mission title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Mission description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The scene graph.
    #[must_use]
    pub fn graph(&self) -> &MissionGraph {
        &self.graph
    }

    /// Explicit starting scene, as authored.
    #[must_use]
    pub fn starting_scene_id(&self) -> Option<SceneId> {
        self.starting_scene_id
    }

    /// Default background track, as authored.
    #[must_use]
    pub fn background_audio(&self) -> Option<&str> {
        self.background_audio.as_deref()
    }

    /// The asset catalogue.
    #[must_use]
    pub fn assets(&self) -> &AssetCatalog {
        &self.assets
    }

    /// Looks up a scene by id.
    #[must_use]
    pub fn find_scene(&self, scene_id: SceneId) -> Option<&Scene> {
        self.graph.find_scene(scene_id)
    }

    /// Looks up the connection leaving `scene_id` through `option_id`.
    #[must_use]
    pub fn find_connection(&self, scene_id: SceneId, option_id: OptionId) -> Option<&Connection> {
        self.graph.find_connection(scene_id, option_id)
    }

    /// Determines where a fresh play-through begins.
    ///
    /// An explicit starting scene wins when it exists. Otherwise the first
    /// scene in definition order that no connection targets is chosen, and
    /// failing that the first scene.
    #[must_use]
    pub fn resolve_start_scene(&self) -> SceneId {
        if let Some(scene_id) = self.starting_scene_id
            && self.graph.contains_scene(scene_id)
        {
            return scene_id;
        }
        self.graph
            .first_unreferenced_scene()
            .unwrap_or_else(|| self.graph.first_scene().id)
    }

    /// Audio tracks in the catalogue that no scene uses as narration.
    ///
    /// These are the mission's ambient/background tracks, sorted by key.
    #[must_use]
    pub fn unused_audio_tracks(&self) -> Vec<String> {
        let used: BTreeSet<&str> = self.graph.narration_tracks();
        self.assets
            .keys(AssetKind::Audio)
            .filter(|key| !used.contains(key))
            .map(str::to_owned)
            .collect()
    }

    /// Tracks the player may pick as background music.
    #[must_use]
    pub fn background_track_choices(&self) -> Vec<String> {
        self.unused_audio_tracks()
    }

    /// Resolves an image reference to a loadable handle.
    ///
    /// Called on every render, so it does not log. Unresolvable references
    /// are reported once when the mission is loaded.
    #[must_use]
    pub fn resolve_image(&self, reference: &str) -> Option<AssetHandle> {
        self.assets.resolve(AssetKind::Image, reference)
    }

    /// Resolves an audio reference to a loadable handle.
    #[must_use]
    pub fn resolve_audio(&self, reference: &str) -> Option<AssetHandle> {
        self.assets.resolve(AssetKind::Audio, reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(scenes: Vec<Scene>, connections: Vec<Connection>) -> MissionGraph {
        MissionGraph::new(scenes, connections).unwrap()
    }

    #[test]
    fn test_resolve_start_scene_returns_single_unreferenced_scene() {
        // Arrange
        let mission = Mission::new(
            "m",
            "Mission",
            "",
            graph(
                vec![Scene::new(2, "S2"), Scene::new(1, "S1"), Scene::new(3, "S3")],
                vec![Connection::new(10, 1, 100, 2), Connection::new(11, 1, 101, 3)],
            ),
        );

        // Act
        let start = mission.resolve_start_scene();

        // Assert
        assert_eq!(start, SceneId(1));
    }

    #[test]
    fn test_resolve_start_scene_prefers_existing_explicit_start() {
        let mission = Mission::new(
            "m",
            "Mission",
            "",
            graph(
                vec![Scene::new(1, "S1"), Scene::new(2, "S2")],
                vec![Connection::new(10, 1, 100, 2)],
            ),
        )
        .with_starting_scene(SceneId(2));

        assert_eq!(mission.resolve_start_scene(), SceneId(2));
    }

    #[test]
    fn test_resolve_start_scene_ignores_missing_explicit_start() {
        let mission = Mission::new(
            "m",
            "Mission",
            "",
            graph(
                vec![Scene::new(1, "S1"), Scene::new(2, "S2")],
                vec![Connection::new(10, 1, 100, 2)],
            ),
        )
        .with_starting_scene(SceneId(99));

        assert_eq!(mission.resolve_start_scene(), SceneId(1));
    }

    #[test]
    fn test_resolve_start_scene_picks_first_of_several_roots() {
        let mission = Mission::new(
            "m",
            "Mission",
            "",
            graph(
                vec![Scene::new(5, "S5"), Scene::new(4, "S4"), Scene::new(6, "S6")],
                vec![Connection::new(10, 4, 100, 6)],
            ),
        );

        assert_eq!(mission.resolve_start_scene(), SceneId(5));
    }

    #[test]
    fn test_resolve_start_scene_falls_back_to_first_scene_in_cycle() {
        // Arrange: every scene is the target of some connection.
        let mission = Mission::new(
            "m",
            "Mission",
            "",
            graph(
                vec![Scene::new(7, "S7"), Scene::new(8, "S8")],
                vec![Connection::new(10, 7, 100, 8), Connection::new(11, 8, 101, 7)],
            ),
        );

        // Act / Assert
        assert_eq!(mission.resolve_start_scene(), SceneId(7));
    }

    #[test]
    fn test_unused_audio_tracks_excludes_narration() {
        // Arrange
        let assets = AssetCatalog::default()
            .with_audio("audio/intro.mp3")
            .with_audio("audio/intro-extended.mp3")
            .with_audio("audio/rain.mp3")
            .with_audio("audio/jazz.mp3");
        let mission = Mission::new(
            "m",
            "Mission",
            "",
            graph(
                vec![Scene::new(1, "S1")
                    .with_audio("audio/intro.mp3")
                    .with_extended_audio("audio/intro-extended.mp3")],
                vec![],
            ),
        )
        .with_assets(assets);

        // Act
        let unused = mission.unused_audio_tracks();

        // Assert
        assert_eq!(unused, vec!["audio/jazz.mp3", "audio/rain.mp3"]);
    }

    #[test]
    fn test_unused_audio_tracks_empty_without_catalogue() {
        let mission = Mission::new(
            "m",
            "Mission",
            "",
            graph(vec![Scene::new(1, "S1").with_audio("audio/intro.mp3")], vec![]),
        );

        assert!(mission.unused_audio_tracks().is_empty());
    }

    #[test]
    fn test_resolve_image_returns_none_for_unknown_reference() {
        let mission = Mission::new("m", "Mission", "", graph(vec![Scene::new(1, "S1")], vec![]));

        assert!(mission.resolve_image("missing.jpg").is_none());
    }

    #[test]
    fn test_scene_option_lookup() {
        let scene = Scene::new(1, "S1").with_option(100, "Open the door");

        assert_eq!(scene.option(OptionId(100)).unwrap().text, "Open the door");
        assert!(scene.option(OptionId(101)).is_none());
    }
}
