//! Mission source documents.
//!
//! A document carries `id`, `title` and `description` plus the graph block
//! `{boxes, connections, backgroundAudio?, startingSceneId?}`. Older
//! documents nest the block under `data`; newer ones put its fields at the
//! top level. Both shapes are accepted, and presentation-only fields such as
//! layout coordinates are ignored.

use std::path::Path;

use casefile_core::error::DomainError;
use serde::Deserialize;

use super::assets::AssetCatalog;
use super::graph::MissionGraph;
use super::model::{Connection, Mission, Scene, SceneId};

/// Encoding of a mission document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissionFormat {
    /// JSON document.
    Json,
    /// YAML document.
    Yaml,
}

impl MissionFormat {
    /// Picks the format from a file extension; anything but `.yaml`/`.yml`
    /// is read as JSON.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Self::Yaml
            }
            _ => Self::Json,
        }
    }
}

/// A mission document compiled into the binary, with the asset keys that
/// ship alongside it.
#[derive(Debug, Clone, Copy)]
pub struct EmbeddedMission {
    /// Document text.
    pub document: &'static str,
    /// Document encoding.
    pub format: MissionFormat,
    /// Bundled image keys.
    pub images: &'static [&'static str],
    /// Bundled audio keys, narration and background tracks alike.
    pub audio: &'static [&'static str],
}

impl EmbeddedMission {
    /// A document with no bundled assets.
    #[must_use]
    pub const fn new(document: &'static str, format: MissionFormat) -> Self {
        Self {
            document,
            format,
            images: &[],
            audio: &[],
        }
    }

    /// Set the bundled image and audio keys.
    #[must_use]
    pub const fn with_assets(
        mut self,
        images: &'static [&'static str],
        audio: &'static [&'static str],
    ) -> Self {
        self.images = images;
        self.audio = audio;
        self
    }

    /// Catalogue of the bundled keys. Keys resolve to themselves.
    #[must_use]
    pub fn catalog(&self) -> AssetCatalog {
        let catalog = self
            .images
            .iter()
            .fold(AssetCatalog::default(), |catalog, key| catalog.with_image(*key));
        self.audio
            .iter()
            .fold(catalog, |catalog, key| catalog.with_audio(*key))
    }

    /// Parses the document and attaches the bundled catalogue.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the document is malformed.
    pub fn into_mission(self) -> Result<Mission, DomainError> {
        MissionSource::parse(self.document, self.format)?.into_mission(self.catalog())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphBlock {
    #[serde(default)]
    boxes: Option<Vec<Scene>>,
    #[serde(default)]
    connections: Option<Vec<Connection>>,
    #[serde(default)]
    background_audio: Option<String>,
    #[serde(default)]
    starting_scene_id: Option<SceneId>,
}

/// A parsed, not yet validated, mission document.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionSource {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    data: Option<GraphBlock>,
    #[serde(default)]
    boxes: Option<Vec<Scene>>,
    #[serde(default)]
    connections: Option<Vec<Connection>>,
    #[serde(default)]
    background_audio: Option<String>,
    #[serde(default)]
    starting_scene_id: Option<SceneId>,
}

impl MissionSource {
    /// Parses a document.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the text is not a well-formed
    /// mission document in `format`.
    pub fn parse(text: &str, format: MissionFormat) -> Result<Self, DomainError> {
        match format {
            MissionFormat::Json => serde_json::from_str(text)
                .map_err(|e| DomainError::Validation(format!("invalid mission JSON: {e}"))),
            MissionFormat::Yaml => serde_yaml::from_str(text)
                .map_err(|e| DomainError::Validation(format!("invalid mission YAML: {e}"))),
        }
    }

    /// The mission id declared by the document.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Builds the mission. Fields of a nested `data` block take precedence
    /// over their top-level counterparts.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the id is blank or the document
    /// has no scenes.
    pub fn into_mission(self, assets: AssetCatalog) -> Result<Mission, DomainError> {
        if self.id.trim().is_empty() {
            return Err(DomainError::Validation("mission id must not be blank".to_owned()));
        }

        let nested = self.data.unwrap_or_default();
        let scenes: Vec<Scene> = nested
            .boxes
            .or(self.boxes)
            .unwrap_or_default()
            .into_iter()
            .map(normalize_scene)
            .collect();
        let connections = nested.connections.or(self.connections).unwrap_or_default();
        let background_audio = non_blank(nested.background_audio.or(self.background_audio));
        let starting_scene_id = nested.starting_scene_id.or(self.starting_scene_id);

        let graph = MissionGraph::new(scenes, connections).map_err(|e| match e {
            DomainError::Validation(msg) => {
                DomainError::Validation(format!("mission {}: {msg}", self.id))
            }
            other => other,
        })?;

        let mut mission =
            Mission::new(self.id, self.title, self.description, graph).with_assets(assets);
        if let Some(scene_id) = starting_scene_id {
            mission = mission.with_starting_scene(scene_id);
        }
        if let Some(track) = background_audio {
            mission = mission.with_background_audio(track);
        }
        Ok(mission)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn normalize_scene(mut scene: Scene) -> Scene {
    scene.audio = non_blank(scene.audio);
    scene.extended_audio = non_blank(scene.extended_audio);
    scene
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::OptionId;

    const NESTED_JSON: &str = r#"{
        "id": "mission-1",
        "title": "The First Case",
        "description": "Investigate the mysterious events.",
        "data": {
            "boxes": [
                {
                    "id": 1771194709306,
                    "label": "Screen 1",
                    "image": "OIG1.jpg",
                    "question": "Where do you start?",
                    "x": 120, "y": 40, "width": 300, "height": 200,
                    "options": [
                        { "id": 1771194709307, "text": "The study" },
                        { "id": 1771194709308, "text": "The garden" }
                    ]
                },
                { "id": 1771194711777, "label": "Screen 2", "image": "OIG5.jpg", "question": "?", "options": [] }
            ],
            "connections": [
                { "id": 1771194716166, "fromBoxId": 1771194709306, "fromOptionId": 1771194709307, "toBoxId": 1771194711777 }
            ]
        }
    }"#;

    const FLAT_YAML: &str = r"
id: mission-2
title: The Second Case
description: A flat document.
backgroundAudio: audio/rain.mp3
startingSceneId: 2
boxes:
  - id: 1
    label: Hall
    image: hall.jpg
    question: Which door?
    audio: ''
    extendedAudio: audio/hall-long.mp3
    options:
      - id: 10
        text: Left
  - id: 2
    label: Porch
    options: []
connections:
  - id: 100
    fromSceneId: 1
    fromOptionId: 10
    toSceneId: 2
";

    #[test]
    fn test_parse_nested_legacy_shape() {
        // Act
        let mission = MissionSource::parse(NESTED_JSON, MissionFormat::Json)
            .unwrap()
            .into_mission(AssetCatalog::default())
            .unwrap();

        // Assert
        assert_eq!(mission.id().as_str(), "mission-1");
        assert_eq!(mission.title(), "The First Case");
        assert_eq!(mission.graph().scenes().len(), 2);
        let connection = mission
            .find_connection(SceneId(1_771_194_709_306), OptionId(1_771_194_709_307))
            .unwrap();
        assert_eq!(connection.to_scene_id, SceneId(1_771_194_711_777));
        assert_eq!(mission.resolve_start_scene(), SceneId(1_771_194_709_306));
    }

    #[test]
    fn test_parse_flat_yaml_shape() {
        // Act
        let mission = MissionSource::parse(FLAT_YAML, MissionFormat::Yaml)
            .unwrap()
            .into_mission(AssetCatalog::default())
            .unwrap();

        // Assert
        assert_eq!(mission.background_audio(), Some("audio/rain.mp3"));
        assert_eq!(mission.starting_scene_id(), Some(SceneId(2)));
        assert_eq!(mission.resolve_start_scene(), SceneId(2));
        let hall = mission.find_scene(SceneId(1)).unwrap();
        assert_eq!(hall.audio, None);
        assert_eq!(hall.extended_audio.as_deref(), Some("audio/hall-long.mp3"));
        assert!(mission.find_connection(SceneId(1), OptionId(10)).is_some());
    }

    #[test]
    fn test_nested_block_wins_over_top_level_fields() {
        let text = r#"{
            "id": "m",
            "backgroundAudio": "audio/top.mp3",
            "boxes": [ { "id": 1 } ],
            "data": { "boxes": [ { "id": 7 } ], "backgroundAudio": "audio/nested.mp3" }
        }"#;

        let mission = MissionSource::parse(text, MissionFormat::Json)
            .unwrap()
            .into_mission(AssetCatalog::default())
            .unwrap();

        assert_eq!(mission.graph().scenes()[0].id, SceneId(7));
        assert_eq!(mission.background_audio(), Some("audio/nested.mp3"));
    }

    #[test]
    fn test_document_without_scenes_is_rejected() {
        let source = MissionSource::parse(r#"{ "id": "empty", "title": "Empty" }"#, MissionFormat::Json)
            .unwrap();

        match source.into_mission(AssetCatalog::default()).unwrap_err() {
            DomainError::Validation(msg) => assert!(msg.contains("empty")),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_blank_mission_id_is_rejected() {
        let source =
            MissionSource::parse(r#"{ "id": " ", "boxes": [ { "id": 1 } ] }"#, MissionFormat::Json)
                .unwrap();

        assert!(matches!(
            source.into_mission(AssetCatalog::default()),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_malformed_document_is_validation_error() {
        let result = MissionSource::parse("{ not json", MissionFormat::Json);

        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_embedded_mission_carries_its_assets() {
        // Arrange
        const EMBEDDED: EmbeddedMission = EmbeddedMission::new(FLAT_YAML, MissionFormat::Yaml)
            .with_assets(&["hall.jpg"], &["audio/hall-long.mp3", "audio/rain.mp3", "audio/jazz.mp3"]);

        // Act
        let mission = EMBEDDED.into_mission().unwrap();

        // Assert
        assert!(mission.resolve_image("hall.jpg").is_some());
        assert_eq!(
            mission.background_track_choices(),
            vec!["audio/jazz.mp3", "audio/rain.mp3"]
        );
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(MissionFormat::from_path(Path::new("a/m.YML")), MissionFormat::Yaml);
        assert_eq!(MissionFormat::from_path(Path::new("a/m.yaml")), MissionFormat::Yaml);
        assert_eq!(MissionFormat::from_path(Path::new("a/m.json")), MissionFormat::Json);
        assert_eq!(MissionFormat::from_path(Path::new("a/m")), MissionFormat::Json);
    }
}
