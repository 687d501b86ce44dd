//! Structural checks over a loaded mission graph.
//!
//! Lenient loading accepts every graph and only reports problems; strict
//! loading refuses a mission with any issue.

use std::collections::HashSet;

use casefile_core::error::DomainError;
use serde::Deserialize;
use thiserror::Error;

use super::assets::AssetKind;
use super::model::{ConnectionId, Mission, OptionId, SceneId};

/// How loaded missions are checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Load everything, log issues as warnings.
    #[default]
    Lenient,
    /// Reject missions with any graph issue.
    Strict,
}

/// A structural problem in a mission graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphIssue {
    /// Two scenes share an id.
    #[error("duplicate scene id {0}")]
    DuplicateScene(SceneId),

    /// Two connections leave the same `(scene, option)` pair.
    #[error("more than one connection leaves scene {scene_id} through option {option_id}")]
    DuplicateConnection {
        /// Source scene.
        scene_id: SceneId,
        /// Source option.
        option_id: OptionId,
    },

    /// A connection leaves a scene that does not exist.
    #[error("connection {connection_id} leaves missing scene {scene_id}")]
    DanglingSource {
        /// Offending connection.
        connection_id: ConnectionId,
        /// Missing scene.
        scene_id: SceneId,
    },

    /// A connection points at a scene that does not exist.
    #[error("connection {connection_id} targets missing scene {scene_id}")]
    DanglingTarget {
        /// Offending connection.
        connection_id: ConnectionId,
        /// Missing scene.
        scene_id: SceneId,
    },

    /// A connection is keyed on an option its source scene does not offer.
    #[error("connection {connection_id} uses option {option_id} not offered by scene {scene_id}")]
    UnknownOption {
        /// Offending connection.
        connection_id: ConnectionId,
        /// Source scene.
        scene_id: SceneId,
        /// Unknown option.
        option_id: OptionId,
    },

    /// The explicit starting scene does not exist.
    #[error("starting scene {0} does not exist")]
    UnknownStartingScene(SceneId),

    /// Several scenes are never targeted; the first one wins by definition order.
    #[error("ambiguous start: {} scenes are never targeted", .0.len())]
    AmbiguousStart(Vec<SceneId>),

    /// Every scene is targeted; the first scene is used as start.
    #[error("no scene is free of incoming connections")]
    NoRootScene,
}

/// A scene's image or narration reference that neither names a catalogued
/// asset nor is a remote URL. The scene still plays with a placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedAsset {
    /// Scene carrying the reference.
    pub scene_id: SceneId,
    /// What the reference was expected to be.
    pub kind: AssetKind,
    /// The reference as authored.
    pub reference: String,
}

impl Mission {
    /// Scene asset references that will render as placeholders, in scene
    /// order with the image before the narration tracks.
    #[must_use]
    pub fn unresolved_assets(&self) -> Vec<UnresolvedAsset> {
        let mut unresolved = Vec::new();
        for scene in self.graph().scenes() {
            let references = std::iter::once((AssetKind::Image, scene.image.as_str()))
                .chain(scene.audio.as_deref().map(|r| (AssetKind::Audio, r)))
                .chain(scene.extended_audio.as_deref().map(|r| (AssetKind::Audio, r)));
            for (kind, reference) in references {
                if !reference.is_empty() && self.assets().resolve(kind, reference).is_none() {
                    unresolved.push(UnresolvedAsset {
                        scene_id: scene.id,
                        kind,
                        reference: reference.to_owned(),
                    });
                }
            }
        }
        unresolved
    }

    /// Inspects the graph and reports every structural issue found.
    #[must_use]
    pub fn graph_issues(&self) -> Vec<GraphIssue> {
        let graph = self.graph();
        let mut issues = Vec::new();

        let mut seen_scenes = HashSet::new();
        for scene in graph.scenes() {
            if !seen_scenes.insert(scene.id) {
                issues.push(GraphIssue::DuplicateScene(scene.id));
            }
        }

        let mut seen_edges = HashSet::new();
        for connection in graph.connections() {
            let key = (connection.from_scene_id, connection.from_option_id);
            if !seen_edges.insert(key) {
                issues.push(GraphIssue::DuplicateConnection {
                    scene_id: connection.from_scene_id,
                    option_id: connection.from_option_id,
                });
            }
            match graph.find_scene(connection.from_scene_id) {
                None => issues.push(GraphIssue::DanglingSource {
                    connection_id: connection.id,
                    scene_id: connection.from_scene_id,
                }),
                Some(scene) if scene.option(connection.from_option_id).is_none() => {
                    issues.push(GraphIssue::UnknownOption {
                        connection_id: connection.id,
                        scene_id: connection.from_scene_id,
                        option_id: connection.from_option_id,
                    });
                }
                Some(_) => {}
            }
            if !graph.contains_scene(connection.to_scene_id) {
                issues.push(GraphIssue::DanglingTarget {
                    connection_id: connection.id,
                    scene_id: connection.to_scene_id,
                });
            }
        }

        match self.starting_scene_id() {
            Some(scene_id) if !graph.contains_scene(scene_id) => {
                issues.push(GraphIssue::UnknownStartingScene(scene_id));
            }
            Some(_) => {}
            None => {
                let roots = graph.unreferenced_scenes();
                match roots.len() {
                    0 => issues.push(GraphIssue::NoRootScene),
                    1 => {}
                    _ => issues.push(GraphIssue::AmbiguousStart(roots)),
                }
            }
        }

        issues
    }
}

impl ValidationMode {
    /// Applies this mode to a freshly loaded mission.
    ///
    /// # Errors
    ///
    /// In strict mode, returns `DomainError::Validation` listing every issue.
    /// Unresolved asset references are only ever warnings.
    pub fn check(self, mission: Mission) -> Result<Mission, DomainError> {
        for asset in mission.unresolved_assets() {
            tracing::warn!(
                mission_id = %mission.id(),
                scene_id = %asset.scene_id,
                kind = ?asset.kind,
                reference = %asset.reference,
                "asset reference does not resolve; the scene will show a placeholder"
            );
        }

        let issues = mission.graph_issues();
        if issues.is_empty() {
            return Ok(mission);
        }
        match self {
            Self::Lenient => {
                for issue in &issues {
                    tracing::warn!(mission_id = %mission.id(), %issue, "mission graph issue");
                }
                Ok(mission)
            }
            Self::Strict => {
                let details: Vec<String> = issues.iter().map(ToString::to_string).collect();
                Err(DomainError::Validation(format!(
                    "mission {} failed strict validation: {}",
                    mission.id(),
                    details.join("; ")
                )))
            }
        }
    }
}
