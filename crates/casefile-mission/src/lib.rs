//! Casefile — Mission Definition and Mission Repository.
//!
//! A mission is an immutable directed graph of scenes whose options are
//! wired to destination scenes by connections. This crate parses mission
//! documents, answers structural queries over the graph and holds the set
//! of loaded missions for the lifetime of the application.

pub mod application;
pub mod domain;

pub use application::config::{CatalogConfig, MissionEntry};
pub use application::repository::MissionRepository;
pub use domain::assets::{AssetCatalog, AssetHandle, AssetKind, track_display_name};
pub use domain::graph::MissionGraph;
pub use domain::model::{
    Connection, ConnectionId, Mission, MissionId, OptionId, Scene, SceneId, SceneOption,
};
pub use domain::narration::NarrationChannel;
pub use domain::source::{EmbeddedMission, MissionFormat, MissionSource};
pub use domain::validation::{GraphIssue, UnresolvedAsset, ValidationMode};
