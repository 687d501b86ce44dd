//! Domain error types.

use thiserror::Error;

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// No mission with the given identifier is registered.
    #[error("mission not found: {0}")]
    MissionNotFound(String),

    /// A scene referenced by state or navigation does not exist.
    #[error("scene {scene_id} not found in mission {mission_id}")]
    SceneNotFound {
        /// The mission that was searched.
        mission_id: String,
        /// The scene that was requested.
        scene_id: i64,
    },

    /// A transition was requested that the current state does not allow.
    #[error("invalid transition: {0}")]
    InvalidTransition(String),

    /// A validation error in domain logic or loaded data.
    #[error("validation error: {0}")]
    Validation(String),

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
