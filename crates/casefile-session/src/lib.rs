//! Casefile — Traversal State Machine and game sessions.
//!
//! Responsible for moving a player through a mission graph one option at a
//! time, recording the visit history, detecting mission completion and
//! keeping the saved progress in step with the in-memory state.

pub mod application;
pub mod domain;

pub use application::menu::MainMenu;
pub use application::progress::{ACCESSIBILITY_KEY, GAME_STATE_KEY, ProgressStore};
pub use application::session::{GameSession, SelectOutcome, SessionOptions};
pub use application::views::SessionView;
pub use domain::commands::{SelectOption, StartMission};
pub use domain::events::{TraversalEvent, TraversalEventKind};
pub use domain::state::GameState;
pub use domain::traversal::{CompletionReason, Transition, Traversal, TraversalStatus};
