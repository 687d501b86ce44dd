//! Commands for the traversal context.

use casefile_core::command::Command;
use casefile_mission::OptionId;
use uuid::Uuid;

/// Command to begin or continue a mission.
#[derive(Debug, Clone)]
pub struct StartMission {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The mission to play.
    pub mission_id: String,
    /// Restore saved progress for this mission when possible.
    pub continue_saved: bool,
}

impl StartMission {
    /// Starts `mission_id` from its start scene.
    pub fn new_game(mission_id: impl Into<String>) -> Self {
        Self {
            correlation_id: Uuid::new_v4(),
            mission_id: mission_id.into(),
            continue_saved: false,
        }
    }

    /// Continues `mission_id` from saved progress.
    pub fn resume(mission_id: impl Into<String>) -> Self {
        Self {
            correlation_id: Uuid::new_v4(),
            mission_id: mission_id.into(),
            continue_saved: true,
        }
    }
}

impl Command for StartMission {
    fn command_type(&self) -> &'static str {
        "traversal.start_mission"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to pick an option on the current scene.
#[derive(Debug, Clone)]
pub struct SelectOption {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The option chosen.
    pub option_id: OptionId,
}

impl SelectOption {
    /// Selects `option_id` with a fresh correlation id.
    #[must_use]
    pub fn new(option_id: OptionId) -> Self {
        Self {
            correlation_id: Uuid::new_v4(),
            option_id,
        }
    }
}

impl Command for SelectOption {
    fn command_type(&self) -> &'static str {
        "traversal.select_option"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
