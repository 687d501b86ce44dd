//! Domain events for the traversal context.

use casefile_core::event::{DomainEvent, EventMetadata};
use casefile_mission::{OptionId, SceneId};
use serde::{Deserialize, Serialize};

use super::traversal::CompletionReason;

/// Event type emitted when a fresh play-through begins.
pub const MISSION_STARTED_EVENT_TYPE: &str = "traversal.mission_started";
/// Event type emitted when saved progress is restored.
pub const MISSION_RESUMED_EVENT_TYPE: &str = "traversal.mission_resumed";
/// Event type emitted when the player moves to another scene.
pub const SCENE_ENTERED_EVENT_TYPE: &str = "traversal.scene_entered";
/// Event type emitted when the mission ends.
pub const MISSION_COMPLETED_EVENT_TYPE: &str = "traversal.mission_completed";

/// Emitted when a fresh play-through begins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionStarted {
    /// The start scene.
    pub scene_id: SceneId,
}

/// Emitted when saved progress is restored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionResumed {
    /// The restored current scene.
    pub scene_id: SceneId,
    /// Number of scenes already visited.
    pub visited: usize,
}

/// Emitted when an option leads to another scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneEntered {
    /// Scene the option was chosen on.
    pub from_scene_id: SceneId,
    /// Option chosen.
    pub option_id: OptionId,
    /// Scene entered.
    pub scene_id: SceneId,
}

/// Emitted when the mission reaches its terminal state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionCompleted {
    /// Why the mission ended.
    pub reason: CompletionReason,
}

/// Event payload variants for the traversal context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TraversalEventKind {
    /// A fresh play-through has begun.
    MissionStarted(MissionStarted),
    /// Saved progress has been restored.
    MissionResumed(MissionResumed),
    /// The player has entered a scene.
    SceneEntered(SceneEntered),
    /// The mission has ended.
    MissionCompleted(MissionCompleted),
}

impl TraversalEventKind {
    /// The event type string for this payload.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::MissionStarted(_) => MISSION_STARTED_EVENT_TYPE,
            Self::MissionResumed(_) => MISSION_RESUMED_EVENT_TYPE,
            Self::SceneEntered(_) => SCENE_ENTERED_EVENT_TYPE,
            Self::MissionCompleted(_) => MISSION_COMPLETED_EVENT_TYPE,
        }
    }
}

/// Domain event envelope for the traversal context.
#[derive(Debug, Clone)]
pub struct TraversalEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: TraversalEventKind,
}

impl DomainEvent for TraversalEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("TraversalEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}

impl TraversalEvent {
    /// Writes this event to the log with its type and sequence number.
    /// Dangling references are warnings; every other event is informational.
    pub fn log(&self) {
        let meta = &self.metadata;
        match &self.kind {
            TraversalEventKind::MissionStarted(payload) => tracing::info!(
                mission_id = %meta.mission_id,
                correlation_id = %meta.correlation_id,
                event_type = %meta.event_type,
                sequence_number = meta.sequence_number,
                scene_id = %payload.scene_id,
                "mission started"
            ),
            TraversalEventKind::MissionResumed(payload) => tracing::info!(
                mission_id = %meta.mission_id,
                correlation_id = %meta.correlation_id,
                event_type = %meta.event_type,
                sequence_number = meta.sequence_number,
                scene_id = %payload.scene_id,
                visited = payload.visited,
                "mission resumed from saved progress"
            ),
            TraversalEventKind::SceneEntered(payload) => tracing::debug!(
                mission_id = %meta.mission_id,
                correlation_id = %meta.correlation_id,
                event_type = %meta.event_type,
                sequence_number = meta.sequence_number,
                from_scene_id = %payload.from_scene_id,
                option_id = %payload.option_id,
                scene_id = %payload.scene_id,
                "scene entered"
            ),
            TraversalEventKind::MissionCompleted(payload) => match &payload.reason {
                CompletionReason::ExplicitEnd { scene_id, option_id } => tracing::info!(
                    mission_id = %meta.mission_id,
                    correlation_id = %meta.correlation_id,
                    event_type = %meta.event_type,
                    sequence_number = meta.sequence_number,
                event_type = %meta.event_type,
                sequence_number = meta.sequence_number,
                    scene_id = %scene_id,
                    option_id = %option_id,
                    "mission complete: terminal option chosen"
                ),
                CompletionReason::DanglingReference {
                    scene_id,
                    option_id,
                    connection_id,
                    missing_scene_id,
                } => tracing::warn!(
                    mission_id = %meta.mission_id,
                    correlation_id = %meta.correlation_id,
                    event_type = %meta.event_type,
                    sequence_number = meta.sequence_number,
                event_type = %meta.event_type,
                sequence_number = meta.sequence_number,
                    scene_id = %scene_id,
                    option_id = %option_id,
                    connection_id = %connection_id,
                    missing_scene_id = %missing_scene_id,
                    "mission complete: connection targets a missing scene"
                ),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use casefile_test_support::{LogCapture, fixed_now};
    use uuid::Uuid;

    fn event(kind: TraversalEventKind) -> TraversalEvent {
        TraversalEvent {
            metadata: EventMetadata {
                event_id: Uuid::new_v4(),
                event_type: kind.event_type().to_owned(),
                mission_id: "mission-1".to_owned(),
                sequence_number: 3,
                correlation_id: Uuid::new_v4(),
                occurred_at: fixed_now(),
            },
            kind,
        }
    }

    #[test]
    fn test_completion_payload_is_tagged_by_reason() {
        // Arrange
        let event = event(TraversalEventKind::MissionCompleted(MissionCompleted {
            reason: CompletionReason::DanglingReference {
                scene_id: SceneId(1),
                option_id: OptionId(11),
                connection_id: casefile_mission::ConnectionId(101),
                missing_scene_id: SceneId(99),
            },
        }));

        // Act
        let payload = event.to_payload();

        // Assert
        assert_eq!(event.event_type(), MISSION_COMPLETED_EVENT_TYPE);
        assert_eq!(
            payload,
            serde_json::json!({
                "MissionCompleted": {
                    "reason": {
                        "kind": "dangling_reference",
                        "scene_id": 1,
                        "option_id": 11,
                        "connection_id": 101,
                        "missing_scene_id": 99,
                    }
                }
            })
        );
    }

    #[test]
    fn test_scene_entered_payload() {
        let event = event(TraversalEventKind::SceneEntered(SceneEntered {
            from_scene_id: SceneId(1),
            option_id: OptionId(10),
            scene_id: SceneId(2),
        }));

        assert_eq!(event.event_type(), SCENE_ENTERED_EVENT_TYPE);
        assert_eq!(event.metadata().sequence_number, 3);
        assert_eq!(
            event.to_payload(),
            serde_json::json!({
                "SceneEntered": { "from_scene_id": 1, "option_id": 10, "scene_id": 2 }
            })
        );
    }

    #[test]
    fn test_log_carries_event_type_and_sequence_number() {
        // Arrange
        let event = event(TraversalEventKind::MissionStarted(MissionStarted {
            scene_id: SceneId(1),
        }));
        let logs = LogCapture::default();

        // Act
        logs.capture(|| event.log());

        // Assert
        let events = logs.events();
        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0].field("event_type"),
            Some(MISSION_STARTED_EVENT_TYPE)
        );
        assert_eq!(events[0].field("sequence_number"), Some("3"));
        assert_eq!(events[0].field("mission_id"), Some("mission-1"));
    }
}
