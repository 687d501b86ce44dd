//! The traversal state machine.
//!
//! A traversal is either `Active` on some scene or `Complete`. Choosing an
//! option while active either moves to the connected scene or ends the
//! mission; nothing leaves `Complete`.

use std::sync::Arc;

use casefile_core::clock::Clock;
use casefile_core::error::DomainError;
use casefile_core::event::EventMetadata;
use casefile_mission::{ConnectionId, Mission, OptionId, Scene, SceneId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::events::{
    MissionCompleted, MissionResumed, MissionStarted, SceneEntered, TraversalEvent,
    TraversalEventKind,
};
use super::state::GameState;

/// Why a mission ended.
///
/// Both reasons look the same to the player, but a dangling reference means
/// the mission data is broken and is reported as such.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CompletionReason {
    /// The chosen option has no outgoing connection.
    ExplicitEnd {
        /// Scene the option was chosen on.
        scene_id: SceneId,
        /// Option chosen.
        option_id: OptionId,
    },
    /// The chosen option's connection targets a scene that does not exist.
    DanglingReference {
        /// Scene the option was chosen on.
        scene_id: SceneId,
        /// Option chosen.
        option_id: OptionId,
        /// The broken connection.
        connection_id: ConnectionId,
        /// The scene the connection names.
        missing_scene_id: SceneId,
    },
}

/// Phase of a traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraversalStatus {
    /// The player is on a scene and may choose an option.
    Active,
    /// The mission has ended.
    Complete(CompletionReason),
}

/// Outcome of one option selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// The player moved to this scene.
    Advanced(SceneId),
    /// The mission ended.
    Completed(CompletionReason),
}

/// One play-through of a mission.
#[derive(Debug)]
pub struct Traversal {
    mission: Arc<Mission>,
    state: GameState,
    status: TraversalStatus,
    sequence: i64,
    uncommitted_events: Vec<TraversalEvent>,
}

impl Traversal {
    /// Begins a fresh play-through at the mission's start scene.
    pub fn start(mission: Arc<Mission>, correlation_id: Uuid, clock: &dyn Clock) -> Self {
        let start = mission.resolve_start_scene();
        let state = GameState::new(mission.id().clone(), start);
        let mut traversal = Self::new(mission, state);
        traversal.record(
            correlation_id,
            clock,
            TraversalEventKind::MissionStarted(MissionStarted { scene_id: start }),
        );
        traversal
    }

    /// Continues from saved progress.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `saved` belongs to another
    /// mission or its history does not end at its current scene, and
    /// `DomainError::SceneNotFound` if the current scene no longer exists.
    pub fn resume(
        mission: Arc<Mission>,
        saved: GameState,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<Self, DomainError> {
        if &saved.mission_id != mission.id() {
            return Err(DomainError::Validation(format!(
                "saved progress belongs to mission {}, not {}",
                saved.mission_id,
                mission.id()
            )));
        }
        if mission.find_scene(saved.current_scene_id).is_none() {
            return Err(DomainError::SceneNotFound {
                mission_id: mission.id().to_string(),
                scene_id: saved.current_scene_id.0,
            });
        }
        if !saved.is_consistent() {
            return Err(DomainError::Validation(format!(
                "saved history does not end at scene {}",
                saved.current_scene_id
            )));
        }

        let scene_id = saved.current_scene_id;
        let visited = saved.history.len();
        let mut traversal = Self::new(mission, saved);
        traversal.record(
            correlation_id,
            clock,
            TraversalEventKind::MissionResumed(MissionResumed { scene_id, visited }),
        );
        Ok(traversal)
    }

    fn new(mission: Arc<Mission>, state: GameState) -> Self {
        Self {
            mission,
            state,
            status: TraversalStatus::Active,
            sequence: 0,
            uncommitted_events: Vec::new(),
        }
    }

    /// Applies the player's choice of `option_id` on the current scene.
    ///
    /// A connected, existing target scene becomes the current scene and is
    /// appended to the history. A missing connection, or one whose target
    /// does not exist, completes the mission.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTransition` if the mission is already
    /// complete.
    pub fn select_option(
        &mut self,
        option_id: OptionId,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<Transition, DomainError> {
        if let TraversalStatus::Complete(_) = self.status {
            return Err(DomainError::InvalidTransition(format!(
                "mission {} is already complete",
                self.mission.id()
            )));
        }

        let from_scene_id = self.state.current_scene_id;
        if self
            .mission
            .find_scene(from_scene_id)
            .is_some_and(|scene| scene.option(option_id).is_none())
        {
            tracing::warn!(
                mission_id = %self.mission.id(),
                scene_id = %from_scene_id,
                option_id = %option_id,
                "selected option is not offered by the current scene"
            );
        }

        let target = self
            .mission
            .find_connection(from_scene_id, option_id)
            .map(|connection| (connection.id, connection.to_scene_id));

        let transition = match target {
            Some((_, to_scene_id)) if self.mission.find_scene(to_scene_id).is_some() => {
                self.state.advance(to_scene_id);
                self.record(
                    correlation_id,
                    clock,
                    TraversalEventKind::SceneEntered(SceneEntered {
                        from_scene_id,
                        option_id,
                        scene_id: to_scene_id,
                    }),
                );
                Transition::Advanced(to_scene_id)
            }
            Some((connection_id, missing_scene_id)) => {
                self.complete(
                    CompletionReason::DanglingReference {
                        scene_id: from_scene_id,
                        option_id,
                        connection_id,
                        missing_scene_id,
                    },
                    correlation_id,
                    clock,
                )
            }
            None => self.complete(
                CompletionReason::ExplicitEnd {
                    scene_id: from_scene_id,
                    option_id,
                },
                correlation_id,
                clock,
            ),
        };
        Ok(transition)
    }

    fn complete(
        &mut self,
        reason: CompletionReason,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Transition {
        self.status = TraversalStatus::Complete(reason.clone());
        self.record(
            correlation_id,
            clock,
            TraversalEventKind::MissionCompleted(MissionCompleted {
                reason: reason.clone(),
            }),
        );
        Transition::Completed(reason)
    }

    fn record(&mut self, correlation_id: Uuid, clock: &dyn Clock, kind: TraversalEventKind) {
        self.sequence += 1;
        self.uncommitted_events.push(TraversalEvent {
            metadata: EventMetadata {
                event_id: Uuid::new_v4(),
                event_type: kind.event_type().to_owned(),
                mission_id: self.mission.id().to_string(),
                sequence_number: self.sequence,
                correlation_id,
                occurred_at: clock.now(),
            },
            kind,
        });
    }

    /// The mission being played.
    #[must_use]
    pub fn mission(&self) -> &Arc<Mission> {
        &self.mission
    }

    /// Current scene and history. After completion this is the last active
    /// state.
    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Current phase.
    #[must_use]
    pub fn status(&self) -> &TraversalStatus {
        &self.status
    }

    /// `true` once the mission has ended.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self.status, TraversalStatus::Complete(_))
    }

    /// The scene the player is on, if it exists in the graph.
    #[must_use]
    pub fn current_scene(&self) -> Option<&Scene> {
        self.mission.find_scene(self.state.current_scene_id)
    }

    /// Events recorded since the last drain.
    #[must_use]
    pub fn uncommitted_events(&self) -> &[TraversalEvent] {
        &self.uncommitted_events
    }

    /// Drains recorded events.
    pub fn take_uncommitted_events(&mut self) -> Vec<TraversalEvent> {
        std::mem::take(&mut self.uncommitted_events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use casefile_core::event::DomainEvent;
    use casefile_mission::MissionId;
    use casefile_test_support::{
        FixedClock, cyclic_mission, dangling_mission, fixed_now, two_branch_mission,
    };

    fn start(mission: Mission) -> Traversal {
        Traversal::start(Arc::new(mission), Uuid::new_v4(), &FixedClock::default())
    }

    fn select(traversal: &mut Traversal, option: i64) -> Result<Transition, DomainError> {
        traversal.select_option(OptionId(option), Uuid::new_v4(), &FixedClock::default())
    }

    #[test]
    fn test_start_enters_resolved_start_scene() {
        // Arrange
        let correlation_id = Uuid::new_v4();
        let clock = FixedClock::default();

        // Act
        let traversal = Traversal::start(Arc::new(two_branch_mission()), correlation_id, &clock);

        // Assert
        assert_eq!(traversal.state().current_scene_id, SceneId(1));
        assert_eq!(traversal.state().history, vec![SceneId(1)]);
        assert_eq!(traversal.status(), &TraversalStatus::Active);
        assert_eq!(traversal.current_scene().unwrap().label, "Office");

        let events = traversal.uncommitted_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type(), "traversal.mission_started");
        let meta = events[0].metadata();
        assert_eq!(meta.event_type, "traversal.mission_started");
        assert_eq!(meta.mission_id, "mission-1");
        assert_eq!(meta.sequence_number, 1);
        assert_eq!(meta.correlation_id, correlation_id);
        assert_eq!(meta.occurred_at, fixed_now());
    }

    #[test]
    fn test_select_connected_option_advances_and_appends_history() {
        // Arrange
        let mut traversal = start(two_branch_mission());

        // Act
        let transition = select(&mut traversal, 10).unwrap();

        // Assert
        assert_eq!(transition, Transition::Advanced(SceneId(2)));
        assert_eq!(traversal.state().current_scene_id, SceneId(2));
        assert_eq!(traversal.state().history, vec![SceneId(1), SceneId(2)]);
        assert_eq!(traversal.status(), &TraversalStatus::Active);

        let events = traversal.take_uncommitted_events();
        assert_eq!(events.len(), 2);
        match &events[1].kind {
            TraversalEventKind::SceneEntered(payload) => {
                assert_eq!(payload.from_scene_id, SceneId(1));
                assert_eq!(payload.option_id, OptionId(10));
                assert_eq!(payload.scene_id, SceneId(2));
            }
            other => panic!("expected SceneEntered, got {other:?}"),
        }
        assert_eq!(events[1].metadata().sequence_number, 2);
        assert!(traversal.uncommitted_events().is_empty());
    }

    #[test]
    fn test_terminal_option_completes_with_explicit_end() {
        // Arrange
        let mut traversal = start(two_branch_mission());
        select(&mut traversal, 10).unwrap();

        // Act
        let transition = select(&mut traversal, 20).unwrap();

        // Assert
        let reason = CompletionReason::ExplicitEnd {
            scene_id: SceneId(2),
            option_id: OptionId(20),
        };
        assert_eq!(transition, Transition::Completed(reason.clone()));
        assert_eq!(traversal.status(), &TraversalStatus::Complete(reason));
        assert!(traversal.is_complete());
        assert_eq!(traversal.state().history, vec![SceneId(1), SceneId(2)]);
    }

    #[test]
    fn test_dangling_connection_completes_with_dangling_reference() {
        let mut traversal = start(dangling_mission());

        let transition = select(&mut traversal, 11).unwrap();

        assert_eq!(
            transition,
            Transition::Completed(CompletionReason::DanglingReference {
                scene_id: SceneId(1),
                option_id: OptionId(11),
                connection_id: ConnectionId(101),
                missing_scene_id: SceneId(99),
            })
        );
        assert_eq!(traversal.state().history, vec![SceneId(1)]);
    }

    #[test]
    fn test_option_not_on_scene_still_completes() {
        let mut traversal = start(two_branch_mission());

        let transition = select(&mut traversal, 12_345).unwrap();

        assert!(matches!(
            transition,
            Transition::Completed(CompletionReason::ExplicitEnd { .. })
        ));
    }

    #[test]
    fn test_complete_rejects_further_selections() {
        // Arrange
        let mut traversal = start(two_branch_mission());
        select(&mut traversal, 11).unwrap();
        select(&mut traversal, 30).unwrap();
        let history_before = traversal.state().history.clone();

        // Act
        let result = select(&mut traversal, 10);

        // Assert
        match result.unwrap_err() {
            DomainError::InvalidTransition(msg) => assert!(msg.contains("already complete")),
            other => panic!("expected InvalidTransition, got {other:?}"),
        }
        assert_eq!(traversal.state().history, history_before);
    }

    #[test]
    fn test_cycles_revisit_scenes_and_history_grows_by_one() {
        // Arrange
        let mut traversal = start(cyclic_mission());
        assert_eq!(traversal.state().current_scene_id, SceneId(1));

        // Act / Assert
        for (step, option) in [10, 20, 10, 20].into_iter().enumerate() {
            let before = traversal.state().history.clone();
            select(&mut traversal, option).unwrap();
            let after = &traversal.state().history;
            assert_eq!(after.len(), before.len() + 1, "step {step}");
            assert_eq!(&after[..before.len()], before.as_slice());
        }
        assert_eq!(
            traversal.state().history,
            vec![SceneId(1), SceneId(2), SceneId(1), SceneId(2), SceneId(1)]
        );
    }

    #[test]
    fn test_same_choices_produce_same_path() {
        let run = || {
            let mut traversal = start(two_branch_mission());
            let mut scenes = vec![traversal.state().current_scene_id];
            for option in [10, 20] {
                select(&mut traversal, option).unwrap();
                scenes.push(traversal.state().current_scene_id);
            }
            (scenes, traversal.status().clone())
        };

        assert_eq!(run(), run());
    }

    #[test]
    fn test_resume_restores_saved_state() {
        // Arrange
        let saved = GameState {
            mission_id: MissionId::new("mission-1"),
            current_scene_id: SceneId(3),
            history: vec![SceneId(1), SceneId(3)],
        };

        // Act
        let traversal = Traversal::resume(
            Arc::new(two_branch_mission()),
            saved.clone(),
            Uuid::new_v4(),
            &FixedClock::default(),
        )
        .unwrap();

        // Assert
        assert_eq!(traversal.state(), &saved);
        match &traversal.uncommitted_events()[0].kind {
            TraversalEventKind::MissionResumed(payload) => {
                assert_eq!(payload.scene_id, SceneId(3));
                assert_eq!(payload.visited, 2);
            }
            other => panic!("expected MissionResumed, got {other:?}"),
        }
    }

    #[test]
    fn test_resume_rejects_foreign_stale_or_inconsistent_saves() {
        let mission = Arc::new(two_branch_mission());
        let clock = FixedClock::default();
        let resume = |state: GameState| {
            Traversal::resume(Arc::clone(&mission), state, Uuid::new_v4(), &clock)
        };

        let foreign = GameState::new(MissionId::new("mission-2"), SceneId(1));
        assert!(matches!(resume(foreign), Err(DomainError::Validation(_))));

        let stale = GameState::new(MissionId::new("mission-1"), SceneId(42));
        assert!(matches!(
            resume(stale),
            Err(DomainError::SceneNotFound { scene_id: 42, .. })
        ));

        let inconsistent = GameState {
            mission_id: MissionId::new("mission-1"),
            current_scene_id: SceneId(2),
            history: vec![],
        };
        assert!(matches!(resume(inconsistent), Err(DomainError::Validation(_))));
    }
}
