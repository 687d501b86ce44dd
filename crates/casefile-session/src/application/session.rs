//! Game sessions.
//!
//! A `GameSession` owns one traversal, applies option selections one at a
//! time with a short feedback delay, and keeps the saved progress in step
//! with the in-memory state. Persistence is best-effort: failures are logged
//! and play continues on the in-memory state.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use casefile_core::clock::Clock;
use casefile_core::command::Command;
use casefile_core::error::DomainError;
use casefile_mission::{Mission, MissionRepository, NarrationChannel, SceneId};

use crate::application::progress::ProgressStore;
use crate::application::views::SessionView;
use crate::domain::commands::{SelectOption, StartMission};
use crate::domain::traversal::{CompletionReason, Transition, Traversal};

/// Tunables for a game session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    /// Pause between an option being chosen and the transition being
    /// applied. Further selections are ignored during the pause.
    pub feedback_delay: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            feedback_delay: Duration::from_millis(300),
        }
    }
}

/// Result of a selection request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectOutcome {
    /// Another selection was still in flight; this one was dropped.
    Ignored,
    /// The player moved to another scene.
    Advanced {
        /// The scene entered.
        scene_id: SceneId,
    },
    /// The mission ended.
    Completed(CompletionReason),
}

#[derive(Debug)]
struct SessionInner {
    traversal: Traversal,
    narration: NarrationChannel,
    background_track: Option<String>,
}

/// One interactive play-through.
pub struct GameSession {
    inner: Mutex<SessionInner>,
    pending: AtomicBool,
    progress: ProgressStore,
    clock: Arc<dyn Clock>,
    options: SessionOptions,
}

impl fmt::Debug for GameSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameSession")
            .field("inner", &self.inner)
            .field("pending", &self.pending)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Clears the in-flight flag when a selection settles, even on error.
struct PendingGuard<'a>(&'a AtomicBool);

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl GameSession {
    /// Opens a session on the requested mission.
    ///
    /// With `continue_saved`, saved progress for the same mission is
    /// restored when it is still valid; anything else starts fresh. The
    /// resulting state is saved before returning.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MissionNotFound` if the mission is not loaded.
    pub async fn start(
        command: &StartMission,
        missions: &MissionRepository,
        progress: ProgressStore,
        clock: Arc<dyn Clock>,
        options: SessionOptions,
    ) -> Result<Self, DomainError> {
        tracing::debug!(
            command = command.command_type(),
            correlation_id = %command.correlation_id(),
            mission_id = %command.mission_id,
            continue_saved = command.continue_saved,
            "starting session"
        );
        let mission = missions.require(&command.mission_id)?;

        let accessibility = progress
            .load_accessibility_mode()
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "could not read accessibility preference");
                false
            });

        let restored = if command.continue_saved {
            restore(&mission, &progress, command, clock.as_ref()).await
        } else {
            None
        };
        let mut traversal = restored.unwrap_or_else(|| {
            Traversal::start(Arc::clone(&mission), command.correlation_id, clock.as_ref())
        });

        for event in traversal.take_uncommitted_events() {
            event.log();
        }
        if let Err(e) = progress.save_game_state(traversal.state()).await {
            tracing::warn!(mission_id = %mission.id(), error = %e, "could not save initial progress");
        }

        Ok(Self {
            inner: Mutex::new(SessionInner {
                traversal,
                narration: NarrationChannel::from_accessibility(accessibility),
                background_track: mission.background_audio().map(str::to_owned),
            }),
            pending: AtomicBool::new(false),
            progress,
            clock,
            options,
        })
    }

    /// Applies an option selection.
    ///
    /// While a selection is in flight any further selection returns
    /// `SelectOutcome::Ignored` without touching the state.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTransition` if the mission is already
    /// complete, or `DomainError::Infrastructure` if the session lock is
    /// poisoned.
    pub async fn select_option(&self, command: &SelectOption) -> Result<SelectOutcome, DomainError> {
        if self.pending.swap(true, Ordering::AcqRel) {
            tracing::debug!(option_id = %command.option_id, "selection ignored while another is pending");
            return Ok(SelectOutcome::Ignored);
        }
        let _guard = PendingGuard(&self.pending);
        tracing::debug!(
            command = command.command_type(),
            correlation_id = %command.correlation_id(),
            option_id = %command.option_id,
            "applying selection"
        );

        let mission_id = {
            let inner = self.lock()?;
            if inner.traversal.is_complete() {
                return Err(DomainError::InvalidTransition(format!(
                    "mission {} is already complete",
                    inner.traversal.mission().id()
                )));
            }
            inner.traversal.mission().id().clone()
        };

        if !self.options.feedback_delay.is_zero() {
            tokio::time::sleep(self.options.feedback_delay).await;
        }

        let (transition, state, events) = {
            let mut inner = self.lock()?;
            let transition = inner.traversal.select_option(
                command.option_id,
                command.correlation_id,
                self.clock.as_ref(),
            )?;
            let state = inner.traversal.state().clone();
            (transition, state, inner.traversal.take_uncommitted_events())
        };
        for event in &events {
            event.log();
        }

        match transition {
            Transition::Advanced(scene_id) => {
                if let Err(e) = self.progress.save_game_state(&state).await {
                    tracing::warn!(
                        mission_id = %mission_id,
                        scene_id = %scene_id,
                        error = %e,
                        "could not save progress; continuing in memory"
                    );
                }
                Ok(SelectOutcome::Advanced { scene_id })
            }
            Transition::Completed(reason) => {
                if let Err(e) = self.progress.clear_game_state().await {
                    tracing::warn!(mission_id = %mission_id, error = %e, "could not clear saved progress");
                }
                Ok(SelectOutcome::Completed(reason))
            }
        }
    }

    /// Snapshot of what the game screen shows.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the session lock is poisoned.
    pub fn view(&self) -> Result<SessionView, DomainError> {
        let inner = self.lock()?;
        Ok(SessionView::build(
            &inner.traversal,
            inner.narration,
            inner.background_track.clone(),
        ))
    }

    /// Switches narration channel and persists the preference.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the session lock is poisoned.
    pub async fn set_accessibility_mode(&self, enabled: bool) -> Result<(), DomainError> {
        self.lock()?.narration = NarrationChannel::from_accessibility(enabled);
        if let Err(e) = self.progress.save_accessibility_mode(enabled).await {
            tracing::warn!(error = %e, "could not save accessibility preference");
        }
        Ok(())
    }

    /// Changes the background track. `None` switches music off.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `track` is neither a selectable
    /// track nor the mission's default, or `DomainError::Infrastructure` if
    /// the session lock is poisoned.
    pub fn select_background_track(&self, track: Option<&str>) -> Result<(), DomainError> {
        let mut inner = self.lock()?;
        if let Some(track) = track {
            let mission = inner.traversal.mission();
            let known = mission.background_audio() == Some(track)
                || mission.background_track_choices().iter().any(|t| t == track);
            if !known {
                return Err(DomainError::Validation(format!(
                    "{track} is not a background track of mission {}",
                    mission.id()
                )));
            }
        }
        inner.background_track = track.map(str::to_owned);
        Ok(())
    }

    /// `true` while a selection is in flight.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    fn lock(&self) -> Result<MutexGuard<'_, SessionInner>, DomainError> {
        self.inner
            .lock()
            .map_err(|_| DomainError::Infrastructure("session state lock poisoned".to_owned()))
    }
}

async fn restore(
    mission: &Arc<Mission>,
    progress: &ProgressStore,
    command: &StartMission,
    clock: &dyn Clock,
) -> Option<Traversal> {
    let saved = match progress.load_game_state().await {
        Ok(saved) => saved?,
        Err(e) => {
            tracing::warn!(mission_id = %mission.id(), error = %e, "could not read saved progress");
            return None;
        }
    };
    match Traversal::resume(Arc::clone(mission), saved, command.correlation_id, clock) {
        Ok(traversal) => Some(traversal),
        Err(e) => {
            tracing::warn!(mission_id = %mission.id(), error = %e, "discarding saved progress");
            None
        }
    }
}
