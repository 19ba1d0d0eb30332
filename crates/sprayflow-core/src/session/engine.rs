//! Session engine.
//!
//! The engine is the only owner of session state. It does not use threads:
//! the host calls [`SessionEngine::tick`] whenever [`SessionEngine::next_deadline`]
//! passes and forwards user intents as method calls, one at a time.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Paused
//! Running | Paused -> Idle          (stop)
//! Running -> Completed -> Idle      (countdown hits zero, acknowledge)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = SessionEngine::new(SilentOutput, MonotonicTime::new());
//! engine.start(&settings)?;
//! // In a loop, at engine.next_deadline():
//! for event in engine.tick() { render(event) }
//! ```

use chrono::Utc;
use rand::SeedableRng;
use rand_pcg::Mcg128Xsl64;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

use super::plan::SessionPlan;
use crate::catalog::{all_movements, Movement};
use crate::clock::{ClockFire, ClockHandle, SessionClock, TimeSource, TriggerKind};
use crate::error::{OutputError, Result, SessionError};
use crate::events::Event;
use crate::output::CueOutput;
use crate::selector::pick;
use crate::stats::SessionStats;
use crate::storage::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Idle,
    Running,
    Paused,
    Completed,
}

pub struct SessionEngine<O, T> {
    output: O,
    time: T,
    rng: Mcg128Xsl64,
    clock: SessionClock,
    handle: Option<ClockHandle>,
    state: SessionState,
    plan: Option<SessionPlan>,
    session_id: Option<Uuid>,
    current: Option<Movement>,
    remaining_secs: u64,
    stats: Option<SessionStats>,
}

impl<O: CueOutput, T: TimeSource> SessionEngine<O, T> {
    /// Engine with an entropy-seeded selector.
    pub fn new(output: O, time: T) -> Self {
        Self::with_rng(output, time, Mcg128Xsl64::from_entropy())
    }

    /// Engine whose cue sequence is fixed by `seed`.
    pub fn with_seed(output: O, time: T, seed: u64) -> Self {
        Self::with_rng(output, time, Mcg128Xsl64::seed_from_u64(seed))
    }

    fn with_rng(output: O, time: T, rng: Mcg128Xsl64) -> Self {
        Self {
            output,
            time,
            rng,
            clock: SessionClock::new(),
            handle: None,
            state: SessionState::Idle,
            plan: None,
            session_id: None,
            current: None,
            remaining_secs: 0,
            stats: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn current_movement(&self) -> Option<&Movement> {
        self.current.as_ref()
    }

    pub fn time_remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    /// Stats of the running, paused or completed session.
    pub fn stats(&self) -> Option<&SessionStats> {
        self.stats.as_ref()
    }

    pub fn plan(&self) -> Option<&SessionPlan> {
        self.plan.as_ref()
    }

    pub fn session_id(&self) -> Option<Uuid> {
        self.session_id
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn time(&self) -> &T {
        &self.time
    }

    /// When the host should call [`tick`](Self::tick) next. `None` unless running.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.clock.next_deadline()
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.state,
            current_movement: self.current,
            remaining_secs: self.remaining_secs,
            total_cues: self.stats.as_ref().map(|s| s.total_cues).unwrap_or(0),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start a session from stored settings (`duration` in minutes).
    ///
    /// Rejected without touching any state when no category is enabled,
    /// when a value is out of range, or when a session is already active.
    pub fn start(&mut self, settings: &Settings) -> Result<Vec<Event>> {
        if self.state != SessionState::Idle {
            return Err(SessionError::AlreadyActive { state: self.state }.into());
        }
        let plan = SessionPlan::from_settings(settings)?;
        self.start_plan(plan)
    }

    /// Start a session from an explicit plan. Emits the first cue at once.
    pub fn start_plan(&mut self, plan: SessionPlan) -> Result<Vec<Event>> {
        if self.state != SessionState::Idle {
            return Err(SessionError::AlreadyActive { state: self.state }.into());
        }

        let session_id = Uuid::new_v4();
        let interval = plan.interval();
        let mut events = vec![Event::SessionStarted {
            session_id,
            interval_secs: plan.interval_secs(),
            duration_secs: plan.duration_secs(),
            at: Utc::now(),
        }];
        tracing::debug!(%session_id, interval_secs = plan.interval_secs(), duration_secs = plan.duration_secs(), "session started");

        self.state = SessionState::Running;
        self.remaining_secs = plan.duration_secs();
        self.stats = Some(SessionStats::new());
        self.session_id = Some(session_id);
        self.plan = Some(plan);

        events.extend(self.emit_cue(false));
        self.handle = Some(self.clock.start(interval, self.time.now()));
        Ok(events)
    }

    pub fn pause(&mut self) -> Option<Event> {
        if self.state != SessionState::Running {
            return None;
        }
        self.halt();
        self.state = SessionState::Paused;
        tracing::debug!(remaining_secs = self.remaining_secs, "session paused");
        Some(Event::SessionPaused {
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Restart both triggers from now. Remaining time is exactly what it
    /// was at pause; the cue cadence restarts from this point.
    pub fn resume(&mut self) -> Option<Event> {
        if self.state != SessionState::Paused {
            return None;
        }
        let interval = self.plan.as_ref()?.interval();
        self.handle = Some(self.clock.start(interval, self.time.now()));
        self.state = SessionState::Running;
        tracing::debug!(remaining_secs = self.remaining_secs, "session resumed");
        Some(Event::SessionResumed {
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Emit a cue now. The cue trigger keeps its phase, so the next
    /// scheduled cue may follow sooner than one interval.
    pub fn skip(&mut self) -> Option<Event> {
        if self.state != SessionState::Running {
            return None;
        }
        self.emit_cue(true)
    }

    /// Abandon the session. The final stats travel with the event and are
    /// dropped by the engine.
    pub fn stop(&mut self) -> Option<Event> {
        match self.state {
            SessionState::Running | SessionState::Paused => {
                self.halt();
                self.state = SessionState::Idle;
                self.current = None;
                self.plan = None;
                let stats = self.stats.take().unwrap_or_default();
                let session_id = self.session_id.take().unwrap_or_else(Uuid::nil);
                tracing::debug!(%session_id, total_cues = stats.total_cues, "session stopped");
                Some(Event::SessionStopped {
                    session_id,
                    remaining_secs: self.remaining_secs,
                    stats,
                    at: Utc::now(),
                })
            }
            _ => None,
        }
    }

    /// Leave the summary and go back to idle, discarding the stats.
    pub fn acknowledge_completion(&mut self) -> Option<Event> {
        if self.state != SessionState::Completed {
            return None;
        }
        self.state = SessionState::Idle;
        self.stats = None;
        self.plan = None;
        self.session_id = None;
        Some(Event::SessionReset { at: Utc::now() })
    }

    /// Deliver every clock fire due by now, in deadline order.
    pub fn tick(&mut self) -> Vec<Event> {
        let now = self.time.now();
        let mut events = Vec::new();
        while let Some(fire) = self.clock.poll(now) {
            if !self.owns(&fire) {
                continue;
            }
            match fire.kind {
                TriggerKind::Countdown => events.extend(self.count_down()),
                TriggerKind::Cue => events.extend(self.emit_cue(false)),
            }
        }
        events
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn owns(&self, fire: &ClockFire) -> bool {
        self.state == SessionState::Running
            && self.clock.is_current(fire)
            && self.handle.map(|h| h.generation()) == Some(fire.generation)
    }

    fn count_down(&mut self) -> Vec<Event> {
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        let mut events = vec![Event::CountdownTick {
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        }];
        if self.remaining_secs == 0 {
            events.push(self.complete());
        }
        events
    }

    fn complete(&mut self) -> Event {
        self.halt();
        self.state = SessionState::Completed;
        self.current = None;
        let stats = self.stats.clone().unwrap_or_default();
        let session_id = self.session_id.unwrap_or_else(Uuid::nil);
        tracing::debug!(%session_id, total_cues = stats.total_cues, "session completed");
        Event::SessionCompleted {
            session_id,
            stats,
            at: Utc::now(),
        }
    }

    /// Stop both triggers and silence speech.
    fn halt(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.clock.stop(handle);
        }
        best_effort("cancel speech", self.output.cancel_speech());
    }

    fn emit_cue(&mut self, skipped: bool) -> Option<Event> {
        let plan = self.plan.as_ref()?;
        let (use_voice, use_beep) = (plan.use_voice(), plan.use_beep());
        let picked = pick(all_movements(), plan.categories(), &mut self.rng);
        debug_assert!(picked.is_some(), "running session has no eligible movement");
        let Some(movement) = picked else {
            tracing::error!("no eligible movement for running session");
            return None;
        };

        self.current = Some(movement);
        let stats = self.stats.take().unwrap_or_default().record_cue(movement);
        let cue_number = stats.total_cues;
        self.stats = Some(stats);

        if use_voice {
            best_effort("cancel speech", self.output.cancel_speech());
            best_effort("speak", self.output.speak(movement.name));
        }
        if use_beep {
            best_effort("tone", self.output.play_tone());
        }

        Some(Event::CueEmitted {
            movement,
            cue_number,
            skipped,
            at: Utc::now(),
        })
    }
}

fn best_effort(what: &str, result: std::result::Result<(), OutputError>) {
    if let Err(e) = result {
        tracing::warn!(error = %e, "{what} failed; continuing session");
    }
}
