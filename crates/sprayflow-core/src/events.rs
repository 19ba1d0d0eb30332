use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::catalog::Movement;
use crate::session::SessionState;
use crate::stats::SessionStats;

/// Every state change of a session produces an Event.
/// The presentation layer renders them; nothing else reacts to them.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    SessionStarted {
        session_id: Uuid,
        interval_secs: u64,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    CueEmitted {
        movement: Movement,
        /// 1-based position within the session.
        cue_number: u32,
        /// Triggered by the user rather than the interval.
        skipped: bool,
        at: DateTime<Utc>,
    },
    SessionPaused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    SessionResumed {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    CountdownTick {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    SessionCompleted {
        session_id: Uuid,
        stats: SessionStats,
        at: DateTime<Utc>,
    },
    /// Stopped early. Carries the final stats, which the engine discards.
    SessionStopped {
        session_id: Uuid,
        remaining_secs: u64,
        stats: SessionStats,
        at: DateTime<Utc>,
    },
    /// Completion acknowledged, back to idle.
    SessionReset {
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: SessionState,
        current_movement: Option<Movement>,
        remaining_secs: u64,
        total_cues: u32,
        at: DateTime<Utc>,
    },
}
