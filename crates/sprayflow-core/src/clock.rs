//! Session clock.
//!
//! Two periodic triggers, one for cues and one for the one-second countdown,
//! armed and disarmed together. The clock has no threads and no timers of
//! its own: the host reads the current instant from a [`TimeSource`], calls
//! [`SessionClock::poll`] and sleeps until [`SessionClock::next_deadline`].
//!
//! Every `start` bumps a generation counter. Fires carry the generation of
//! the run that produced them and a stopped run never produces another fire,
//! so a host timer that wakes late after a pause has nothing to deliver.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Countdown period.
pub const COUNTDOWN_PERIOD: Duration = Duration::from_secs(1);

/// Monotonic time, as an offset from a source-specific origin.
pub trait TimeSource {
    fn now(&self) -> Duration;
}

/// Wall-clock monotonic time for production hosts.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicTime {
    origin: Instant,
}

impl MonotonicTime {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// Convert an offset returned by [`TimeSource::now`] back to an `Instant`.
    pub fn instant_at(&self, offset: Duration) -> Instant {
        self.origin + offset
    }
}

impl Default for MonotonicTime {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for MonotonicTime {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Hand-driven time. Clones share the same reading.
#[derive(Debug, Clone, Default)]
pub struct ManualTime {
    now: Rc<Cell<Duration>>,
}

impl ManualTime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn advance_secs(&self, secs: u64) {
        self.advance(Duration::from_secs(secs));
    }
}

impl TimeSource for ManualTime {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerKind {
    Countdown,
    Cue,
}

/// Identifies one armed run of the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockHandle {
    generation: u64,
}

impl ClockHandle {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// A trigger that came due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockFire {
    pub kind: TriggerKind,
    pub generation: u64,
    /// Scheduled deadline, which may be earlier than the poll instant when
    /// the host woke late.
    pub due: Duration,
}

#[derive(Debug, Clone, Copy)]
struct Trigger {
    period: Duration,
    next_due: Duration,
}

impl Trigger {
    fn armed_at(now: Duration, period: Duration) -> Self {
        Self {
            period,
            next_due: now + period,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Armed {
    countdown: Trigger,
    cue: Trigger,
}

#[derive(Debug, Default)]
pub struct SessionClock {
    generation: u64,
    armed: Option<Armed>,
}

impl SessionClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm both triggers from `now`. Any previous run is cancelled.
    ///
    /// A zero interval is clamped to one second.
    pub fn start(&mut self, cue_interval: Duration, now: Duration) -> ClockHandle {
        let cue_interval = cue_interval.max(COUNTDOWN_PERIOD);
        self.generation += 1;
        self.armed = Some(Armed {
            countdown: Trigger::armed_at(now, COUNTDOWN_PERIOD),
            cue: Trigger::armed_at(now, cue_interval),
        });
        ClockHandle {
            generation: self.generation,
        }
    }

    /// Disarm the run identified by `handle`.
    ///
    /// Idempotent. A handle from an older run is ignored. Returns whether
    /// anything was disarmed.
    pub fn stop(&mut self, handle: ClockHandle) -> bool {
        if !self.is_running(handle) {
            return false;
        }
        self.armed = None;
        true
    }

    pub fn is_running(&self, handle: ClockHandle) -> bool {
        self.armed.is_some() && handle.generation == self.generation
    }

    pub fn is_current(&self, fire: &ClockFire) -> bool {
        self.armed.is_some() && fire.generation == self.generation
    }

    /// Earliest pending deadline, if armed.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.armed.map(|a| a.countdown.next_due.min(a.cue.next_due))
    }

    /// Take the earliest fire due at or before `now`.
    ///
    /// Call repeatedly until it returns `None`; missed periods are delivered
    /// one by one in deadline order. The countdown fires first on a tie.
    pub fn poll(&mut self, now: Duration) -> Option<ClockFire> {
        let armed = self.armed.as_mut()?;
        let (trigger, kind) = if armed.countdown.next_due <= armed.cue.next_due {
            (&mut armed.countdown, TriggerKind::Countdown)
        } else {
            (&mut armed.cue, TriggerKind::Cue)
        };
        if trigger.next_due > now {
            return None;
        }
        let due = trigger.next_due;
        trigger.next_due += trigger.period;
        Some(ClockFire {
            kind,
            generation: self.generation,
            due,
        })
    }
}
