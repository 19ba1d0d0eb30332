//! # SprayFlow Core Library
//!
//! This library provides the core logic for SprayFlow, a movement
//! metronome for spray wall warmups: at a fixed interval it announces a
//! randomly chosen climbing movement from the enabled categories, counts
//! down to the end of the session and summarizes what was called.
//!
//! ## Architecture
//!
//! - **Session Engine**: A polled state machine; the host calls `tick()` at
//!   the deadline the engine reports and forwards user intents
//! - **Clock**: Two cancellable periodic triggers over an injectable time source
//! - **Selector**: Uniform random choice over a seedable generator
//! - **Storage**: TOML-based settings persistence
//!
//! ## Key Components
//!
//! - [`SessionEngine`]: Core session state machine
//! - [`SessionClock`]: Cue and countdown triggers
//! - [`Settings`]: User settings management
//! - [`CueOutput`]: Trait for speech and tone outputs

pub mod catalog;
pub mod clock;
pub mod error;
pub mod events;
pub mod format;
pub mod output;
pub mod selector;
pub mod session;
pub mod stats;
pub mod storage;

pub use catalog::{all_movements, categories, Category, Movement};
pub use clock::{ManualTime, MonotonicTime, SessionClock, TimeSource};
pub use error::{ConfigError, CoreError, OutputError, SessionError, ValidationError};
pub use events::Event;
pub use output::{CueOutput, RecordingOutput, SilentOutput};
pub use selector::{pick, CategorySet};
pub use session::{SessionEngine, SessionPlan, SessionState};
pub use stats::{CategoryShare, SessionStats};
pub use storage::Settings;
