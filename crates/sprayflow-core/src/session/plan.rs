use std::time::Duration;

use serde::Serialize;

use crate::error::{Result, SessionError, ValidationError};
use crate::selector::CategorySet;
use crate::storage::Settings;

/// What a session runs with, captured at start.
///
/// Times are in seconds. Construction validates everything `start` would
/// otherwise have to reject, so a plan in hand is always startable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionPlan {
    interval_secs: u64,
    duration_secs: u64,
    categories: CategorySet,
    use_voice: bool,
    use_beep: bool,
}

impl SessionPlan {
    /// Plan with voice on and beep off.
    pub fn new(interval_secs: u64, duration_secs: u64, categories: CategorySet) -> Result<Self> {
        if categories.is_empty() {
            return Err(SessionError::NoCategoriesEnabled.into());
        }
        if interval_secs == 0 {
            return Err(ValidationError::InvalidValue {
                field: "interval".into(),
                message: "must be at least 1 second".into(),
            }
            .into());
        }
        if duration_secs == 0 {
            return Err(ValidationError::InvalidValue {
                field: "duration".into(),
                message: "must be at least 1 second".into(),
            }
            .into());
        }
        Ok(Self {
            interval_secs,
            duration_secs,
            categories,
            use_voice: true,
            use_beep: false,
        })
    }

    /// Normalize stored settings; `duration` is read as minutes.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        settings.validate()?;
        Ok(Self::new(
            settings.interval as u64,
            (settings.duration as u64).saturating_mul(60),
            settings.enabled_categories.clone(),
        )?
        .with_voice(settings.use_voice)
        .with_beep(settings.use_beep))
    }

    pub fn with_voice(mut self, on: bool) -> Self {
        self.use_voice = on;
        self
    }

    pub fn with_beep(mut self, on: bool) -> Self {
        self.use_beep = on;
        self
    }

    pub fn interval_secs(&self) -> u64 {
        self.interval_secs
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn duration_secs(&self) -> u64 {
        self.duration_secs
    }

    pub fn categories(&self) -> &CategorySet {
        &self.categories
    }

    pub fn use_voice(&self) -> bool {
        self.use_voice
    }

    pub fn use_beep(&self) -> bool {
        self.use_beep
    }
}
