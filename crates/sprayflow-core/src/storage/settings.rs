//! User settings.
//!
//! A flat record stored under a single key, [`SETTINGS_KEY`], as TOML in the
//! data directory (`~/.config/sprayflow/sprayflow-settings.toml`). The file
//! is rewritten after every change.
//!
//! `duration` is in minutes. The session engine normalizes it to seconds
//! when it captures a [`SessionPlan`](crate::session::SessionPlan).

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::catalog::Category;
use crate::error::{ConfigError, Result, ValidationError};
use crate::selector::CategorySet;

/// Storage key; also the settings file stem.
pub const SETTINGS_KEY: &str = "sprayflow-settings";

/// Accepted seconds between cues.
pub const INTERVAL_RANGE: RangeInclusive<u32> = 1..=10;

/// Accepted session length in minutes.
pub const DURATION_RANGE: RangeInclusive<u32> = 1..=20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Seconds between cues.
    #[serde(default = "default_interval")]
    pub interval: u32,
    /// Session length in minutes.
    #[serde(default = "default_duration")]
    pub duration: u32,
    #[serde(default = "default_categories")]
    pub enabled_categories: CategorySet,
    #[serde(default = "default_true")]
    pub use_voice: bool,
    #[serde(default)]
    pub use_beep: bool,
}

fn default_interval() -> u32 {
    5
}
fn default_duration() -> u32 {
    5
}
fn default_categories() -> CategorySet {
    Category::ALL.into_iter().collect()
}
fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            interval: default_interval(),
            duration: default_duration(),
            enabled_categories: default_categories(),
            use_voice: true,
            use_beep: false,
        }
    }
}

impl Settings {
    /// Check ranges. An empty category set is allowed here; it only blocks
    /// starting a session.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !INTERVAL_RANGE.contains(&self.interval) {
            return Err(ValidationError::InvalidValue {
                field: "interval".into(),
                message: format!(
                    "must be between {} and {} seconds",
                    INTERVAL_RANGE.start(),
                    INTERVAL_RANGE.end()
                ),
            });
        }
        if !DURATION_RANGE.contains(&self.duration) {
            return Err(ValidationError::InvalidValue {
                field: "duration".into(),
                message: format!(
                    "must be between {} and {} minutes",
                    DURATION_RANGE.start(),
                    DURATION_RANGE.end()
                ),
            });
        }
        Ok(())
    }

    /// Enable `category` if disabled, disable it otherwise. Returns whether
    /// it is enabled afterwards.
    pub fn toggle_category(&mut self, category: Category) -> bool {
        if self.enabled_categories.remove(&category) {
            false
        } else {
            self.enabled_categories.insert(category);
            true
        }
    }

    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join(format!("{SETTINGS_KEY}.toml")))
    }

    /// Load from the data directory, writing defaults if nothing is stored.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Persist to the data directory.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let settings: Settings =
                    toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                        path: path.to_path_buf(),
                        message: e.to_string(),
                    })?;
                Ok(settings)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let settings = Self::default();
                settings.save_to(path)?;
                Ok(settings)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
            .into()),
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Load, falling back to defaults on any error.
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(error = %e, "using default settings");
                Self::default()
            }
        }
    }

    /// Get a value as a string by key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        match json.get(key)? {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a value by key, keeping the field's type. Does not persist.
    ///
    /// Arrays (the category set) are given as JSON, e.g.
    /// `["footwork","balance"]`.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut json = serde_json::to_value(&*self)?;
        let obj = json
            .as_object_mut()
            .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
        let existing = obj
            .get(key)
            .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

        let new_value = match existing {
            serde_json::Value::Bool(_) => serde_json::Value::Bool(
                value
                    .parse::<bool>()
                    .map_err(|_| invalid(format!("cannot parse '{value}' as bool")))?,
            ),
            serde_json::Value::Number(_) => serde_json::Value::Number(
                value
                    .parse::<u64>()
                    .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?
                    .into(),
            ),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
                serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
            }
            _ => serde_json::Value::String(value.into()),
        };
        obj.insert(key.to_string(), new_value);

        let updated: Settings = serde_json::from_value(json).map_err(|e| invalid(e.to_string()))?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Keys accepted by [`get`](Self::get) and [`set`](Self::set).
    pub fn keys() -> &'static [&'static str] {
        &[
            "interval",
            "duration",
            "enabled_categories",
            "use_voice",
            "use_beep",
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    #[test]
    fn default_settings_roundtrip() {
        let settings = Settings::default();
        let toml_str = toml::to_string_pretty(&settings).unwrap();
        let parsed: Settings = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn defaults_match_the_app() {
        let settings = Settings::default();
        assert_eq!(settings.interval, 5);
        assert_eq!(settings.duration, 5);
        assert_eq!(settings.enabled_categories.len(), 5);
        assert!(settings.use_voice);
        assert!(!settings.use_beep);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let parsed: Settings = toml::from_str("interval = 8\n").unwrap();
        assert_eq!(parsed.interval, 8);
        assert_eq!(parsed.duration, 5);
        assert!(parsed.use_voice);
    }

    #[test]
    fn get_returns_strings_for_all_types() {
        let settings = Settings::default();
        assert_eq!(settings.get("interval").as_deref(), Some("5"));
        assert_eq!(settings.get("use_beep").as_deref(), Some("false"));
        assert!(settings
            .get("enabled_categories")
            .unwrap()
            .contains("footwork"));
        assert!(settings.get("volume").is_none());
    }

    #[test]
    fn set_updates_number_and_bool() {
        let mut settings = Settings::default();
        settings.set("interval", "8").unwrap();
        settings.set("use_beep", "true").unwrap();
        assert_eq!(settings.interval, 8);
        assert!(settings.use_beep);
    }

    #[test]
    fn set_updates_categories_from_json() {
        let mut settings = Settings::default();
        settings
            .set("enabled_categories", r#"["footwork","balance"]"#)
            .unwrap();
        let expected: CategorySet = [Category::Footwork, Category::Balance].into_iter().collect();
        assert_eq!(settings.enabled_categories, expected);
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut settings = Settings::default();
        let err = settings.set("theme", "dark").unwrap_err();
        assert!(matches!(err, CoreError::Config(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn set_rejects_bad_values_without_mutating() {
        let mut settings = Settings::default();
        assert!(settings.set("use_voice", "loud").is_err());
        assert!(settings.set("interval", "0").is_err());
        assert!(settings.set("interval", "11").is_err());
        assert!(settings.set("duration", "21").is_err());
        assert!(settings.set("enabled_categories", r#"["campus"]"#).is_err());
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn validate_accepts_the_full_slider_range() {
        let mut settings = Settings::default();
        for (interval, duration) in [(1, 1), (10, 20)] {
            settings.interval = interval;
            settings.duration = duration;
            assert!(settings.validate().is_ok());
        }
        settings.interval = 30;
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("between 1 and 10 seconds"));
    }

    #[test]
    fn toggle_category_flips_membership() {
        let mut settings = Settings::default();
        assert!(!settings.toggle_category(Category::Balance));
        assert!(!settings.enabled_categories.contains(&Category::Balance));
        assert!(settings.toggle_category(Category::Balance));
        assert!(settings.enabled_categories.contains(&Category::Balance));
    }

    #[test]
    fn load_from_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        let loaded = Settings::load_from(&path).unwrap();
        assert_eq!(loaded, Settings::default());
        assert!(path.exists());
    }

    #[test]
    fn save_then_load_preserves_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        let mut settings = Settings::default();
        settings.set("duration", "12").unwrap();
        settings.toggle_category(Category::Transitions);
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn corrupt_file_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "interval = \"soon\"").unwrap();
        let err = Settings::load_from(&path).unwrap_err();
        assert!(matches!(err, CoreError::Config(ConfigError::LoadFailed { .. })));
    }
}
