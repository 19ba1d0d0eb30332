//! Core error types for sprayflow-core.
//!
//! This module defines the error hierarchy using thiserror. Output
//! capability errors are deliberately kept out of [`CoreError`]: the
//! session engine swallows them at the call site.

use std::path::PathBuf;
use thiserror::Error;

use crate::session::SessionState;

/// Core error type for sprayflow-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Session lifecycle errors
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised by session intents that are rejected before any mutation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// No category enabled, so no movement is eligible
    #[error("Cannot start a session with no movement categories enabled")]
    NoCategoriesEnabled,

    /// A session is already running, paused or awaiting acknowledgement
    #[error("A session is already active (state: {state:?})")]
    AlreadyActive { state: SessionState },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load settings from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save settings to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown settings key
    #[error("Unknown settings key: {0}")]
    UnknownKey(String),

    /// Value could not be parsed for the given key
    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Data directory could not be determined or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    /// Unknown category name
    #[error("Unknown movement category: '{0}'")]
    UnknownCategory(String),
}

/// Failures reported by speech and tone outputs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OutputError {
    /// The platform has no engine for this output
    #[error("{0} output is unavailable")]
    Unavailable(&'static str),

    /// The engine exists but the call failed
    #[error("{capability} output failed: {message}")]
    Failed {
        capability: &'static str,
        message: String,
    },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
