//! Speech and tone capabilities.
//!
//! The session engine only talks to [`CueOutput`]. Failures are reported
//! back as [`OutputError`] and never change session state.

use crate::error::OutputError;

pub trait CueOutput {
    /// Announce `text`. Returns without waiting for the speech to finish.
    fn speak(&mut self, text: &str) -> Result<(), OutputError>;

    /// Interrupt any announcement still in progress.
    fn cancel_speech(&mut self) -> Result<(), OutputError>;

    /// Emit a short audible tone.
    fn play_tone(&mut self) -> Result<(), OutputError>;
}

/// Output that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentOutput;

impl CueOutput for SilentOutput {
    fn speak(&mut self, _text: &str) -> Result<(), OutputError> {
        Ok(())
    }

    fn cancel_speech(&mut self) -> Result<(), OutputError> {
        Ok(())
    }

    fn play_tone(&mut self) -> Result<(), OutputError> {
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputCall {
    Speak(String),
    CancelSpeech,
    Tone,
}

/// Records every call. Optionally fails them all, to exercise the paths
/// where the platform has no speech or audio engine.
#[derive(Debug, Default, Clone)]
pub struct RecordingOutput {
    pub calls: Vec<OutputCall>,
    pub fail: bool,
}

impl RecordingOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            calls: Vec::new(),
            fail: true,
        }
    }

    pub fn spoken(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                OutputCall::Speak(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn tones(&self) -> usize {
        self.calls.iter().filter(|c| **c == OutputCall::Tone).count()
    }

    pub fn cancels(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| **c == OutputCall::CancelSpeech)
            .count()
    }

    fn record(&mut self, call: OutputCall, capability: &'static str) -> Result<(), OutputError> {
        self.calls.push(call);
        if self.fail {
            Err(OutputError::Unavailable(capability))
        } else {
            Ok(())
        }
    }
}

impl CueOutput for RecordingOutput {
    fn speak(&mut self, text: &str) -> Result<(), OutputError> {
        self.record(OutputCall::Speak(text.to_string()), "speech")
    }

    fn cancel_speech(&mut self) -> Result<(), OutputError> {
        self.record(OutputCall::CancelSpeech, "speech")
    }

    fn play_tone(&mut self) -> Result<(), OutputError> {
        self.record(OutputCall::Tone, "tone")
    }
}
