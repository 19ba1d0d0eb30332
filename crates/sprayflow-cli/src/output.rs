//! Terminal speech and tone.
//!
//! The tone is the terminal bell. Speech goes through an external
//! text-to-speech program: `SPRAYFLOW_TTS` if set, otherwise `say` on macOS
//! or the first of `espeak-ng`, `espeak`, `spd-say` found on `PATH`.
//!
//! At most one utterance process is alive. A process that finished on its
//! own is reaped on the next `speak`, `cancel_speech` or `is_speaking`.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};

use sprayflow_core::{CueOutput, OutputError};

const SPEECH_PROGRAMS: &[&str] = &["say", "espeak-ng", "espeak", "spd-say"];

pub struct TerminalOutput {
    speaker: Option<PathBuf>,
    utterance: Option<Child>,
}

impl TerminalOutput {
    pub fn new() -> Self {
        Self::with_speaker(find_speaker())
    }

    /// Use `speaker` as the text-to-speech program; `None` disables speech.
    pub fn with_speaker(speaker: Option<PathBuf>) -> Self {
        Self {
            speaker,
            utterance: None,
        }
    }

    pub fn has_speech(&self) -> bool {
        self.speaker.is_some()
    }

    /// Whether an utterance is still playing. Reaps a finished one.
    pub fn is_speaking(&mut self) -> bool {
        self.reap_finished();
        self.utterance.is_some()
    }

    fn reap_finished(&mut self) {
        let finished = match self.utterance.as_mut() {
            Some(child) => !matches!(child.try_wait(), Ok(None)),
            None => false,
        };
        if finished {
            self.utterance = None;
        }
    }
}

impl Drop for TerminalOutput {
    fn drop(&mut self) {
        let _ = self.cancel_speech();
    }
}

impl CueOutput for TerminalOutput {
    fn speak(&mut self, text: &str) -> Result<(), OutputError> {
        let program = self
            .speaker
            .clone()
            .ok_or(OutputError::Unavailable("speech"))?;
        self.cancel_speech()?;
        let child = Command::new(&program)
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| OutputError::Failed {
                capability: "speech",
                message: e.to_string(),
            })?;
        tracing::trace!(pid = child.id(), "utterance started");
        self.utterance = Some(child);
        Ok(())
    }

    fn cancel_speech(&mut self) -> Result<(), OutputError> {
        self.reap_finished();
        if let Some(mut child) = self.utterance.take() {
            // Already exited is fine.
            let _ = child.kill();
            child.wait().map_err(|e| OutputError::Failed {
                capability: "speech",
                message: e.to_string(),
            })?;
        }
        Ok(())
    }

    fn play_tone(&mut self) -> Result<(), OutputError> {
        let mut stderr = std::io::stderr();
        stderr
            .write_all(b"\x07")
            .and_then(|_| stderr.flush())
            .map_err(|e| OutputError::Failed {
                capability: "tone",
                message: e.to_string(),
            })
    }
}

fn find_speaker() -> Option<PathBuf> {
    if let Some(program) = std::env::var_os("SPRAYFLOW_TTS") {
        if program.is_empty() {
            return None;
        }
        return Some(PathBuf::from(program));
    }
    find_on_path(SPEECH_PROGRAMS)
}

fn find_on_path(names: &[&str]) -> Option<PathBuf> {
    let path = std::env::var_os("PATH")?;
    names.iter().find_map(|name| {
        std::env::split_paths(&path)
            .map(|dir| dir.join(name))
            .find(|candidate| candidate.is_file())
    })
}
