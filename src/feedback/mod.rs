//! Spoken feedback for command outcomes
//!
//! The emitter maps an outcome to a fixed utterance and hands it to a
//! speech sink. Sinks are fire-and-forget: `speak` returns immediately and
//! nothing waits on playback, so announcements may overlap or reorder.

use std::process::Stdio;
use std::sync::Arc;

use tokio::process::Command;

use tracing::{debug, info, warn};

use crate::events::Outcome;

/// Destination for spoken utterances
pub trait SpeechSink: Send + Sync {
    fn speak(&self, utterance: &str);
}

/// Logs utterances instead of speaking them
#[derive(Debug, Default)]
pub struct LogSpeechSink;

impl SpeechSink for LogSpeechSink {
    fn speak(&self, utterance: &str) {
        info!(utterance, "speak");
    }
}

/// Speaks by spawning an external text-to-speech program
/// (`espeak`, `say`, ...) with the utterance as its only argument.
/// Must be called from within the tokio runtime.
#[derive(Debug, Clone)]
pub struct CommandSpeechSink {
    program: String,
}

impl CommandSpeechSink {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl SpeechSink for CommandSpeechSink {
    fn speak(&self, utterance: &str) {
        let spawned = Command::new(&self.program)
            .arg(utterance)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();

        match spawned {
            Ok(mut child) => {
                debug!(pid = ?child.id(), utterance, "speech started");
                tokio::spawn(async move {
                    if let Err(e) = child.wait().await {
                        warn!(error = %e, "speech program did not exit cleanly");
                    }
                });
            }
            Err(e) => warn!(program = %self.program, error = %e, "failed to start speech program"),
        }
    }
}

/// Turns outcomes into announcements
#[derive(Clone)]
pub struct FeedbackEmitter {
    sink: Arc<dyn SpeechSink>,
}

impl FeedbackEmitter {
    pub fn new(sink: Arc<dyn SpeechSink>) -> Self {
        Self { sink }
    }

    /// Announce an outcome. Silent outcomes are skipped.
    pub fn announce(&self, outcome: &Outcome) {
        if let Some(utterance) = utterance(outcome) {
            self.sink.speak(&utterance);
        }
    }
}

/// Fixed utterance for an outcome, `None` for outcomes that stay silent
pub fn utterance(outcome: &Outcome) -> Option<String> {
    let text = match outcome {
        Outcome::FieldUpdated { .. } | Outcome::Ignored | Outcome::Focused { .. } => return None,
        Outcome::OptionSelected { label, value, .. } => format!("{} set to {}", label, value),
        Outcome::Advanced { label, .. } => format!("Next field: {}", label),
        Outcome::ValidationFailed { label, .. } => {
            format!("{} is required. Please fill it in before moving on.", label)
        }
        Outcome::UnknownField { key } => format!("There is no field called {}", key),
        Outcome::CameraOpened => "Camera opened. Say take photo when ready.".to_string(),
        Outcome::CameraAlreadyOpen => "The camera is already open.".to_string(),
        Outcome::DeviceError { .. } => "Could not open the camera.".to_string(),
        Outcome::PhotoCaptured { .. } => "Photo captured. Say keep photo or discard photo.".to_string(),
        Outcome::PhotoPending => "Keep or discard the current photo first.".to_string(),
        Outcome::PhotoKept { .. } => "Photo kept.".to_string(),
        Outcome::PhotoDiscarded => "Photo discarded.".to_string(),
        Outcome::NoActivePhoto => "There is no photo to keep or discard.".to_string(),
        Outcome::CameraNotOpen => "The camera is not open.".to_string(),
        Outcome::CameraClosed => "Camera closed.".to_string(),
        Outcome::ParseError { label, .. } => format!("{} must be a number.", label),
        Outcome::SubmissionSucceeded { .. } => "Inspection submitted successfully.".to_string(),
        Outcome::SubmissionFailed { message } => format!("Submission failed: {}", message),
    };
    Some(text)
}
