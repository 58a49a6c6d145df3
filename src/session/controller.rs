//! Top-level session loop
//!
//! Classifies each input against the active field, dispatches it to the
//! navigator, the camera, or the submitter, then announces and broadcasts
//! the outcome. Inputs are awaited one at a time, so a submission in flight
//! holds back the next transcript instead of interleaving with it.

use serde::Serialize;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info};

use crate::camera::{CameraStateMachine, CameraStatus, CaptureDevice};
use crate::command::{classify, Command};
use crate::events::Outcome;
use crate::feedback::FeedbackEmitter;
use crate::form::{FieldSnapshot, FormSession};
use crate::submission::SubmissionOrchestrator;

/// Inputs accepted by the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionInput {
    /// Full text of a recognized utterance
    Transcript(String),
    /// Field focused through the UI
    Focus { key: String },
    /// Field edited through the UI
    ManualEdit { key: String, value: String },
}

/// What the presentation layer sees after each input
#[derive(Debug, Clone, Serialize)]
pub struct SessionUpdate {
    pub outcome: Outcome,
    pub fields: Vec<FieldSnapshot>,
    pub camera: CameraStatus,
    pub photos: usize,
}

/// Owns the form and the camera and drives them from session inputs
pub struct SessionController<D: CaptureDevice> {
    form: FormSession,
    camera: CameraStateMachine<D>,
    submitter: SubmissionOrchestrator,
    feedback: FeedbackEmitter,
    update_tx: broadcast::Sender<SessionUpdate>,
}

impl<D: CaptureDevice> SessionController<D> {
    pub fn new(
        form: FormSession,
        camera: CameraStateMachine<D>,
        submitter: SubmissionOrchestrator,
        feedback: FeedbackEmitter,
        update_tx: broadcast::Sender<SessionUpdate>,
    ) -> Self {
        Self {
            form,
            camera,
            submitter,
            feedback,
            update_tx,
        }
    }

    pub fn form(&self) -> &FormSession {
        &self.form
    }

    pub fn camera(&self) -> &CameraStateMachine<D> {
        &self.camera
    }

    /// Process inputs in arrival order until the sender side closes
    pub async fn run(&mut self, mut input_rx: mpsc::Receiver<SessionInput>) {
        info!(field = %self.form.active_key(), "session started");

        while let Some(input) = input_rx.recv().await {
            self.handle_input(input).await;
        }
        info!("input stream closed");
    }

    /// Release the camera if it is still open
    pub fn shutdown(&mut self) {
        self.camera.shutdown();
        info!("session stopped");
    }

    /// Process a single input to completion
    pub async fn handle_input(&mut self, input: SessionInput) -> Outcome {
        let outcome = match input {
            SessionInput::Transcript(text) => return self.on_transcript(&text).await,
            SessionInput::Focus { key } => self.form.focus(&key),
            SessionInput::ManualEdit { key, value } => match self.form.focus(&key) {
                Outcome::Focused { .. } => self.form.edit_active_field(&value),
                unknown => unknown,
            },
        };

        self.publish(&outcome);
        outcome
    }

    /// Process one recognized utterance
    pub async fn on_transcript(&mut self, text: &str) -> Outcome {
        let outcome = self.dispatch_transcript(text).await;
        self.publish(&outcome);
        outcome
    }

    async fn dispatch_transcript(&mut self, text: &str) -> Outcome {
        let command = classify(text, self.form.active_field());
        debug!(%command, field = %self.form.active_key(), "transcript classified");

        match command {
            Command::Next => self.form.advance(),
            Command::SelectOption(value) => self.form.select_option(&value),
            Command::SetFieldText(value) => self.form.set_active_field_value(&value),
            Command::Submit => self.submit().await,
            Command::Ignored => Outcome::Ignored,
            camera_command => self.camera.handle(&camera_command).await,
        }
    }

    async fn submit(&mut self) -> Outcome {
        match self.submitter.submit(&mut self.form, &mut self.camera).await {
            Ok(photos) => Outcome::SubmissionSucceeded { photos },
            Err(e) => Outcome::from(&e),
        }
    }

    fn publish(&self, outcome: &Outcome) {
        if outcome.is_error() {
            info!(%outcome, "command refused");
        } else {
            debug!(%outcome, "command applied");
        }

        self.feedback.announce(outcome);

        let update = SessionUpdate {
            outcome: outcome.clone(),
            fields: self.form.snapshot(),
            camera: self.camera.status(),
            photos: self.camera.photos().len(),
        };
        // No subscribers is fine
        let _ = self.update_tx.send(update);
    }
}
