//! Submission orchestration
//!
//! Builds the payload from the form and the kept photos, sends it, and
//! resets both on success. On any failure nothing is touched so the
//! operator can simply say "submit" again.

use thiserror::Error;
use tracing::{info, warn};

use crate::camera::{CameraStateMachine, CaptureDevice};
use crate::events::Outcome;
use crate::form::FormSession;

use super::payload::{build_payload, ParseError};
use super::transport::{SubmissionTransport, TransportError};

/// Why a submission attempt did not go through
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl From<&SubmissionError> for Outcome {
    fn from(err: &SubmissionError) -> Self {
        match err {
            SubmissionError::Parse(e) => Outcome::ParseError {
                key: e.key.clone(),
                label: e.label.clone(),
                text: e.text.clone(),
            },
            SubmissionError::Transport(e) => Outcome::SubmissionFailed {
                message: e.to_string(),
            },
        }
    }
}

/// Sends the form and photos through a transport
pub struct SubmissionOrchestrator {
    transport: Box<dyn SubmissionTransport>,
}

impl SubmissionOrchestrator {
    pub fn new(transport: Box<dyn SubmissionTransport>) -> Self {
        Self { transport }
    }

    /// Submit once. Returns the number of photos sent.
    pub async fn submit<D: CaptureDevice>(
        &self,
        form: &mut FormSession,
        camera: &mut CameraStateMachine<D>,
    ) -> Result<usize, SubmissionError> {
        let payload = build_payload(form, camera.photos()).map_err(|e| {
            warn!(key = %e.key, text = %e.text, "submission blocked by unparsable field");
            e
        })?;
        let photos = payload.photos.len();

        self.transport.send(payload).await.map_err(|e| {
            warn!(error = %e, "submission failed, form kept for retry");
            e
        })?;

        form.reset();
        camera.clear_photos();
        info!(photos, "submission complete, session reset");
        Ok(photos)
    }
}
