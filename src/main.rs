//! voice-form-daemon: hands-free inspection form filling
//!
//! Reads recognized speech one utterance per line on stdin and drives:
//! - Field navigation and validation for the tire inspection form
//! - Camera capture lifecycle for supporting photos
//! - Multipart submission of the form and kept photos
//!
//! Spoken feedback goes to an external TTS program when configured.
//! Session updates are written to stdout as JSON lines for a presentation
//! layer.

mod camera;
mod command;
mod config;
mod events;
mod feedback;
mod form;
mod inspection;
mod lifecycle;
mod session;
mod submission;
mod transcript;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncWriteExt, BufReader};
use tokio::sync::{broadcast, mpsc};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::camera::{CameraStateMachine, FileFrameDevice};
use crate::config::Config;
use crate::feedback::{CommandSpeechSink, FeedbackEmitter, LogSpeechSink, SpeechSink};
use crate::lifecycle::ShutdownSignal;
use crate::session::{SessionController, SessionUpdate};
use crate::submission::{HttpTransport, SubmissionOrchestrator};

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr, stdout carries outcomes
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .with_writer(std::io::stderr)
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "voice-form-daemon starting"
    );

    let config = Config::load()?;
    info!(submit_url = %config.submit_url, camera = ?config.camera_frame, "configuration loaded");

    let shutdown = ShutdownSignal::new();

    // Transcript source -> session controller
    let (input_tx, input_rx) = mpsc::channel(32);
    // Session controller -> presentation
    let (update_tx, update_rx) = broadcast::channel::<SessionUpdate>(64);

    let sink: Arc<dyn SpeechSink> = match &config.speech_command {
        Some(program) => Arc::new(CommandSpeechSink::new(program.clone())),
        None => Arc::new(LogSpeechSink),
    };

    let transport = HttpTransport::new(config.submit_url.clone(), config.request_timeout)
        .context("failed to build HTTP client")?;

    let mut controller = SessionController::new(
        inspection::tire_inspection()?,
        CameraStateMachine::new(FileFrameDevice::new(config.camera_frame.clone())),
        SubmissionOrchestrator::new(Box::new(transport)),
        FeedbackEmitter::new(sink),
        update_tx,
    );

    tokio::spawn(async move {
        if let Err(e) = transcript::forward(BufReader::new(tokio::io::stdin()), input_tx).await {
            error!(?e, "transcript source failed");
        }
    });

    tokio::spawn(present(update_rx));

    info!("daemon initialized, listening for transcripts");

    tokio::select! {
        // Ends when the transcript source closes
        _ = controller.run(input_rx) => {
            info!("transcript stream ended");
        }

        result = shutdown.wait() => {
            match result {
                Ok(()) => info!("shutdown signal received"),
                Err(e) => error!(?e, "failed to register signal handlers"),
            }
        }
    }

    info!(
        field = %controller.form().active_key(),
        photos = controller.camera().photos().len(),
        "shutting down..."
    );
    controller.shutdown();
    info!("voice-form-daemon stopped");

    Ok(())
}

/// Write every session update to stdout as one JSON line
async fn present(mut update_rx: broadcast::Receiver<SessionUpdate>) {
    let mut stdout = tokio::io::stdout();

    loop {
        match update_rx.recv().await {
            Ok(update) => {
                let mut line = match serde_json::to_vec(&update) {
                    Ok(line) => line,
                    Err(e) => {
                        warn!(?e, "failed to encode session update");
                        continue;
                    }
                };
                line.push(b'\n');
                if let Err(e) = stdout.write_all(&line).await {
                    warn!(?e, "stdout closed, presentation stopping");
                    break;
                }
                let _ = stdout.flush().await;
            }
            Err(broadcast::error::RecvError::Lagged(n)) => {
                warn!(skipped = n, "update receiver lagged");
            }
            Err(broadcast::error::RecvError::Closed) => {
                break;
            }
        }
    }
}
