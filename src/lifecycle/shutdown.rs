//! Signal handling for graceful shutdown

use std::io;

use tokio::signal::unix::{signal, SignalKind};
use tracing::debug;

/// Handles shutdown signals (SIGTERM, SIGINT)
pub struct ShutdownSignal;

impl ShutdownSignal {
    pub fn new() -> Self {
        Self
    }

    /// Wait for a shutdown signal. Fails only if the handlers cannot be
    /// registered.
    pub async fn wait(&self) -> io::Result<()> {
        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sigint = signal(SignalKind::interrupt())?;

        tokio::select! {
            _ = sigterm.recv() => {
                debug!("received SIGTERM");
            }
            _ = sigint.recv() => {
                debug!("received SIGINT");
            }
        }
        Ok(())
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}
