//! Configuration loading and management

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};

const DEFAULT_SUBMIT_URL: &str = "http://127.0.0.1:8000/api/inspections";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Endpoint that receives submitted inspections
    pub submit_url: String,

    /// Timeout for one submission request
    pub request_timeout: Duration,

    /// Frame source for the capture device, none means no camera
    pub camera_frame: Option<PathBuf>,

    /// External text-to-speech program, none means log only
    pub speech_command: Option<String>,
}

impl Config {
    /// Load configuration from environment and defaults
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let submit_url = non_empty("VOICE_FORM_SUBMIT_URL").unwrap_or_else(|| DEFAULT_SUBMIT_URL.to_string());

        let timeout_secs = match non_empty("VOICE_FORM_REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("invalid VOICE_FORM_REQUEST_TIMEOUT_SECS: {raw:?}"))?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        if timeout_secs == 0 {
            bail!("VOICE_FORM_REQUEST_TIMEOUT_SECS must be greater than zero");
        }

        Ok(Self {
            submit_url,
            request_timeout: Duration::from_secs(timeout_secs),
            camera_frame: non_empty("VOICE_FORM_CAMERA_FRAME").map(PathBuf::from),
            speech_command: non_empty("VOICE_FORM_SPEECH_COMMAND"),
        })
    }
}
