//! Submission transport seam and the HTTP implementation
//!
//! The HTTP transport posts `multipart/form-data`: an `inspection` part with
//! the JSON record and one binary part per photo, named `photo_<index>`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::payload::InspectionPayload;

/// Errors sending a payload
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Request never got a response
    #[error("could not reach the server: {0}")]
    Request(String),

    /// Server answered with a non-2xx status
    #[error("server rejected the inspection ({status}): {detail}")]
    Rejected { status: u16, detail: String },
}

/// Delivers a payload to the inspection backend
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubmissionTransport: Send + Sync {
    async fn send(&self, payload: InspectionPayload) -> Result<(), TransportError>;
}

/// Multipart HTTP transport
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
}

impl HttpTransport {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Request(e.to_string()))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    fn form(payload: InspectionPayload) -> Result<Form, TransportError> {
        let mut form = Form::new().text("inspection", payload.record.to_string());
        for photo in payload.photos {
            let part = Part::bytes(photo.bytes)
                .file_name(photo.file_name)
                .mime_str(&photo.mime_type)
                .map_err(|e| TransportError::Request(e.to_string()))?;
            form = form.part(photo.name, part);
        }
        Ok(form)
    }
}

#[async_trait]
impl SubmissionTransport for HttpTransport {
    async fn send(&self, payload: InspectionPayload) -> Result<(), TransportError> {
        let photo_count = payload.photos.len();
        let form = Self::form(payload)?;

        debug!(url = %self.url, photo_count, "posting inspection");
        let response = self
            .client
            .post(&self.url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            info!(status = status.as_u16(), photo_count, "inspection accepted");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        let detail = error_detail(&body).unwrap_or_else(|| status.to_string());
        warn!(status = status.as_u16(), %detail, "inspection rejected");
        Err(TransportError::Rejected {
            status: status.as_u16(),
            detail,
        })
    }
}

/// Pull a human-readable reason out of an error body like
/// `{"detail": "..."}` or `{"error": "..."}`
fn error_detail(body: &str) -> Option<String> {
    let json: serde_json::Value = serde_json::from_str(body).ok()?;
    ["detail", "error"]
        .iter()
        .find_map(|key| json.get(key).and_then(|v| v.as_str()))
        .map(str::to_string)
}
