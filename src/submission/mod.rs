//! Submission module: payload assembly, transport, and orchestration

mod orchestrator;
mod payload;
mod transport;

pub use orchestrator::{SubmissionError, SubmissionOrchestrator};
pub use payload::{build_payload, InspectionPayload, ParseError, PhotoAttachment};
pub use transport::{HttpTransport, SubmissionTransport, TransportError};

#[cfg(test)]
pub use transport::MockSubmissionTransport;
