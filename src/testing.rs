//! In-memory collaborators for unit tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::camera::{CaptureDevice, DeviceError, StillImage};
use crate::feedback::SpeechSink;
use crate::submission::{InspectionPayload, SubmissionTransport, TransportError};

/// Capture device that counts acquire and release calls
#[derive(Debug, Clone, Default)]
pub struct FakeDevice {
    fail: bool,
    acquired: Arc<AtomicUsize>,
    released: Arc<AtomicUsize>,
}

#[derive(Debug)]
pub struct FakeHandle;

impl FakeDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Device whose acquisition is always denied
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn acquired(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    pub fn live_handles(&self) -> usize {
        self.acquired() - self.released()
    }
}

#[async_trait]
impl CaptureDevice for FakeDevice {
    type Handle = FakeHandle;

    async fn acquire(&mut self) -> Result<FakeHandle, DeviceError> {
        if self.fail {
            return Err(DeviceError::PermissionDenied);
        }
        self.acquired.fetch_add(1, Ordering::SeqCst);
        Ok(FakeHandle)
    }

    fn snapshot(&mut self, _handle: &FakeHandle) -> StillImage {
        StillImage {
            bytes: vec![0xff, 0xd8, 0xff],
            mime_type: "image/jpeg".to_string(),
        }
    }

    fn release(&mut self, _handle: FakeHandle) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}

/// Transport that records payloads, optionally failing every send
#[derive(Clone, Default)]
pub struct FakeTransport {
    failure: Arc<Mutex<Option<TransportError>>>,
    sent: Arc<Mutex<Vec<InspectionPayload>>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(error: TransportError) -> Self {
        let transport = Self::default();
        *transport.failure.lock().unwrap() = Some(error);
        transport
    }

    /// Stop failing from now on
    pub fn recover(&self) {
        self.failure.lock().unwrap().take();
    }

    /// Payloads that were accepted
    pub fn sent(&self) -> Vec<InspectionPayload> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl SubmissionTransport for FakeTransport {
    async fn send(&self, payload: InspectionPayload) -> Result<(), TransportError> {
        if let Some(error) = self.failure.lock().unwrap().clone() {
            return Err(error);
        }
        self.sent.lock().unwrap().push(payload);
        Ok(())
    }
}

/// Speech sink that keeps every utterance
#[derive(Debug, Default)]
pub struct RecordingSink {
    spoken: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().unwrap().clone()
    }
}

impl SpeechSink for RecordingSink {
    fn speak(&self, utterance: &str) {
        self.spoken.lock().unwrap().push(utterance.to_string());
    }
}
