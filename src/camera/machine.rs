//! Camera lifecycle state machine
//!
//! Handles transitions between Closed, Streaming and Previewing based on
//! camera commands. The device handle lives inside the state value, so it
//! exists exactly while the state is not Closed, and every path back to
//! Closed hands it to `CaptureDevice::release`.

use serde::Serialize;
use tracing::{info, warn};

use crate::command::Command;
use crate::events::Outcome;

use super::device::{CaptureDevice, Photo, PhotoSet};

/// Camera lifecycle as seen by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraStatus {
    Closed,
    Streaming,
    Previewing,
}

impl std::fmt::Display for CameraStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CameraStatus::Closed => write!(f, "Closed"),
            CameraStatus::Streaming => write!(f, "Streaming"),
            CameraStatus::Previewing => write!(f, "Previewing"),
        }
    }
}

enum CameraState<H> {
    Closed,
    Streaming(H),
    /// Captured photo waiting for keep or discard
    Previewing { handle: H, pending: Photo },
}

impl<H> CameraState<H> {
    fn status(&self) -> CameraStatus {
        match self {
            CameraState::Closed => CameraStatus::Closed,
            CameraState::Streaming(_) => CameraStatus::Streaming,
            CameraState::Previewing { .. } => CameraStatus::Previewing,
        }
    }
}

/// Owns the capture device, the live handle and the kept photos
pub struct CameraStateMachine<D: CaptureDevice> {
    device: D,
    state: CameraState<D::Handle>,
    photos: PhotoSet,
    next_sequence: u64,
}

impl<D: CaptureDevice> CameraStateMachine<D> {
    pub fn new(device: D) -> Self {
        Self {
            device,
            state: CameraState::Closed,
            photos: PhotoSet::new(),
            next_sequence: 0,
        }
    }

    pub fn status(&self) -> CameraStatus {
        self.state.status()
    }

    pub fn photos(&self) -> &PhotoSet {
        &self.photos
    }

    /// Photo awaiting keep or discard, if any
    pub fn pending_photo(&self) -> Option<&Photo> {
        match &self.state {
            CameraState::Previewing { pending, .. } => Some(pending),
            _ => None,
        }
    }

    /// Drop every kept photo. Used after a successful submission.
    pub fn clear_photos(&mut self) {
        self.photos.clear();
    }

    /// Apply a camera command. Non-camera commands are ignored.
    pub async fn handle(&mut self, command: &Command) -> Outcome {
        let from = self.status();
        let outcome = match command {
            Command::OpenCamera => self.open().await,
            Command::TakePhoto => self.take_photo(),
            Command::KeepPhoto => self.keep_photo(),
            Command::DiscardPhoto => self.discard_photo(),
            Command::CloseCamera => self.close(),
            _ => Outcome::Ignored,
        };

        let to = self.status();
        if from != to {
            info!(from = %from, to = %to, "camera transition");
        }
        outcome
    }

    async fn open(&mut self) -> Outcome {
        if !matches!(self.state, CameraState::Closed) {
            return Outcome::CameraAlreadyOpen;
        }

        match self.device.acquire().await {
            Ok(handle) => {
                self.state = CameraState::Streaming(handle);
                Outcome::CameraOpened
            }
            Err(e) => {
                warn!(error = %e, "camera acquisition failed");
                Outcome::DeviceError {
                    message: e.to_string(),
                }
            }
        }
    }

    fn take_photo(&mut self) -> Outcome {
        match std::mem::replace(&mut self.state, CameraState::Closed) {
            CameraState::Streaming(handle) => {
                let image = self.device.snapshot(&handle);
                let sequence = self.next_sequence;
                self.next_sequence += 1;
                self.state = CameraState::Previewing {
                    handle,
                    pending: Photo { image, sequence },
                };
                Outcome::PhotoCaptured { sequence }
            }
            previewing @ CameraState::Previewing { .. } => {
                self.state = previewing;
                Outcome::PhotoPending
            }
            CameraState::Closed => Outcome::CameraNotOpen,
        }
    }

    fn keep_photo(&mut self) -> Outcome {
        match std::mem::replace(&mut self.state, CameraState::Closed) {
            CameraState::Previewing { handle, pending } => {
                let sequence = pending.sequence;
                self.photos.push(pending);
                self.device.release(handle);
                Outcome::PhotoKept {
                    sequence,
                    total: self.photos.len(),
                }
            }
            other => {
                self.state = other;
                Outcome::NoActivePhoto
            }
        }
    }

    fn discard_photo(&mut self) -> Outcome {
        match std::mem::replace(&mut self.state, CameraState::Closed) {
            CameraState::Previewing { handle, .. } => {
                self.state = CameraState::Streaming(handle);
                Outcome::PhotoDiscarded
            }
            other => {
                self.state = other;
                Outcome::NoActivePhoto
            }
        }
    }

    fn close(&mut self) -> Outcome {
        match std::mem::replace(&mut self.state, CameraState::Closed) {
            CameraState::Streaming(handle) | CameraState::Previewing { handle, .. } => {
                self.device.release(handle);
                Outcome::CameraClosed
            }
            CameraState::Closed => Outcome::CameraNotOpen,
        }
    }

    /// Release the device if it is still held
    pub fn shutdown(&mut self) {
        if self.status() != CameraStatus::Closed {
            self.close();
            info!("camera released on shutdown");
        }
    }
}

impl<D: CaptureDevice> Drop for CameraStateMachine<D> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{MockCaptureDevice, StillImage};
    use crate::testing::FakeDevice;

    fn camera() -> (CameraStateMachine<FakeDevice>, FakeDevice) {
        let device = FakeDevice::new();
        (CameraStateMachine::new(device.clone()), device)
    }

    #[tokio::test]
    async fn test_initial_state() {
        let (cam, device) = camera();
        assert_eq!(cam.status(), CameraStatus::Closed);
        assert!(cam.photos().is_empty());
        assert_eq!(device.live_handles(), 0);
    }

    #[tokio::test]
    async fn test_only_open_leaves_closed() {
        for command in [
            Command::TakePhoto,
            Command::KeepPhoto,
            Command::DiscardPhoto,
            Command::CloseCamera,
        ] {
            let (mut cam, device) = camera();
            let outcome = cam.handle(&command).await;
            assert!(
                matches!(outcome, Outcome::CameraNotOpen | Outcome::NoActivePhoto),
                "{:?} gave {:?}",
                command,
                outcome
            );
            assert_eq!(cam.status(), CameraStatus::Closed);
            assert_eq!(device.acquired(), 0);
        }

        let (mut cam, device) = camera();
        assert_eq!(cam.handle(&Command::OpenCamera).await, Outcome::CameraOpened);
        assert_eq!(cam.status(), CameraStatus::Streaming);
        assert_eq!(device.live_handles(), 1);
    }

    #[tokio::test]
    async fn test_acquisition_failure_stays_closed() {
        let device = FakeDevice::failing();
        let mut cam = CameraStateMachine::new(device.clone());

        let outcome = cam.handle(&Command::OpenCamera).await;
        assert!(matches!(outcome, Outcome::DeviceError { .. }));
        assert_eq!(cam.status(), CameraStatus::Closed);
        assert_eq!(device.live_handles(), 0);
    }

    #[tokio::test]
    async fn test_open_twice_keeps_single_handle() {
        let (mut cam, device) = camera();
        cam.handle(&Command::OpenCamera).await;
        assert_eq!(cam.handle(&Command::OpenCamera).await, Outcome::CameraAlreadyOpen);
        assert_eq!(device.acquired(), 1);
        assert_eq!(device.live_handles(), 1);
    }

    #[tokio::test]
    async fn test_take_photo_enters_preview() {
        let (mut cam, _device) = camera();
        cam.handle(&Command::OpenCamera).await;

        assert_eq!(
            cam.handle(&Command::TakePhoto).await,
            Outcome::PhotoCaptured { sequence: 0 }
        );
        assert_eq!(cam.status(), CameraStatus::Previewing);
        assert!(cam.pending_photo().is_some());

        // A second take does not overwrite the pending photo
        assert_eq!(cam.handle(&Command::TakePhoto).await, Outcome::PhotoPending);
        assert_eq!(cam.pending_photo().map(|p| p.sequence), Some(0));
    }

    #[tokio::test]
    async fn test_keep_appends_and_closes() {
        let (mut cam, device) = camera();
        cam.handle(&Command::OpenCamera).await;
        cam.handle(&Command::TakePhoto).await;

        let outcome = cam.handle(&Command::KeepPhoto).await;
        assert_eq!(outcome, Outcome::PhotoKept { sequence: 0, total: 1 });
        assert_eq!(cam.status(), CameraStatus::Closed);
        assert_eq!(cam.photos().len(), 1);
        assert!(cam.pending_photo().is_none());
        assert_eq!(device.live_handles(), 0);
    }

    #[tokio::test]
    async fn test_discard_returns_to_streaming() {
        let (mut cam, device) = camera();
        cam.handle(&Command::OpenCamera).await;
        cam.handle(&Command::TakePhoto).await;

        assert_eq!(cam.handle(&Command::DiscardPhoto).await, Outcome::PhotoDiscarded);
        assert_eq!(cam.status(), CameraStatus::Streaming);
        assert!(cam.photos().is_empty());
        assert!(cam.pending_photo().is_none());
        assert_eq!(device.live_handles(), 1);
    }

    #[tokio::test]
    async fn test_keep_or_discard_while_streaming() {
        let (mut cam, _device) = camera();
        cam.handle(&Command::OpenCamera).await;
        assert_eq!(cam.handle(&Command::KeepPhoto).await, Outcome::NoActivePhoto);
        assert_eq!(cam.handle(&Command::DiscardPhoto).await, Outcome::NoActivePhoto);
        assert_eq!(cam.status(), CameraStatus::Streaming);
    }

    #[tokio::test]
    async fn test_close_from_any_state() {
        // Streaming
        let (mut cam, device) = camera();
        cam.handle(&Command::OpenCamera).await;
        assert_eq!(cam.handle(&Command::CloseCamera).await, Outcome::CameraClosed);
        assert_eq!(cam.status(), CameraStatus::Closed);
        assert_eq!(device.live_handles(), 0);

        // Previewing with a kept photo from earlier
        let (mut cam, device) = camera();
        cam.handle(&Command::OpenCamera).await;
        cam.handle(&Command::TakePhoto).await;
        cam.handle(&Command::KeepPhoto).await;
        cam.handle(&Command::OpenCamera).await;
        cam.handle(&Command::TakePhoto).await;

        assert_eq!(cam.handle(&Command::CloseCamera).await, Outcome::CameraClosed);
        assert_eq!(cam.status(), CameraStatus::Closed);
        assert_eq!(cam.photos().len(), 1);
        assert!(cam.pending_photo().is_none());
        assert_eq!(device.live_handles(), 0);
    }

    #[tokio::test]
    async fn test_discard_then_keep_scenario() {
        let (mut cam, device) = camera();
        for command in [
            Command::OpenCamera,
            Command::TakePhoto,
            Command::DiscardPhoto,
            Command::TakePhoto,
            Command::KeepPhoto,
        ] {
            cam.handle(&command).await;
        }
        assert_eq!(cam.photos().len(), 1);
        assert_eq!(cam.status(), CameraStatus::Closed);
        // Sequence numbers are never reused, even for discarded shots
        assert_eq!(cam.photos().iter().next().map(|p| p.sequence), Some(1));
        assert_eq!(device.acquired(), 1);
        assert_eq!(device.released(), 1);
    }

    #[tokio::test]
    async fn test_close_while_previewing_releases_acquired_handle() {
        let mut device = MockCaptureDevice::new();
        device.expect_acquire().times(1).returning(|| Ok(7));
        device
            .expect_snapshot()
            .withf(|handle: &u32| *handle == 7)
            .times(1)
            .returning(|_| StillImage {
                bytes: vec![1, 2, 3],
                mime_type: "image/jpeg".to_string(),
            });
        device
            .expect_release()
            .withf(|handle: &u32| *handle == 7)
            .times(1)
            .return_const(());

        let mut cam = CameraStateMachine::new(device);
        cam.handle(&Command::OpenCamera).await;
        cam.handle(&Command::TakePhoto).await;
        assert_eq!(cam.handle(&Command::CloseCamera).await, Outcome::CameraClosed);
        assert!(cam.photos().is_empty());
        // Dropping the machine checks the release happened exactly once
    }

    #[tokio::test]
    async fn test_drop_releases_handle() {
        let (mut cam, device) = camera();
        cam.handle(&Command::OpenCamera).await;
        cam.handle(&Command::TakePhoto).await;
        drop(cam);
        assert_eq!(device.live_handles(), 0);
    }

    #[tokio::test]
    async fn test_non_camera_command_is_ignored() {
        let (mut cam, _device) = camera();
        assert_eq!(cam.handle(&Command::Next).await, Outcome::Ignored);
        assert_eq!(cam.status(), CameraStatus::Closed);
    }
}
