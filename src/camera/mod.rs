//! Camera module for photo capture
//!
//! Provides an explicit state machine with three states:
//! - Closed: no device handle held
//! - Streaming: live preview running, ready to take a photo
//! - Previewing: a captured photo waits for keep or discard

mod device;
mod machine;

pub use device::{CaptureDevice, DeviceError, FileFrameDevice, Photo, PhotoSet, StillImage};
pub use machine::{CameraStateMachine, CameraStatus};

#[cfg(test)]
pub use device::MockCaptureDevice;
