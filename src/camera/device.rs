//! Capture device seam and photo types
//!
//! The device hands out a live stream handle on `acquire` and takes it back
//! on `release`. Only the camera state machine ever holds a handle.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info};

/// Errors acquiring the capture device
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeviceError {
    #[error("camera unavailable: {0}")]
    Unavailable(String),

    #[error("camera permission denied")]
    PermissionDenied,
}

/// A still frame grabbed from the live stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StillImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl StillImage {
    /// File extension matching the mime type
    pub fn extension(&self) -> &'static str {
        match self.mime_type.as_str() {
            "image/jpeg" => "jpg",
            "image/png" => "png",
            "image/webp" => "webp",
            _ => "bin",
        }
    }
}

/// A captured still with its capture order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    pub image: StillImage,
    /// Monotonic across the whole process, never reused
    pub sequence: u64,
}

/// Kept photos in the order they were confirmed
#[derive(Debug, Clone, Default)]
pub struct PhotoSet {
    photos: Vec<Photo>,
}

impl PhotoSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, photo: Photo) {
        self.photos.push(photo);
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Photo> {
        self.photos.iter()
    }

    pub fn clear(&mut self) {
        self.photos.clear();
    }
}

/// Camera hardware as seen by the state machine
#[cfg_attr(test, mockall::automock(type Handle = u32;))]
#[async_trait]
pub trait CaptureDevice: Send {
    /// Exclusive live stream handle
    type Handle: Send;

    /// Open the device and start streaming. May wait on a permission prompt.
    async fn acquire(&mut self) -> Result<Self::Handle, DeviceError>;

    /// Grab the current frame of a live stream
    fn snapshot(&mut self, handle: &Self::Handle) -> StillImage;

    /// Stop the stream and give the device back
    fn release(&mut self, handle: Self::Handle);
}

/// Capture device backed by a frame file on disk
///
/// Acquiring loads the file, which stands in for the live stream; every
/// snapshot returns that frame.
#[derive(Debug, Clone)]
pub struct FileFrameDevice {
    path: Option<PathBuf>,
}

/// Live stream of a `FileFrameDevice`
#[derive(Debug)]
pub struct FrameStream {
    frame: StillImage,
}

impl FileFrameDevice {
    /// `None` models a machine with no camera attached
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }
}

#[async_trait]
impl CaptureDevice for FileFrameDevice {
    type Handle = FrameStream;

    async fn acquire(&mut self) -> Result<FrameStream, DeviceError> {
        let path = self
            .path
            .as_ref()
            .ok_or_else(|| DeviceError::Unavailable("no camera configured".to_string()))?;

        let bytes = tokio::fs::read(path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::PermissionDenied => DeviceError::PermissionDenied,
            _ => DeviceError::Unavailable(e.to_string()),
        })?;

        info!(?path, size = bytes.len(), "frame source opened");
        Ok(FrameStream {
            frame: StillImage {
                bytes,
                mime_type: mime_for(path).to_string(),
            },
        })
    }

    fn snapshot(&mut self, handle: &FrameStream) -> StillImage {
        handle.frame.clone()
    }

    fn release(&mut self, handle: FrameStream) {
        debug!(size = handle.frame.bytes.len(), "frame source released");
    }
}

fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}
