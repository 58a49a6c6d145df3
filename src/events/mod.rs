//! Events module for dispatched command results
//!
//! Every command the session controller dispatches resolves to exactly one
//! `Outcome`. Outcomes feed spoken feedback and are broadcast to the
//! presentation layer; none of them is fatal.

use serde::{Deserialize, Serialize};

/// Result of a dispatched command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Outcome {
    /// Active field overwritten with dictated or typed text
    FieldUpdated { key: String, value: String },

    /// Active single choice field set to one of its options
    OptionSelected {
        key: String,
        label: String,
        value: String,
    },

    /// Moved to the next field
    Advanced {
        from: String,
        to: String,
        /// Label of the newly active field
        label: String,
    },

    /// Advance refused because the active field is empty
    ValidationFailed { key: String, label: String },

    /// Field focused through the UI
    Focused { key: String, label: String },

    /// UI referenced a field that does not exist
    UnknownField { key: String },

    /// Transcript matched nothing actionable
    Ignored,

    CameraOpened,

    /// Open requested while the camera is already streaming or previewing
    CameraAlreadyOpen,

    /// Capture device could not be acquired
    DeviceError { message: String },

    /// Frame captured and waiting for keep or discard
    PhotoCaptured { sequence: u64 },

    /// Take requested while a captured photo still awaits a decision
    PhotoPending,

    PhotoKept {
        sequence: u64,
        /// Number of kept photos after this one
        total: usize,
    },

    PhotoDiscarded,

    /// Keep or discard with nothing captured
    NoActivePhoto,

    /// Camera command issued while the camera is closed
    CameraNotOpen,

    CameraClosed,

    /// Numeric field could not be parsed at submission time
    ParseError {
        key: String,
        label: String,
        text: String,
    },

    SubmissionSucceeded { photos: usize },

    SubmissionFailed { message: String },
}

impl Outcome {
    /// Outcomes that report a problem to the operator
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Outcome::ValidationFailed { .. }
                | Outcome::UnknownField { .. }
                | Outcome::DeviceError { .. }
                | Outcome::NoActivePhoto
                | Outcome::CameraNotOpen
                | Outcome::ParseError { .. }
                | Outcome::SubmissionFailed { .. }
        )
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::FieldUpdated { key, .. } => write!(f, "FIELD_UPDATED ({})", key),
            Outcome::OptionSelected { key, value, .. } => {
                write!(f, "OPTION_SELECTED ({}={})", key, value)
            }
            Outcome::Advanced { from, to, .. } => write!(f, "ADVANCED ({} -> {})", from, to),
            Outcome::ValidationFailed { key, .. } => write!(f, "VALIDATION_FAILED ({})", key),
            Outcome::Focused { key, .. } => write!(f, "FOCUSED ({})", key),
            Outcome::UnknownField { key } => write!(f, "UNKNOWN_FIELD ({})", key),
            Outcome::Ignored => write!(f, "IGNORED"),
            Outcome::CameraOpened => write!(f, "CAMERA_OPENED"),
            Outcome::CameraAlreadyOpen => write!(f, "CAMERA_ALREADY_OPEN"),
            Outcome::DeviceError { message } => write!(f, "DEVICE_ERROR ({})", message),
            Outcome::PhotoCaptured { sequence } => write!(f, "PHOTO_CAPTURED (#{})", sequence),
            Outcome::PhotoPending => write!(f, "PHOTO_PENDING"),
            Outcome::PhotoKept { sequence, total } => {
                write!(f, "PHOTO_KEPT (#{}, {} total)", sequence, total)
            }
            Outcome::PhotoDiscarded => write!(f, "PHOTO_DISCARDED"),
            Outcome::NoActivePhoto => write!(f, "NO_ACTIVE_PHOTO"),
            Outcome::CameraNotOpen => write!(f, "CAMERA_NOT_OPEN"),
            Outcome::CameraClosed => write!(f, "CAMERA_CLOSED"),
            Outcome::ParseError { key, .. } => write!(f, "PARSE_ERROR ({})", key),
            Outcome::SubmissionSucceeded { photos } => {
                write!(f, "SUBMISSION_SUCCEEDED ({} photos)", photos)
            }
            Outcome::SubmissionFailed { message } => write!(f, "SUBMISSION_FAILED ({})", message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_serialization() {
        let outcome = Outcome::PhotoKept {
            sequence: 3,
            total: 2,
        };
        let json = serde_json::to_string(&outcome).unwrap();
        assert!(json.contains("photo_kept"));
        assert!(json.contains("\"sequence\":3"));
    }

    #[test]
    fn test_outcome_deserialization() {
        let json = r#"{"type":"camera_not_open"}"#;
        let outcome: Outcome = serde_json::from_str(json).unwrap();
        assert_eq!(outcome, Outcome::CameraNotOpen);
    }

    #[test]
    fn test_error_classification() {
        assert!(Outcome::NoActivePhoto.is_error());
        assert!(Outcome::SubmissionFailed {
            message: "503".to_string()
        }
        .is_error());
        assert!(!Outcome::CameraClosed.is_error());
        assert!(!Outcome::Ignored.is_error());
    }

    #[test]
    fn test_display() {
        let outcome = Outcome::Advanced {
            from: "name".to_string(),
            to: "email".to_string(),
            label: "Email".to_string(),
        };
        assert_eq!(outcome.to_string(), "ADVANCED (name -> email)");
    }
}
