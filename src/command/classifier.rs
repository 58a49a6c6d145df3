//! Transcript classification
//!
//! Case-insensitive substring matching against a fixed phrase table. The
//! table is walked in order and the first hit wins, so command phrases
//! always beat option labels and dictated text.

use crate::form::{Field, FieldKind};

/// Classified intent of a transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Next,
    Submit,
    OpenCamera,
    TakePhoto,
    KeepPhoto,
    DiscardPhoto,
    CloseCamera,
    /// Option label exactly as declared on the active field
    SelectOption(String),
    /// Full transcript, to become the active free text field's value
    SetFieldText(String),
    /// Nothing matched on a single choice field
    Ignored,
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::Next => write!(f, "next"),
            Command::Submit => write!(f, "submit"),
            Command::OpenCamera => write!(f, "open_camera"),
            Command::TakePhoto => write!(f, "take_photo"),
            Command::KeepPhoto => write!(f, "keep_photo"),
            Command::DiscardPhoto => write!(f, "discard_photo"),
            Command::CloseCamera => write!(f, "close_camera"),
            Command::SelectOption(value) => write!(f, "select_option({})", value),
            Command::SetFieldText(_) => write!(f, "set_field_text"),
            Command::Ignored => write!(f, "ignored"),
        }
    }
}

/// Command phrases in priority order
const PHRASES: &[(&str, Command)] = &[
    ("next", Command::Next),
    ("submit", Command::Submit),
    ("capture photo", Command::OpenCamera),
    ("take picture", Command::OpenCamera),
    ("take photo", Command::TakePhoto),
    ("keep photo", Command::KeepPhoto),
    ("discard photo", Command::DiscardPhoto),
    ("close camera", Command::CloseCamera),
];

/// Classify a transcript against the currently active field
pub fn classify(transcript: &str, active_field: &Field) -> Command {
    let lowered = transcript.to_lowercase();

    if let Some((_, command)) = PHRASES.iter().find(|(phrase, _)| lowered.contains(phrase)) {
        return command.clone();
    }

    match &active_field.kind {
        FieldKind::SingleChoice(options) => options
            .iter()
            .find(|option| lowered.contains(&option.to_lowercase()))
            .map(|option| Command::SelectOption(option.clone()))
            .unwrap_or(Command::Ignored),
        FieldKind::FreeText => Command::SetFieldText(transcript.to_string()),
    }
}
