//! Submission payload assembly
//!
//! The record is JSON: `{"fields": {<key>: <value>, ...}, "photos": [..]}`
//! where photo entries are the attachment names, in kept order. Number
//! fields are parsed here so a bad reading stops the submission before
//! anything is sent.

use serde_json::{json, Map, Number, Value};
use thiserror::Error;

use crate::camera::PhotoSet;
use crate::form::{FormSession, ValueType};

/// A number field whose text is not a reading
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{label} is not a number: {text:?}")]
pub struct ParseError {
    pub key: String,
    pub label: String,
    pub text: String,
}

/// Binary image part of the payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoAttachment {
    /// Transport identifier, `photo_<index>`
    pub name: String,
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Everything the transport sends for one submission
#[derive(Debug, Clone)]
pub struct InspectionPayload {
    pub record: Value,
    pub photos: Vec<PhotoAttachment>,
}

/// Build the payload from the current form and kept photos
pub fn build_payload(form: &FormSession, photos: &PhotoSet) -> Result<InspectionPayload, ParseError> {
    let mut fields = Map::new();
    for field in form.fields() {
        let value = match &field.value_type {
            ValueType::Text => Value::String(field.value().to_string()),
            ValueType::Number { unit } => {
                if field.is_empty() {
                    Value::Null
                } else {
                    parse_number(field.value(), unit.as_deref())
                        .map(Value::Number)
                        .ok_or_else(|| ParseError {
                            key: field.key.clone(),
                            label: field.label.clone(),
                            text: field.value().to_string(),
                        })?
                }
            }
        };
        fields.insert(field.key.clone(), value);
    }

    let photos: Vec<PhotoAttachment> = photos
        .iter()
        .enumerate()
        .map(|(index, photo)| PhotoAttachment {
            name: format!("photo_{}", index),
            file_name: format!("photo_{}.{}", index, photo.image.extension()),
            mime_type: photo.image.mime_type.clone(),
            bytes: photo.image.bytes.clone(),
        })
        .collect();

    let names: Vec<&str> = photos.iter().map(|p| p.name.as_str()).collect();
    Ok(InspectionPayload {
        record: json!({ "fields": fields, "photos": names }),
        photos,
    })
}

/// Parse a dictated reading such as `"32"`, `"31.5"` or `"32 PSI"`
fn parse_number(text: &str, unit: Option<&str>) -> Option<Number> {
    let text = text.trim();
    let digits = match unit {
        Some(unit) => strip_unit(text, unit).unwrap_or(text),
        None => text,
    };

    let value: f64 = digits.trim().parse().ok()?;
    Number::from_f64(value)
}

fn strip_unit<'a>(text: &'a str, unit: &str) -> Option<&'a str> {
    let split = text.len().checked_sub(unit.len())?;
    let (head, tail) = (text.get(..split)?, text.get(split..)?);
    tail.eq_ignore_ascii_case(unit).then_some(head)
}
