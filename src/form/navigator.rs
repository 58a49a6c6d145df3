//! Field navigation and validation
//!
//! Owns the ordered field list and the active field pointer. The pointer is
//! an index into `fields` and is only ever moved modulo the field count, so
//! it always resolves to an existing field.

use thiserror::Error;
use tracing::{debug, info};

use crate::events::Outcome;

use super::field::{Field, FieldKind, FieldSnapshot};

/// Errors building a form session
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("a form needs at least one field")]
    NoFields,

    #[error("duplicate field key: {0}")]
    DuplicateKey(String),
}

/// Ordered fields plus the active field pointer
#[derive(Debug, Clone)]
pub struct FormSession {
    fields: Vec<Field>,
    active: usize,
}

impl FormSession {
    /// Create a session with all values empty and the first field active
    pub fn new(fields: Vec<Field>) -> Result<Self, FormError> {
        if fields.is_empty() {
            return Err(FormError::NoFields);
        }
        for (i, field) in fields.iter().enumerate() {
            if fields[..i].iter().any(|f| f.key == field.key) {
                return Err(FormError::DuplicateKey(field.key.clone()));
            }
        }

        let mut session = Self { fields, active: 0 };
        session.reset();
        Ok(session)
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, key: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.key == key)
    }

    pub fn active_field(&self) -> &Field {
        &self.fields[self.active]
    }

    pub fn active_key(&self) -> &str {
        &self.active_field().key
    }

    /// Overwrite the active field's value. Always accepted.
    pub fn set_active_field_value(&mut self, value: &str) -> Outcome {
        let field = &mut self.fields[self.active];
        field.set_value(value.to_string());
        debug!(key = %field.key, value, "field updated");
        Outcome::FieldUpdated {
            key: field.key.clone(),
            value: value.to_string(),
        }
    }

    /// Apply an edit made through the UI. A single choice field only takes
    /// one of its options, or an empty value that clears the selection.
    pub fn edit_active_field(&mut self, value: &str) -> Outcome {
        let choice = matches!(self.active_field().kind, FieldKind::SingleChoice(_));
        if choice && !value.trim().is_empty() {
            self.select_option(value)
        } else {
            self.set_active_field_value(value)
        }
    }

    /// Move to the next field, wrapping from last to first, provided the
    /// current field is not empty.
    pub fn advance(&mut self) -> Outcome {
        let current = &self.fields[self.active];
        if current.is_empty() {
            info!(key = %current.key, "advance blocked, field is empty");
            return Outcome::ValidationFailed {
                key: current.key.clone(),
                label: current.label.clone(),
            };
        }

        let from = current.key.clone();
        self.active = (self.active + 1) % self.fields.len();
        let next = &self.fields[self.active];
        info!(from = %from, to = %next.key, "advanced to next field");
        Outcome::Advanced {
            from,
            to: next.key.clone(),
            label: next.label.clone(),
        }
    }

    /// Set the active single choice field to `value` if it is one of its
    /// options. Anything else is a no-op.
    pub fn select_option(&mut self, value: &str) -> Outcome {
        let field = &mut self.fields[self.active];
        if !field.options().iter().any(|o| o == value) {
            debug!(key = %field.key, value, "option not offered by active field");
            return Outcome::Ignored;
        }

        field.set_value(value.to_string());
        info!(key = %field.key, value, "option selected");
        Outcome::OptionSelected {
            key: field.key.clone(),
            label: field.label.clone(),
            value: value.to_string(),
        }
    }

    /// Jump straight to a field, bypassing validation
    pub fn focus(&mut self, key: &str) -> Outcome {
        match self.fields.iter().position(|f| f.key == key) {
            Some(index) => {
                self.active = index;
                let field = &self.fields[index];
                debug!(key, "field focused");
                Outcome::Focused {
                    key: field.key.clone(),
                    label: field.label.clone(),
                }
            }
            None => Outcome::UnknownField {
                key: key.to_string(),
            },
        }
    }

    /// Clear every value and make the first field active again
    pub fn reset(&mut self) {
        self.fields.iter_mut().for_each(Field::clear);
        self.active = 0;
    }

    /// Presentation view of the form
    pub fn snapshot(&self) -> Vec<FieldSnapshot> {
        self.fields
            .iter()
            .enumerate()
            .map(|(i, f)| FieldSnapshot {
                key: f.key.clone(),
                label: f.label.clone(),
                value: f.value().to_string(),
                active: i == self.active,
            })
            .collect()
    }
}
