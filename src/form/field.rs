//! Typed form field descriptors

use serde::Serialize;

/// How a field accepts spoken input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Arbitrary dictated text
    FreeText,
    /// One of a fixed, ordered set of option labels
    SingleChoice(Vec<String>),
}

/// How a field's text is encoded in the submission record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueType {
    Text,
    /// Decimal reading, optionally followed by its unit word ("32 psi")
    Number { unit: Option<String> },
}

/// A single form field with its configuration and current value
#[derive(Debug, Clone)]
pub struct Field {
    pub key: String,
    pub label: String,
    pub kind: FieldKind,
    pub value_type: ValueType,
    value: String,
}

impl Field {
    /// Create a free text field
    pub fn text(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            kind: FieldKind::FreeText,
            value_type: ValueType::Text,
            value: String::new(),
        }
    }

    /// Create a free text field whose value is submitted as a number
    pub fn number(key: &str, label: &str, unit: Option<&str>) -> Self {
        Self {
            value_type: ValueType::Number {
                unit: unit.map(str::to_string),
            },
            ..Self::text(key, label)
        }
    }

    /// Create a single choice field. Options keep their declaration order.
    pub fn choice(key: &str, label: &str, options: &[&str]) -> Self {
        Self {
            kind: FieldKind::SingleChoice(options.iter().map(|o| o.to_string()).collect()),
            ..Self::text(key, label)
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Options of a single choice field, empty for free text
    pub fn options(&self) -> &[String] {
        match &self.kind {
            FieldKind::SingleChoice(options) => options,
            FieldKind::FreeText => &[],
        }
    }

    /// A field counts as empty when its trimmed value is empty. An unselected
    /// single choice field is empty too.
    pub fn is_empty(&self) -> bool {
        self.value.trim().is_empty()
    }

    pub(super) fn set_value(&mut self, value: String) {
        self.value = value;
    }

    pub(super) fn clear(&mut self) {
        self.value.clear();
    }
}

/// Serializable view of a field for the presentation layer
#[derive(Debug, Clone, Serialize)]
pub struct FieldSnapshot {
    pub key: String,
    pub label: String,
    pub value: String,
    pub active: bool,
}
