//! Tire inspection form used by the daemon

use crate::form::{Field, FormError, FormSession};

/// Tread condition options, in the order they are matched against speech
pub const TREAD_OPTIONS: &[&str] = &["Good", "Ok", "Needs Replacement"];

/// Fields of a tire inspection, in dictation order
pub fn tire_inspection_fields() -> Vec<Field> {
    vec![
        Field::text("vehicle_id", "Vehicle ID"),
        Field::text("inspector", "Inspector name"),
        Field::number("front_left_psi", "Front left pressure", Some("psi")),
        Field::number("front_right_psi", "Front right pressure", Some("psi")),
        Field::number("rear_left_psi", "Rear left pressure", Some("psi")),
        Field::number("rear_right_psi", "Rear right pressure", Some("psi")),
        Field::choice("tread_condition", "Tread condition", TREAD_OPTIONS),
        Field::text("notes", "Notes"),
    ]
}

/// Fresh tire inspection session
pub fn tire_inspection() -> Result<FormSession, FormError> {
    FormSession::new(tire_inspection_fields())
}
