//! Form module: typed field descriptors and the field navigator
//!
//! Fields are a closed, ordered list resolved by key. The navigator
//! enforces non-empty validation when advancing and wraps from the last
//! field back to the first.

mod field;
mod navigator;

pub use field::{Field, FieldKind, FieldSnapshot, ValueType};
pub use navigator::{FormError, FormSession};
