//! Session module: the single actor that consumes transcripts
//!
//! One controller owns the form and the camera; every transcript is
//! classified, dispatched, and announced before the next one is read.

mod controller;

pub use controller::{SessionController, SessionInput, SessionUpdate};
