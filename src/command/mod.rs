//! Command module: maps a transcript to a classified intent
//!
//! Pure and stateless. Unmatched input degrades to literal field text or
//! `Ignored`, never to an error.

mod classifier;

pub use classifier::{classify, Command};
