//! Error types shared across the crate.
//!
//! Each subsystem owns an error enum in `types`; handlers convert and
//! contain them at the interception boundary instead of letting them
//! reach the host application's call stack.

pub mod types;

pub use types::{CaptureError, ResolutionError};
