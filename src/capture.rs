//! Media capture subsystem.
//!
//! Turns intercepted values into persisted artifacts:
//! - `types`: captured media and artifact data types.
//! - `namer`: destination directory handling and the deterministic
//!   filename scheme.
//! - `image_capture`: re-encodes intercepted bitmaps to JPEG.
//! - `video_capture`: copies video bytes from the intercepted source
//!   locator.

pub mod image_capture;
pub mod namer;
pub mod types;
pub mod video_capture;

pub use image_capture::ImageCapture;
pub use namer::ArtifactNamer;
pub use types::{ArtifactState, CapturedMedia, MediaKind, PersistedArtifact};
pub use video_capture::VideoCapture;
