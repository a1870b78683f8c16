//! Common data types used across the capture subsystem.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use image::{DynamicImage, GenericImageView};
use serde::{Deserialize, Serialize};

/// Kind of media being captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// File extension for persisted artifacts of this kind.
    pub fn extension(&self) -> &'static str {
        match self {
            MediaKind::Image => "jpg",
            MediaKind::Video => "mp4",
        }
    }
}

/// One intercepted piece of media, together with the capture metadata
/// both kinds share.
///
/// Images cross the interception boundary already decoded; videos cross
/// it as a locator whose bytes are copied, never decoded.
#[derive(Clone)]
pub enum CapturedMedia {
    Image {
        bitmap: DynamicImage,
        sender: String,
        captured_at: DateTime<Utc>,
    },
    Video {
        source: PathBuf,
        sender: String,
        captured_at: DateTime<Utc>,
    },
}

impl CapturedMedia {
    pub fn kind(&self) -> MediaKind {
        match self {
            CapturedMedia::Image { .. } => MediaKind::Image,
            CapturedMedia::Video { .. } => MediaKind::Video,
        }
    }

    pub fn sender(&self) -> &str {
        match self {
            CapturedMedia::Image { sender, .. } => sender,
            CapturedMedia::Video { sender, .. } => sender,
        }
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        match self {
            CapturedMedia::Image { captured_at, .. } => *captured_at,
            CapturedMedia::Video { captured_at, .. } => *captured_at,
        }
    }
}

impl std::fmt::Debug for CapturedMedia {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CapturedMedia::Image {
                bitmap,
                sender,
                captured_at,
            } => write!(
                f,
                "Image({}x{}, sender={}, at={})",
                bitmap.width(),
                bitmap.height(),
                sender,
                captured_at
            ),
            CapturedMedia::Video {
                source,
                sender,
                captured_at,
            } => write!(
                f,
                "Video({}, sender={}, at={})",
                source.display(),
                sender,
                captured_at
            ),
        }
    }
}

/// Completion state of one artifact write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArtifactState {
    /// Write began but has not finished.
    Pending,
    /// Destination stream was flushed and closed successfully.
    Written,
    /// An I/O error ended the write.
    Failed,
}

/// Destination path plus completion state of one capture.
///
/// Created when a handler begins writing; the state transitions once,
/// to `Written` or `Failed`, and is never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedArtifact {
    pub path: PathBuf,
    pub state: ArtifactState,
}

impl PersistedArtifact {
    pub fn pending<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            state: ArtifactState::Pending,
        }
    }

    pub fn written(mut self) -> Self {
        self.state = ArtifactState::Written;
        self
    }

    pub fn failed(mut self) -> Self {
        self.state = ArtifactState::Failed;
        self
    }
}
