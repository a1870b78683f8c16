use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::{debug, error, info};

use crate::error_handling::types::CaptureError;

use super::types::MediaKind;

/// Derives collision-free destination paths for captured media.
///
/// Filenames follow `<sender>_<yyyy-MM-dd_HH-mm-ss>.<ext>`, zero padded
/// and locale independent at one-second resolution. Two captures of
/// different kinds at the same instant differ in extension only; two
/// captures of the same sender, kind and second resolve to the same
/// path and the later one wins. [`prepare`] deletes a pre-existing file
/// unconditionally, so a capture is never skipped because its name is
/// taken.
///
/// [`prepare`]: ArtifactNamer::prepare
#[derive(Debug, Clone)]
pub struct ArtifactNamer {
    media_dir: PathBuf,
}

impl ArtifactNamer {
    pub fn new<P: AsRef<Path>>(media_dir: P) -> Self {
        Self {
            media_dir: media_dir.as_ref().to_path_buf(),
        }
    }

    pub fn media_dir(&self) -> &Path {
        &self.media_dir
    }

    /// Filename for a capture, without the directory component.
    pub fn file_name(sender: &str, kind: MediaKind, now: DateTime<Utc>) -> String {
        format!(
            "{}_{}.{}",
            sender,
            now.format("%Y-%m-%d_%H-%M-%S"),
            kind.extension()
        )
    }

    /// Creates the destination directory if it is absent. Called on
    /// every capture; pre-existence is not an error.
    pub fn ensure_dir(&self) -> Result<(), CaptureError> {
        if !self.media_dir.is_dir() {
            fs::create_dir_all(&self.media_dir).map_err(|e| {
                error!(
                    "Failed to create media dir {}: {}",
                    self.media_dir.display(),
                    e
                );
                CaptureError::StorageUnavailable(e)
            })?;
            info!("Created media dir {}", self.media_dir.display());
        }
        Ok(())
    }

    /// Full destination path for a capture, with the directory created
    /// and any colliding file removed.
    pub fn prepare(
        &self,
        sender: &str,
        kind: MediaKind,
        now: DateTime<Utc>,
    ) -> Result<PathBuf, CaptureError> {
        self.ensure_dir()?;
        let path = self.media_dir.join(Self::file_name(sender, kind, now));
        debug!("Capture destination {}", path.display());
        if path.exists() {
            fs::remove_file(&path).map_err(CaptureError::StorageUnavailable)?;
            info!("Overwriting {}", path.display());
        }
        Ok(path)
    }
}
