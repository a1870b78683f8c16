use std::env;
use std::path::{Path, PathBuf};

use log::info;

/// Directory used when `SNAPVAULT_MEDIA_DIR` is not set.
const DEFAULT_MEDIA_DIR: &str = "snapvault";

/// JPEG quality used when re-encoding intercepted bitmaps, out of 100.
const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Package name of the application this build instruments.
const DEFAULT_TARGET_PACKAGE: &str = "com.snapchat.android";

/// Runtime parameters for the capture pipeline.
///
/// One value is built at startup and handed to each capture handler at
/// construction. The destination directory is deliberately an explicit
/// field here rather than process-wide state so tests and embedders can
/// point every handler somewhere else.
///
/// # Fields Overview
///
/// - `media_dir`: destination directory for persisted artifacts. The
///   directory is created lazily on the first capture.
/// - `jpeg_quality`: quality setting for image re-encoding, 0 to 100.
/// - `target_package`: instrumentation only applies to a host process
///   whose package name matches this value.
/// - `screenshot_signal`: the constant the screenshot detection
///   accessor is forced to return. `false` means "not detected".
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureConfig {
    pub media_dir: PathBuf,
    pub jpeg_quality: u8,
    pub target_package: String,
    pub screenshot_signal: bool,
}

impl CaptureConfig {
    /// Builds a configuration writing to the given directory, with the
    /// fixed quality, target package and forced signal defaults.
    pub fn new<P: AsRef<Path>>(media_dir: P) -> Self {
        Self {
            media_dir: media_dir.as_ref().to_path_buf(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            target_package: DEFAULT_TARGET_PACKAGE.to_string(),
            screenshot_signal: false,
        }
    }

    /// Builds a configuration using `SNAPVAULT_MEDIA_DIR` if set,
    /// otherwise a `snapvault` directory under the current directory.
    pub fn from_env() -> Self {
        if let Ok(dir) = env::var("SNAPVAULT_MEDIA_DIR") {
            info!("Using media dir from SNAPVAULT_MEDIA_DIR: {}", dir);
            return Self::new(PathBuf::from(dir));
        }
        Self::new(PathBuf::from(DEFAULT_MEDIA_DIR))
    }
}
