use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use log::{error, info};

use crate::configuration::CaptureConfig;
use crate::error_handling::types::CaptureError;
use crate::host::DisplayContext;
use crate::notification::Notifier;

use super::namer::ArtifactNamer;
use super::types::{CapturedMedia, MediaKind, PersistedArtifact};

/// Persists intercepted bitmaps as JPEG files.
///
/// The intercepted value is an already-decoded bitmap; it is re-encoded
/// at the configured quality, flushed and closed, and on success a
/// confirmation is dispatched against the display context the
/// intercepted call carried. A failed write produces a log entry and no
/// notification.
pub struct ImageCapture {
    namer: ArtifactNamer,
    quality: u8,
    notifier: Arc<dyn Notifier>,
}

impl ImageCapture {
    pub fn new(config: &CaptureConfig, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            namer: ArtifactNamer::new(&config.media_dir),
            quality: config.jpeg_quality,
            notifier,
        }
    }

    /// Writes the captured image and notifies on the given context.
    ///
    /// `media` must be the image variant; the video variant is routed
    /// to [`VideoCapture`](super::video_capture::VideoCapture).
    pub fn capture(
        &self,
        media: &CapturedMedia,
        context: Option<&DisplayContext>,
    ) -> Result<PersistedArtifact, CaptureError> {
        let CapturedMedia::Image {
            bitmap,
            sender,
            captured_at,
        } = media
        else {
            return Err(CaptureError::EncodeOrWriteError(
                "video media routed to the image handler".to_string(),
            ));
        };

        let path = self.namer.prepare(sender, MediaKind::Image, *captured_at)?;
        let artifact = PersistedArtifact::pending(&path);
        match self.write_jpeg(bitmap, &path) {
            Ok(()) => {
                let artifact = artifact.written();
                info!("Saved image from {} to {}", sender, path.display());
                if let Some(context) = context {
                    self.notifier
                        .notify(context, &format!("Saved to {}!", path.display()));
                }
                Ok(artifact)
            }
            Err(e) => {
                let artifact = artifact.failed();
                error!(
                    "Image capture to {} marked {:?}: {}",
                    artifact.path.display(),
                    artifact.state,
                    e
                );
                Err(e)
            }
        }
    }

    fn write_jpeg(&self, bitmap: &DynamicImage, path: &Path) -> Result<(), CaptureError> {
        let file = File::create(path).map_err(CaptureError::StorageUnavailable)?;
        let mut out = BufWriter::new(file);
        // JPEG has no alpha channel; encode the RGB view
        let mut encoder = JpegEncoder::new_with_quality(&mut out, self.quality);
        encoder.encode_image(&bitmap.to_rgb8())?;
        out.flush()
            .map_err(|e| CaptureError::EncodeOrWriteError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::super::types::ArtifactState;
    use super::*;
    use chrono::Utc;
    use image::{GenericImageView, RgbaImage};
    use std::sync::Mutex;
    use tempfile::TempDir;

    struct RecordingNotifier {
        seen: Mutex<Vec<(String, String)>>,
    }

    impl RecordingNotifier {
        fn new() -> Self {
            Self {
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, context: &DisplayContext, text: &str) {
            self.seen
                .lock()
                .unwrap()
                .push((context.label().to_string(), text.to_string()));
        }
    }

    fn image_media(width: u32, height: u32) -> CapturedMedia {
        let bitmap = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            width,
            height,
            image::Rgba([120, 40, 200, 255]),
        ));
        CapturedMedia::Image {
            bitmap,
            sender: "alice".to_string(),
            captured_at: Utc::now(),
        }
    }

    #[test]
    fn persisted_file_decodes_to_the_same_dimensions() {
        let tmp = TempDir::new().unwrap();
        let config = CaptureConfig::new(tmp.path().join("media"));
        let notifier = Arc::new(RecordingNotifier::new());
        let handler = ImageCapture::new(&config, Arc::clone(&notifier) as Arc<dyn Notifier>);

        let context = DisplayContext::new("viewer");
        let artifact = handler
            .capture(&image_media(8, 5), Some(&context))
            .unwrap();
        assert_eq!(artifact.state, ArtifactState::Written);

        let reloaded = image::open(&artifact.path).unwrap();
        assert_eq!((reloaded.width(), reloaded.height()), (8, 5));

        let seen = notifier.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "viewer");
        assert!(seen[0].1.starts_with("Saved to "));
        assert!(seen[0].1.ends_with(".jpg!"));
    }

    #[test]
    fn failed_write_produces_no_notification() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("occupied");
        std::fs::write(&blocker, b"file, not a dir").unwrap();

        let config = CaptureConfig::new(blocker.join("media"));
        let notifier = Arc::new(RecordingNotifier::new());
        let handler = ImageCapture::new(&config, Arc::clone(&notifier) as Arc<dyn Notifier>);

        let context = DisplayContext::new("viewer");
        let result = handler.capture(&image_media(4, 4), Some(&context));
        assert!(matches!(result, Err(CaptureError::StorageUnavailable(_))));
        assert!(notifier.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn video_media_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let config = CaptureConfig::new(tmp.path());
        let handler = ImageCapture::new(&config, Arc::new(RecordingNotifier::new()));

        let media = CapturedMedia::Video {
            source: "/nowhere.mp4".into(),
            sender: "alice".to_string(),
            captured_at: Utc::now(),
        };
        assert!(handler.capture(&media, None).is_err());
    }
}
