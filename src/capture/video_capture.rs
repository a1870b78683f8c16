use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use log::{error, info, trace};

use crate::configuration::CaptureConfig;
use crate::error_handling::types::CaptureError;

use super::namer::ArtifactNamer;
use super::types::{CapturedMedia, MediaKind, PersistedArtifact};

const COPY_CHUNK: usize = 16 * 1024;

/// Persists intercepted videos by copying bytes from the source
/// locator the host handed out.
///
/// The copy runs in bounded chunks, then both streams are flushed and
/// closed. This handler dispatches no notification; the "saved"
/// confirmation for video comes from a separate hook on the host's
/// video-display entry point and does not check that the copy
/// succeeded.
pub struct VideoCapture {
    namer: ArtifactNamer,
}

impl VideoCapture {
    pub fn new(config: &CaptureConfig) -> Self {
        Self {
            namer: ArtifactNamer::new(&config.media_dir),
        }
    }

    /// Copies the captured video to its destination path.
    ///
    /// `media` must be the video variant; the image variant is routed
    /// to [`ImageCapture`](super::image_capture::ImageCapture).
    pub fn capture(&self, media: &CapturedMedia) -> Result<PersistedArtifact, CaptureError> {
        let CapturedMedia::Video {
            source,
            sender,
            captured_at,
        } = media
        else {
            return Err(CaptureError::SourceReadError(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "image media routed to the video handler",
            )));
        };

        info!("Video source at {}", source.display());
        let path = self.namer.prepare(sender, MediaKind::Video, *captured_at)?;
        let artifact = PersistedArtifact::pending(&path);
        match copy_bytes(source, &path) {
            Ok(total) => {
                let artifact = artifact.written();
                info!(
                    "Saved video from {} to {} ({} byte(s))",
                    sender,
                    path.display(),
                    total
                );
                Ok(artifact)
            }
            Err(e) => {
                let artifact = artifact.failed();
                error!(
                    "Video capture to {} marked {:?}: {}",
                    artifact.path.display(),
                    artifact.state,
                    e
                );
                Err(e)
            }
        }
    }
}

/// Bounded-chunk copy. Never reads the whole source at once.
fn copy_bytes(source: &Path, dest: &Path) -> Result<u64, CaptureError> {
    let mut input = File::open(source).map_err(CaptureError::SourceReadError)?;
    let file = File::create(dest).map_err(CaptureError::StorageUnavailable)?;
    let mut out = BufWriter::new(file);

    let mut buf = vec![0u8; COPY_CHUNK];
    let mut total: u64 = 0;
    loop {
        let n = input
            .read(&mut buf)
            .map_err(CaptureError::SourceReadError)?;
        if n == 0 {
            break;
        }
        out.write_all(&buf[..n])
            .map_err(|e| CaptureError::EncodeOrWriteError(e.to_string()))?;
        total += n as u64;
        trace!("copied {} byte(s) of video", n);
    }
    out.flush()
        .map_err(|e| CaptureError::EncodeOrWriteError(e.to_string()))?;
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::super::types::ArtifactState;
    use super::*;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn video_media(source: &Path, at: chrono::DateTime<Utc>) -> CapturedMedia {
        CapturedMedia::Video {
            source: source.to_path_buf(),
            sender: "alice".to_string(),
            captured_at: at,
        }
    }

    #[test]
    fn copies_source_byte_for_byte() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("incoming.mp4");
        // larger than one chunk so the loop takes several passes
        let payload: Vec<u8> = (0..40_000u32).map(|i| (i % 251) as u8).collect();
        std::fs::write(&source, &payload).unwrap();

        let config = CaptureConfig::new(tmp.path().join("media"));
        let handler = VideoCapture::new(&config);
        let artifact = handler
            .capture(&video_media(&source, Utc::now()))
            .unwrap();

        assert_eq!(artifact.state, ArtifactState::Written);
        let copied = std::fs::read(&artifact.path).unwrap();
        assert_eq!(copied.len(), payload.len());
        assert_eq!(copied, payload);
    }

    #[test]
    fn missing_source_leaves_no_output_file() {
        let tmp = TempDir::new().unwrap();
        let config = CaptureConfig::new(tmp.path().join("media"));
        let handler = VideoCapture::new(&config);

        let at = Utc.with_ymd_and_hms(2024, 1, 2, 10, 30, 0).unwrap();
        let missing = tmp.path().join("gone.mp4");
        let result = handler.capture(&video_media(&missing, at));
        assert!(matches!(result, Err(CaptureError::SourceReadError(_))));

        let would_be = tmp
            .path()
            .join("media")
            .join("alice_2024-01-02_10-30-00.mp4");
        assert!(!would_be.exists());
    }

    #[test]
    fn same_second_capture_is_last_write_wins() {
        let tmp = TempDir::new().unwrap();
        let first = tmp.path().join("first.mp4");
        let second = tmp.path().join("second.mp4");
        std::fs::write(&first, b"first capture").unwrap();
        std::fs::write(&second, b"second capture").unwrap();

        let config = CaptureConfig::new(tmp.path().join("media"));
        let handler = VideoCapture::new(&config);
        let at = Utc.with_ymd_and_hms(2024, 1, 2, 10, 30, 0).unwrap();

        let a = handler.capture(&video_media(&first, at)).unwrap();
        let b = handler.capture(&video_media(&second, at)).unwrap();
        assert_eq!(a.path, b.path);

        // a single surviving artifact holding the later payload
        let entries: Vec<_> = std::fs::read_dir(tmp.path().join("media"))
            .unwrap()
            .collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(std::fs::read(&b.path).unwrap(), b"second capture");
    }
}
