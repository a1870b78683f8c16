use std::fmt;

/// A target class or method could not be located in the host process.
///
/// Raised at registration time when an interception point does not
/// resolve, and at call time when the host model dispatches a method
/// that is not in the class table. Fatal to the one registration or
/// call, never to the process.
#[derive(Debug)]
pub enum ResolutionError {
    ClassNotFound(String),
    MethodNotFound { class: String, method: String },
    AmbiguousMethod { class: String, method: String },
}

impl fmt::Display for ResolutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionError::ClassNotFound(name) => write!(f, "Class not found: {}", name),
            ResolutionError::MethodNotFound { class, method } => {
                write!(f, "Method not found: {}.{}", class, method)
            }
            ResolutionError::AmbiguousMethod { class, method } => {
                write!(
                    f,
                    "Method name is ambiguous without parameter types: {}.{}",
                    class, method
                )
            }
        }
    }
}

impl std::error::Error for ResolutionError {}

/// Failure while turning an intercepted value into a persisted artifact.
///
/// All variants are contained at the handler boundary: the capture for
/// that invocation is abandoned, the error is logged, and the host call
/// proceeds as if the hook had done nothing.
#[derive(Debug)]
pub enum CaptureError {
    /// Destination directory cannot be created or the destination file
    /// cannot be opened for writing.
    StorageUnavailable(std::io::Error),
    /// Video source location cannot be opened or read.
    SourceReadError(std::io::Error),
    /// Image encode or stream write failed.
    EncodeOrWriteError(String),
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::StorageUnavailable(e) => write!(f, "Storage unavailable: {}", e),
            CaptureError::SourceReadError(e) => write!(f, "Source read error: {}", e),
            CaptureError::EncodeOrWriteError(e) => write!(f, "Encode or write error: {}", e),
        }
    }
}

impl std::error::Error for CaptureError {}

impl From<image::ImageError> for CaptureError {
    fn from(err: image::ImageError) -> Self {
        CaptureError::EncodeOrWriteError(err.to_string())
    }
}
