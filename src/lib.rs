pub mod capture;
pub mod configuration;
pub mod error_handling;
pub mod hooking;
pub mod host;
pub mod instrument;
pub mod notification;
pub mod signal_override;

pub use capture::{ArtifactNamer, CapturedMedia, ImageCapture, MediaKind, VideoCapture};
pub use configuration::CaptureConfig;
pub use error_handling::{CaptureError, ResolutionError};
pub use hooking::{HookMode, InterceptionEngine, InterceptionPoint, RegistrationHandle};
pub use host::{HostClass, HostObject, HostProcess, Value};
pub use instrument::install_hooks;
pub use notification::{LogNotifier, Notifier};
