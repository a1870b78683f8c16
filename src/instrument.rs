//! Hook registration for the instrumented messaging application.
//!
//! This is the one place that knows the target surface: which classes
//! and accessors to intercept, and which handler runs at each site.
//! Four hooks are installed:
//!
//! 1. ObserveAfter on the image accessor: persist the decoded bitmap,
//!    then confirm on the display context the call carried.
//! 2. ObserveAfter on the video-locator accessor: copy the bytes the
//!    locator points at. No confirmation from this hook.
//! 3. ObserveBefore on the video-display entry point: fire the "saved"
//!    confirmation unconditionally. This hook does not know whether
//!    the corresponding copy succeeded; the decoupling is deliberate
//!    and there is no cross-hook synchronization to change that.
//! 4. Replace on the screenshot detection accessor: force the
//!    configured constant.
//!
//! Registration is per-hook best effort. A target that fails to
//! resolve is logged and skipped while the remaining hooks install.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use log::{debug, error, info, warn};

use crate::capture::{CapturedMedia, ImageCapture, VideoCapture};
use crate::configuration::CaptureConfig;
use crate::hooking::{
    Handler, HookMode, InterceptionEngine, InterceptionPoint, MethodCall, RegistrationHandle,
};
use crate::host::{DisplayContext, HostObject, HostProcess, Value};
use crate::notification::Notifier;
use crate::signal_override;

/// Media object class holding the image, video and sender accessors.
pub const RECEIVED_SNAP_CLASS: &str = "com.snapchat.android.model.ReceivedSnap";
/// Activity class owning the video-display entry point.
pub const FEED_ACTIVITY_CLASS: &str = "com.snapchat.android.FeedActivity";
/// Parameter descriptor of the display context argument.
pub const CONTEXT_TYPE: &str = "android.content.Context";
/// Accessor returning the decoded image bitmap.
pub const IMAGE_ACCESSOR: &str = "getImageBitmap";
/// Accessor returning the video source locator.
pub const VIDEO_ACCESSOR: &str = "getVideoUri";
/// Video-display entry point.
pub const VIDEO_DISPLAY_METHOD: &str = "showVideo";
/// Accessor on the activity yielding an application display context.
pub const APP_CONTEXT_ACCESSOR: &str = "getApplicationContext";
/// Sender identity accessor on the media object.
pub const SENDER_ACCESSOR: &str = "getSender";
/// Screenshot detection accessor forced by the signal override.
pub const SCREENSHOT_ACCESSOR: &str = "wasScreenshotted";

/// Registers every hook against the engine's host process.
///
/// A no-op (with a log line) when the host is not the configured
/// target package. Returns the handles of the registrations that
/// succeeded; failures are logged and do not abort the rest.
pub fn install_hooks(
    engine: &InterceptionEngine,
    config: &CaptureConfig,
    notifier: Arc<dyn Notifier>,
) -> Vec<RegistrationHandle> {
    let host = Arc::clone(engine.host());
    if host.package_name() != config.target_package {
        info!(
            "Host package {} is not {}, leaving it alone",
            host.package_name(),
            config.target_package
        );
        return Vec::new();
    }
    info!("Attached to {}", host.package_name());

    let registrations: Vec<(InterceptionPoint, HookMode, Handler)> = vec![
        (
            InterceptionPoint::with_params(RECEIVED_SNAP_CLASS, IMAGE_ACCESSOR, &[CONTEXT_TYPE]),
            HookMode::ObserveAfter,
            image_handler(&host, config, Arc::clone(&notifier)),
        ),
        (
            InterceptionPoint::new(RECEIVED_SNAP_CLASS, VIDEO_ACCESSOR),
            HookMode::ObserveAfter,
            video_handler(&host, config),
        ),
        (
            InterceptionPoint::new(FEED_ACTIVITY_CLASS, VIDEO_DISPLAY_METHOD),
            HookMode::ObserveBefore,
            video_display_handler(&host, Arc::clone(&notifier)),
        ),
        (
            InterceptionPoint::new(RECEIVED_SNAP_CLASS, SCREENSHOT_ACCESSOR),
            HookMode::Replace,
            signal_override::forced_signal(config.screenshot_signal),
        ),
    ];

    let mut handles = Vec::new();
    for (point, mode, handler) in registrations {
        let site = point.site();
        match engine.register(point, mode, handler) {
            Ok(handle) => handles.push(handle),
            Err(e) => error!("Skipping hook on {}: {}", site, e),
        }
    }
    handles
}

/// Persists the bitmap the image accessor just returned, then
/// confirms on the display context passed as the call's first
/// argument.
fn image_handler(
    host: &Arc<HostProcess>,
    config: &CaptureConfig,
    notifier: Arc<dyn Notifier>,
) -> Handler {
    let capture = ImageCapture::new(config, notifier);
    let host = Arc::clone(host);
    Arc::new(move |call: &mut MethodCall| {
        let bitmap = match call.result().and_then(|v| v.as_bitmap()) {
            Some(bitmap) => bitmap.clone(),
            None => {
                warn!("{} returned no bitmap, nothing to capture", IMAGE_ACCESSOR);
                return Ok(());
            }
        };
        debug!("Bitmap loaded");
        let sender = match sender_of(&host, call.receiver()) {
            Some(sender) => sender,
            None => return Ok(()),
        };
        let media = CapturedMedia::Image {
            bitmap,
            sender,
            captured_at: Utc::now(),
        };
        let context = call.arg(0).and_then(|v| v.as_context());
        capture.capture(&media, context)?;
        Ok(())
    })
}

/// Copies the bytes behind the locator the video accessor just
/// returned. Confirmation is not this hook's job.
fn video_handler(host: &Arc<HostProcess>, config: &CaptureConfig) -> Handler {
    let capture = VideoCapture::new(config);
    let host = Arc::clone(host);
    Arc::new(move |call: &mut MethodCall| {
        let source = match call.result().and_then(|v| v.as_str()) {
            Some(uri) => PathBuf::from(uri),
            None => {
                warn!("{} returned no locator, nothing to capture", VIDEO_ACCESSOR);
                return Ok(());
            }
        };
        let sender = match sender_of(&host, call.receiver()) {
            Some(sender) => sender,
            None => return Ok(()),
        };
        let media = CapturedMedia::Video {
            source,
            sender,
            captured_at: Utc::now(),
        };
        capture.capture(&media)?;
        Ok(())
    })
}

/// Fires the generic "saved" confirmation when the host is about to
/// display a video. Deliberately does not verify that the capture
/// hook succeeded, or even ran.
fn video_display_handler(host: &Arc<HostProcess>, notifier: Arc<dyn Notifier>) -> Handler {
    let host = Arc::clone(host);
    Arc::new(move |call: &mut MethodCall| {
        let context = match host.invoke_on(call.receiver(), APP_CONTEXT_ACCESSOR, &[]) {
            Ok(Value::Context(context)) => context,
            other => {
                warn!(
                    "{} yielded no display context ({:?}), using a generic one",
                    APP_CONTEXT_ACCESSOR, other
                );
                DisplayContext::new("application")
            }
        };
        notifier.notify(&context, "Saved video snap.");
        Ok(())
    })
}

fn sender_of(host: &HostProcess, receiver: &HostObject) -> Option<String> {
    match host.invoke_on(receiver, SENDER_ACCESSOR, &[]) {
        Ok(Value::Str(sender)) => Some(sender),
        Ok(other) => {
            warn!("{} returned {:?}, not a sender name", SENDER_ACCESSOR, other);
            None
        }
        Err(e) => {
            warn!("Sender lookup failed, capture abandoned: {}", e);
            None
        }
    }
}
