use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use env_logger::Env;
use image::{DynamicImage, RgbaImage};
use log::info;
use snapvault::configuration::CaptureConfig;
use snapvault::hooking::InterceptionEngine;
use snapvault::host::{DisplayContext, HostClass, HostObject, HostProcess, Value};
use snapvault::instrument::{
    self, install_hooks, FEED_ACTIVITY_CLASS, RECEIVED_SNAP_CLASS, SCREENSHOT_ACCESSOR,
};
use snapvault::notification::LogNotifier;

// Wires the capture pipeline against a simulated target application
// and drives one image, one video and one screenshot-check call
// through it.
fn main() {
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or("info")).try_init();

    let out_dir: PathBuf = env::var("SNAPVAULT_MEDIA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            env::current_dir()
                .expect("cwd")
                .join("target")
                .join("capture_demo")
        });

    // simulated target surface
    let host = Arc::new(HostProcess::new("com.snapchat.android"));
    let snap_class = HostClass::new(RECEIVED_SNAP_CLASS);
    snap_class.define_method(
        instrument::IMAGE_ACCESSOR,
        &[instrument::CONTEXT_TYPE],
        |receiver, _| receiver.property("image").unwrap_or(Value::Null),
    );
    snap_class.define_method(instrument::VIDEO_ACCESSOR, &[], |receiver, _| {
        receiver.property("video_uri").unwrap_or(Value::Null)
    });
    snap_class.define_method(instrument::SENDER_ACCESSOR, &[], |receiver, _| {
        receiver.property("sender").unwrap_or(Value::Null)
    });
    snap_class.define_method(SCREENSHOT_ACCESSOR, &[], |_, _| Value::Bool(true));
    host.load_class(snap_class);

    let feed = HostClass::new(FEED_ACTIVITY_CLASS);
    feed.define_method(instrument::VIDEO_DISPLAY_METHOD, &[], |_, _| Value::Null);
    feed.define_method(instrument::APP_CONTEXT_ACCESSOR, &[], |_, _| {
        Value::Context(DisplayContext::new("application"))
    });
    host.load_class(feed);

    let engine = InterceptionEngine::new(Arc::clone(&host));
    let config = CaptureConfig::new(&out_dir);
    let handles = install_hooks(&engine, &config, Arc::new(LogNotifier));
    info!("{} hook(s) installed", handles.len());

    // image snap
    let snap = HostObject::new(RECEIVED_SNAP_CLASS)
        .with_property("sender", Value::Str("alice".into()))
        .with_property(
            "image",
            Value::Bitmap(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
                64,
                64,
                image::Rgba([200, 120, 30, 255]),
            ))),
        );
    host.invoke(
        RECEIVED_SNAP_CLASS,
        instrument::IMAGE_ACCESSOR,
        &snap,
        &[Value::Context(DisplayContext::new("viewer"))],
    )
    .expect("image call");

    // video snap backed by a scratch source file
    let source = out_dir.join("incoming-source.mp4");
    fs::create_dir_all(&out_dir).expect("out dir");
    fs::write(&source, vec![42u8; 64 * 1024]).expect("source bytes");
    let video_snap = HostObject::new(RECEIVED_SNAP_CLASS)
        .with_property("sender", Value::Str("bob".into()))
        .with_property(
            "video_uri",
            Value::Str(source.to_string_lossy().into_owned()),
        );
    host.invoke_on(&video_snap, instrument::VIDEO_ACCESSOR, &[])
        .expect("video call");

    let activity = HostObject::new(FEED_ACTIVITY_CLASS);
    host.invoke_on(&activity, instrument::VIDEO_DISPLAY_METHOD, &[])
        .expect("display call");

    // the forced signal in action
    let screenshotted = host
        .invoke_on(&snap, SCREENSHOT_ACCESSOR, &[])
        .expect("signal call");
    info!("wasScreenshotted now reports {:?}", screenshotted);

    info!("Artifacts under {}", out_dir.display());
}
