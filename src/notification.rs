use log::info;

use crate::host::DisplayContext;

/// User-visible confirmation surface, consumed not owned.
///
/// Dispatch is fire and forget: no acknowledgment, no error channel. A
/// real deployment shows a transient toast on the provided display
/// context; the default implementation writes the confirmation to the
/// diagnostic log.
pub trait Notifier: Send + Sync {
    fn notify(&self, context: &DisplayContext, text: &str);
}

/// Default notifier backed by the diagnostic log.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, context: &DisplayContext, text: &str) {
        info!("[notify:{}] {}", context.label(), text);
    }
}
