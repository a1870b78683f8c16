use std::sync::Arc;

use log::debug;

use crate::hooking::{Handler, MethodCall};
use crate::host::Value;

/// Builds the `Replace` handler that forces a boolean accessor to a
/// fixed constant.
///
/// The original accessor body never runs; receiver state and arguments
/// are ignored. No persistence, no notification, no other side effect.
pub fn forced_signal(constant: bool) -> Handler {
    Arc::new(move |call: &mut MethodCall| {
        debug!("Reporting capture state as {}", constant);
        call.set_result(Value::Bool(constant));
        Ok(())
    })
}
