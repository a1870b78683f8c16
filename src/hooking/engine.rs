use std::any::Any;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex};

use log::{error, info, warn};
use uuid::Uuid;

use crate::error_handling::types::{CaptureError, ResolutionError};
use crate::host::{HostClass, HostProcess, MethodBody, MethodKey, Value};

use super::locator;
use super::types::{Handler, HookMode, InterceptionPoint, MethodCall, RegistrationHandle};

/// Bookkeeping for one installed detour.
struct InstalledHook {
    point: InterceptionPoint,
    mode: HookMode,
    class: Arc<HostClass>,
    key: MethodKey,
    /// Slot body as it was when this hook installed, restored on
    /// unregister.
    previous: MethodBody,
}

/// Installs and tracks detours on the host's dispatch slots.
///
/// `register` resolves the target up front and fails with
/// [`ResolutionError`] if the class or method is not loadable; on
/// success every subsequent invocation of the call site runs the
/// handler inline on the host's calling thread. Whatever the handler
/// does (file I/O, notification dispatch) blocks that call until done.
///
/// The engine is the containment boundary required of hook code: a
/// handler returning `Err` or panicking is logged and swallowed here,
/// and the host call completes as if the hook had not fired.
pub struct InterceptionEngine {
    host: Arc<HostProcess>,
    installed: Mutex<HashMap<Uuid, InstalledHook>>,
}

impl InterceptionEngine {
    pub fn new(host: Arc<HostProcess>) -> Self {
        Self {
            host,
            installed: Mutex::new(HashMap::new()),
        }
    }

    pub fn host(&self) -> &Arc<HostProcess> {
        &self.host
    }

    /// Attaches `handler` to the call site named by `point`.
    ///
    /// The previous slot body stays reachable from the installed
    /// detour, so `ObserveBefore` and `ObserveAfter` still execute the
    /// original while `Replace` suppresses it entirely.
    pub fn register(
        &self,
        point: InterceptionPoint,
        mode: HookMode,
        handler: Handler,
    ) -> Result<RegistrationHandle, ResolutionError> {
        let (class, key) = locator::resolve(&self.host, &point)?;
        let previous = class
            .method_body(&key)
            .ok_or_else(|| ResolutionError::MethodNotFound {
                class: point.class_name.clone(),
                method: point.method_name.clone(),
            })?;

        let id = Uuid::new_v4();
        let detour = build_detour(point.site(), mode, Arc::clone(&previous), handler);
        class.swap_body(&key, detour);

        if let Ok(mut installed) = self.installed.lock() {
            installed.insert(
                id,
                InstalledHook {
                    point: point.clone(),
                    mode,
                    class,
                    key,
                    previous,
                },
            );
        }

        info!("[{}] installed {:?} hook on {}", id, mode, point.site());
        Ok(RegistrationHandle::new(id, point, mode))
    }

    /// Detaches a hook, restoring the slot body captured when it
    /// installed. Any detour stacked on the same slot afterwards is
    /// detached along with it.
    pub fn unregister(&self, handle: &RegistrationHandle) -> bool {
        let hook = match self.installed.lock() {
            Ok(mut installed) => installed.remove(&handle.id()),
            Err(_) => None,
        };
        match hook {
            Some(hook) => {
                hook.class.swap_body(&hook.key, hook.previous);
                info!("[{}] removed hook on {}", handle.id(), hook.point.site());
                true
            }
            None => {
                warn!("[{}] unregister: unknown handle", handle.id());
                false
            }
        }
    }

    pub fn installed_count(&self) -> usize {
        self.installed.lock().map(|i| i.len()).unwrap_or(0)
    }

    pub fn is_hooked(&self, point: &InterceptionPoint) -> bool {
        self.installed
            .lock()
            .map(|installed| installed.values().any(|hook| &hook.point == point))
            .unwrap_or(false)
    }

    /// Points and modes of every installed hook, for diagnostics.
    pub fn installed_hooks(&self) -> Vec<(Uuid, InterceptionPoint, HookMode)> {
        self.installed
            .lock()
            .map(|installed| {
                installed
                    .iter()
                    .map(|(id, hook)| (*id, hook.point.clone(), hook.mode))
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl std::fmt::Debug for InterceptionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "InterceptionEngine({}, {} hook(s))",
            self.host.package_name(),
            self.installed_count()
        )
    }
}

/// Builds the slot body implementing one hook mode around the previous
/// body. The mode semantics are enforced here, not trusted to the
/// handler: observers cannot change what the caller sees, and a
/// replacement never runs the original.
fn build_detour(site: String, mode: HookMode, previous: MethodBody, handler: Handler) -> MethodBody {
    match mode {
        HookMode::ObserveBefore => Arc::new(move |receiver, args| {
            let mut call = MethodCall::new(receiver, args);
            contain(&site, || handler(&mut call));
            previous(receiver, args)
        }),
        HookMode::ObserveAfter => Arc::new(move |receiver, args| {
            let result = previous(receiver, args);
            let mut call = MethodCall::with_result(receiver, args, result.clone());
            contain(&site, || handler(&mut call));
            result
        }),
        HookMode::Replace => Arc::new(move |receiver, args| {
            let mut call = MethodCall::new(receiver, args);
            if contain(&site, || handler(&mut call)) {
                call.take_result().unwrap_or(Value::Null)
            } else {
                Value::Null
            }
        }),
    }
}

/// Runs a handler inside the containment boundary. Returns whether it
/// completed cleanly; failures are logged and absorbed so nothing
/// unwinds into the host's call stack.
fn contain<F>(site: &str, run: F) -> bool
where
    F: FnOnce() -> Result<(), CaptureError>,
{
    match panic::catch_unwind(AssertUnwindSafe(run)) {
        Ok(Ok(())) => true,
        Ok(Err(e)) => {
            error!("[{}] handler error contained: {}", site, e);
            false
        }
        Err(payload) => {
            error!("[{}] handler panic contained: {}", site, panic_text(&payload));
            false
        }
    }
}

fn panic_text(payload: &(dyn Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        (*text).to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        String::from("opaque panic payload")
    }
}
