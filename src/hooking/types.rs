use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error_handling::types::CaptureError;
use crate::host::{HostObject, Value};

/// Identifies a target call site: class name, method name, and ordered
/// parameter type descriptors. An empty descriptor list means "match by
/// name only", valid as long as the name is not overloaded. Immutable
/// once registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterceptionPoint {
    pub class_name: String,
    pub method_name: String,
    pub param_types: Vec<String>,
}

impl InterceptionPoint {
    pub fn new<C: Into<String>, M: Into<String>>(class_name: C, method_name: M) -> Self {
        Self {
            class_name: class_name.into(),
            method_name: method_name.into(),
            param_types: Vec::new(),
        }
    }

    pub fn with_params<C: Into<String>, M: Into<String>>(
        class_name: C,
        method_name: M,
        param_types: &[&str],
    ) -> Self {
        Self {
            class_name: class_name.into(),
            method_name: method_name.into(),
            param_types: param_types.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// Log-friendly `Class.method` label.
    pub fn site(&self) -> String {
        format!("{}.{}", self.class_name, self.method_name)
    }
}

/// The three interception modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HookMode {
    /// Handler runs before the original method. Side effect only.
    ObserveBefore,
    /// Handler runs after the original method with a copy of its
    /// result. Side effect only.
    ObserveAfter,
    /// Handler runs instead of the original method; its result slot is
    /// the call's result. The original body never executes.
    Replace,
}

/// Mutable view of one intercepted invocation, handed to handlers.
///
/// For `ObserveAfter` the result slot holds a copy of the original
/// result; writing to it has no effect on the caller. For `Replace`
/// the slot is empty on entry and whatever the handler leaves there
/// (null if nothing) is returned to the caller.
pub struct MethodCall<'a> {
    receiver: &'a HostObject,
    args: &'a [Value],
    result: Option<Value>,
}

impl<'a> MethodCall<'a> {
    pub(crate) fn new(receiver: &'a HostObject, args: &'a [Value]) -> Self {
        Self {
            receiver,
            args,
            result: None,
        }
    }

    pub(crate) fn with_result(receiver: &'a HostObject, args: &'a [Value], result: Value) -> Self {
        Self {
            receiver,
            args,
            result: Some(result),
        }
    }

    pub fn receiver(&self) -> &HostObject {
        self.receiver
    }

    pub fn args(&self) -> &[Value] {
        self.args
    }

    pub fn arg(&self, index: usize) -> Option<&Value> {
        self.args.get(index)
    }

    pub fn result(&self) -> Option<&Value> {
        self.result.as_ref()
    }

    pub fn set_result(&mut self, value: Value) {
        self.result = Some(value);
    }

    pub(crate) fn take_result(&mut self) -> Option<Value> {
        self.result.take()
    }
}

/// Hook callback. Runs inline in the host's call; any `Err` is
/// contained and logged by the engine, never propagated.
pub type Handler = Arc<dyn Fn(&mut MethodCall) -> Result<(), CaptureError> + Send + Sync>;

/// Proof of a successful registration. Carries a correlation id used in
/// log lines and accepted by [`InterceptionEngine::unregister`].
///
/// [`InterceptionEngine::unregister`]: super::engine::InterceptionEngine::unregister
#[derive(Debug, Clone)]
pub struct RegistrationHandle {
    id: Uuid,
    point: InterceptionPoint,
    mode: HookMode,
}

impl RegistrationHandle {
    pub(crate) fn new(id: Uuid, point: InterceptionPoint, mode: HookMode) -> Self {
        Self { id, point, mode }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn point(&self) -> &InterceptionPoint {
        &self.point
    }

    pub fn mode(&self) -> HookMode {
        self.mode
    }
}
