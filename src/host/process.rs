use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use log::trace;

use crate::error_handling::types::ResolutionError;

use super::class::HostClass;
use super::object::HostObject;
use super::value::Value;

/// The instrumented application: a package name and its loaded classes.
///
/// Invocation is synchronous; whatever thread calls [`invoke`] runs the
/// slot body (and any detour installed in it) to completion before
/// proceeding. Lookup failures surface as [`ResolutionError`], the same
/// taxonomy registration-time resolution uses.
///
/// [`invoke`]: HostProcess::invoke
pub struct HostProcess {
    package_name: String,
    classes: RwLock<HashMap<String, Arc<HostClass>>>,
}

impl HostProcess {
    pub fn new<S: Into<String>>(package_name: S) -> Self {
        Self {
            package_name: package_name.into(),
            classes: RwLock::new(HashMap::new()),
        }
    }

    pub fn package_name(&self) -> &str {
        &self.package_name
    }

    /// Makes a class visible to resolution and dispatch.
    pub fn load_class(&self, class: HostClass) -> Arc<HostClass> {
        let class = Arc::new(class);
        if let Ok(mut classes) = self.classes.write() {
            classes.insert(class.name().to_string(), Arc::clone(&class));
        }
        class
    }

    pub fn class(&self, name: &str) -> Result<Arc<HostClass>, ResolutionError> {
        let classes = match self.classes.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        classes
            .get(name)
            .cloned()
            .ok_or_else(|| ResolutionError::ClassNotFound(name.to_string()))
    }

    /// Calls a method by class and name, matching by name only. The
    /// slot body is cloned out of the table before running, so a body
    /// is free to invoke other host methods without holding any lock.
    pub fn invoke(
        &self,
        class_name: &str,
        method: &str,
        receiver: &HostObject,
        args: &[Value],
    ) -> Result<Value, ResolutionError> {
        let class = self.class(class_name)?;
        let key = class.resolve(method, &[])?;
        let body = class
            .method_body(&key)
            .ok_or_else(|| ResolutionError::MethodNotFound {
                class: class_name.to_string(),
                method: method.to_string(),
            })?;
        trace!("invoke {}.{}", class_name, method);
        Ok(body(receiver, args))
    }

    /// Calls a method on a receiver, dispatching through the receiver's
    /// own class.
    pub fn invoke_on(
        &self,
        receiver: &HostObject,
        method: &str,
        args: &[Value],
    ) -> Result<Value, ResolutionError> {
        self.invoke(receiver.class_name(), method, receiver, args)
    }
}

impl std::fmt::Debug for HostProcess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HostProcess({})", self.package_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatches_through_receiver_class() {
        let host = HostProcess::new("com.example.app");
        let class = HostClass::new("com.example.Snap");
        class.define_method("getSender", &[], |receiver, _| {
            receiver.property("sender").unwrap_or(Value::Null)
        });
        host.load_class(class);

        let snap = HostObject::new("com.example.Snap")
            .with_property("sender", Value::Str("alice".into()));
        let sender = host.invoke_on(&snap, "getSender", &[]).unwrap();
        assert_eq!(sender.as_str(), Some("alice"));
    }

    #[test]
    fn unknown_class_and_method_fail_resolution() {
        let host = HostProcess::new("com.example.app");
        let snap = HostObject::new("com.example.Snap");
        assert!(matches!(
            host.invoke_on(&snap, "getSender", &[]),
            Err(ResolutionError::ClassNotFound(_))
        ));

        host.load_class(HostClass::new("com.example.Snap"));
        assert!(matches!(
            host.invoke_on(&snap, "getSender", &[]),
            Err(ResolutionError::MethodNotFound { .. })
        ));
    }
}
