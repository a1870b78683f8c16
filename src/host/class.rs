use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error_handling::types::ResolutionError;

use super::object::HostObject;
use super::value::Value;

/// Executable body of a method slot. The engine swaps these to install
/// a detour; the previous body stays reachable through the closure the
/// detour captured.
pub type MethodBody = Arc<dyn Fn(&HostObject, &[Value]) -> Value + Send + Sync>;

/// Identity of one method slot inside a class: name plus ordered
/// parameter type descriptors.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodKey {
    pub name: String,
    pub param_types: Vec<String>,
}

impl MethodKey {
    pub fn new<S: Into<String>>(name: S, param_types: &[&str]) -> Self {
        Self {
            name: name.into(),
            param_types: param_types.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// A named class of the host application with a swappable method table.
pub struct HostClass {
    name: String,
    methods: RwLock<HashMap<MethodKey, MethodBody>>,
}

impl HostClass {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            methods: RwLock::new(HashMap::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Defines (or redefines) a method slot.
    pub fn define_method<F>(&self, name: &str, param_types: &[&str], body: F)
    where
        F: Fn(&HostObject, &[Value]) -> Value + Send + Sync + 'static,
    {
        let key = MethodKey::new(name, param_types);
        if let Ok(mut methods) = self.methods.write() {
            methods.insert(key, Arc::new(body));
        }
    }

    /// Resolves a method by name and parameter descriptors.
    ///
    /// An empty descriptor list matches by name only and is an error if
    /// the name is overloaded; a non-empty list must match a slot
    /// exactly.
    pub fn resolve(&self, name: &str, param_types: &[String]) -> Result<MethodKey, ResolutionError> {
        let methods = match self.methods.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if !param_types.is_empty() {
            let key = MethodKey {
                name: name.to_string(),
                param_types: param_types.to_vec(),
            };
            if methods.contains_key(&key) {
                return Ok(key);
            }
            return Err(ResolutionError::MethodNotFound {
                class: self.name.clone(),
                method: name.to_string(),
            });
        }

        let mut matches = methods.keys().filter(|key| key.name == name);
        match (matches.next(), matches.next()) {
            (Some(key), None) => Ok(key.clone()),
            (Some(_), Some(_)) => Err(ResolutionError::AmbiguousMethod {
                class: self.name.clone(),
                method: name.to_string(),
            }),
            (None, _) => Err(ResolutionError::MethodNotFound {
                class: self.name.clone(),
                method: name.to_string(),
            }),
        }
    }

    /// Returns a clone of the body currently installed in the slot.
    pub fn method_body(&self, key: &MethodKey) -> Option<MethodBody> {
        let methods = match self.methods.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        methods.get(key).cloned()
    }

    /// Replaces the slot body, returning the previous one. Used by the
    /// interception engine to install and remove detours.
    pub fn swap_body(&self, key: &MethodKey, body: MethodBody) -> Option<MethodBody> {
        let mut methods = match self.methods.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        methods.insert(key.clone(), body)
    }
}

impl std::fmt::Debug for HostClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HostClass({})", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap_class() -> HostClass {
        let class = HostClass::new("com.example.Snap");
        class.define_method("getSender", &[], |receiver, _| {
            receiver.property("sender").unwrap_or(Value::Null)
        });
        class.define_method("open", &["android.content.Context"], |_, _| Value::Null);
        class.define_method("open", &["java.lang.String"], |_, _| Value::Null);
        class
    }

    #[test]
    fn resolves_by_name_when_unambiguous() {
        let class = snap_class();
        let key = class.resolve("getSender", &[]).unwrap();
        assert_eq!(key.name, "getSender");
        assert!(key.param_types.is_empty());
    }

    #[test]
    fn name_only_resolution_rejects_overloads() {
        let class = snap_class();
        assert!(matches!(
            class.resolve("open", &[]),
            Err(ResolutionError::AmbiguousMethod { .. })
        ));
        let key = class
            .resolve("open", &["java.lang.String".to_string()])
            .unwrap();
        assert_eq!(key.param_types, vec!["java.lang.String".to_string()]);
    }

    #[test]
    fn missing_method_is_an_error() {
        let class = snap_class();
        assert!(matches!(
            class.resolve("getVideoUri", &[]),
            Err(ResolutionError::MethodNotFound { .. })
        ));
    }

    #[test]
    fn swap_body_keeps_previous_reachable() {
        let class = snap_class();
        let key = class.resolve("getSender", &[]).unwrap();
        let previous = class.method_body(&key).unwrap();

        class.swap_body(&key, Arc::new(move |receiver, args| {
            // detour shape: still able to fall through to the original
            previous(receiver, args)
        }));

        let receiver =
            HostObject::new("com.example.Snap").with_property("sender", Value::Str("bob".into()));
        let body = class.method_body(&key).unwrap();
        assert_eq!(body(&receiver, &[]).as_str(), Some("bob"));
    }
}
