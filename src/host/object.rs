use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::value::Value;

/// A receiver object of the host application.
///
/// Carries the name of its class, so method calls on it can be
/// dispatched through the class table, and a property bag standing in
/// for whatever state the real object holds. Clones share the same
/// underlying object.
#[derive(Clone)]
pub struct HostObject {
    inner: Arc<ObjectInner>,
}

struct ObjectInner {
    class_name: String,
    properties: Mutex<HashMap<String, Value>>,
}

impl HostObject {
    pub fn new<S: Into<String>>(class_name: S) -> Self {
        Self {
            inner: Arc::new(ObjectInner {
                class_name: class_name.into(),
                properties: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Builder-style property initialization.
    pub fn with_property<K: Into<String>>(self, key: K, value: Value) -> Self {
        self.set_property(key, value);
        self
    }

    pub fn class_name(&self) -> &str {
        &self.inner.class_name
    }

    /// Returns a clone of the named property, if present.
    pub fn property(&self, key: &str) -> Option<Value> {
        self.inner
            .properties
            .lock()
            .ok()
            .and_then(|props| props.get(key).cloned())
    }

    pub fn set_property<K: Into<String>>(&self, key: K, value: Value) {
        if let Ok(mut props) = self.inner.properties.lock() {
            props.insert(key.into(), value);
        }
    }
}

impl std::fmt::Debug for HostObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HostObject({})", self.class_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_state() {
        let snap = HostObject::new("com.example.Snap");
        let alias = snap.clone();
        alias.set_property("sender", Value::Str("alice".into()));

        assert_eq!(
            snap.property("sender").and_then(|v| v.as_str().map(String::from)),
            Some("alice".to_string())
        );
        assert!(snap.property("missing").is_none());
    }
}
