use std::fmt;

use image::{DynamicImage, GenericImageView};

use super::object::HostObject;

/// A display surface the host hands to UI-facing calls. Notifications
/// are shown against one of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayContext {
    label: String,
}

impl DisplayContext {
    pub fn new<S: Into<String>>(label: S) -> Self {
        Self {
            label: label.into(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

/// Tagged union of the values that cross the interception boundary.
///
/// `Bitmap` carries a decoded image, not encoded bytes; the image
/// capture path re-encodes it. Video crosses the boundary as a `Str`
/// source locator instead, so there is no video payload variant.
#[derive(Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Str(String),
    Bitmap(DynamicImage),
    Context(DisplayContext),
    Object(HostObject),
}

impl Value {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bitmap(&self) -> Option<&DynamicImage> {
        match self {
            Value::Bitmap(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_context(&self) -> Option<&DisplayContext> {
        match self {
            Value::Context(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&HostObject> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Debug for Value {
    // bitmaps print as dimensions, not pixel dumps
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Bool(b) => write!(f, "Bool({})", b),
            Value::Str(s) => write!(f, "Str({:?})", s),
            Value::Bitmap(b) => write!(f, "Bitmap({}x{})", b.width(), b.height()),
            Value::Context(c) => write!(f, "Context({:?})", c.label()),
            Value::Object(o) => write!(f, "Object({})", o.class_name()),
        }
    }
}
