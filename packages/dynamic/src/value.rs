//! The Value type - contents of a dynamic attribute.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};

use linkfeature_core::{Attr, ObjRef, Object};

/// An attribute value held by an [`Instance`](crate::Instance).
///
/// Scalars mirror JSON. Objects are held either owning (`Object`) or
/// non-owning (`Ref`); use `Ref` for back-references so cycles do not leak.
#[derive(Clone, Default)]
pub enum Value {
    /// Absence of a value.
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// Signed 64-bit integer.
    Integer(i64),
    /// 64-bit floating point.
    Float(f64),
    /// UTF-8 string.
    String(String),
    /// Owning reference to another object.
    Object(ObjRef),
    /// Non-owning reference to another object.
    Ref(Weak<dyn Object>),
    /// Ordered sequence of values.
    List(Vec<Value>),
    /// Key-value map with string keys.
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Owning reference to `obj`.
    pub fn object<T: Object>(obj: &Rc<T>) -> Self {
        Value::Object(obj.clone())
    }

    /// Non-owning reference to `obj`.
    pub fn weak<T: Object>(obj: &Weak<T>) -> Self {
        Value::Ref(obj.clone())
    }

    /// Create an empty list.
    pub fn list() -> Self {
        Value::List(Vec::new())
    }

    /// Create an empty map.
    pub fn map() -> Self {
        Value::Map(BTreeMap::new())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The referenced object, if this is a live object reference.
    pub fn as_object(&self) -> Option<ObjRef> {
        match self {
            Value::Object(obj) => Some(obj.clone()),
            Value::Ref(obj) => obj.upgrade(),
            _ => None,
        }
    }

    /// How the walker sees this value.
    pub fn to_attr(&self) -> Attr {
        match self {
            Value::Object(obj) => Attr::Object(obj.clone()),
            Value::Ref(obj) => obj.upgrade().map(Attr::Object).unwrap_or_default(),
            Value::List(items) => Attr::Sequence(items.iter().map(Value::to_attr).collect()),
            Value::Map(map) => Attr::Mapping(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_attr()))
                    .collect(),
            ),
            _ => Attr::Scalar,
        }
    }
}

impl PartialEq for Value {
    /// Scalars and containers compare by value, object references by
    /// identity.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            (Value::Ref(a), Value::Ref(b)) => Weak::ptr_eq(a, b),
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Bool(b) => write!(f, "{:?}", b),
            Value::Integer(i) => write!(f, "{:?}", i),
            Value::Float(x) => write!(f, "{:?}", x),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Object(obj) => write!(f, "Object({})", obj.type_name()),
            Value::Ref(obj) => match obj.upgrade() {
                Some(obj) => write!(f, "Ref({})", obj.type_name()),
                None => write!(f, "Ref(dropped)"),
            },
            Value::List(items) => f.debug_list().entries(items).finish(),
            Value::Map(map) => f.debug_map().entries(map).finish(),
        }
    }
}

// Conversion from common types

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<ObjRef> for Value {
    fn from(v: ObjRef) -> Self {
        Value::Object(v)
    }
}

impl<T: Object> From<Rc<T>> for Value {
    fn from(v: Rc<T>) -> Self {
        Value::Object(v)
    }
}

impl<T: Object> From<Weak<T>> for Value {
    fn from(v: Weak<T>) -> Self {
        Value::Ref(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<BTreeMap<String, T>> for Value {
    fn from(v: BTreeMap<String, T>) -> Self {
        Value::Map(v.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Integer(i)
                } else if let Some(f) = n.as_f64() {
                    Value::Float(f)
                } else {
                    // Fallback for very large numbers
                    Value::String(n.to_string())
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(arr) => {
                Value::List(arr.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Map(
                map.into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}
