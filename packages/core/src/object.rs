//! Objects that can be walked for features.
//!
//! The walker knows nothing about concrete field layouts. Participating types
//! implement [`Object`] and report their attribute values as [`Attr`]s, a
//! closed variant the walker dispatches on.

use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::class::FeatureSlot;

/// Shared, type-erased reference to an object in the graph.
pub type ObjRef = Rc<dyn Object>;

/// A value that can own features and expose attributes to the walker.
///
/// Both methods have empty defaults: a type that implements neither is a leaf
/// that carries no features.
pub trait Object: Any {
    /// The reserved slot holding this object's features, if the type has one.
    fn feature_slot(&self) -> Option<&FeatureSlot> {
        None
    }

    /// Every attribute currently set on this object, in a stable order.
    fn attrs(&self) -> Vec<Field<'_>> {
        Vec::new()
    }

    /// Name used in diagnostics and lookup errors.
    fn type_name(&self) -> &str {
        match self.feature_slot().and_then(FeatureSlot::class) {
            Some(class) => class.name(),
            None => short_type_name(std::any::type_name::<Self>()),
        }
    }
}

/// One named attribute of an object.
#[derive(Clone, Debug)]
pub struct Field<'a> {
    pub name: Cow<'a, str>,
    pub value: Attr,
}

impl<'a> Field<'a> {
    pub fn new(name: impl Into<Cow<'a, str>>, value: impl Into<Attr>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// An attribute value, as seen by the walker.
#[derive(Clone, Default)]
pub enum Attr {
    /// Anything without attributes of its own: numbers, strings, dead weak
    /// references.
    #[default]
    Scalar,
    /// A nested object.
    Object(ObjRef),
    /// An ordered sequence of values.
    Sequence(Vec<Attr>),
    /// A key-value mapping. Only the values are walked.
    Mapping(Vec<(String, Attr)>),
}

impl Attr {
    /// A strong reference to a nested object.
    pub fn object<T: Object>(obj: &Rc<T>) -> Self {
        Attr::Object(obj.clone())
    }

    /// A non-owning reference; a dangling one is a scalar.
    pub fn weak<T: Object>(obj: &Weak<T>) -> Self {
        match obj.upgrade() {
            Some(obj) => Attr::Object(obj),
            None => Attr::Scalar,
        }
    }

    /// A sequence built from any iterable of values.
    pub fn sequence<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Attr>,
    {
        Attr::Sequence(items.into_iter().map(Into::into).collect())
    }

    /// A mapping built from `(key, value)` pairs; order is preserved.
    pub fn mapping<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Attr>,
    {
        Attr::Mapping(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, Attr::Scalar)
    }

    /// The nested object, if this is one.
    pub fn as_object(&self) -> Option<&ObjRef> {
        match self {
            Attr::Object(obj) => Some(obj),
            _ => None,
        }
    }
}

impl fmt::Debug for Attr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attr::Scalar => write!(f, "Scalar"),
            Attr::Object(obj) => write!(f, "Object({})", obj.type_name()),
            Attr::Sequence(items) => f.debug_list().entries(items).finish(),
            Attr::Mapping(entries) => f
                .debug_map()
                .entries(entries.iter().map(|(k, v)| (k, v)))
                .finish(),
        }
    }
}

impl From<ObjRef> for Attr {
    fn from(obj: ObjRef) -> Self {
        Attr::Object(obj)
    }
}

impl From<&ObjRef> for Attr {
    fn from(obj: &ObjRef) -> Self {
        Attr::Object(obj.clone())
    }
}

impl<T: Object> From<Rc<T>> for Attr {
    fn from(obj: Rc<T>) -> Self {
        Attr::Object(obj)
    }
}

impl<T: Object> From<&Rc<T>> for Attr {
    fn from(obj: &Rc<T>) -> Self {
        Attr::object(obj)
    }
}

impl<T: Object> From<&Weak<T>> for Attr {
    fn from(obj: &Weak<T>) -> Self {
        Attr::weak(obj)
    }
}

impl<T: Into<Attr>> From<Option<T>> for Attr {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

/// Anything that can be turned into a shared [`ObjRef`].
///
/// Lets the walker accept both `Rc<Concrete>` and `Rc<dyn Object>`.
pub trait AsObjRef {
    fn obj_ref(&self) -> ObjRef;
}

impl<T: Object> AsObjRef for Rc<T> {
    fn obj_ref(&self) -> ObjRef {
        self.clone()
    }
}

impl AsObjRef for ObjRef {
    fn obj_ref(&self) -> ObjRef {
        self.clone()
    }
}

/// Strip the module path from a `std::any::type_name` result.
pub(crate) fn short_type_name(full: &str) -> &str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
