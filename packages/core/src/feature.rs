//! The Feature capability and its per-instance storage.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::object::{ObjRef, Object};

/// Non-owning back-reference from a feature to the object that owns it.
///
/// The owner outlives its features, so [`Owner::get`] only returns `None`
/// while the owner is still being constructed.
#[derive(Clone)]
pub struct Owner(Weak<dyn Object>);

impl Owner {
    /// Wrap a weak reference to the owning object.
    pub fn new(owner: Weak<dyn Object>) -> Self {
        Self(owner)
    }

    /// Get a strong reference to the owner.
    pub fn get(&self) -> Option<ObjRef> {
        self.0.upgrade()
    }

    /// Check whether this back-reference points at `obj` (identity).
    pub fn is<T: Object + ?Sized>(&self, obj: &Rc<T>) -> bool {
        std::ptr::addr_eq(self.0.as_ptr(), Rc::as_ptr(obj))
    }
}

impl fmt::Debug for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Owner")
            .field("alive", &(self.0.strong_count() > 0))
            .finish()
    }
}

/// A capability bound to exactly one owning object.
pub trait Feature: Any + fmt::Debug {
    /// The identifying name this feature is stored under.
    fn name(&self) -> &str;

    /// Back-reference to the owning object.
    fn owner(&self) -> &Owner;

    /// Helper to allow downcasting from the trait object.
    fn as_any(&self) -> &dyn Any;

    /// The owning object, if it is fully constructed.
    fn obj(&self) -> Option<ObjRef> {
        self.owner().get()
    }
}

/// A feature type declared in Rust code.
///
/// Implementors get a class descriptor through
/// [`Class::feature`](crate::Class::feature).
pub trait FeatureKind: Feature + Sized {
    /// Name under which instances are stored in a [`FeatureMap`].
    const NAME: &'static str;

    /// Construct the feature for a freshly built owner.
    fn bind(owner: Owner) -> Self;
}

/// Per-instance lookup table from feature name to feature.
///
/// Populated once at construction. Inserting an already present name
/// replaces the earlier entry, so the last registered feature type wins.
#[derive(Default)]
pub struct FeatureMap {
    features: BTreeMap<String, Box<dyn Feature>>,
}

impl FeatureMap {
    pub(crate) fn insert(&mut self, name: &str, feature: Box<dyn Feature>) {
        self.features.insert(name.to_string(), feature);
    }

    /// Get a feature by name.
    pub fn get(&self, name: &str) -> Option<&dyn Feature> {
        self.features.get(name).map(|f| f.as_ref())
    }

    /// Check whether a feature is stored under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.features.contains_key(name)
    }

    /// Names of all stored features, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.features.keys().map(String::as_str)
    }

    /// Iterate over `(name, feature)` pairs, sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &dyn Feature)> {
        self.features.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl fmt::Debug for FeatureMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

/// Declare a feature type that stores nothing but its owner.
///
/// # Example
///
/// ```rust
/// use linkfeature_core::{feature, FeatureKind};
///
/// feature! {
///     /// Marks objects that can be audited.
///     pub struct Auditable = "auditable";
/// }
///
/// assert_eq!(Auditable::NAME, "auditable");
/// ```
#[macro_export]
macro_rules! feature {
    ($(#[$meta:meta])* $vis:vis struct $ty:ident = $name:literal;) => {
        $(#[$meta])*
        #[derive(Debug)]
        $vis struct $ty {
            owner: $crate::Owner,
        }

        impl $crate::Feature for $ty {
            fn name(&self) -> &str {
                $name
            }

            fn owner(&self) -> &$crate::Owner {
                &self.owner
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }
        }

        impl $crate::FeatureKind for $ty {
            const NAME: &'static str = $name;

            fn bind(owner: $crate::Owner) -> Self {
                Self { owner }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Bare;

    impl Object for Bare {}

    feature! {
        struct Probe = "probe";
    }

    #[test]
    fn owner_identity() {
        let obj = Rc::new(Bare);
        let other = Rc::new(Bare);
        let weak: Weak<dyn Object> = Rc::downgrade(&obj) as Weak<dyn Object>;
        let owner = Owner::new(weak);

        assert!(owner.is(&obj));
        assert!(!owner.is(&other));
        assert!(owner.get().is_some());
    }

    #[test]
    fn owner_dies_with_object() {
        let obj = Rc::new(Bare);
        let owner = Owner::new(Rc::downgrade(&obj) as Weak<dyn Object>);
        drop(obj);

        assert!(owner.get().is_none());
        assert!(format!("{:?}", owner).contains("false"));
    }

    #[test]
    fn map_last_insert_wins() {
        let obj = Rc::new(Bare);
        let owner = Owner::new(Rc::downgrade(&obj) as Weak<dyn Object>);

        let mut map = FeatureMap::default();
        map.insert("probe", Box::new(Probe::bind(owner.clone())));
        map.insert("other", Box::new(Probe::bind(owner.clone())));
        map.insert("probe", Box::new(Probe::bind(owner)));

        assert_eq!(map.len(), 2);
        assert_eq!(map.names().collect::<Vec<_>>(), vec!["other", "probe"]);
        assert!(map.contains("probe"));
        assert!(map.get("missing").is_none());
    }

    #[test]
    fn macro_feature_downcasts() {
        let obj = Rc::new(Bare);
        let feature: Box<dyn Feature> = Box::new(Probe::bind(Owner::new(
            Rc::downgrade(&obj) as Weak<dyn Object>,
        )));

        assert_eq!(feature.name(), "probe");
        assert!(feature.as_any().downcast_ref::<Probe>().is_some());
        assert!(feature.owner().is(&obj));
    }
}
