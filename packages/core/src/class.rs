//! Class descriptors, the feature registry, and construction wrapping.

use std::any::TypeId;
use std::cell::{OnceCell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::{Rc, Weak};

use crate::feature::{Feature, FeatureKind, FeatureMap, Owner};
use crate::object::{short_type_name, Object};

type Binder = Box<dyn Fn(Owner) -> Box<dyn Feature>>;

thread_local! {
    // One descriptor per Rust feature type.
    static FEATURE_CLASSES: RefCell<HashMap<TypeId, Class>> = RefCell::new(HashMap::new());
}

/// What makes a class a Feature subtype.
struct FeatureDecl {
    name: String,
    bind: Binder,
}

struct ClassInner {
    name: String,
    feature: Option<FeatureDecl>,
    registry: RefCell<Option<Rc<[Class]>>>,
}

/// A type descriptor.
///
/// Embedding types construct their instances through a `Class` so that the
/// feature types registered on it get instantiated. Feature types are classes
/// too: they carry a feature declaration (a name and a binder).
///
/// Cloning is cheap and yields the same descriptor. Equality is identity.
#[derive(Clone)]
pub struct Class(Rc<ClassInner>);

impl Class {
    /// A plain class that is not a feature type.
    pub fn new(name: impl Into<String>) -> Self {
        Self::from_parts(name.into(), None)
    }

    /// The class of a feature type declared in Rust.
    ///
    /// Every call for the same `F` on a thread returns the same descriptor,
    /// so `Class::feature::<F>() == Class::feature::<F>()`.
    pub fn feature<F: FeatureKind>() -> Self {
        FEATURE_CLASSES.with(|classes| {
            classes
                .borrow_mut()
                .entry(TypeId::of::<F>())
                .or_insert_with(Self::declare::<F>)
                .clone()
        })
    }

    fn declare<F: FeatureKind>() -> Self {
        let bind: Binder = Box::new(|owner| Box::new(F::bind(owner)) as Box<dyn Feature>);
        Self::from_parts(
            short_type_name(std::any::type_name::<F>()).to_string(),
            Some(FeatureDecl {
                name: F::NAME.to_string(),
                bind,
            }),
        )
    }

    /// A feature class assembled at run time.
    ///
    /// An empty `feature_name` is accepted here and rejected by
    /// [`addfeatures`](crate::addfeatures).
    pub fn dynamic_feature<B>(
        class_name: impl Into<String>,
        feature_name: impl Into<String>,
        bind: B,
    ) -> Self
    where
        B: Fn(Owner) -> Box<dyn Feature> + 'static,
    {
        Self::from_parts(
            class_name.into(),
            Some(FeatureDecl {
                name: feature_name.into(),
                bind: Box::new(bind),
            }),
        )
    }

    fn from_parts(name: String, feature: Option<FeatureDecl>) -> Self {
        Class(Rc::new(ClassInner {
            name,
            feature,
            registry: RefCell::new(None),
        }))
    }

    /// Class name.
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Check whether this class is a Feature subtype.
    pub fn is_feature(&self) -> bool {
        self.0.feature.is_some()
    }

    /// Name declared by a feature class. `None` for plain classes.
    pub fn feature_name(&self) -> Option<&str> {
        self.0.feature.as_ref().map(|decl| decl.name.as_str())
    }

    /// Feature types registered on this class, in registration order.
    pub fn registry(&self) -> Option<Rc<[Class]>> {
        self.0.registry.borrow().clone()
    }

    /// Check whether a registrar has been applied to this class.
    pub fn has_registry(&self) -> bool {
        self.0.registry.borrow().is_some()
    }

    /// Replace the registry, returning the previous one.
    pub(crate) fn set_registry(&self, registry: Rc<[Class]>) -> Option<Rc<[Class]>> {
        self.0.registry.borrow_mut().replace(registry)
    }

    /// Check whether two handles refer to the same class.
    pub fn ptr_eq(&self, other: &Class) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Construct an instance of this class.
    ///
    /// `init` is the type's own construction logic. It receives a weak handle
    /// to the instance being built so that children can hold back-references.
    /// Once it returns, one feature per registered type is bound to the new
    /// instance and stored in its [`FeatureSlot`].
    pub fn construct<T, F>(&self, init: F) -> Rc<T>
    where
        T: Object,
        F: FnOnce(&Weak<T>) -> T,
    {
        Rc::new_cyclic(|this| {
            let value = init(this);
            let owner: Weak<dyn Object> = this.clone();
            self.bind(&value, Owner::new(owner));
            value
        })
    }

    fn bind(&self, value: &dyn Object, owner: Owner) {
        let registry = self.registry();
        let Some(slot) = value.feature_slot() else {
            if registry.is_some_and(|r| !r.is_empty()) {
                tracing::warn!(
                    class = self.name(),
                    "constructed type has no feature slot; registered features are dropped"
                );
            }
            return;
        };

        let features = registry.map(|registry| {
            let mut map = FeatureMap::default();
            for feature_type in registry.iter() {
                if let Some(decl) = &feature_type.0.feature {
                    map.insert(&decl.name, (decl.bind)(owner.clone()));
                }
            }
            map
        });

        if !slot.bind(self.clone(), features) {
            tracing::warn!(class = self.name(), "feature slot already bound");
        }
    }
}

impl PartialEq for Class {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Class {}

impl Hash for Class {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Rc::as_ptr(&self.0).hash(state);
    }
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.feature_name() {
            Some(feature) => write!(f, "{}({:?})", self.name(), feature),
            None => write!(f, "{}", self.name()),
        }
    }
}

struct Bound {
    class: Class,
    features: Option<FeatureMap>,
}

/// Reserved per-instance slot managed by [`Class::construct`].
///
/// Embedding types keep one as a field and return it from
/// [`Object::feature_slot`]. It is written once and never changes afterwards.
#[derive(Default)]
pub struct FeatureSlot {
    bound: OnceCell<Bound>,
}

impl FeatureSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// The class that constructed the owning object.
    pub fn class(&self) -> Option<&Class> {
        self.bound.get().map(|b| &b.class)
    }

    /// The feature map, present only if the class had a registry at
    /// construction time.
    pub fn features(&self) -> Option<&FeatureMap> {
        self.bound.get().and_then(|b| b.features.as_ref())
    }

    pub fn is_bound(&self) -> bool {
        self.bound.get().is_some()
    }

    fn bind(&self, class: Class, features: Option<FeatureMap>) -> bool {
        self.bound.set(Bound { class, features }).is_ok()
    }
}

impl fmt::Debug for FeatureSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.bound.get() {
            Some(bound) => f
                .debug_struct("FeatureSlot")
                .field("class", &bound.class)
                .field("features", &bound.features)
                .finish(),
            None => write!(f, "FeatureSlot(unbound)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature;

    feature! {
        struct Tag = "tag";
    }

    struct Plain {
        slot: FeatureSlot,
    }

    impl Object for Plain {
        fn feature_slot(&self) -> Option<&FeatureSlot> {
            Some(&self.slot)
        }
    }

    struct Slotless;

    impl Object for Slotless {}

    fn plain(class: &Class) -> Rc<Plain> {
        class.construct(|_| Plain {
            slot: FeatureSlot::new(),
        })
    }

    #[test]
    fn class_identity() {
        let a = Class::new("A");
        let b = Class::new("A");
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn feature_class_is_shared_per_type() {
        let a = Class::feature::<Tag>();
        let b = Class::feature::<Tag>();
        assert_eq!(a, b);
        assert!(a.ptr_eq(&b));

        let dynamic = Class::dynamic_feature("Tag", "tag", |owner| {
            Box::new(Tag { owner }) as Box<dyn Feature>
        });
        assert_ne!(dynamic, a);
    }

    #[test]
    fn feature_class_metadata() {
        let class = Class::feature::<Tag>();
        assert_eq!(class.name(), "Tag");
        assert_eq!(class.feature_name(), Some("tag"));
        assert!(class.is_feature());
        assert!(!Class::new("Plain").is_feature());
        assert_eq!(format!("{:?}", class), "Tag(\"tag\")");
    }

    #[test]
    fn untransformed_construct_records_class_only() {
        let class = Class::new("Plain");
        let obj = plain(&class);

        assert!(obj.slot.is_bound());
        assert_eq!(obj.slot.class(), Some(&class));
        assert!(obj.slot.features().is_none());
        assert_eq!(obj.type_name(), "Plain");
    }

    #[test]
    fn transformed_construct_binds_features() {
        let class = Class::new("Plain");
        class.set_registry(Rc::from(vec![Class::feature::<Tag>()]));
        let obj = plain(&class);

        let features = obj.slot.features().expect("feature map");
        let tag = features.get("tag").expect("tag feature");
        assert!(tag.owner().is(&obj));
        assert!(tag.obj().is_some());
    }

    #[test]
    fn slotless_type_still_constructs() {
        let class = Class::new("Slotless");
        class.set_registry(Rc::from(vec![Class::feature::<Tag>()]));
        let _obj: Rc<Slotless> = class.construct(|_| Slotless);
    }

    #[test]
    fn init_sees_weak_self() {
        let class = Class::new("Plain");
        let obj = class.construct(|this: &Weak<Plain>| {
            assert!(this.upgrade().is_none());
            Plain {
                slot: FeatureSlot::new(),
            }
        });
        assert!(obj.slot.is_bound());
    }
}
