//! Direct, single-object feature lookup.

use crate::error::{Error, Result};
use crate::feature::{Feature, FeatureKind, FeatureMap};
use crate::object::Object;

fn feature_map(obj: &dyn Object) -> Option<&FeatureMap> {
    obj.feature_slot()?.features()
}

/// Check whether `obj` carries a feature named `name`.
///
/// Never fails: objects that were never given features simply answer `false`.
pub fn hasfeature(obj: &dyn Object, name: &str) -> bool {
    feature_map(obj).is_some_and(|features| features.contains(name))
}

/// Get the feature stored under `name` on `obj`.
///
/// # Errors
///
/// Returns [`Error::NoSuchFeature`] if `obj` has no feature map or the map
/// lacks `name`.
pub fn getfeature<'a>(obj: &'a dyn Object, name: &str) -> Result<&'a dyn Feature> {
    feature_map(obj)
        .and_then(|features| features.get(name))
        .ok_or_else(|| Error::no_such_feature(obj.type_name(), name))
}

/// Get the feature of type `F` on `obj`, looked up by `F::NAME`.
///
/// # Errors
///
/// Returns [`Error::NoSuchFeature`] if absent, or [`Error::WrongFeatureType`]
/// if another feature type is stored under the same name.
pub fn getfeature_as<F: FeatureKind>(obj: &dyn Object) -> Result<&F> {
    getfeature(obj, F::NAME)?
        .as_any()
        .downcast_ref::<F>()
        .ok_or_else(|| Error::WrongFeatureType {
            object: obj.type_name().to_string(),
            name: F::NAME.to_string(),
            expected: std::any::type_name::<F>(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::{Class, FeatureSlot};
    use crate::{addfeatures, feature};
    use std::rc::Rc;

    feature! {
        struct Dummy = "dummy";
    }

    feature! {
        struct Impostor = "dummy";
    }

    feature! {
        struct Other = "other";
    }

    struct Widget {
        slot: FeatureSlot,
    }

    impl Object for Widget {
        fn feature_slot(&self) -> Option<&FeatureSlot> {
            Some(&self.slot)
        }
    }

    struct Opaque;

    impl Object for Opaque {}

    fn widget(class: &Class) -> Rc<Widget> {
        class.construct(|_| Widget {
            slot: FeatureSlot::new(),
        })
    }

    #[test]
    fn hasfeature_on_transformed_object() {
        let class = addfeatures([Class::feature::<Dummy>()])
            .unwrap()
            .apply(&Class::new("Widget"));
        let obj = widget(&class);

        assert!(hasfeature(&*obj, "dummy"));
        assert!(!hasfeature(&*obj, "other"));
    }

    #[test]
    fn untransformed_objects_have_nothing() {
        let obj = widget(&Class::new("Widget"));

        assert!(!hasfeature(&*obj, "dummy"));
        assert!(!hasfeature(&Opaque, "dummy"));

        let err = getfeature(&*obj, "dummy").unwrap_err();
        assert!(err.is_lookup());
        assert_eq!(
            err,
            Error::NoSuchFeature {
                object: "Widget".to_string(),
                name: "dummy".to_string(),
            }
        );
        assert!(getfeature(&Opaque, "dummy").is_err());
    }

    #[test]
    fn getfeature_binds_owner() {
        let class = addfeatures([Class::feature::<Dummy>()])
            .unwrap()
            .apply(&Class::new("Widget"));
        let obj = widget(&class);

        let feature = getfeature(&*obj, "dummy").unwrap();
        assert_eq!(feature.name(), "dummy");
        assert!(feature.owner().is(&obj));
        assert!(feature.as_any().downcast_ref::<Dummy>().is_some());
    }

    #[test]
    fn missing_name_on_transformed_object() {
        let class = addfeatures([Class::feature::<Dummy>()])
            .unwrap()
            .apply(&Class::new("Widget"));
        let obj = widget(&class);

        assert!(matches!(
            getfeature(&*obj, "other"),
            Err(Error::NoSuchFeature { .. })
        ));
    }

    #[test]
    fn last_registered_wins_on_name_collision() {
        let class = addfeatures([Class::feature::<Dummy>(), Class::feature::<Impostor>()])
            .unwrap()
            .apply(&Class::new("Widget"));
        let obj = widget(&class);

        assert!(getfeature_as::<Impostor>(&*obj).is_ok());
        let err = getfeature_as::<Dummy>(&*obj).unwrap_err();
        assert!(matches!(err, Error::WrongFeatureType { .. }));
        assert!(err.is_lookup());
    }

    #[test]
    fn typed_lookup() {
        let class = addfeatures([Class::feature::<Dummy>(), Class::feature::<Other>()])
            .unwrap()
            .apply(&Class::new("Widget"));
        let obj = widget(&class);

        let dummy = getfeature_as::<Dummy>(&*obj).unwrap();
        assert!(dummy.owner().is(&obj));
        assert!(getfeature_as::<Other>(&*obj).is_ok());
    }
}
