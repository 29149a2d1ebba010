//! Registering feature types on classes.

use std::borrow::Borrow;
use std::rc::Rc;

use crate::class::Class;
use crate::error::{Error, Result};

/// A validated list of feature types, ready to be applied to classes.
///
/// Built by [`addfeatures`]. Applying it attaches the list to a class as its
/// feature registry; instances constructed through that class afterwards get
/// one feature per entry.
#[derive(Clone, Debug)]
pub struct Registrar {
    feature_types: Rc<[Class]>,
}

impl Registrar {
    /// The validated feature types, in registration order.
    pub fn feature_types(&self) -> &[Class] {
        &self.feature_types
    }

    /// Attach the feature types to `class` and return it.
    ///
    /// The registry is replaced, not merged, if one is already present.
    pub fn apply(&self, class: &Class) -> Class {
        let previous = class.set_registry(self.feature_types.clone());
        if let Some(previous) = previous {
            tracing::debug!(
                class = class.name(),
                previous = previous.len(),
                "replacing feature registry"
            );
        }
        tracing::debug!(
            class = class.name(),
            features = ?self.feature_types,
            "registered features"
        );
        class.clone()
    }
}

/// Validate `feature_types` and build a [`Registrar`] for them.
///
/// Every element must be a feature class with a non-empty name. Validation
/// happens here, before any class is touched.
///
/// # Example
///
/// ```rust
/// use linkfeature_core::{addfeatures, feature, Class};
///
/// feature! {
///     pub struct Dummy = "dummy";
/// }
///
/// let class = addfeatures([Class::feature::<Dummy>()])?.apply(&Class::new("Widget"));
/// assert_eq!(class.registry().map(|r| r.len()), Some(1));
/// # Ok::<(), linkfeature_core::Error>(())
/// ```
pub fn addfeatures<I>(feature_types: I) -> Result<Registrar>
where
    I: IntoIterator,
    I::Item: Borrow<Class>,
{
    let feature_types: Vec<Class> = feature_types
        .into_iter()
        .map(|class| -> Result<Class> {
            let class: &Class = class.borrow();
            validate(class)?;
            Ok(class.clone())
        })
        .collect::<Result<_>>()?;

    tracing::debug!(count = feature_types.len(), "built feature registrar");
    Ok(Registrar {
        feature_types: feature_types.into(),
    })
}

fn validate(class: &Class) -> Result<()> {
    match class.feature_name() {
        None => Err(Error::NotAFeature {
            class: class.name().to_string(),
        }),
        Some("") => Err(Error::MissingName {
            class: class.name().to_string(),
        }),
        Some(_) => Ok(()),
    }
}
