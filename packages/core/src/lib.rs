//! Core linkfeature: named capabilities attached to objects.
//!
//! This layer provides the whole mechanism:
//! - `Class`: a type descriptor carrying a registry of feature types
//! - `addfeatures`: validates feature types and registers them on classes
//! - `Class::construct`: builds an instance and binds one feature per
//!   registered type to it
//! - `getfeatures`: cycle-safe discovery of every feature-bearing object
//!   reachable from a root
//! - `hasfeature` / `getfeature`: direct lookup on a single object
//!
//! Types join the object graph by implementing [`Object`]: they expose their
//! [`FeatureSlot`] and report their attributes as [`Attr`] values.
//!
//! # Example
//!
//! ```rust
//! use std::rc::Rc;
//! use linkfeature_core::{
//!     addfeatures, feature, getfeature, getfeatures, Class, FeatureSlot, Object,
//! };
//!
//! feature! {
//!     pub struct Cached = "cached";
//! }
//!
//! struct Widget {
//!     slot: FeatureSlot,
//! }
//!
//! impl Object for Widget {
//!     fn feature_slot(&self) -> Option<&FeatureSlot> {
//!         Some(&self.slot)
//!     }
//! }
//!
//! let class = addfeatures([Class::feature::<Cached>()])?.apply(&Class::new("Widget"));
//! let widget: Rc<Widget> = class.construct(|_| Widget { slot: FeatureSlot::new() });
//!
//! assert_eq!(getfeatures(&widget).len(), 1);
//! assert!(getfeature(&*widget, "cached")?.owner().is(&widget));
//! # Ok::<(), linkfeature_core::Error>(())
//! ```

mod class;
mod error;
mod feature;
mod object;
mod query;
mod registrar;
mod walk;

pub use class::{Class, FeatureSlot};
pub use error::{Error, ErrorKind, Result};
pub use feature::{Feature, FeatureKind, FeatureMap, Owner};
pub use object::{AsObjRef, Attr, Field, ObjRef, Object};
pub use query::{getfeature, getfeature_as, hasfeature};
pub use registrar::{addfeatures, Registrar};
pub use walk::{getfeatures, Discovery, WalkConfig, Walker};
