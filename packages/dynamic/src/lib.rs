//! Dynamic objects for linkfeature.
//!
//! [`Instance`] is an attribute bag whose attributes can be set, replaced and
//! removed at run time. Attribute contents are [`Value`]s: JSON-like scalars,
//! lists and maps, plus owning and non-owning references to other objects.
//! Instances are constructed through a [`Class`](linkfeature_core::Class), so
//! they receive the features registered on it and take part in discovery
//! like any other [`Object`](linkfeature_core::Object).

mod instance;
mod value;

pub use instance::{Attributes, Instance};
pub use value::Value;
