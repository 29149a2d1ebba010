//! linkfeature: attach named features to objects and find them again.
//!
//! A class is given a list of feature types once, at definition time. Every
//! instance constructed through that class then owns one feature per type,
//! each holding a non-owning reference back to the instance. Callers can ask
//! a single object for a feature by name, or walk an object graph (cycles
//! included) to enumerate every feature-bearing object reachable from a root.
//!
//! This crate re-exports the two layers:
//! - [`linkfeature_core`]: the mechanism itself
//! - [`linkfeature_dynamic`]: attribute-bag objects built on top of it

pub use linkfeature_core::*;
pub use linkfeature_dynamic::{Attributes, Instance, Value};
