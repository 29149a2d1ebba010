//! Objects with attributes that can be set and removed at run time.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use linkfeature_core::{Class, FeatureSlot, Field, Object};

use crate::Value;

/// Insertion-ordered attribute storage.
///
/// Replacing an attribute keeps its original position.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Attributes {
    entries: Vec<(String, Value)>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an attribute, returning the value it replaced.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((name, value));
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
    }

    /// Remove an attribute, returning it if it existed.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        let index = self.entries.iter().position(|(k, _)| k == name)?;
        Some(self.entries.remove(index).1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Attribute names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Set one attribute per entry of a JSON object.
    pub fn extend_json(&mut self, json: serde_json::Map<String, serde_json::Value>) {
        for (name, value) in json {
            self.set(name, Value::from(value));
        }
    }
}

/// A feature-bearing object whose attributes live in an [`Attributes`] bag.
///
/// # Example
///
/// ```rust
/// use linkfeature_core::{addfeatures, feature, getfeatures, Class};
/// use linkfeature_dynamic::{Instance, Value};
///
/// feature! {
///     pub struct Tracked = "tracked";
/// }
///
/// let node = addfeatures([Class::feature::<Tracked>()])?.apply(&Class::new("Node"));
/// let leaf = Instance::new(&node);
/// let root = Instance::build(&node, |_, attrs| {
///     attrs.set("children", vec![Value::object(&leaf)]);
/// });
///
/// assert_eq!(getfeatures(&root).len(), 2);
/// # Ok::<(), linkfeature_core::Error>(())
/// ```
pub struct Instance {
    slot: FeatureSlot,
    attributes: RefCell<Attributes>,
}

impl Instance {
    /// Construct an instance of `class` with no attributes.
    pub fn new(class: &Class) -> Rc<Instance> {
        Self::build(class, |_, _| {})
    }

    /// Construct an instance of `class`, letting `init` fill its attributes.
    ///
    /// `init` gets a weak handle to the instance under construction; store it
    /// with [`Value::weak`] to build back-references.
    pub fn build<F>(class: &Class, init: F) -> Rc<Instance>
    where
        F: FnOnce(&Weak<Instance>, &mut Attributes),
    {
        class.construct(|this| {
            let mut attributes = Attributes::new();
            init(this, &mut attributes);
            Instance {
                slot: FeatureSlot::new(),
                attributes: RefCell::new(attributes),
            }
        })
    }

    /// The class this instance was constructed through.
    pub fn class(&self) -> Option<&Class> {
        self.slot.class()
    }

    /// Set an attribute, returning the value it replaced.
    pub fn set(&self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let name = name.into();
        let previous = self.attributes.borrow_mut().set(name.as_str(), value);
        if previous.is_some() {
            tracing::trace!(object = self.type_name(), attr = %name, "replaced attribute");
        }
        previous
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.attributes.borrow().get(name).cloned()
    }

    /// Remove an attribute, returning it if it existed.
    pub fn remove(&self, name: &str) -> Option<Value> {
        self.attributes.borrow_mut().remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.attributes.borrow().contains(name)
    }

    /// Attribute names in insertion order.
    pub fn names(&self) -> Vec<String> {
        self.attributes
            .borrow()
            .names()
            .map(str::to_string)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.attributes.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.borrow().is_empty()
    }

    /// Set one attribute per entry of a JSON object.
    pub fn set_json(&self, json: serde_json::Map<String, serde_json::Value>) {
        self.attributes.borrow_mut().extend_json(json);
    }
}

impl Object for Instance {
    fn feature_slot(&self) -> Option<&FeatureSlot> {
        Some(&self.slot)
    }

    fn attrs(&self) -> Vec<Field<'_>> {
        self.attributes
            .borrow()
            .iter()
            .map(|(name, value)| Field::new(name.to_string(), value.to_attr()))
            .collect()
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("class", &self.class())
            .field("attributes", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linkfeature_core::Attr;

    #[test]
    fn attributes_keep_insertion_order() {
        let mut attrs = Attributes::new();
        attrs.set("b", 1);
        attrs.set("a", 2);
        assert_eq!(attrs.set("b", 3), Some(Value::from(1)));

        assert_eq!(attrs.names().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(attrs.get("b"), Some(&Value::from(3)));
    }

    #[test]
    fn attributes_remove() {
        let mut attrs = Attributes::new();
        attrs.set("a", 1);
        attrs.set("b", 2);

        assert_eq!(attrs.remove("a"), Some(Value::from(1)));
        assert_eq!(attrs.remove("a"), None);
        assert!(!attrs.contains("a"));
        assert_eq!(attrs.len(), 1);
    }

    #[test]
    fn extend_json_sets_each_key() {
        let mut attrs = Attributes::new();
        let json = serde_json::json!({"name": "widget", "size": 2});
        if let serde_json::Value::Object(map) = json {
            attrs.extend_json(map);
        }

        assert_eq!(attrs.get("name"), Some(&Value::from("widget")));
        assert_eq!(attrs.get("size"), Some(&Value::from(2)));
    }

    #[test]
    fn instance_records_class() {
        let class = Class::new("Node");
        let obj = Instance::new(&class);

        assert_eq!(obj.class(), Some(&class));
        assert_eq!(obj.type_name(), "Node");
        assert!(obj.is_empty());
    }

    #[test]
    fn instance_attrs_follow_values() {
        let class = Class::new("Node");
        let child = Instance::new(&class);
        let obj = Instance::build(&class, |this, attrs| {
            attrs.set("child", Value::object(&child));
            attrs.set("parent", Value::weak(this));
            attrs.set("label", "root");
        });

        let fields = obj.attrs();
        let names: Vec<_> = fields.iter().map(|f| &*f.name).collect();
        assert_eq!(names, vec!["child", "parent", "label"]);
        assert!(fields[0].value.as_object().is_some());
        assert!(fields[1].value.as_object().is_some());
        assert!(matches!(fields[2].value, Attr::Scalar));
    }

    #[test]
    fn set_and_remove_after_construction() {
        let obj = Instance::new(&Class::new("Node"));

        assert_eq!(obj.set("x", 1), None);
        assert_eq!(obj.set("x", 2), Some(Value::from(1)));
        assert_eq!(obj.get("x"), Some(Value::from(2)));
        assert_eq!(obj.remove("x"), Some(Value::from(2)));
        assert!(!obj.contains("x"));
    }
}
