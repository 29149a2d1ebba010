//! Cycle-safe discovery of feature-bearing objects.
//!
//! The walk is depth-first over [`Object::attrs`]. An object's own features
//! are reported before anything reachable from it. Every object is visited at
//! most once per walk, keyed by identity, which is what stops cycles.

use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

use serde::Deserialize;

use crate::class::{Class, FeatureSlot};
use crate::object::{AsObjRef, Attr, ObjRef, Object};

/// Options for a [`Walker`].
///
/// The defaults walk the whole reachable graph.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WalkConfig {
    /// Stop descending below this many attribute hops from the root.
    /// `None` means unlimited.
    pub max_depth: Option<usize>,
    /// Walk the elements of sequence attributes.
    pub sequences: bool,
    /// Walk the values of mapping attributes.
    pub mappings: bool,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            sequences: true,
            mappings: true,
        }
    }
}

/// One `(object, feature type)` pair found by a walk.
///
/// Equality is identity on both halves.
#[derive(Clone)]
pub struct Discovery {
    pub object: ObjRef,
    pub feature_type: Class,
}

impl Discovery {
    pub fn new(object: &impl AsObjRef, feature_type: &Class) -> Self {
        Self {
            object: object.obj_ref(),
            feature_type: feature_type.clone(),
        }
    }

    /// Check whether this entry was found on `obj` (identity).
    pub fn object_is<T: Object + ?Sized>(&self, obj: &Rc<T>) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.object), Rc::as_ptr(obj))
    }

    /// Check whether this entry is `obj` paired with `feature_type`.
    pub fn is<T: Object + ?Sized>(&self, obj: &Rc<T>, feature_type: &Class) -> bool {
        self.object_is(obj) && self.feature_type == *feature_type
    }
}

impl PartialEq for Discovery {
    fn eq(&self, other: &Self) -> bool {
        self.is(&other.object, &other.feature_type)
    }
}

impl Eq for Discovery {}

impl fmt::Debug for Discovery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}@{:p}, {:?})",
            self.object.type_name(),
            Rc::as_ptr(&self.object) as *const (),
            self.feature_type
        )
    }
}

/// Objects seen so far in one walk.
///
/// Holds a strong reference to each so an address cannot be reused by another
/// object while the walk is running.
#[derive(Default)]
struct Visited {
    seen: HashSet<*const ()>,
    pinned: Vec<ObjRef>,
}

impl Visited {
    fn insert(&mut self, obj: &ObjRef) -> bool {
        let key = Rc::as_ptr(obj) as *const ();
        if !self.seen.insert(key) {
            return false;
        }
        self.pinned.push(obj.clone());
        true
    }
}

/// Depth-first feature discovery with configurable reach.
#[derive(Debug, Clone, Default)]
pub struct Walker {
    config: WalkConfig,
}

impl Walker {
    pub fn new(config: WalkConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WalkConfig {
        &self.config
    }

    /// Collect every `(object, feature type)` pair reachable from `root`, in
    /// discovery order.
    pub fn walk(&self, root: &impl AsObjRef) -> Vec<Discovery> {
        let root = root.obj_ref();
        let mut visited = Visited::default();
        let mut found = Vec::new();
        self.visit(&root, 0, &mut visited, &mut found);
        tracing::trace!(
            root = root.type_name(),
            visited = visited.pinned.len(),
            found = found.len(),
            "walk finished"
        );
        found
    }

    fn visit(
        &self,
        obj: &ObjRef,
        depth: usize,
        visited: &mut Visited,
        found: &mut Vec<Discovery>,
    ) {
        if !visited.insert(obj) {
            tracing::trace!(object = obj.type_name(), "already visited");
            return;
        }
        tracing::trace!(object = obj.type_name(), depth, "visiting");

        let registry = obj
            .feature_slot()
            .and_then(FeatureSlot::class)
            .and_then(Class::registry);
        if let Some(registry) = registry {
            found.extend(registry.iter().map(|feature_type| Discovery {
                object: obj.clone(),
                feature_type: feature_type.clone(),
            }));
        }

        if self.config.max_depth.is_some_and(|max| depth >= max) {
            return;
        }

        for field in obj.attrs() {
            tracing::trace!(object = obj.type_name(), attr = %field.name, "descending");
            self.visit_attr(&field.value, depth + 1, visited, found);
        }
    }

    fn visit_attr(
        &self,
        attr: &Attr,
        depth: usize,
        visited: &mut Visited,
        found: &mut Vec<Discovery>,
    ) {
        match attr {
            Attr::Object(child) => self.visit(child, depth, visited, found),
            Attr::Sequence(items) if self.config.sequences => {
                for item in items {
                    self.visit_member(item, depth, visited, found);
                }
            }
            Attr::Mapping(entries) if self.config.mappings => {
                for (_, value) in entries {
                    self.visit_member(value, depth, visited, found);
                }
            }
            _ => {}
        }
    }

    // Members of a container are walked as objects; a container nested
    // directly in another container has no attributes of its own.
    fn visit_member(
        &self,
        attr: &Attr,
        depth: usize,
        visited: &mut Visited,
        found: &mut Vec<Discovery>,
    ) {
        if let Attr::Object(child) = attr {
            self.visit(child, depth, visited, found);
        }
    }
}

/// Collect every `(object, feature type)` pair reachable from `root`.
///
/// Equivalent to `Walker::default().walk(root)`.
pub fn getfeatures(root: &impl AsObjRef) -> Vec<Discovery> {
    Walker::default().walk(root)
}
