//! Config contexts - key path lookup for template expressions
//!
//! A context is anything that can answer "what is the value at `a.b.c`?".
//! The engine only ever reads through [`ConfigContext::resolve`]; concrete
//! variants (project, module, plain value) implement it independently.

mod module;
mod project;

use serde_json::{Map, Value};

use crate::value::Primitive;

pub use module::{EnvironmentInfo, ModuleContext, ModuleInfo};
pub use project::ProjectContext;

/// Outcome of a context lookup
#[derive(Debug, Clone, PartialEq)]
pub enum ContextLookup {
    /// Path exists and holds a primitive
    Found(Primitive),
    /// Path exists but holds a mapping or sequence
    NotPrimitive,
    /// Path does not exist
    NotFound,
}

impl ContextLookup {
    pub fn is_found(&self) -> bool {
        matches!(self, ContextLookup::Found(_))
    }
}

/// Path based lookup capability.
///
/// Implementations must be pure: the engine may call `resolve` any number of
/// times, in any order, from several threads at once.
pub trait ConfigContext: Send + Sync {
    fn resolve(&self, path: &[String]) -> ContextLookup;
}

impl<C: ConfigContext + ?Sized> ConfigContext for &C {
    fn resolve(&self, path: &[String]) -> ContextLookup {
        (**self).resolve(path)
    }
}

/// Walk `path` through nested mappings starting at `root`.
///
/// Only mappings are traversed; hitting a scalar or sequence before the last
/// segment is `NotFound`. An empty path classifies `root` itself.
pub fn lookup_value(root: &Value, path: &[String]) -> ContextLookup {
    let mut current = root;

    for segment in path {
        match current {
            Value::Object(map) => match map.get(segment) {
                Some(next) => current = next,
                None => return ContextLookup::NotFound,
            },
            _ => return ContextLookup::NotFound,
        }
    }

    classify(current)
}

/// Same as [`lookup_value`] but rooted at a bare mapping
pub fn lookup_in_map(map: &Map<String, Value>, path: &[String]) -> ContextLookup {
    match path.split_first() {
        None => ContextLookup::NotPrimitive,
        Some((head, rest)) => match map.get(head) {
            Some(value) => lookup_value(value, rest),
            None => ContextLookup::NotFound,
        },
    }
}

fn classify(value: &Value) -> ContextLookup {
    match Primitive::from_value(value) {
        Some(p) => ContextLookup::Found(p),
        None => ContextLookup::NotPrimitive,
    }
}

/// Context backed by an arbitrary value tree
#[derive(Debug, Clone, Default)]
pub struct ValueContext {
    root: Value,
}

impl ValueContext {
    pub fn new(root: Value) -> Self {
        Self { root }
    }
}

impl ConfigContext for ValueContext {
    fn resolve(&self, path: &[String]) -> ContextLookup {
        lookup_value(&self.root, path)
    }
}

/// Split a dotted key path into owned segments (test and CLI helper)
pub fn key_path(dotted: &str) -> Vec<String> {
    dotted.split('.').map(str::to_string).collect()
}
