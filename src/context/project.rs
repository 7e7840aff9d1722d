//! Project-level context: `local.env.*`, `local.platform`, `local.username`

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use super::{lookup_value, ConfigContext, ContextLookup};

/// Values describing the machine the project is being resolved on.
///
/// Environment variables are captured once at construction; later changes
/// to the process environment are not observed.
#[derive(Debug, Clone)]
pub struct ProjectContext {
    tree: Value,
}

impl Default for ProjectContext {
    fn default() -> Self {
        Self::new(BTreeMap::new(), std::env::consts::OS)
    }
}

impl ProjectContext {
    pub fn new(env: BTreeMap<String, String>, platform: impl Into<String>) -> Self {
        let env: Map<String, Value> = env
            .into_iter()
            .map(|(k, v)| (k, Value::String(v)))
            .collect();

        let mut local = Map::new();
        local.insert("env".to_string(), Value::Object(env));
        local.insert("platform".to_string(), Value::String(platform.into()));

        let mut root = Map::new();
        root.insert("local".to_string(), Value::Object(local));

        Self {
            tree: Value::Object(root),
        }
    }

    /// Snapshot the current process environment
    pub fn from_process() -> Self {
        let env: BTreeMap<String, String> = std::env::vars().collect();
        let username = env
            .get("USER")
            .or_else(|| env.get("USERNAME"))
            .cloned();

        let ctx = Self::new(env, std::env::consts::OS);
        match username {
            Some(name) => ctx.with_username(name),
            None => ctx,
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        if let Some(local) = self.tree.get_mut("local").and_then(Value::as_object_mut) {
            local.insert("username".to_string(), Value::String(username.into()));
        }
        self
    }
}

impl ConfigContext for ProjectContext {
    fn resolve(&self, path: &[String]) -> ContextLookup {
        lookup_value(&self.tree, path)
    }
}
