//! Module-level context
//!
//! Exposes the environment name, project variables and the versions and
//! outputs of other modules. Anything under `local.*` falls through to the
//! wrapped [`ProjectContext`].

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{Map, Value};

use super::{lookup_in_map, ConfigContext, ContextLookup, ProjectContext};
use crate::value::Primitive;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentInfo {
    #[serde(default)]
    pub name: String,
}

/// Resolved state of a single module that others may reference
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleInfo {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub outputs: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleContext {
    #[serde(skip)]
    project: ProjectContext,
    #[serde(default)]
    environment: EnvironmentInfo,
    #[serde(default)]
    variables: Map<String, Value>,
    #[serde(default)]
    modules: BTreeMap<String, ModuleInfo>,
}

impl ModuleContext {
    pub fn new(environment: impl Into<String>) -> Self {
        Self {
            environment: EnvironmentInfo {
                name: environment.into(),
            },
            ..Self::default()
        }
    }

    pub fn with_project(mut self, project: ProjectContext) -> Self {
        self.project = project;
        self
    }

    pub fn set_variable(&mut self, key: impl Into<String>, value: Value) {
        self.variables.insert(key.into(), value);
    }

    pub fn add_module(&mut self, name: impl Into<String>, module: ModuleInfo) {
        self.modules.insert(name.into(), module);
    }

    pub fn environment_name(&self) -> &str {
        &self.environment.name
    }

    fn resolve_module(&self, rest: &[String]) -> ContextLookup {
        let Some((name, tail)) = rest.split_first() else {
            return ContextLookup::NotPrimitive;
        };
        let Some(module) = self.modules.get(name) else {
            return ContextLookup::NotFound;
        };

        match tail.split_first() {
            None => ContextLookup::NotPrimitive,
            Some((field, [])) if field == "version" => match &module.version {
                Some(v) => ContextLookup::Found(Primitive::String(v.clone())),
                None => ContextLookup::NotFound,
            },
            Some((field, outputs)) if field == "outputs" => lookup_in_map(&module.outputs, outputs),
            Some(_) => ContextLookup::NotFound,
        }
    }
}

impl ConfigContext for ModuleContext {
    fn resolve(&self, path: &[String]) -> ContextLookup {
        let Some((head, rest)) = path.split_first() else {
            return ContextLookup::NotPrimitive;
        };

        match head.as_str() {
            "local" => self.project.resolve(path),
            "environment" => match rest {
                [] => ContextLookup::NotPrimitive,
                [field] if field == "name" => {
                    ContextLookup::Found(Primitive::String(self.environment.name.clone()))
                }
                _ => ContextLookup::NotFound,
            },
            "variables" => lookup_in_map(&self.variables, rest),
            "modules" => self.resolve_module(rest),
            _ => ContextLookup::NotFound,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::key_path;
    use serde_json::json;

    fn module_context() -> ModuleContext {
        let mut ctx = ModuleContext::new("dev");
        ctx.set_variable("replicas", json!(3));
        ctx.set_variable("db", json!({"host": "postgres"}));

        let mut outputs = Map::new();
        outputs.insert("endpoint".to_string(), json!("http://api:8080"));
        ctx.add_module(
            "api",
            ModuleInfo {
                version: Some("v-1a2b3c".to_string()),
                outputs,
            },
        );
        ctx
    }

    #[test]
    fn resolves_environment_name() {
        assert_eq!(
            module_context().resolve(&key_path("environment.name")),
            ContextLookup::Found(Primitive::from("dev"))
        );
    }

    #[test]
    fn resolves_variables() {
        let ctx = module_context();
        assert_eq!(
            ctx.resolve(&key_path("variables.replicas")),
            ContextLookup::Found(Primitive::from(3))
        );
        assert_eq!(
            ctx.resolve(&key_path("variables.db.host")),
            ContextLookup::Found(Primitive::from("postgres"))
        );
        assert_eq!(
            ctx.resolve(&key_path("variables.db")),
            ContextLookup::NotPrimitive
        );
    }

    #[test]
    fn resolves_module_version_and_outputs() {
        let ctx = module_context();
        assert_eq!(
            ctx.resolve(&key_path("modules.api.version")),
            ContextLookup::Found(Primitive::from("v-1a2b3c"))
        );
        assert_eq!(
            ctx.resolve(&key_path("modules.api.outputs.endpoint")),
            ContextLookup::Found(Primitive::from("http://api:8080"))
        );
        assert_eq!(
            ctx.resolve(&key_path("modules.api.outputs")),
            ContextLookup::NotPrimitive
        );
        assert_eq!(
            ctx.resolve(&key_path("modules.api")),
            ContextLookup::NotPrimitive
        );
    }

    #[test]
    fn unknown_module_or_field_is_not_found() {
        let ctx = module_context();
        assert_eq!(
            ctx.resolve(&key_path("modules.web.version")),
            ContextLookup::NotFound
        );
        assert_eq!(
            ctx.resolve(&key_path("modules.api.status")),
            ContextLookup::NotFound
        );
        assert_eq!(ctx.resolve(&key_path("unknown")), ContextLookup::NotFound);
    }

    #[test]
    fn local_falls_through_to_project() {
        let mut env = BTreeMap::new();
        env.insert("TAG".to_string(), "latest".to_string());
        let ctx = module_context().with_project(ProjectContext::new(env, "linux"));

        assert_eq!(
            ctx.resolve(&key_path("local.env.TAG")),
            ContextLookup::Found(Primitive::from("latest"))
        );
    }

    #[test]
    fn deserializes_from_yaml() {
        let yaml = r#"
environment:
  name: staging
variables:
  region: eu-west-1
modules:
  db:
    version: v-abc
    outputs:
      host: db.internal
"#;
        let ctx: ModuleContext = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(ctx.environment_name(), "staging");
        assert_eq!(
            ctx.resolve(&key_path("modules.db.outputs.host")),
            ContextLookup::Found(Primitive::from("db.internal"))
        );
        assert_eq!(
            ctx.resolve(&key_path("variables.region")),
            ContextLookup::Found(Primitive::from("eu-west-1"))
        );
    }
}
