//! Loading configuration trees and contexts from disk
//!
//! YAML is a superset of JSON, so both formats go through `serde_yaml`.

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::context::ModuleContext;
use crate::error::DeckhandError;

/// Output format for rendered trees
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

impl std::str::FromStr for OutputFormat {
    type Err = DeckhandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            other => Err(DeckhandError::Config(format!(
                "Unknown output format '{other}' (expected json or yaml)"
            ))),
        }
    }
}

/// Parse a YAML or JSON document into a configuration tree
pub fn parse_tree(text: &str) -> Result<Value, DeckhandError> {
    Ok(serde_yaml::from_str(text)?)
}

/// Read a configuration tree from a file
pub fn load_tree(path: &Path) -> Result<Value, DeckhandError> {
    let text = fs::read_to_string(path)?;
    let tree = parse_tree(&text)?;
    debug!(path = %path.display(), "loaded configuration tree");
    Ok(tree)
}

/// Read a module context file (`environment`, `variables`, `modules`)
pub fn load_module_context(path: &Path) -> Result<ModuleContext, DeckhandError> {
    let text = fs::read_to_string(path)?;
    let raw: Value = serde_yaml::from_str(&text)?;

    // An empty file parses as null
    if raw.is_null() {
        return Ok(ModuleContext::default());
    }
    if !raw.is_object() {
        return Err(DeckhandError::Config(format!(
            "{} is not a mapping",
            path.display()
        )));
    }

    Ok(serde_json::from_value(raw)?)
}

/// Render a tree in the requested format
pub fn render(tree: &Value, format: OutputFormat) -> Result<String, DeckhandError> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(tree)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(tree)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{key_path, ConfigContext, ContextLookup};
    use crate::value::Primitive;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn parse_yaml_and_json() {
        assert_eq!(parse_tree("a: ${b}\n").unwrap(), json!({"a": "${b}"}));
        assert_eq!(parse_tree(r#"{"a": [1, 2]}"#).unwrap(), json!({"a": [1, 2]}));
    }

    #[test]
    fn parse_yaml_keeps_key_order() {
        let tree = parse_tree("z: 1\na: 2\nm: 3\n").unwrap();
        let keys: Vec<&String> = tree.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn output_format_from_str() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("YML".parse::<OutputFormat>().unwrap(), OutputFormat::Yaml);
        assert!("toml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn load_context_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "environment:\n  name: prod\nvariables:\n  port: 8080").unwrap();

        let ctx = load_module_context(file.path()).unwrap();
        assert_eq!(ctx.environment_name(), "prod");
        assert_eq!(
            ctx.resolve(&key_path("variables.port")),
            ContextLookup::Found(Primitive::from(8080))
        );
    }

    #[test]
    fn load_context_rejects_non_mapping() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "- a\n- b").unwrap();

        let err = load_module_context(file.path()).unwrap_err();
        assert!(matches!(err, DeckhandError::Config(_)));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = load_tree(Path::new("/definitely/not/here.yaml")).unwrap_err();
        assert!(matches!(err, DeckhandError::Io(_)));
    }

    #[test]
    fn render_yaml() {
        let out = render(&json!({"a": 1}), OutputFormat::Yaml).unwrap();
        assert_eq!(out.trim(), "a: 1");
    }
}
