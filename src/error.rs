//! Error types with fix suggestions

use thiserror::Error;

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

/// Errors raised while scanning, parsing or evaluating template expressions.
///
/// Every variant carries enough text to point at the offending input:
/// syntax errors keep the raw `${...}` substring verbatim, lookup errors
/// keep the dot-joined key path.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Invalid template string ({template}): {reason}")]
    Syntax { template: String, reason: String },

    #[error("Could not find key: {path}")]
    MissingKey { path: String },

    #[error(
        "Config value at {path} exists but is not a primitive (string, number, boolean or null)"
    )]
    NotPrimitive { path: String },
}

impl TemplateError {
    pub(crate) fn syntax(template: impl Into<String>, reason: impl Into<String>) -> Self {
        TemplateError::Syntax {
            template: template.into(),
            reason: reason.into(),
        }
    }

    /// True for malformed template text (as opposed to lookup failures)
    pub fn is_syntax(&self) -> bool {
        matches!(self, TemplateError::Syntax { .. })
    }
}

impl FixSuggestion for TemplateError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            TemplateError::Syntax { .. } => Some(
                "Check template syntax: ${key.path}, ${a || b || 'default'}, quotes must be closed",
            ),
            TemplateError::MissingKey { .. } => {
                Some("Define the key in the context, or add a fallback: ${key || 'default'}")
            }
            TemplateError::NotPrimitive { .. } => {
                Some("Reference a nested field instead of the whole mapping or list")
            }
        }
    }
}

/// Crate-level error: engine failures plus the file/config plumbing around them
#[derive(Error, Debug)]
pub enum DeckhandError {
    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),
}

impl FixSuggestion for DeckhandError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            DeckhandError::Template(e) => e.fix_suggestion(),
            DeckhandError::YamlParse(_) => Some("Check YAML syntax: indentation and quoting"),
            DeckhandError::Json(_) => None,
            DeckhandError::Io(_) => Some("Check file path and permissions"),
            DeckhandError::Config(_) => Some("Context files must be a YAML/JSON mapping"),
        }
    }
}
