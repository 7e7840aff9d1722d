//! Primitive values produced by template expressions
//!
//! Configuration trees are plain `serde_json::Value`s. A template expression
//! may only ever resolve to one of the four primitive tags; mappings and
//! sequences are rejected structurally through [`Primitive::from_value`].

use std::fmt;

use serde_json::{Number, Value};

/// A string, number, boolean or null
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
}

impl Primitive {
    /// Convert a tree value, returning `None` for mappings and sequences
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(Primitive::Null),
            Value::Bool(b) => Some(Primitive::Bool(*b)),
            Value::Number(n) => Some(Primitive::Number(n.clone())),
            Value::String(s) => Some(Primitive::String(s.clone())),
            Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// Textual form used when a value is spliced into surrounding text
    ///
    /// `null` → `"null"`, booleans → `"true"`/`"false"`, numbers → decimal.
    pub fn to_template_string(&self) -> String {
        match self {
            Primitive::Null => "null".to_string(),
            Primitive::Bool(b) => b.to_string(),
            Primitive::Number(n) => n.to_string(),
            Primitive::String(s) => s.clone(),
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            Primitive::Null => Value::Null,
            Primitive::Bool(b) => Value::Bool(b),
            Primitive::Number(n) => Value::Number(n),
            Primitive::String(s) => Value::String(s),
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_template_string())
    }
}

impl From<&str> for Primitive {
    fn from(s: &str) -> Self {
        Primitive::String(s.to_string())
    }
}

impl From<String> for Primitive {
    fn from(s: String) -> Self {
        Primitive::String(s)
    }
}

impl From<bool> for Primitive {
    fn from(b: bool) -> Self {
        Primitive::Bool(b)
    }
}

impl From<i64> for Primitive {
    fn from(n: i64) -> Self {
        Primitive::Number(n.into())
    }
}

impl From<Primitive> for Value {
    fn from(p: Primitive) -> Self {
        p.into_value()
    }
}
