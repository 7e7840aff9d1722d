//! Template resolution - `${...}` expressions in configuration values
//!
//! Three entry points:
//! - [`resolve_template_string`]: one string against a context
//! - [`resolve_template_strings`]: every string in a configuration tree
//! - [`collect_template_references`]: key paths a tree depends on (no context)
//!
//! A string that is exactly one `${...}` span returns the typed value
//! (number stays number). Any other string is resolved by splicing the
//! textual form of each span back into the surrounding text.

pub mod expression;
pub mod lexer;
mod references;

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, instrument, trace};

use crate::context::ConfigContext;
use crate::error::TemplateError;
use crate::value::Primitive;

pub use expression::Expression;
pub use lexer::Token;
pub use references::{collect_template_references, Reference};

/// Options controlling template resolution
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResolveOptions {
    /// Resolve missing keys to undefined instead of failing
    pub allow_undefined: bool,
}

impl ResolveOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allow_undefined(mut self, allow: bool) -> Self {
        self.allow_undefined = allow;
        self
    }
}

/// Parse the expression of one scanned span, attaching the raw span text to syntax errors
pub(crate) fn parse_span(
    input: &str,
    span: &std::ops::Range<usize>,
    inner: &std::ops::Range<usize>,
) -> Result<Expression, TemplateError> {
    expression::parse(&input[inner.clone()])
        .map_err(|reason| TemplateError::syntax(&input[span.clone()], reason))
}

/// Resolve all `${...}` expressions in `input`.
///
/// Returns `Ok(None)` only for a whole-string template that resolved to
/// undefined under `allow_undefined`.
#[instrument(level = "trace", skip(context, options))]
pub fn resolve_template_string(
    input: &str,
    context: &dyn ConfigContext,
    options: &ResolveOptions,
) -> Result<Option<Primitive>, TemplateError> {
    // Early return: nothing to resolve
    if !lexer::has_template(input) {
        return Ok(Some(Primitive::String(input.to_string())));
    }

    let tokens = lexer::scan(input)?;

    // Whole-string template: typed pass-through
    if let [Token::Expression { span, inner }] = tokens.as_slice() {
        if span.start == 0 && span.end == input.len() {
            let expr = parse_span(input, span, inner)?;
            let value = expr.evaluate(context, options)?;
            trace!(?value, "resolved whole-string template");
            return Ok(value);
        }
    }

    // Embedded templates: collect segments, join once
    let mut parts: Vec<String> = Vec::with_capacity(tokens.len());
    for token in &tokens {
        match token {
            Token::Literal(range) => parts.push(input[range.clone()].to_string()),
            Token::Expression { span, inner } => {
                let expr = parse_span(input, span, inner)?;
                let text = expr
                    .evaluate(context, options)?
                    .map(|v| v.to_template_string())
                    .unwrap_or_default();
                parts.push(text);
            }
        }
    }

    Ok(Some(Primitive::String(parts.concat())))
}

/// Resolve every string value in a configuration tree.
///
/// Mapping keys, sequence order and non-string scalars are untouched. The
/// first error aborts the whole call. An undefined result inside a tree
/// becomes `null` so the mapping keeps its key.
#[instrument(level = "debug", skip_all)]
pub fn resolve_template_strings(
    tree: &Value,
    context: &dyn ConfigContext,
    options: &ResolveOptions,
) -> Result<Value, TemplateError> {
    let resolved = resolve_value(tree, context, options)?;
    debug!("resolved configuration tree");
    Ok(resolved)
}

fn resolve_value(
    value: &Value,
    context: &dyn ConfigContext,
    options: &ResolveOptions,
) -> Result<Value, TemplateError> {
    match value {
        Value::String(s) => Ok(resolve_template_string(s, context, options)?
            .map(Primitive::into_value)
            .unwrap_or(Value::Null)),
        Value::Array(items) => items
            .iter()
            .map(|item| resolve_value(item, context, options))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        Value::Object(map) => {
            let mut out = Map::with_capacity(map.len());
            for (key, item) in map {
                out.insert(key.clone(), resolve_value(item, context, options)?);
            }
            Ok(Value::Object(out))
        }
        other => Ok(other.clone()),
    }
}
