//! Reference collection - key paths used by templates in a tree
//!
//! Feeds dependency ordering: no context is needed and nothing is evaluated,
//! so only syntax errors can surface here.

use std::collections::BTreeSet;

use serde_json::Value;
use tracing::{debug, instrument};

use crate::error::TemplateError;

use super::lexer::{self, Token};
use super::parse_span;

/// A key path split on `.`
pub type Reference = Vec<String>;

/// Collect every distinct key path referenced by templates in `tree`.
///
/// Sorted segment by segment, independent of traversal order.
#[instrument(level = "debug", skip_all)]
pub fn collect_template_references(tree: &Value) -> Result<Vec<Reference>, TemplateError> {
    let mut found = BTreeSet::new();
    collect_value(tree, &mut found)?;
    debug!(count = found.len(), "collected template references");
    Ok(found.into_iter().collect())
}

fn collect_value(value: &Value, found: &mut BTreeSet<Reference>) -> Result<(), TemplateError> {
    match value {
        Value::String(s) => collect_string(s, found),
        Value::Array(items) => items.iter().try_for_each(|item| collect_value(item, found)),
        Value::Object(map) => map.values().try_for_each(|item| collect_value(item, found)),
        _ => Ok(()),
    }
}

fn collect_string(input: &str, found: &mut BTreeSet<Reference>) -> Result<(), TemplateError> {
    if !lexer::has_template(input) {
        return Ok(());
    }

    for token in lexer::scan(input)? {
        if let Token::Expression { span, inner } = token {
            let expr = parse_span(input, &span, &inner)?;
            for path in expr.references() {
                if !found.contains(path) {
                    found.insert(path.to_vec());
                }
            }
        }
    }

    Ok(())
}
