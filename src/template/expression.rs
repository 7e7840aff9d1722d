//! Template expression parsing and evaluation
//!
//! Grammar (content between `${` and `}`):
//!
//! ```text
//! expr := alt ( "||" alt )*
//! alt  := quoted | number | "true" | "false" | "null" | name ( "." name )*
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Number;
use tracing::trace;

use crate::context::{ConfigContext, ContextLookup};
use crate::error::TemplateError;
use crate::value::Primitive;

use super::ResolveOptions;

/// Leading key segment
static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_\-]*$").expect("valid name regex"));

/// Any later key segment (may start with a digit, e.g. `outputs.0`)
static SEGMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_\-]*$").expect("valid segment regex"));

static NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?[0-9]+(\.[0-9]+)?$").expect("valid number regex"));

/// Parsed template expression
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Dotted key path: `a.b.c`
    Identifier(Vec<String>),
    /// Quoted string, number, boolean or null
    Literal(Primitive),
    /// `a || b || 'default'` (at least two alternatives)
    Conditional(Vec<Expression>),
}

impl Expression {
    /// Every key path referenced, left to right
    pub fn references(&self) -> Vec<&[String]> {
        match self {
            Expression::Identifier(path) => vec![path.as_slice()],
            Expression::Literal(_) => Vec::new(),
            Expression::Conditional(alternatives) => alternatives
                .iter()
                .flat_map(Expression::references)
                .collect(),
        }
    }

    /// Evaluate against `context`.
    ///
    /// `Ok(None)` is the undefined outcome and is only returned when
    /// `options.allow_undefined` is set.
    pub fn evaluate(
        &self,
        context: &dyn ConfigContext,
        options: &ResolveOptions,
    ) -> Result<Option<Primitive>, TemplateError> {
        let value = self.evaluate_defined(context)?;
        if value.is_none() && !options.allow_undefined {
            return Err(TemplateError::MissingKey {
                path: self.display_path(),
            });
        }
        Ok(value)
    }

    /// Evaluate, mapping a missing key to `None` instead of an error
    fn evaluate_defined(
        &self,
        context: &dyn ConfigContext,
    ) -> Result<Option<Primitive>, TemplateError> {
        match self {
            Expression::Literal(value) => Ok(Some(value.clone())),
            Expression::Identifier(path) => match context.resolve(path) {
                ContextLookup::Found(value) => Ok(Some(value)),
                ContextLookup::NotPrimitive => Err(TemplateError::NotPrimitive {
                    path: path.join("."),
                }),
                ContextLookup::NotFound => Ok(None),
            },
            Expression::Conditional(alternatives) => {
                for alt in alternatives {
                    if let Some(value) = alt.evaluate_defined(context)? {
                        return Ok(Some(value));
                    }
                    trace!(alternative = %alt.display_path(), "conditional alternative undefined");
                }
                Ok(None)
            }
        }
    }

    /// Human readable form used in missing-key errors
    fn display_path(&self) -> String {
        match self {
            Expression::Identifier(path) => path.join("."),
            Expression::Literal(value) => value.to_template_string(),
            Expression::Conditional(alternatives) => alternatives
                .iter()
                .map(Expression::display_path)
                .collect::<Vec<_>>()
                .join(" || "),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Lexeme {
    Path(Vec<String>),
    Value(Primitive),
    Or,
}

/// Parse the inner text of a `${...}` span.
///
/// Errors are plain reasons; the caller attaches the raw span text.
pub fn parse(source: &str) -> Result<Expression, String> {
    let lexemes = tokenize(source)?;

    if lexemes.is_empty() {
        return Err("empty expression".to_string());
    }

    let mut alternatives = Vec::new();
    let mut expect_operand = true;

    for lexeme in lexemes {
        let operand = match lexeme {
            Lexeme::Or if expect_operand => return Err("unexpected '||'".to_string()),
            Lexeme::Or => {
                expect_operand = true;
                continue;
            }
            Lexeme::Path(path) => Expression::Identifier(path),
            Lexeme::Value(value) => Expression::Literal(value),
        };

        if !expect_operand {
            return Err(format!(
                "expected '||' before '{}'",
                operand.display_path()
            ));
        }
        alternatives.push(operand);
        expect_operand = false;
    }

    if expect_operand {
        return Err("dangling '||'".to_string());
    }

    if alternatives.len() == 1 {
        Ok(alternatives.remove(0))
    } else {
        Ok(Expression::Conditional(alternatives))
    }
}

fn tokenize(source: &str) -> Result<Vec<Lexeme>, String> {
    let mut lexemes = Vec::new();
    let mut chars = source.char_indices().peekable();

    while let Some(&(start, ch)) = chars.peek() {
        match ch {
            c if c.is_whitespace() => {
                chars.next();
            }
            '|' => {
                chars.next();
                match chars.next() {
                    Some((_, '|')) => lexemes.push(Lexeme::Or),
                    _ => return Err("unexpected character '|'".to_string()),
                }
            }
            '\'' | '"' => {
                chars.next();
                lexemes.push(Lexeme::Value(Primitive::String(read_quoted(
                    &mut chars, ch,
                )?)));
            }
            c if c.is_ascii_digit() || c == '-' => {
                let end = take_word(&mut chars, start);
                let word = &source[start..end];
                lexemes.push(Lexeme::Value(parse_number(word)?));
            }
            c if c.is_alphabetic() || c == '_' => {
                let end = take_word(&mut chars, start);
                lexemes.push(parse_word(&source[start..end])?);
            }
            other => return Err(format!("unexpected character '{other}'")),
        }
    }

    Ok(lexemes)
}

/// Consume a run of identifier/number characters, returning its end offset
fn take_word(
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
    start: usize,
) -> usize {
    let mut end = start;
    while let Some(&(i, c)) = chars.peek() {
        if c.is_alphanumeric() || matches!(c, '_' | '-' | '.') {
            end = i + c.len_utf8();
            chars.next();
        } else {
            break;
        }
    }
    end
}

fn read_quoted(
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
    quote: char,
) -> Result<String, String> {
    let mut out = String::new();

    while let Some((_, c)) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some((_, 'n')) => out.push('\n'),
                Some((_, 't')) => out.push('\t'),
                Some((_, 'r')) => out.push('\r'),
                Some((_, escaped)) => out.push(escaped),
                None => break,
            },
            c if c == quote => return Ok(out),
            '\'' | '"' => return Err(format!("unescaped {c} inside quoted literal")),
            c => out.push(c),
        }
    }

    Err("unterminated string literal".to_string())
}

fn parse_number(word: &str) -> Result<Primitive, String> {
    let invalid = || format!("invalid number literal '{word}'");

    if !NUMBER_RE.is_match(word) {
        return Err(invalid());
    }

    let number = if word.contains('.') {
        let f = word.parse::<f64>().map_err(|_| invalid())?;
        // Whole-valued decimals print without a fraction: `1.0` -> `1`
        if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
            Number::from(f as i64)
        } else {
            Number::from_f64(f).ok_or_else(invalid)?
        }
    } else if let Ok(n) = word.parse::<i64>() {
        Number::from(n)
    } else {
        // Integers beyond i64 fall back to floating point
        word.parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .ok_or_else(invalid)?
    };

    Ok(Primitive::Number(number))
}

fn parse_word(word: &str) -> Result<Lexeme, String> {
    match word {
        "true" => return Ok(Lexeme::Value(Primitive::Bool(true))),
        "false" => return Ok(Lexeme::Value(Primitive::Bool(false))),
        "null" => return Ok(Lexeme::Value(Primitive::Null)),
        _ => {}
    }

    let segments: Vec<&str> = word.split('.').collect();
    let valid = segments
        .iter()
        .enumerate()
        .all(|(i, s)| if i == 0 { NAME_RE.is_match(s) } else { SEGMENT_RE.is_match(s) });

    if !valid {
        return Err(format!("invalid key path '{word}'"));
    }

    Ok(Lexeme::Path(segments.into_iter().map(str::to_string).collect()))
}
