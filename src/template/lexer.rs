//! Template span scanner
//!
//! Splits a string into literal text and `${...}` spans in a single pass.
//! Inside a span, quoted literals are skipped so that braces inside them
//! do not close the span. A second `${` outside a quote is rejected.

use std::ops::Range;

use crate::error::TemplateError;

/// Token representing a scanned template fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Literal text (range in original string)
    Literal(Range<usize>),
    /// `${...}` span; `span` covers the delimiters, `inner` only the expression
    Expression {
        span: Range<usize>,
        inner: Range<usize>,
    },
}

/// Scan `input` into literal and expression tokens
pub fn scan(input: &str) -> Result<Vec<Token>, TemplateError> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut literal_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if !opens_template(bytes, i) {
            i += 1;
            continue;
        }

        let start = i;
        let end = find_close(input, start)?;

        if start > literal_start {
            tokens.push(Token::Literal(literal_start..start));
        }
        tokens.push(Token::Expression {
            span: start..end + 1,
            inner: start + 2..end,
        });

        i = end + 1;
        literal_start = i;
    }

    if literal_start < bytes.len() {
        tokens.push(Token::Literal(literal_start..bytes.len()));
    }

    Ok(tokens)
}

/// Quick check used as the no-op fast path
pub fn has_template(input: &str) -> bool {
    input.contains("${")
}

#[inline]
fn opens_template(bytes: &[u8], i: usize) -> bool {
    bytes[i] == b'$' && bytes.get(i + 1) == Some(&b'{')
}

/// Find the byte index of the `}` closing the span opened at `start`
fn find_close(input: &str, start: usize) -> Result<usize, TemplateError> {
    let bytes = input.as_bytes();
    let mut quote: Option<u8> = None;
    let mut i = start + 2;

    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(_) if b == b'\\' => i += 2,
            Some(q) => {
                // An unescaped opposite quote means this run is not a quoted
                // literal; braces after it are matched normally.
                if b == q || b == opposite_quote(q) {
                    quote = None;
                }
                i += 1;
            }
            None => match b {
                b'\'' | b'"' => {
                    quote = Some(b);
                    i += 1;
                }
                b'$' if bytes.get(i + 1) == Some(&b'{') => {
                    return Err(TemplateError::syntax(
                        nested_extent(input, start),
                        "nested template expressions are not allowed",
                    ));
                }
                b'}' => return Ok(i),
                _ => i += 1,
            },
        }
    }

    let reason = if quote.is_some() {
        "unterminated string literal"
    } else {
        "unterminated template string"
    };
    Err(TemplateError::syntax(&input[start..], reason))
}

#[inline]
fn opposite_quote(q: u8) -> u8 {
    if q == b'\'' {
        b'"'
    } else {
        b'\''
    }
}

/// Raw text of a span containing nested `${`, up to its balanced close
fn nested_extent(input: &str, start: usize) -> &str {
    let bytes = input.as_bytes();
    let mut depth = 0usize;
    let mut i = start;

    while i < bytes.len() {
        if opens_template(bytes, i) {
            depth += 1;
            i += 2;
            continue;
        }
        if bytes[i] == b'}' {
            depth -= 1;
            if depth == 0 {
                return &input[start..=i];
            }
        }
        i += 1;
    }

    &input[start..]
}
