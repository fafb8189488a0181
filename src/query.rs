// query.rs

use indexmap::IndexMap;

use crate::error::{DbError, Result};
use crate::row::{Row, Value};

/// Column name to literal. Read as a conjunction of equality tests in WHERE
/// clauses and as a list of assignments in SET clauses.
pub type Predicate = IndexMap<String, Value>;

/// Converts a single literal token into a typed value.
///
/// Precedence: a token wrapped in double quotes yields its inner text,
/// `true`/`false` (any case) yield booleans, all-digit tokens yield integers,
/// anything else is kept verbatim as a string.
pub fn parse_literal(token: &str) -> Value {
    let token = token.trim();
    if token.len() >= 2 && token.starts_with('"') && token.ends_with('"') {
        return Value::Str(unescape(&token[1..token.len() - 1]));
    }
    if token.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if token.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    if !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()) {
        // Out-of-range digit runs fall through to the string case.
        if let Ok(n) = token.parse::<i64>() {
            return Value::Int(n);
        }
    }
    Value::Str(token.to_string())
}

/// Resolves `\"` and `\\` inside a double-quoted literal; other escapes are kept.
fn unescape(inner: &str) -> String {
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some(esc @ ('"' | '\\')) => out.push(esc),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Parses exactly `field = value` into a single-entry predicate.
pub fn parse_condition<S: AsRef<str>>(tokens: &[S]) -> Result<Predicate> {
    match tokens {
        [field, op, value] if op.as_ref() == "=" => {
            let field = unquote(field.as_ref());
            if field.is_empty() {
                return Err(DbError::MalformedCondition);
            }
            let mut predicate = Predicate::new();
            predicate.insert(field.to_string(), parse_literal(value.as_ref()));
            Ok(predicate)
        }
        _ => Err(DbError::MalformedCondition),
    }
}

/// True when every predicate column is present in the row with an equal value.
/// A missing column never matches.
pub fn matches(row: &Row, predicate: &Predicate) -> bool {
    predicate
        .iter()
        .all(|(column, expected)| row.get(column) == Some(expected))
}

/// Strips one pair of surrounding double quotes from an identifier token.
pub fn unquote(token: &str) -> &str {
    if token.len() >= 2 && token.starts_with('"') && token.ends_with('"') {
        &token[1..token.len() - 1]
    } else {
        token
    }
}
