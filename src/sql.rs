// sql.rs
//! Turns command lines into the structured arguments the table engine takes.
//!
//! Lines are split with shell-like rules first (see [`tokenize`]); each command
//! parser then checks keyword positions and hands value tokens to
//! [`parse_literal`].

use std::collections::VecDeque;

use crate::error::{DbError, Result};
use crate::query::{Predicate, parse_condition, parse_literal, unquote};
use crate::row::Value;

/// Arguments of `insert into <table> values (v1, v2, ...)`.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertCommand {
    pub table: String,
    pub values: Vec<Value>,
}

/// Arguments of `select from <table> [where field = value]`.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectCommand {
    pub table: String,
    pub filter: Option<Predicate>,
}

/// Arguments of `update <table> set field = value where field = value`.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateCommand {
    pub table: String,
    pub set: Predicate,
    pub filter: Predicate,
}

/// Arguments of `delete from <table> where field = value`.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteCommand {
    pub table: String,
    pub filter: Predicate,
}

/// Splits a command line into tokens.
///
/// Whitespace separates tokens. Single quotes group text literally and are
/// removed. A backslash escapes the next character. Double quotes group text
/// but stay in the token, together with any backslash escapes inside them, so
/// `"42"` can later be told apart from `42`.
pub fn tokenize(src: &str) -> Result<Vec<String>> {
    Lexer::new(src).tokens()
}

struct Lexer {
    src: VecDeque<char>,
}

impl Lexer {
    fn new(src: &str) -> Self {
        Lexer {
            src: src.chars().collect(),
        }
    }

    fn walk(&mut self) -> Option<char> {
        self.src.pop_front()
    }

    fn tokens(mut self) -> Result<Vec<String>> {
        let mut tokens = Vec::new();
        let mut current = String::new();
        let mut started = false;

        while let Some(ch) = self.walk() {
            match ch {
                _ if ch.is_whitespace() => {
                    if started {
                        tokens.push(std::mem::take(&mut current));
                        started = false;
                    }
                }
                '\'' => {
                    self.lex_single(&mut current)?;
                    started = true;
                }
                '"' => {
                    self.lex_double(&mut current)?;
                    started = true;
                }
                '\\' => {
                    let esc = self
                        .walk()
                        .ok_or_else(|| DbError::SyntaxError("no character after '\\'".into()))?;
                    current.push(esc);
                    started = true;
                }
                _ => {
                    current.push(ch);
                    started = true;
                }
            }
        }
        if started {
            tokens.push(current);
        }
        Ok(tokens)
    }

    fn lex_single(&mut self, out: &mut String) -> Result<()> {
        while let Some(ch) = self.walk() {
            if ch == '\'' {
                return Ok(());
            }
            out.push(ch);
        }
        Err(DbError::SyntaxError("unterminated quoted string".into()))
    }

    fn lex_double(&mut self, out: &mut String) -> Result<()> {
        out.push('"');
        while let Some(ch) = self.walk() {
            match ch {
                '"' => {
                    out.push('"');
                    return Ok(());
                }
                // Escapes stay in the token; `parse_literal` resolves them.
                '\\' => match self.walk() {
                    Some(esc) => {
                        out.push('\\');
                        out.push(esc);
                    }
                    None => break,
                },
                _ => out.push(ch),
            }
        }
        Err(DbError::SyntaxError("unterminated quoted string".into()))
    }
}

/// Parses `name:type` tokens into `(name, type)` pairs.
pub fn parse_column_specs<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<(String, String)>> {
    tokens
        .iter()
        .map(|token| {
            let raw = unquote(token.as_ref());
            let mut parts = raw.split(':');
            match (parts.next(), parts.next(), parts.next()) {
                (Some(name), Some(col_type), None)
                    if !name.trim().is_empty() && !col_type.trim().is_empty() =>
                {
                    Ok((name.trim().to_string(), col_type.trim().to_string()))
                }
                _ => Err(DbError::MalformedColumnSpec(raw.to_string())),
            }
        })
        .collect()
}

pub fn parse_insert_command(text: &str) -> Result<InsertCommand> {
    let tokens = tokenize(text)?;
    let usage = || {
        DbError::SyntaxError("use: insert into <table> values (<value1>, <value2>, ...)".into())
    };

    if tokens.len() < 4
        || !tokens[0].eq_ignore_ascii_case("insert")
        || !tokens[1].eq_ignore_ascii_case("into")
    {
        return Err(usage());
    }

    // `values(1,` arrives as one token; keep whatever follows the keyword.
    let keyword = &tokens[3];
    match keyword.get(..6) {
        Some(head) if head.eq_ignore_ascii_case("values") => {}
        _ => return Err(usage()),
    }
    let rest = &keyword[6..];
    if !rest.is_empty() && !rest.starts_with('(') {
        return Err(usage());
    }

    let values: Vec<Value> = std::iter::once(rest)
        .chain(tokens[4..].iter().map(String::as_str))
        .flat_map(split_values)
        .map(|v| v.trim_matches(['(', ')', ',']))
        .filter(|v| !v.is_empty())
        .map(parse_literal)
        .collect();

    if values.is_empty() {
        return Err(usage());
    }

    Ok(InsertCommand {
        table: unquote(&tokens[2]).to_string(),
        values,
    })
}

pub fn parse_select_command(text: &str) -> Result<SelectCommand> {
    let tokens = tokenize(text)?;
    let usage =
        || DbError::SyntaxError("use: select from <table> [where <column> = <value>]".into());

    if tokens.len() < 3
        || !tokens[0].eq_ignore_ascii_case("select")
        || !tokens[1].eq_ignore_ascii_case("from")
    {
        return Err(usage());
    }

    let filter = match find_keyword(&tokens, "where", 3) {
        Some(3) => Some(parse_condition(&tokens[4..])?),
        Some(_) => return Err(usage()),
        None if tokens.len() > 3 => return Err(usage()),
        None => None,
    };

    Ok(SelectCommand {
        table: unquote(&tokens[2]).to_string(),
        filter,
    })
}

pub fn parse_update_command(text: &str) -> Result<UpdateCommand> {
    let tokens = tokenize(text)?;
    let usage = || {
        DbError::SyntaxError(
            "use: update <table> set <column> = <value> where <column> = <value>".into(),
        )
    };

    if tokens.len() < 2 || !tokens[0].eq_ignore_ascii_case("update") {
        return Err(usage());
    }
    let set_idx = find_keyword(&tokens, "set", 2).ok_or_else(usage)?;
    let where_idx = find_keyword(&tokens, "where", set_idx + 1).ok_or_else(usage)?;
    if set_idx != 2 {
        return Err(usage());
    }

    Ok(UpdateCommand {
        table: unquote(&tokens[1]).to_string(),
        set: parse_condition(&tokens[set_idx + 1..where_idx])?,
        filter: parse_condition(&tokens[where_idx + 1..])?,
    })
}

pub fn parse_delete_command(text: &str) -> Result<DeleteCommand> {
    let tokens = tokenize(text)?;
    let usage =
        || DbError::SyntaxError("use: delete from <table> where <column> = <value>".into());

    if tokens.len() < 3
        || !tokens[0].eq_ignore_ascii_case("delete")
        || !tokens[1].eq_ignore_ascii_case("from")
    {
        return Err(usage());
    }
    if find_keyword(&tokens, "where", 3) != Some(3) {
        return Err(usage());
    }

    Ok(DeleteCommand {
        table: unquote(&tokens[2]).to_string(),
        filter: parse_condition(&tokens[4..])?,
    })
}

/// Case-insensitive scan for a bare keyword at or after `from`.
fn find_keyword(tokens: &[String], keyword: &str, from: usize) -> Option<usize> {
    tokens
        .iter()
        .enumerate()
        .skip(from)
        .find(|(_, t)| t.eq_ignore_ascii_case(keyword))
        .map(|(i, _)| i)
}

/// Splits a value token on commas that sit outside double quotes.
fn split_values(token: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut in_quotes = false;
    let mut escaped = false;
    let mut start = 0;
    for (i, ch) in token.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                parts.push(&token[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&token[start..]);
    parts
}
