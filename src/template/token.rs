//! `{{...}}` token scanning.
//!
//! Tokens look like `{{name}}` or `{{name:arg1,arg2|key=val}}`. The
//! argument surface is deliberately loose: segments after the name separate
//! on `:` or `|`; items with `=` become key/value entries, bare items are
//! positional. A comma inside a value (e.g. `default=name DESC, id ASC`)
//! stays with its key.

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_until},
    character::complete::{alpha1, alphanumeric1},
    combinator::recognize,
    multi::many0_count,
    sequence::delimited,
};

/// A parsed template token: name, positional args, ordered key/value map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateToken {
    pub name: String,
    pub args: Vec<String>,
    pub kv: Vec<(String, String)>,
}

impl TemplateToken {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.kv
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    pub fn first_arg(&self) -> Option<&str> {
        self.args.first().map(|s| s.as_str())
    }

    pub fn has_arg(&self, arg: &str) -> bool {
        self.args.iter().any(|a| a.eq_ignore_ascii_case(arg))
    }
}

/// One piece of a scanned template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Piece<'a> {
    /// Literal text between tokens.
    Text(&'a str),
    /// A well-formed token plus its raw source text.
    Token(TemplateToken, &'a str),
    /// Unterminated or unparseable token text, kept verbatim.
    Malformed(&'a str),
}

/// `{{ body }}`, returning the body.
fn delimited_token(input: &str) -> IResult<&str, &str> {
    delimited(tag("{{"), take_until("}}"), tag("}}")).parse(input)
}

/// Token name: identifier of letters, digits, underscores.
fn token_name(input: &str) -> IResult<&str, &str> {
    recognize((alpha1, many0_count(alt((alphanumeric1, tag("_")))))).parse(input)
}

/// Parse a token body. `None` means malformed (empty name, bad separator).
pub(crate) fn parse_body(body: &str) -> Option<TemplateToken> {
    let trimmed = body.trim();
    let (rest, name) = token_name(trimmed).ok()?;

    let mut token = TemplateToken {
        name: name.to_string(),
        args: Vec::new(),
        kv: Vec::new(),
    };

    if rest.is_empty() {
        return Some(token);
    }
    let arg_str = rest.strip_prefix(':')?;

    for group in arg_str.split(|c| c == ':' || c == '|') {
        if group.contains('=') {
            for item in group.split(',') {
                match item.split_once('=') {
                    Some((key, value)) => token
                        .kv
                        .push((key.trim().to_string(), value.trim().to_string())),
                    None => {
                        // Comma belonged to the previous value.
                        if let Some(last) = token.kv.last_mut() {
                            last.1.push_str(", ");
                            last.1.push_str(item.trim());
                        }
                    }
                }
            }
        } else {
            token.args.extend(
                group
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from),
            );
        }
    }
    Some(token)
}

/// Split a template into pieces, left to right, single pass.
pub(crate) fn scan(template: &str) -> Vec<Piece<'_>> {
    let mut pieces = Vec::new();
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        if start > 0 {
            pieces.push(Piece::Text(&rest[..start]));
        }
        let candidate = &rest[start..];
        match delimited_token(candidate) {
            Ok((after, body)) => {
                let raw = &candidate[..candidate.len() - after.len()];
                match parse_body(body) {
                    Some(token) => pieces.push(Piece::Token(token, raw)),
                    None => pieces.push(Piece::Malformed(raw)),
                }
                rest = after;
            }
            Err(_) => {
                // No closing braces; the remainder is one malformed piece.
                pieces.push(Piece::Malformed(candidate));
                rest = "";
            }
        }
    }
    if !rest.is_empty() {
        pieces.push(Piece::Text(rest));
    }
    pieces
}
