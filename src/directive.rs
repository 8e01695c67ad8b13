//! The `@fn` directive: data model, header parser and source scanner.
//!
//! A directive is `@fn name arg1, arg2=default, ... {`. The scanner finds
//! every `@fn` followed by whitespace; each one must parse as a directive
//! or the whole compile fails — a malformed header is never silently
//! skipped as ordinary text.

use std::fmt;

use crate::error::{ErrorKind, ParseError};
use crate::lex::{self, Lexer};
use crate::value;

/// A validated identifier: `[A-Za-z_][A-Za-z0-9_]*`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name(String);

impl Name {
    /// Validates the whole string as a name.
    pub fn parse(s: &str) -> Option<Name> {
        let bytes = s.as_bytes();
        let (first, rest) = bytes.split_first()?;
        if lex::is_name_start(*first) && rest.iter().all(|&b| lex::is_name_char(b)) {
            Some(Name(s.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One declared parameter. `default` is the exact original source text of
/// the default expression, never evaluated or re-escaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arg {
    pub name: Name,
    pub default: Option<String>,
}

/// A parsed `@fn` header. Argument order is significant: it drives the
/// usage text and the positional order of the hidden implementation
/// function. Duplicate names are not rejected — generated code simply
/// shadows, an accepted quirk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FnDirective {
    pub name: Name,
    pub args: Vec<Arg>,
}

/// A directive located in source text. `start..end` spans from the
/// literal `@fn` through the `{` opening the body; the author's body
/// after the `{` stays where it is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub directive: FnDirective,
    pub start: usize,
    pub end: usize,
}

fn skip_ws(bytes: &[u8], mut i: usize) -> usize {
    while matches!(bytes.get(i), Some(b' ' | b'\t' | b'\r' | b'\n')) {
        i += 1;
    }
    i
}

fn parse_name(lex: &Lexer, pos: usize) -> Result<(Name, usize), ParseError> {
    match lex.name(pos) {
        Some(end) => Ok((Name(lex.src()[pos..end].to_string()), end)),
        None => Err(ParseError::new(pos, ErrorKind::ExpectedName)),
    }
}

/// Parses a directive whose `@fn` literal starts at `start`.
pub fn parse_at(lex: &mut Lexer, start: usize) -> Result<Match, ParseError> {
    let src = lex.src();
    let bytes = src.as_bytes();
    debug_assert!(src[start..].starts_with("@fn"));

    let mut i = skip_ws(bytes, start + 3);
    let (name, end) = parse_name(lex, i)?;
    i = skip_ws(bytes, end);

    let mut args = Vec::new();
    if bytes.get(i).copied().is_some_and(lex::is_name_start) {
        loop {
            let (arg_name, end) = parse_name(lex, i)?;
            i = skip_ws(bytes, end);
            let default = if bytes.get(i) == Some(&b'=') {
                i = skip_ws(bytes, i + 1);
                let end = value::value(lex, i)?;
                let text = src[i..end].to_string();
                i = skip_ws(bytes, end);
                Some(text)
            } else {
                None
            };
            args.push(Arg { name: arg_name, default });
            if bytes.get(i) == Some(&b',') {
                i = skip_ws(bytes, i + 1);
            } else {
                break;
            }
        }
    }

    if bytes.get(i) == Some(&b'{') {
        Ok(Match {
            directive: FnDirective { name, args },
            start,
            end: i + 1,
        })
    } else {
        Err(ParseError::new(i, ErrorKind::ExpectedBrace))
    }
}

/// Finds all directives in `src`, left to right, non-overlapping. An
/// `@fn` not followed by whitespace (e.g. `@fnx`) is ordinary text; an
/// `@fn` followed by whitespace that fails to parse aborts the compile.
pub fn scan(src: &str) -> Result<Vec<Match>, ParseError> {
    let mut lex = Lexer::new(src);
    let mut matches = Vec::new();
    let mut i = 0;
    while let Some(off) = src[i..].find("@fn") {
        let at = i + off;
        if matches!(src.as_bytes().get(at + 3), Some(b' ' | b'\t' | b'\r' | b'\n')) {
            let m = parse_at(&mut lex, at)?;
            i = m.end;
            matches.push(m);
        } else {
            i = at + 3;
        }
    }
    Ok(matches)
}
