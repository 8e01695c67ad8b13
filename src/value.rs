//! Default-value token sequences for `@fn` parameters.
//!
//! A value is one or more concatenated tokens: quoted strings, capturing
//! subshells, variables, runs of plain characters, or a bare trailing
//! `$`. The matched span is kept — the directive layer splices the
//! original text verbatim into generated code, so shell expansions in a
//! default are evaluated at call time, not compile time.

use crate::error::{ErrorKind, ParseError};
use crate::lex::Lexer;

/// Characters that terminate a plain run: whitespace, quote/substitution
/// introducers, and the directive delimiters.
fn is_plain(b: u8) -> bool {
    !matches!(
        b,
        b' ' | b'\t' | b'\r' | b'\n'
            | b'"' | b'\'' | b'`' | b'$'
            | b';' | b',' | b'{' | b'(' | b'[' | b'#' | b'!' | b'&' | b'<' | b'>' | b'|'
    )
}

/// Matches a default value starting at `pos`, returning the end offset of
/// the last token.
///
/// The token sequence ends at the first position matching no alternative
/// (typically `,`, whitespace or `{`). Zero tokens is `ExpectedValue`; a
/// quote or substitution opener with no closing delimiter is a hard error
/// at the opener's offset.
pub fn value(lex: &mut Lexer, pos: usize) -> Result<usize, ParseError> {
    let bytes = lex.src().as_bytes();
    let mut i = pos;
    loop {
        match bytes.get(i) {
            Some(&b'\'') => match lex.single_quoted(i) {
                Some(end) => i = end,
                None => return Err(ParseError::new(i, ErrorKind::UnterminatedSingleQuote)),
            },
            Some(&b'"') => match lex.double_quoted(i) {
                Some(end) => i = end,
                None => return Err(ParseError::new(i, ErrorKind::UnterminatedDoubleQuote)),
            },
            Some(&b'`') => match lex.backtick_subshell(i) {
                Some(end) => i = end,
                None => return Err(ParseError::new(i, ErrorKind::UnterminatedBacktick)),
            },
            Some(&b'$') => match bytes.get(i + 1) {
                Some(&b'(') => match lex.paren_subshell(i) {
                    Some(end) => i = end,
                    None => return Err(ParseError::new(i, ErrorKind::UnterminatedSubshell)),
                },
                Some(&b'{') => match lex.expanded_variable(i) {
                    Some(end) => i = end,
                    None => return Err(ParseError::new(i, ErrorKind::UnterminatedVariable)),
                },
                _ => match lex.simple_variable(i) {
                    Some(end) => i = end,
                    // A bare `$` is a token only at end-of-input or
                    // end-of-line.
                    None => match bytes.get(i + 1) {
                        None | Some(b'\n') | Some(b'\r') => i += 1,
                        Some(_) => break,
                    },
                },
            },
            Some(&b) if is_plain(b) => {
                i += 1;
                while bytes.get(i).copied().is_some_and(is_plain) {
                    i += 1;
                }
            }
            _ => break,
        }
    }
    if i == pos {
        return Err(ParseError::new(pos, ErrorKind::ExpectedValue));
    }
    Ok(i)
}
