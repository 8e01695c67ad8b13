//! Compile-time parse errors.
//!
//! The grammar never recovers internally: the first lexical or directive
//! error aborts the whole compile call. Errors carry the byte offset of
//! the offending construct (for unterminated quotes/subshells, the offset
//! of the unmatched opener).

use std::fmt;

/// What the parser expected (or failed to close) at the error offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// `'` without a closing `'` before end of input.
    UnterminatedSingleQuote,
    /// `"` without a closing `"` before end of input.
    UnterminatedDoubleQuote,
    /// `` ` `` without a closing `` ` `` before end of input.
    UnterminatedBacktick,
    /// `$(` without a closing `)` before end of input.
    UnterminatedSubshell,
    /// `${` without a closing `}` before end of input.
    UnterminatedVariable,
    /// A name was required: first char must be `[A-Za-z_]`.
    ExpectedName,
    /// A default value was required after `=` but no value token matched.
    ExpectedValue,
    /// The `{` opening the function body (or a `,` continuing the
    /// parameter list) was not found where required.
    ExpectedBrace,
}

impl ErrorKind {
    fn describe(self) -> &'static str {
        match self {
            ErrorKind::UnterminatedSingleQuote => "unterminated single-quoted string",
            ErrorKind::UnterminatedDoubleQuote => "unterminated double-quoted string",
            ErrorKind::UnterminatedBacktick => "unterminated backtick subshell",
            ErrorKind::UnterminatedSubshell => "unterminated subshell",
            ErrorKind::UnterminatedVariable => "unterminated variable expansion",
            ErrorKind::ExpectedName => "expected a name ([A-Za-z_][A-Za-z0-9_]*)",
            ErrorKind::ExpectedValue => "expected a default value after '='",
            ErrorKind::ExpectedBrace => "expected '{' to open the function body",
        }
    }
}

/// A parse failure at a byte offset into the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub offset: usize,
    pub kind: ErrorKind,
}

impl ParseError {
    pub fn new(offset: usize, kind: ErrorKind) -> Self {
        ParseError { offset, kind }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "parse error at byte {}: {}", self.offset, self.kind.describe())
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_offset_and_description() {
        let err = ParseError::new(17, ErrorKind::UnterminatedSingleQuote);
        let msg = err.to_string();
        assert!(msg.contains("byte 17"), "Got: {msg}");
        assert!(msg.contains("single-quoted"), "Got: {msg}");
    }

    #[test]
    fn errors_compare_by_content() {
        assert_eq!(
            ParseError::new(3, ErrorKind::ExpectedBrace),
            ParseError::new(3, ErrorKind::ExpectedBrace)
        );
        assert_ne!(
            ParseError::new(3, ErrorKind::ExpectedBrace),
            ParseError::new(4, ErrorKind::ExpectedBrace)
        );
    }
}
