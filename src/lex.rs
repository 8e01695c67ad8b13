//! Shell lexical structure: names, quoted strings, variables, subshells.
//!
//! These recognizers only delimit constructs — contents are never
//! transformed, they just have to be skipped correctly so that `{`, `}`,
//! `,` and whitespace inside quotes or substitutions don't confuse the
//! directive scanner. Everything returns `Option<usize>` (the end offset
//! past the construct); `None` means "not this construct here" and the
//! caller falls through to its next alternative.
//!
//! The grammar is mutually recursive (a double-quoted string can contain
//! a subshell containing another double-quoted string, to arbitrary
//! depth), so results for the recursive rules are memoized per `Lexer`.
//! The cache lives and dies with one compile call — never global.

use std::collections::HashMap;

/// Memoized recursive rules. Non-recursive rules (names, single quotes,
/// simple variables) are linear scans and aren't worth caching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Rule {
    DoubleQuoted,
    ExpandedVariable,
    ParenSubshell,
    BacktickSubshell,
}

/// Recognizer state for one compile call: the source text plus the
/// packrat cache keyed by (rule, start offset).
pub struct Lexer<'a> {
    src: &'a str,
    memo: HashMap<(Rule, usize), Option<usize>>,
}

pub(crate) fn is_name_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

pub(crate) fn is_name_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Single-character "special" variable names: `$1`, `$#`, `$@`, `$?`, ...
fn is_special_name(b: u8) -> bool {
    b.is_ascii_digit() || matches!(b, b'#' | b'*' | b'@' | b'-' | b'!' | b'?' | b'_' | b'$')
}

/// Maximal nonempty run of bytes excluding `excluded`. Multi-byte UTF-8
/// sequences never contain ASCII bytes, so byte-wise scanning always
/// stops on a char boundary.
fn run_excluding(bytes: &[u8], pos: usize, excluded: &[u8]) -> Option<usize> {
    let mut i = pos;
    while i < bytes.len() && !excluded.contains(&bytes[i]) {
        i += 1;
    }
    (i > pos).then_some(i)
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Lexer { src, memo: HashMap::new() }
    }

    pub fn src(&self) -> &'a str {
        self.src
    }

    fn bytes(&self) -> &'a [u8] {
        self.src.as_bytes()
    }

    /// `[A-Za-z_][A-Za-z0-9_]*`
    pub fn name(&self, pos: usize) -> Option<usize> {
        let bytes = self.bytes();
        if !bytes.get(pos).copied().is_some_and(is_name_start) {
            return None;
        }
        let mut i = pos + 1;
        while bytes.get(i).copied().is_some_and(is_name_char) {
            i += 1;
        }
        Some(i)
    }

    /// `'` ... `'`, multi-line, no escape processing at all: the first
    /// following `'` always closes, even after a backslash.
    pub fn single_quoted(&self, pos: usize) -> Option<usize> {
        let bytes = self.bytes();
        if bytes.get(pos) != Some(&b'\'') {
            return None;
        }
        self.src[pos + 1..].find('\'').map(|off| pos + 1 + off + 1)
    }

    /// `$name` or `$<special>` (one of digits, `#*@-!?_$`).
    pub fn simple_variable(&self, pos: usize) -> Option<usize> {
        let bytes = self.bytes();
        if bytes.get(pos) != Some(&b'$') {
            return None;
        }
        if let Some(end) = self.name(pos + 1) {
            return Some(end);
        }
        bytes
            .get(pos + 1)
            .copied()
            .is_some_and(is_special_name)
            .then_some(pos + 2)
    }

    /// `${` ... `}` form.
    pub fn expanded_variable(&mut self, pos: usize) -> Option<usize> {
        if let Some(&hit) = self.memo.get(&(Rule::ExpandedVariable, pos)) {
            return hit;
        }
        let result = self.enclosed(pos, "${", b'}', true);
        self.memo.insert((Rule::ExpandedVariable, pos), result);
        result
    }

    /// Expanded form first, then simple.
    pub fn variable(&mut self, pos: usize) -> Option<usize> {
        self.expanded_variable(pos).or_else(|| self.simple_variable(pos))
    }

    /// `$(` ... `)` command substitution.
    pub fn paren_subshell(&mut self, pos: usize) -> Option<usize> {
        if let Some(&hit) = self.memo.get(&(Rule::ParenSubshell, pos)) {
            return hit;
        }
        let result = self.enclosed(pos, "$(", b')', true);
        self.memo.insert((Rule::ParenSubshell, pos), result);
        result
    }

    /// `` ` `` ... `` ` `` command substitution. Backticks do not nest
    /// inside backticks (only the paren form does) — same asymmetry as
    /// the shell itself.
    pub fn backtick_subshell(&mut self, pos: usize) -> Option<usize> {
        if let Some(&hit) = self.memo.get(&(Rule::BacktickSubshell, pos)) {
            return hit;
        }
        let result = self.enclosed(pos, "`", b'`', false);
        self.memo.insert((Rule::BacktickSubshell, pos), result);
        result
    }

    /// Either subshell form.
    pub fn capturing_subshell(&mut self, pos: usize) -> Option<usize> {
        self.paren_subshell(pos).or_else(|| self.backtick_subshell(pos))
    }

    /// Single- or double-quoted string.
    pub fn quoted_string(&mut self, pos: usize) -> Option<usize> {
        self.single_quoted(pos).or_else(|| self.double_quoted(pos))
    }

    /// `"` ... `"`. The body is a sequence of two-byte escapes, plain
    /// runs, substitutions and variables; anything else is consumed
    /// literally, so the recursion bottoms out only at an unescaped `"`.
    pub fn double_quoted(&mut self, pos: usize) -> Option<usize> {
        if let Some(&hit) = self.memo.get(&(Rule::DoubleQuoted, pos)) {
            return hit;
        }
        let result = self.double_quoted_uncached(pos);
        self.memo.insert((Rule::DoubleQuoted, pos), result);
        result
    }

    fn double_quoted_uncached(&mut self, pos: usize) -> Option<usize> {
        let bytes = self.bytes();
        if bytes.get(pos) != Some(&b'"') {
            return None;
        }
        let mut i = pos + 1;
        loop {
            match bytes.get(i) {
                None => return None,
                Some(&b'"') => return Some(i + 1),
                Some(&b) => {
                    // Two-byte escape: \ followed by one of \ " $ `
                    if b == b'\\'
                        && matches!(bytes.get(i + 1), Some(b'\\' | b'"' | b'$' | b'`'))
                    {
                        i += 2;
                        continue;
                    }
                    if let Some(end) = run_excluding(bytes, i, &[b'"', b'$', b'`', b'\\']) {
                        i = end;
                        continue;
                    }
                    if let Some(end) = self.capturing_subshell(i) {
                        i = end;
                        continue;
                    }
                    if let Some(end) = self.variable(i) {
                        i = end;
                        continue;
                    }
                    // Last resort: a `$`, `` ` `` or `\` that introduces
                    // nothing parseable is literal text up to the next `"`.
                    match run_excluding(bytes, i, &[b'"']) {
                        Some(end) => i = end,
                        None => return None,
                    }
                }
            }
        }
    }

    /// Shared body for `${...}`, `$(...)` and backtick subshells:
    /// start delimiter, then zero or more nested constructs or plain
    /// runs, then the end delimiter. `nested_backticks` is false inside
    /// a backtick subshell.
    fn enclosed(&mut self, pos: usize, start: &str, end: u8, nested_backticks: bool) -> Option<usize> {
        if !self.src[pos..].starts_with(start) {
            return None;
        }
        let mut i = pos + start.len();
        loop {
            let bytes = self.bytes();
            match bytes.get(i) {
                None => return None,
                Some(&b) if b == end => return Some(i + 1),
                Some(&b) => {
                    if let Some(e) = self.paren_subshell(i) {
                        i = e;
                        continue;
                    }
                    if nested_backticks {
                        if let Some(e) = self.backtick_subshell(i) {
                            i = e;
                            continue;
                        }
                    }
                    if let Some(e) = self.variable(i) {
                        i = e;
                        continue;
                    }
                    if let Some(e) = self.quoted_string(i) {
                        i = e;
                        continue;
                    }
                    if let Some(e) =
                        run_excluding(bytes, i, &[b'"', b'\'', b'$', b'`', end])
                    {
                        i = e;
                        continue;
                    }
                    // A bare `$` not followed by a name character, digit,
                    // `{` or `(` is literal text, not a variable-start
                    // failure.
                    if b == b'$'
                        && !matches!(bytes.get(i + 1),
                            Some(&n) if is_name_char(n) || n == b'{' || n == b'(')
                    {
                        i += 1;
                        continue;
                    }
                    return None;
                }
            }
        }
    }
}
