//! Splices generated code into the original source.
//!
//! The driver scans for directive matches, infers the indentation style
//! around each one, re-indents the generated text (which uses a canonical
//! four-space unit) to match, and stitches the output. Text outside
//! matches is copied byte-for-byte; with no matches the compile is the
//! identity transform.

use regex::Regex;
use std::sync::LazyLock;

use crate::directive;
use crate::emit;
use crate::error::ParseError;

/// First non-blank line after the directive's `{`, capturing its leading
/// whitespace. `[^\n}]*` refuses to cross a `}`, so a one-line function
/// never matches; `#[^\n]*` lets a trailing comment on the `@fn` line
/// contain `}`.
static RE_BODY_INDENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\n}]*(?:#[^\n]*)?[\n\t ]*\n(?P<body_indent>[ \t]*)").unwrap()
});

const DEFAULT_INDENT: &str = "    ";

/// Run of spaces/tabs immediately preceding `pos` on its line.
fn initial_indent(src: &str, pos: usize) -> &str {
    let bytes = src.as_bytes();
    let mut start = pos;
    while start > 0 && matches!(bytes[start - 1], b' ' | b'\t') {
        start -= 1;
    }
    &src[start..pos]
}

/// One indentation level in the surrounding source: the first body
/// line's leading whitespace with the initial indent stripped. Falls
/// back to four spaces for one-line functions or when nothing follows.
fn body_indent_unit<'a>(after_match: &'a str, initial: &str) -> &'a str {
    match RE_BODY_INDENT.captures(after_match) {
        Some(cap) => {
            let body = cap.name("body_indent").unwrap().as_str();
            body.strip_prefix(initial).unwrap_or(body)
        }
        None => DEFAULT_INDENT,
    }
}

/// Re-indents generated text: blank lines pass through unchanged; every
/// other line's leading four-space multiple becomes `initial` plus that
/// many repetitions of `unit`, preserving relative nesting depth.
fn reindent(generated: &str, initial: &str, unit: &str) -> String {
    let mut out = String::with_capacity(generated.len());
    for line in generated.split_inclusive('\n') {
        if line.trim().is_empty() {
            out.push_str(line);
            continue;
        }
        let lead = line.len() - line.trim_start_matches([' ', '\t']).len();
        out.push_str(initial);
        for _ in 0..lead / DEFAULT_INDENT.len() {
            out.push_str(unit);
        }
        out.push_str(&line[lead..]);
    }
    out
}

/// Compiles all `@fn` directives in `src`, returning the transformed
/// text. Fails with the first parse error encountered; never produces
/// partial output.
pub fn compile(src: &str) -> Result<String, ParseError> {
    let matches = directive::scan(src)?;
    if matches.is_empty() {
        return Ok(src.to_string());
    }

    let mut out = String::with_capacity(src.len());
    let mut last = 0;
    for m in &matches {
        let initial = initial_indent(src, m.start);
        let unit = body_indent_unit(&src[m.end..], initial);
        out.push_str(&src[last..m.start - initial.len()]);
        out.push_str(&reindent(&emit::emit_fn(&m.directive), initial, unit));
        last = m.end;
    }
    out.push_str(&src[last..]);
    Ok(out)
}
