//! Compiles `@fn` function-declaration directives embedded in shell text
//! into plain bash.
//!
//! A script may mix ordinary shell statements with declarations like:
//!
//! ```text
//! @fn hi greeting='Hello', target='World' {
//!     echo "${greeting}, ${target}!"
//! }
//! ```
//!
//! [`compile`] replaces each directive with a generated function pair —
//! a public wrapper that parses `--greeting`/`--target` style flags
//! (erroring on missing required ones) and a hidden `__hi` implementation
//! holding the author's body. All surrounding text, including the body
//! itself, is preserved byte-for-byte, and generated code adopts the
//! file's own indentation style.
//!
//! Processing phases:
//!
//! 1. **Lex** — shell lexical structure (quotes, variables, subshells)
//!    so directive delimiters inside them are treated as opaque
//! 2. **Directive** — scan for and parse `@fn` headers
//! 3. **Emit** — render each directive as bash at a canonical indent
//! 4. **Splice** — re-indent to the surrounding style and stitch output

pub mod directive;
pub mod emit;
pub mod error;
pub mod lex;
pub mod splice;
pub mod value;

pub use error::{ErrorKind, ParseError};
pub use splice::compile;
