//! Regular expression pattern handling.
//!
//! The engine (`fancy-regex`) compiles and runs patterns. This module adds a
//! structural view of the pattern source: where each group opens and closes,
//! how deep it is nested, whether it captures, and what it is called.
//!
//! # Recognised group syntax
//!
//! | Source        | Kind                                   |
//! |---------------|----------------------------------------|
//! | `(…)`         | Capturing                              |
//! | `(?P<name>…)` | Capturing, named                       |
//! | `(?<name>…)`  | Capturing, named                       |
//! | `(?:…)`       | Non-capturing                          |
//! | `(?=…)`       | Lookahead (non-capturing)              |
//! | `(?!…)`       | Negative lookahead (non-capturing)     |
//! | `(?<=…)`      | Lookbehind (non-capturing)             |
//! | `(?<!…)`      | Negative lookbehind (non-capturing)    |
//! | `(?i)`, `(?x:…)` | Inline flags (non-capturing)        |
//! | `(?P=name)`   | Backreference (non-capturing)          |
//! | `(?#…)`       | Comment (non-capturing)                |
//!
//! Escaped parentheses, parentheses inside `[...]`, and (in verbose syntax)
//! parentheses inside `#` comments are not group delimiters.

pub mod ast;
pub mod char_class;
pub mod matcher;
pub mod parser;

pub use ast::{GroupLabel, PatternGroup, PatternStructure};
pub use matcher::{Expression, PatternError, RawMatch};
pub use parser::{SyntaxMode, comment_spans, parse, parse_structure, parse_with};
