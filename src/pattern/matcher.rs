//! Engine adapter: compiles a pattern with its option flags and reports raw
//! match spans.
//!
//! Offsets produced here are **byte** offsets into the sample, as reported by
//! the engine. [`crate::record`] converts them to character offsets.

use std::ops::Range;

use crate::flags::OptionFlags;

use super::ast::PatternStructure;
use super::char_class::ascii_shorthands;
use super::parser::parse_structure;

/// Errors raised while compiling or running a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    /// The engine rejected the pattern source.
    Syntax(String),
    /// The engine gave up while searching (backtrack limit).
    Runtime(String),
    /// A search was requested without a valid compiled pattern.
    NotCompiled,
}

impl std::fmt::Display for PatternError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Syntax(msg) => write!(f, "Invalid pattern: {msg}"),
            Self::Runtime(msg) => write!(f, "Search aborted: {msg}"),
            Self::NotCompiled => write!(f, "No valid pattern to search with"),
        }
    }
}

impl std::error::Error for PatternError {}

/// One engine match: overall span plus one entry per capturing group,
/// `None` for groups that did not participate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMatch {
    pub span: Range<usize>,
    pub groups: Vec<Option<Range<usize>>>,
}

/// A compiled pattern together with its scanned group structure.
#[derive(Debug)]
pub struct Expression {
    source: String,
    flags: OptionFlags,
    regex: fancy_regex::Regex,
    structure: PatternStructure,
}

impl Expression {
    /// Compile `source` with `flags`. The group structure is only built once
    /// the engine has accepted the pattern.
    pub fn compile(source: &str, flags: OptionFlags) -> Result<Self, PatternError> {
        let mut translated = if flags.ascii {
            ascii_shorthands(source, flags.syntax_mode())
        } else {
            source.to_string()
        };
        if flags.verbose {
            translated.insert_str(0, "(?x)");
        }

        let mut builder = fancy_regex::RegexBuilder::new(&translated);
        builder.case_insensitive(flags.ignore_case);
        builder.multi_line(flags.multiline);
        builder.dot_matches_new_line(flags.dot_all);
        let regex = builder
            .build()
            .map_err(|err| PatternError::Syntax(err.to_string()))?;

        let structure = parse_structure(source, flags.syntax_mode());
        let engine_count = regex.captures_len().saturating_sub(1);
        if engine_count != structure.capturing_count() {
            tracing::warn!(
                pattern = source,
                scanned = structure.capturing_count(),
                engine = engine_count,
                "group scan disagrees with engine capture count"
            );
        }

        Ok(Self {
            source: source.to_string(),
            flags,
            regex,
            structure,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn flags(&self) -> OptionFlags {
        self.flags
    }

    pub fn structure(&self) -> &PatternStructure {
        &self.structure
    }

    /// Number of capturing groups as reported by the engine.
    pub fn engine_capture_count(&self) -> usize {
        self.regex.captures_len().saturating_sub(1)
    }

    /// All non-overlapping matches in `sample`, leftmost first.
    pub fn find_all(&self, sample: &str) -> Result<Vec<RawMatch>, PatternError> {
        let mut out = Vec::new();
        for captures in self.regex.captures_iter(sample) {
            let captures = captures.map_err(|err| PatternError::Runtime(err.to_string()))?;
            let Some(whole) = captures.get(0) else {
                continue;
            };
            let groups = (1..captures.len())
                .map(|i| captures.get(i).map(|m| m.start()..m.end()))
                .collect();
            out.push(RawMatch {
                span: whole.start()..whole.end(),
                groups,
            });
        }
        Ok(out)
    }
}
