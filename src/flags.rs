//! Compile options exposed as named boolean flags.

use serde::Deserialize;

use crate::pattern::SyntaxMode;

/// The five option flags, each mapped onto one engine compile option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct OptionFlags {
    /// `\d`, `\w` and `\s` match ASCII only.
    pub ascii: bool,
    pub ignore_case: bool,
    /// `^` and `$` match at line boundaries.
    pub multiline: bool,
    /// `.` also matches `\n`.
    pub dot_all: bool,
    /// Free-spacing syntax with `#` comments.
    pub verbose: bool,
}

impl OptionFlags {
    pub fn syntax_mode(&self) -> SyntaxMode {
        if self.verbose {
            SyntaxMode::Verbose
        } else {
            SyntaxMode::Normal
        }
    }
}
