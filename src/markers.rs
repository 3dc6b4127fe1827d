//! Line positions of matches, for drawing markers beside a scrollbar.

use ropey::Rope;

use crate::record::Match;

/// 1-based line number of each match's start.
pub fn match_lines(sample: &Rope, matches: &[Match]) -> Vec<usize> {
    matches
        .iter()
        .map(|m| sample.char_to_line(m.start.min(sample.len_chars())) + 1)
        .collect()
}
