//! Map a sample-text offset to the match and group under it.

use crate::record::Match;

/// A match (and optionally one of its groups) containing a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub match_index: usize,
    /// 0-based position among the match's groups; `None` for the whole match.
    pub group_index: Option<usize>,
}

/// Find what lies under `position`.
///
/// Groups are tried from the highest capturing index down so that the
/// innermost group wins when spans coincide. A group contains `position`
/// when `start < position <= end`; a match when `start <= position <= end`.
pub fn locate(matches: &[Match], position: usize) -> Option<Location> {
    for (match_index, m) in matches.iter().enumerate() {
        let group = m
            .groups
            .iter()
            .enumerate()
            .rev()
            .filter(|(_, g)| !g.is_empty())
            .find(|(_, g)| g.start < position && position <= g.end);
        if let Some((group_index, _)) = group {
            return Some(Location {
                match_index,
                group_index: Some(group_index),
            });
        }
        if m.start <= position && position <= m.end {
            return Some(Location {
                match_index,
                group_index: None,
            });
        }
    }
    None
}
