//! Match and group records in sample-text character offsets.

use ropey::Rope;

use crate::pattern::RawMatch;

/// One capturing group's span within a match.
///
/// A group that did not take part in the match has `participated == false`
/// and an empty span at the start of its match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Group {
    pub start: usize,
    pub end: usize,
    /// 1-based capturing index.
    pub index: usize,
    pub participated: bool,
}

impl Group {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Zero-width or non-participating.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// One match of the pattern, half-open `[start, end)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub start: usize,
    pub end: usize,
    /// Capturing groups in ascending index order.
    pub groups: Vec<Group>,
}

impl Match {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Sum of all group lengths; equals `len()` when the match is fully
    /// decomposed into its groups.
    pub fn group_total(&self) -> usize {
        self.groups.iter().map(Group::len).sum()
    }
}

/// Convert raw engine matches into [`Match`] records.
///
/// `capturing_count` fixes the number of groups per record; engine groups
/// beyond it are dropped and missing ones are recorded as non-participating.
pub fn build(raw: &[RawMatch], capturing_count: usize, sample: &Rope) -> Vec<Match> {
    raw.iter()
        .map(|m| {
            let start = sample.byte_to_char(m.span.start);
            let end = sample.byte_to_char(m.span.end);
            let groups = (0..capturing_count)
                .map(|i| match m.groups.get(i).cloned().flatten() {
                    Some(span) => Group {
                        start: sample.byte_to_char(span.start),
                        end: sample.byte_to_char(span.end),
                        index: i + 1,
                        participated: true,
                    },
                    None => Group {
                        start,
                        end: start,
                        index: i + 1,
                        participated: false,
                    },
                })
                .collect();
            Match { start, end, groups }
        })
        .collect()
}
