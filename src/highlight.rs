//! Highlight planning: which spans of the sample to colour, and how.

use ropey::Rope;

use crate::colour::Colour;
use crate::config::Palette;
use crate::record::Match;

/// Darkening applied when a background lands on the same colour.
const OVERLAP_DARKEN: u32 = 150;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Match,
    Group,
}

/// Paint `[start, end)` of the sample. Instructions are applied in order,
/// each replacing the formatting of the characters it covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightInstruction {
    pub start: usize,
    pub end: usize,
    pub role: Role,
    pub foreground: Colour,
    pub background: Colour,
    /// Set on every group of a match whose groups cover it exactly.
    pub underline: bool,
}

pub struct HighlightPlanner {
    palette: Palette,
}

impl HighlightPlanner {
    pub fn new(palette: Palette) -> Self {
        Self { palette }
    }

    /// Plan instructions for `matches` found in `sample`: each match, then
    /// its non-empty groups.
    pub fn plan(&self, matches: &[Match], sample: &Rope) -> Vec<HighlightInstruction> {
        let mut plan = Vec::new();
        for m in matches {
            push(
                &mut plan,
                sample,
                HighlightInstruction {
                    start: m.start,
                    end: m.end,
                    role: Role::Match,
                    foreground: self.palette.match_foreground,
                    background: self.palette.match_background,
                    underline: false,
                },
            );
            let underline = m.group_total() == m.len();
            for g in m.groups.iter().filter(|g| !g.is_empty()) {
                push(
                    &mut plan,
                    sample,
                    HighlightInstruction {
                        start: g.start,
                        end: g.end,
                        role: Role::Group,
                        foreground: self.palette.group_foreground,
                        background: self.palette.group_background,
                        underline,
                    },
                );
            }
        }
        plan
    }
}

/// Append `instruction`, darkening its background if it would land on the
/// same colour.
fn push(
    plan: &mut Vec<HighlightInstruction>,
    sample: &Rope,
    mut instruction: HighlightInstruction,
) {
    let at = format_position(sample, instruction.start);
    if painted_background(plan, at) == Some(instruction.background) {
        instruction.background = instruction.background.darker(OVERLAP_DARKEN);
    }
    plan.push(instruction);
}

/// Character whose format is compared against a span starting at `start`:
/// the one before it, unless `start` begins a line.
fn format_position(sample: &Rope, start: usize) -> usize {
    if start == 0 || sample.get_char(start - 1).is_none_or(|c| c == '\n') {
        start
    } else {
        start - 1
    }
}

/// Background currently painted on the character at `at`.
fn painted_background(plan: &[HighlightInstruction], at: usize) -> Option<Colour> {
    plan.iter()
        .rev()
        .find(|i| i.start <= at && at < i.end)
        .map(|i| i.background)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Group;

    fn group(start: usize, end: usize, index: usize) -> Group {
        Group {
            start,
            end,
            index,
            participated: true,
        }
    }

    fn plan_for(matches: &[Match]) -> Vec<HighlightInstruction> {
        let sample = Rope::from_str(&"x".repeat(16));
        HighlightPlanner::new(Palette::default()).plan(matches, &sample)
    }

    fn spans(plan: &[HighlightInstruction]) -> Vec<(usize, usize, Role)> {
        plan.iter().map(|i| (i.start, i.end, i.role)).collect()
    }

    #[test]
    fn test_match_then_groups() {
        let plan = plan_for(&[Match {
            start: 0,
            end: 4,
            groups: vec![group(0, 1, 1), group(1, 1, 2), group(2, 3, 3)],
        }]);
        assert_eq!(
            spans(&plan),
            vec![(0, 4, Role::Match), (0, 1, Role::Group), (2, 3, Role::Group)]
        );
        assert_eq!(plan[0].foreground, Colour::BLACK);
        assert_eq!(plan[0].background, Colour::YELLOW);
        assert_eq!(plan[1].foreground, Colour::WHITE);
        assert_eq!(plan[1].background, Colour::RED);
        assert!(plan.iter().all(|i| !i.underline));
    }

    #[test]
    fn test_adjacent_matches_alternate_background() {
        let plan = plan_for(&[
            Match {
                start: 0,
                end: 2,
                groups: vec![],
            },
            Match {
                start: 2,
                end: 4,
                groups: vec![],
            },
        ]);
        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].background, Colour::YELLOW);
        assert_eq!(plan[1].background, Colour::YELLOW.darker(150));
    }

    #[test]
    fn test_adjacent_sibling_groups_alternate() {
        // (a)(b) over "abab"
        let plan = plan_for(&[
            Match {
                start: 0,
                end: 2,
                groups: vec![group(0, 1, 1), group(1, 2, 2)],
            },
            Match {
                start: 2,
                end: 4,
                groups: vec![group(2, 3, 1), group(3, 4, 2)],
            },
        ]);
        let backgrounds: Vec<Colour> = plan.iter().map(|i| i.background).collect();
        let dark_red = Colour::RED.darker(150);
        assert_eq!(
            backgrounds,
            vec![
                Colour::YELLOW,
                Colour::RED,
                dark_red,
                // the character before is a dark red group, not yellow
                Colour::YELLOW,
                Colour::RED,
                dark_red,
            ]
        );
    }

    #[test]
    fn test_match_at_line_start_compares_own_character() {
        let sample = Rope::from_str("ab\nab");
        let matches = [
            Match {
                start: 0,
                end: 2,
                groups: vec![],
            },
            Match {
                start: 3,
                end: 5,
                groups: vec![],
            },
        ];
        let plan = HighlightPlanner::new(Palette::default()).plan(&matches, &sample);
        // nothing painted on the line break, nor at offset 3
        assert_eq!(plan[1].background, Colour::YELLOW);
    }

    #[test]
    fn test_full_cover_underlines_groups() {
        let plan = plan_for(&[Match {
            start: 3,
            end: 6,
            groups: vec![group(3, 6, 1)],
        }]);
        assert!(!plan[0].underline);
        assert!(plan[1].underline);

        let plan = plan_for(&[Match {
            start: 0,
            end: 3,
            groups: vec![group(0, 1, 1), group(1, 3, 2)],
        }]);
        assert!(plan[1].underline && plan[2].underline);
    }

    #[test]
    fn test_nested_groups_are_darkened() {
        let plan = plan_for(&[Match {
            start: 0,
            end: 3,
            groups: vec![group(0, 1, 1), group(1, 3, 2), group(2, 3, 3)],
        }]);
        // the middle group starts right after a red group
        assert_eq!(plan[2].background, Colour::RED.darker(150));
        assert_eq!(plan[3].background, Colour::RED);
        // groups sum to 4 over a 3 character match
        assert!(plan.iter().all(|i| !i.underline));
    }

    #[test]
    fn test_group_matching_match_colour_is_darkened() {
        let palette = Palette {
            group_background: Colour::YELLOW,
            ..Palette::default()
        };
        let sample = Rope::from_str("xx");
        let plan = HighlightPlanner::new(palette).plan(
            &[Match {
                start: 0,
                end: 2,
                groups: vec![group(1, 2, 1)],
            }],
            &sample,
        );
        assert_eq!(plan[1].background, Colour::rgb(170, 170, 0));
    }

    #[test]
    fn test_empty_input() {
        assert!(plan_for(&[]).is_empty());
    }
}
