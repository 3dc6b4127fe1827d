//! Cursor over matches and their capturing groups.
//!
//! The cursor is either idle or sits on one match, optionally with one of the
//! match's groups selected. Moves that would leave the match list are
//! no-ops, and group moves never stop on a zero-width group.

use std::ops::Range;

use crate::locate::Location;
use crate::pattern::{GroupLabel, PatternGroup, PatternStructure};
use crate::record::Match;

/// A navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    NextMatch,
    PreviousMatch,
    NextGroup,
    PreviousGroup,
    /// Reselect the whole current match.
    ToAnchor,
}

impl Move {
    /// True for moves that advance through the sample.
    pub fn is_forward(self) -> bool {
        matches!(self, Move::NextMatch | Move::NextGroup)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavigationState {
    /// Navigation is off.
    #[default]
    Idle,
    Active(Location),
}

/// The capturing group part of an [`Annotation`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupAnnotation {
    pub label: GroupLabel,
    /// Source range of the group's delimiters in the pattern text.
    pub pattern_span: Option<Range<usize>>,
}

/// What the user should be shown for a location: `[match]` and the group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    /// 1-based.
    pub match_number: usize,
    pub group: Option<GroupAnnotation>,
}

impl Annotation {
    pub fn new(location: Location, structure: &PatternStructure) -> Self {
        let group = location.group_index.map(|g| GroupAnnotation {
            label: structure.label(g),
            pattern_span: structure.capturing_group(g).map(PatternGroup::source_span),
        });
        Self {
            match_number: location.match_index + 1,
            group,
        }
    }
}

impl std::fmt::Display for Annotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.match_number)?;
        if let Some(group) = &self.group {
            write!(f, " group {}", group.label)?;
        }
        Ok(())
    }
}

/// Emitted after every transition that lands somewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionChanged {
    pub direction: Move,
    pub location: Location,
    pub annotation: Annotation,
    /// Character offset in the sample to scroll to and select.
    pub offset: usize,
}

#[derive(Debug, Default)]
pub struct Navigator {
    state: NavigationState,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> NavigationState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, NavigationState::Active(_))
    }

    /// Current location, if navigating.
    pub fn location(&self) -> Option<Location> {
        match self.state {
            NavigationState::Idle => None,
            NavigationState::Active(location) => Some(location),
        }
    }

    /// Start navigating `matches` by landing on the first match. Stays idle
    /// when there is nothing to navigate.
    pub fn activate(
        &mut self,
        matches: &[Match],
        structure: &PatternStructure,
    ) -> Option<PositionChanged> {
        self.state = NavigationState::Idle;
        if matches.is_empty() {
            return None;
        }
        let location = Location {
            match_index: 0,
            group_index: None,
        };
        self.state = NavigationState::Active(location);
        Some(position_changed(Move::NextMatch, location, matches, structure))
    }

    pub fn deactivate(&mut self) {
        self.state = NavigationState::Idle;
    }

    /// Apply `direction`. Returns `None` when idle or when the move is a no-op.
    pub fn navigate(
        &mut self,
        direction: Move,
        matches: &[Match],
        structure: &PatternStructure,
    ) -> Option<PositionChanged> {
        let NavigationState::Active(current) = self.state else {
            return None;
        };
        if current.match_index >= matches.len() {
            return None;
        }
        let last_match = matches.len() - 1;
        let group_count = matches[current.match_index].groups.len();

        let target = match direction {
            Move::NextMatch => (current.match_index < last_match).then(|| Location {
                match_index: current.match_index + 1,
                group_index: None,
            }),
            Move::PreviousMatch => (current.match_index > 0).then(|| Location {
                match_index: current.match_index - 1,
                group_index: None,
            }),
            Move::NextGroup => find_group(matches, current, |at| {
                step_forward(at, last_match, group_count)
            }),
            Move::PreviousGroup => find_group(matches, current, |at| step_backward(at, group_count)),
            Move::ToAnchor => Some(Location {
                group_index: None,
                ..current
            }),
        }?;

        self.state = NavigationState::Active(target);
        Some(position_changed(direction, target, matches, structure))
    }
}

/// Repeat `step` until it lands on a non-empty group. Gives up (no-op) at the
/// list boundary or after visiting every group position once.
fn find_group(
    matches: &[Match],
    from: Location,
    step: impl Fn(Location) -> Option<Location>,
) -> Option<Location> {
    let positions: usize = matches.iter().map(|m| m.groups.len()).sum();
    let mut at = from;
    for _ in 0..positions {
        at = step(at)?;
        let group = at
            .group_index
            .and_then(|g| matches.get(at.match_index)?.groups.get(g));
        if group.is_some_and(|g| !g.is_empty()) {
            return Some(at);
        }
    }
    None
}

fn step_forward(at: Location, last_match: usize, group_count: usize) -> Option<Location> {
    if group_count == 0 {
        return None;
    }
    match at.group_index {
        None => Some(Location {
            group_index: Some(0),
            ..at
        }),
        Some(g) if g + 1 >= group_count => (at.match_index < last_match).then(|| Location {
            match_index: at.match_index + 1,
            group_index: Some(0),
        }),
        Some(g) => Some(Location {
            group_index: Some(g + 1),
            ..at
        }),
    }
}

fn step_backward(at: Location, group_count: usize) -> Option<Location> {
    if group_count == 0 {
        return None;
    }
    match at.group_index {
        None | Some(0) => (at.match_index > 0).then(|| Location {
            match_index: at.match_index - 1,
            group_index: Some(group_count - 1),
        }),
        Some(g) => Some(Location {
            group_index: Some(g - 1),
            ..at
        }),
    }
}

fn position_changed(
    direction: Move,
    location: Location,
    matches: &[Match],
    structure: &PatternStructure,
) -> PositionChanged {
    let record = &matches[location.match_index];
    let offset = location
        .group_index
        .and_then(|g| record.groups.get(g))
        .map_or(record.start, |g| g.start);
    PositionChanged {
        direction,
        location,
        annotation: Annotation::new(location, structure),
        offset,
    }
}
