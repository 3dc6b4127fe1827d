//! The single front-end interface: compile a pattern, search a sample,
//! navigate the results.

use std::ops::Range;

use ropey::Rope;

use crate::colour::Colour;
use crate::config::Configuration;
use crate::flags::OptionFlags;
use crate::highlight::{HighlightInstruction, HighlightPlanner};
use crate::locate::{Location, locate};
use crate::markers;
use crate::navigation::{Annotation, Move, Navigator, PositionChanged};
use crate::pattern::{Expression, PatternError, PatternStructure};
use crate::record::{self, Match};

/// State of the pattern text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Validity {
    #[default]
    Empty,
    Valid,
    Invalid,
}

/// Result of a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchReport {
    pub match_count: usize,
    /// Where navigation landed; `None` when nothing matched.
    pub position: Option<PositionChanged>,
}

pub struct Session {
    configuration: Configuration,
    planner: HighlightPlanner,
    flags: OptionFlags,
    pattern: String,
    validity: Validity,
    expression: Option<Expression>,
    sample: Rope,
    matches: Vec<Match>,
    navigator: Navigator,
}

impl Session {
    pub fn new(configuration: Configuration) -> Self {
        Self {
            planner: HighlightPlanner::new(configuration.palette),
            flags: configuration.flags,
            configuration,
            pattern: String::new(),
            validity: Validity::Empty,
            expression: None,
            sample: Rope::new(),
            matches: Vec::new(),
            navigator: Navigator::new(),
        }
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    pub fn flags(&self) -> OptionFlags {
        self.flags
    }

    /// Pattern text last passed to [`Session::compile`].
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn validity(&self) -> Validity {
        self.validity
    }

    pub fn validity_colour(&self) -> Option<Colour> {
        self.configuration.palette.validity_colour(self.validity)
    }

    pub fn expression(&self) -> Option<&Expression> {
        self.expression.as_ref()
    }

    /// Group structure of the last successfully compiled pattern.
    pub fn structure(&self) -> Option<&PatternStructure> {
        self.expression.as_ref().map(Expression::structure)
    }

    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    pub fn match_count(&self) -> usize {
        self.matches.len()
    }

    /// Compile `pattern` with `flags`, replacing any previous pattern.
    ///
    /// Navigation stops and previous matches are dropped whatever the
    /// outcome. On a syntax error no group structure is kept.
    pub fn compile(&mut self, pattern: &str, flags: OptionFlags) -> Result<Validity, PatternError> {
        self.navigator.deactivate();
        self.matches.clear();
        self.expression = None;
        self.pattern = pattern.to_string();
        self.flags = flags;

        if pattern.is_empty() {
            self.validity = Validity::Empty;
            return Ok(self.validity);
        }
        match Expression::compile(pattern, flags) {
            Ok(expression) => {
                tracing::debug!(
                    pattern,
                    groups = expression.structure().groups().len(),
                    capturing = expression.structure().capturing_count(),
                    "pattern compiled"
                );
                self.expression = Some(expression);
                self.validity = Validity::Valid;
                Ok(self.validity)
            }
            Err(err) => {
                tracing::debug!(pattern, %err, "pattern rejected");
                self.validity = Validity::Invalid;
                Err(err)
            }
        }
    }

    /// Recompile the current pattern with new option flags.
    pub fn set_flags(&mut self, flags: OptionFlags) -> Result<Validity, PatternError> {
        let pattern = std::mem::take(&mut self.pattern);
        self.compile(&pattern, flags)
    }

    /// Find every match in `sample` and start navigating at the first one.
    pub fn search(&mut self, sample: &str) -> Result<SearchReport, PatternError> {
        self.navigator.deactivate();
        self.matches.clear();
        self.sample = Rope::from_str(sample);

        let expression = self.expression.as_ref().ok_or(PatternError::NotCompiled)?;
        let raw = expression.find_all(sample)?;
        self.matches = record::build(&raw, expression.structure().capturing_count(), &self.sample);
        tracing::debug!(matches = self.matches.len(), "search finished");

        let position = self.navigator.activate(&self.matches, expression.structure());
        Ok(SearchReport {
            match_count: self.matches.len(),
            position,
        })
    }

    pub fn is_navigating(&self) -> bool {
        self.navigator.is_active()
    }

    /// Current cursor, if navigating.
    pub fn location(&self) -> Option<Location> {
        self.navigator.location()
    }

    pub fn navigate(&mut self, direction: Move) -> Option<PositionChanged> {
        let structure = self.expression.as_ref()?.structure();
        self.navigator.navigate(direction, &self.matches, structure)
    }

    /// Turn navigation off.
    pub fn deactivate(&mut self) {
        self.navigator.deactivate();
    }

    /// Sample range covered by `location`: the selected group, or the
    /// whole match when no group is selected.
    pub fn span_of(&self, location: Location) -> Option<Range<usize>> {
        let record = self.matches.get(location.match_index)?;
        match location.group_index {
            Some(g) => record.groups.get(g).map(|g| g.start..g.end),
            None => Some(record.start..record.end),
        }
    }

    pub fn locate(&self, position: usize) -> Option<Location> {
        locate(&self.matches, position)
    }

    /// What lies under `position`, labelled for display.
    pub fn hover(&self, position: usize) -> Option<Annotation> {
        let structure = self.structure()?;
        self.locate(position)
            .map(|location| Annotation::new(location, structure))
    }

    pub fn highlights(&self) -> Vec<HighlightInstruction> {
        self.planner.plan(&self.matches, &self.sample)
    }

    /// 1-based line of each match start.
    pub fn match_lines(&self) -> Vec<usize> {
        markers::match_lines(&self.sample, &self.matches)
    }

    pub fn sample(&self) -> &Rope {
        &self.sample
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::NavigationState;
    use crate::pattern::GroupLabel;

    fn session() -> Session {
        Session::new(Configuration::default())
    }

    #[test]
    fn test_empty_pattern() {
        let mut s = session();
        assert_eq!(s.compile("", OptionFlags::default()), Ok(Validity::Empty));
        assert_eq!(s.validity_colour(), None);
        assert_eq!(s.search("abc"), Err(PatternError::NotCompiled));
    }

    #[test]
    fn test_invalid_pattern_discards_structure() {
        let mut s = session();
        s.compile("(a)", OptionFlags::default()).unwrap();
        s.search("aa").unwrap();
        assert!(s.is_navigating());

        let err = s.compile("(a", OptionFlags::default()).unwrap_err();
        assert!(matches!(err, PatternError::Syntax(_)));
        assert_eq!(s.validity(), Validity::Invalid);
        assert_eq!(s.validity_colour(), Some(Colour::RED));
        assert!(s.structure().is_none());
        assert!(!s.is_navigating());
        assert!(s.matches().is_empty());
        assert!(s.navigate(Move::NextMatch).is_none());
    }

    #[test]
    fn test_search_starts_navigation() {
        let mut s = session();
        s.compile("(a)(b(c))", OptionFlags::default()).unwrap();
        let report = s.search("abc").unwrap();
        assert_eq!(report.match_count, 1);
        let position = report.position.unwrap();
        assert_eq!(position.location.match_index, 0);
        assert_eq!(position.location.group_index, None);
        assert_eq!(s.navigator.state(), NavigationState::Active(position.location));
    }

    #[test]
    fn test_search_without_matches() {
        let mut s = session();
        s.compile("z", OptionFlags::default()).unwrap();
        let report = s.search("abc").unwrap();
        assert_eq!(report.match_count, 0);
        assert!(report.position.is_none());
        assert!(!s.is_navigating());
    }

    #[test]
    fn test_set_flags_recompiles_and_stops_navigation() {
        let mut s = session();
        s.compile("abc", OptionFlags::default()).unwrap();
        assert_eq!(s.search("ABC abc").unwrap().match_count, 1);
        let flags = OptionFlags {
            ignore_case: true,
            ..Default::default()
        };
        assert_eq!(s.set_flags(flags), Ok(Validity::Valid));
        assert!(!s.is_navigating());
        assert_eq!(s.search("ABC abc").unwrap().match_count, 2);
    }

    #[test]
    fn test_hover_labels_groups() {
        let mut s = session();
        s.compile(r"(?P<key>\w+)=(\w+)", OptionFlags::default()).unwrap();
        s.search("x a=b").unwrap();
        let hover = s.hover(3).unwrap();
        assert_eq!(hover.match_number, 1);
        assert_eq!(hover.group.unwrap().label, GroupLabel::Name("key".into()));
        let hover = s.hover(5).unwrap();
        assert_eq!(hover.group.unwrap().label, GroupLabel::Number(2));
        assert_eq!(s.hover(1), None);
    }

    #[test]
    fn test_highlights_and_lines() {
        let mut s = session();
        s.compile("b", OptionFlags::default()).unwrap();
        s.search("ab\nb").unwrap();
        assert_eq!(s.highlights().len(), 2);
        assert_eq!(s.match_lines(), vec![1, 2]);
    }

    #[test]
    fn test_unicode_sample_offsets() {
        let mut s = session();
        s.compile("(b)", OptionFlags::default()).unwrap();
        let report = s.search("ééb").unwrap();
        assert_eq!(report.position.unwrap().offset, 2);
        let event = s.navigate(Move::NextGroup).unwrap();
        assert_eq!(event.offset, 2);
    }

    #[test]
    fn test_span_of_location() {
        let mut s = session();
        s.compile("(a)(b(c))", OptionFlags::default()).unwrap();
        s.search("xabc").unwrap();
        let location = s.location().unwrap();
        assert_eq!(s.span_of(location), Some(1..4));
        let event = s.navigate(Move::NextGroup).unwrap();
        assert_eq!(s.span_of(event.location), Some(1..2));
        let missing = Location {
            match_index: 5,
            group_index: None,
        };
        assert_eq!(s.span_of(missing), None);
    }
}
