//! Group metadata recovered from a pattern's source text.

/// One parenthesised group in a pattern source string.
///
/// `start` and `end` are character offsets of the opening `(` and the closing
/// `)`. For `(a)(b(c))` the third group has `level = 1`, `start = 5`, `end = 7`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternGroup {
    /// Nesting depth, 0 for top-level groups.
    pub level: usize,
    pub start: usize,
    /// Offset of the closing delimiter. `None` only while the group is open,
    /// which never survives a scan of a compilable pattern.
    pub end: Option<usize>,
    pub capturing: bool,
    pub name: Option<String>,
}

impl PatternGroup {
    pub fn new(level: usize, start: usize, capturing: bool, name: Option<String>) -> Self {
        Self {
            level,
            start,
            end: None,
            capturing,
            name,
        }
    }

    /// Source range covering both delimiters, suitable for selecting the
    /// group in a pattern editor.
    pub fn source_span(&self) -> std::ops::Range<usize> {
        match self.end {
            Some(end) => self.start..end + 1,
            None => self.start..self.start + 1,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.end.is_some()
    }
}

/// The label shown for a capturing group: its name if it has one,
/// otherwise its 1-based ordinal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupLabel {
    Name(String),
    Number(usize),
}

impl std::fmt::Display for GroupLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Name(name) => write!(f, "{name}"),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

/// The ordered group list of one pattern plus capturing-group lookups.
///
/// Capturing groups are numbered by their position among the capturing
/// subsequence, so `capturing_group(0)` is the engine's group 1.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternStructure {
    groups: Vec<PatternGroup>,
    capturing: Vec<usize>,
}

impl PatternStructure {
    pub fn new(groups: Vec<PatternGroup>) -> Self {
        let capturing = groups
            .iter()
            .enumerate()
            .filter(|(_, g)| g.capturing)
            .map(|(i, _)| i)
            .collect();
        Self { groups, capturing }
    }

    /// All groups in source order of their opening delimiters.
    pub fn groups(&self) -> &[PatternGroup] {
        &self.groups
    }

    pub fn capturing_groups(&self) -> impl Iterator<Item = &PatternGroup> + '_ {
        self.capturing.iter().map(|&i| &self.groups[i])
    }

    pub fn capturing_count(&self) -> usize {
        self.capturing.len()
    }

    /// The capturing group at 0-based position `index`.
    pub fn capturing_group(&self, index: usize) -> Option<&PatternGroup> {
        self.capturing.get(index).map(|&i| &self.groups[i])
    }

    /// 1-based capturing index of the group called `name`.
    pub fn index_of_name(&self, name: &str) -> Option<usize> {
        self.capturing_groups()
            .position(|g| g.name.as_deref() == Some(name))
            .map(|i| i + 1)
    }

    /// Label for the capturing group at 0-based position `index`.
    pub fn label(&self, index: usize) -> GroupLabel {
        match self.capturing_group(index).and_then(|g| g.name.clone()) {
            Some(name) => GroupLabel::Name(name),
            None => GroupLabel::Number(index + 1),
        }
    }
}
