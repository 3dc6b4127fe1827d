//! Group-structure scanner for regular expression source text.
//!
//! The scan only looks at group delimiters. It never validates the pattern;
//! callers compile first and only scan patterns the engine accepted.

use std::iter::{Enumerate, Peekable};
use std::ops::Range;
use std::str::Chars;

use super::ast::{PatternGroup, PatternStructure};

/// How `#` and whitespace are treated while scanning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyntaxMode {
    #[default]
    Normal,
    /// Free-spacing syntax: `#` starts a comment running to end of line.
    Verbose,
}

/// Scan `input` and return its groups in source order of their opening
/// delimiters.
pub fn parse(input: &str) -> Vec<PatternGroup> {
    parse_with(input, SyntaxMode::Normal)
}

/// Like [`parse`], with explicit starting syntax mode. Inline flag groups
/// such as `(?x)`, `(?-x)` or `(?x:…)` switch modes from their position
/// to the end of the enclosing group.
pub fn parse_with(input: &str, mode: SyntaxMode) -> Vec<PatternGroup> {
    Scanner::new(input, mode).run().groups
}

/// Character ranges of comments in `input`: `#` comments under verbose
/// syntax and the bodies of `(?#…)` groups.
pub fn comment_spans(input: &str, mode: SyntaxMode) -> Vec<Range<usize>> {
    Scanner::new(input, mode).run().comments
}

/// Scan `input` into a [`PatternStructure`].
pub fn parse_structure(input: &str, mode: SyntaxMode) -> PatternStructure {
    PatternStructure::new(parse_with(input, mode))
}

struct Scanner<'a> {
    chars: Peekable<Enumerate<Chars<'a>>>,
    verbose: bool,
    groups: Vec<PatternGroup>,
    open: Vec<OpenGroup>,
    comments: Vec<Range<usize>>,
}

/// A group still waiting for its `)`.
struct OpenGroup {
    index: usize,
    /// Verbose setting in force after the closing delimiter.
    resume_verbose: bool,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str, mode: SyntaxMode) -> Self {
        Self {
            chars: input.chars().enumerate().peekable(),
            verbose: mode == SyntaxMode::Verbose,
            groups: Vec::new(),
            open: Vec::new(),
            comments: Vec::new(),
        }
    }

    fn run(mut self) -> Self {
        while let Some((i, c)) = self.chars.next() {
            match c {
                '\\' => {
                    self.chars.next();
                }
                '[' => self.skip_class(),
                '#' if self.verbose => self.skip_line(i),
                '(' => self.open_group(i),
                ')' => self.close_group(i),
                _ => {}
            }
        }
        self
    }

    fn open_group(&mut self, at: usize) {
        let outer_verbose = self.verbose;
        let (capturing, name) = if self.peek() == Some('?') {
            self.chars.next();
            self.classify_extension()
        } else {
            (true, None)
        };
        // A bare flag group like (?x) keeps its setting past its `)`
        let resume_verbose = if self.peek() == Some(')') {
            self.verbose
        } else {
            outer_verbose
        };
        let level = self.open.len();
        self.groups.push(PatternGroup::new(level, at, capturing, name));
        self.open.push(OpenGroup {
            index: self.groups.len() - 1,
            resume_verbose,
        });
    }

    /// Classify a `(?…` group. Only named groups capture.
    fn classify_extension(&mut self) -> (bool, Option<String>) {
        match self.peek() {
            Some('P') => {
                self.chars.next();
                if self.peek() == Some('<') {
                    self.chars.next();
                    (true, Some(self.take_name()))
                } else {
                    // (?P=name) and (?P>name) are references
                    (false, None)
                }
            }
            Some('<') => {
                self.chars.next();
                match self.peek() {
                    Some('=') | Some('!') => (false, None),
                    _ => (true, Some(self.take_name())),
                }
            }
            Some('#') => {
                self.skip_comment_group();
                (false, None)
            }
            _ => {
                self.take_inline_flags();
                (false, None)
            }
        }
    }

    /// Consume inline flag letters such as `x-i` and apply any change to
    /// the `x` flag.
    fn take_inline_flags(&mut self) {
        let mut enabling = true;
        while let Some(c) = self.peek() {
            match c {
                '-' => enabling = false,
                'x' => self.verbose = enabling,
                c if c.is_ascii_alphabetic() => {}
                _ => return,
            }
            self.chars.next();
        }
    }

    fn take_name(&mut self) -> String {
        let mut name = String::new();
        while let Some(c) = self.peek() {
            if c == '>' {
                self.chars.next();
                break;
            }
            if !(c.is_alphanumeric() || c == '_') {
                break;
            }
            name.push(c);
            self.chars.next();
        }
        name
    }

    fn close_group(&mut self, at: usize) {
        if let Some(open) = self.open.pop() {
            self.groups[open.index].end = Some(at);
            self.verbose = open.resume_verbose;
        }
    }

    /// Skip a bracketed class; the opening `[` is already consumed.
    fn skip_class(&mut self) {
        if self.peek() == Some('^') {
            self.chars.next();
        }
        // A leading ']' is a literal member
        if self.peek() == Some(']') {
            self.chars.next();
        }
        let mut depth = 1usize;
        while let Some((_, c)) = self.chars.next() {
            match c {
                '\\' => {
                    self.chars.next();
                }
                '[' => depth += 1,
                ']' => {
                    depth -= 1;
                    if depth == 0 {
                        return;
                    }
                }
                _ => {}
            }
        }
    }

    /// Skip an inline `(?#…)` comment body, stopping before its `)`.
    fn skip_comment_group(&mut self) {
        let Some(&(from, _)) = self.chars.peek() else {
            return;
        };
        let mut to = from;
        while let Some(&(i, c)) = self.chars.peek() {
            if c == ')' {
                break;
            }
            to = i + 1;
            self.chars.next();
        }
        self.comments.push(from..to);
    }

    /// Skip a `#` comment at `from` up to and including the line break.
    fn skip_line(&mut self, from: usize) {
        let mut to = from + 1;
        while let Some((i, c)) = self.chars.next() {
            to = i + 1;
            if c == '\n' {
                break;
            }
        }
        self.comments.push(from..to);
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn summary(groups: &[PatternGroup]) -> Vec<(usize, usize, Option<usize>, bool)> {
        groups
            .iter()
            .map(|g| (g.level, g.start, g.end, g.capturing))
            .collect()
    }

    fn capture_count(pattern: &str) -> usize {
        parse(pattern).iter().filter(|g| g.capturing).count()
    }

    #[test]
    fn test_nested_groups() {
        let groups = parse("(a)(b(c))");
        assert_eq!(
            summary(&groups),
            vec![
                (0, 0, Some(2), true),
                (0, 3, Some(8), true),
                (1, 5, Some(7), true),
            ]
        );
    }

    #[test]
    fn test_named_groups() {
        let s = parse_structure(r"(?P<word>\w+)\s(?P<word2>\w+)", SyntaxMode::Normal);
        assert_eq!(s.capturing_count(), 2);
        assert_eq!(s.index_of_name("word"), Some(1));
        assert_eq!(s.index_of_name("word2"), Some(2));
    }

    #[test]
    fn test_angle_named_group() {
        let groups = parse(r"(?<year>\d{4})");
        assert_eq!(groups.len(), 1);
        assert!(groups[0].capturing);
        assert_eq!(groups[0].name.as_deref(), Some("year"));
    }

    #[test]
    fn test_non_capturing_forms() {
        assert_eq!(capture_count("(?:x)(?=y)(?!z)"), 0);
        assert_eq!(capture_count("(?<=a)b(?<!c)"), 0);
        assert_eq!(capture_count("(?i:ab)"), 0);
        assert_eq!(capture_count("(?P<n>a)(?P=n)"), 1);
        assert_eq!(parse("(?:x)(?=y)(?!z)").len(), 3);
    }

    #[test]
    fn test_levels_follow_depth() {
        let groups = parse("((a(?:b))c)(d)");
        let levels: Vec<usize> = groups.iter().map(|g| g.level).collect();
        assert_eq!(levels, vec![0, 1, 2, 0]);
    }

    #[test]
    fn test_escaped_parens_are_not_groups() {
        let groups = parse(r"\((a)\)");
        assert_eq!(summary(&groups), vec![(0, 2, Some(4), true)]);
    }

    #[test]
    fn test_parens_in_class_are_not_groups() {
        assert_eq!(capture_count("[()](x)"), 1);
        assert_eq!(capture_count("[]()](x)"), 1);
        assert_eq!(capture_count("[^]()](x)"), 1);
        assert_eq!(capture_count(r"[\]()](x)"), 1);
        assert_eq!(capture_count("[[:alpha:]()](x)"), 1);
    }

    #[test]
    fn test_verbose_comments() {
        let pattern = "(a) # not (a group\n(b)";
        assert_eq!(parse_with(pattern, SyntaxMode::Verbose).len(), 2);
        assert_eq!(parse("(?x)(a) # (\n(b)").len(), 3);
        // '#' is literal without verbose syntax
        assert_eq!(parse("(a)#(b)").len(), 2);
    }

    #[test]
    fn test_inline_verbose_flags_anywhere() {
        assert_eq!(capture_count("(?x-i)(a) # (\n"), 1);
        assert_eq!(capture_count("a(?x) # (\n(b)"), 1);
        assert_eq!(capture_count("(?i)(?x)(a) # (\n"), 1);
        assert!(parse("(?i)(?x)(a) # (\n").iter().all(PatternGroup::is_closed));
    }

    #[test]
    fn test_inline_verbose_flag_scope() {
        // scoped to the flag group's body
        assert_eq!(parse("(?x: # (\n)#(b)").len(), 2);
        // a bare flag lasts until the enclosing group closes
        assert_eq!(parse("(?:(?x) # (\n)#(b)").len(), 3);
        // and can be turned off again
        assert_eq!(parse_with("(?-x)#(b)", SyntaxMode::Verbose).len(), 2);
    }

    #[test]
    fn test_comment_spans() {
        let pattern = "(?x)a # [\n(?#[)b";
        assert_eq!(comment_spans(pattern, SyntaxMode::Normal), vec![6..10, 12..14]);
        assert!(comment_spans("a#[", SyntaxMode::Normal).is_empty());
        assert_eq!(comment_spans("a#[", SyntaxMode::Verbose), vec![1..3]);
    }

    #[test]
    fn test_inline_comment_group() {
        let groups = parse("(?#a (comment)(x)");
        assert_eq!(summary(&groups), vec![(0, 0, Some(13), false), (0, 14, Some(16), true)]);
    }

    #[test]
    fn test_stray_close_is_ignored() {
        let groups = parse("a)(b)");
        assert_eq!(summary(&groups), vec![(0, 2, Some(4), true)]);
    }

    #[test]
    fn test_trailing_open_paren() {
        let groups = parse("(");
        assert_eq!(summary(&groups), vec![(0, 0, None, true)]);
    }

    #[test]
    fn test_offsets_are_characters() {
        let groups = parse("é(ü)");
        assert_eq!(summary(&groups), vec![(0, 1, Some(3), true)]);
    }

    fn balanced() -> impl Strategy<Value = String> {
        let leaf = prop_oneof![
            Just(String::new()),
            Just("a".to_string()),
            Just(r"\(".to_string()),
            Just("[)]".to_string()),
        ];
        leaf.prop_recursive(4, 32, 4, |inner| {
            prop_oneof![
                inner.clone().prop_map(|s| format!("({s})")),
                inner.clone().prop_map(|s| format!("(?:{s})")),
                inner.clone().prop_map(|s| format!("(?P<n>{s})")),
                (inner.clone(), inner).prop_map(|(a, b)| format!("{a}{b}")),
            ]
        })
    }

    proptest! {
        #[test]
        fn groups_form_stack_consistent_pairs(pattern in balanced()) {
            let groups = parse(&pattern);
            let mut previous_start = None;
            for g in &groups {
                let end = g.end.expect("every group closed");
                prop_assert!(end > g.start);
                if let Some(prev) = previous_start {
                    prop_assert!(g.start > prev);
                }
                previous_start = Some(g.start);
            }
            for a in &groups {
                for b in &groups {
                    let (a0, a1) = (a.start, a.end.unwrap());
                    let (b0, b1) = (b.start, b.end.unwrap());
                    let disjoint = a1 < b0 || b1 < a0;
                    let nested = (a0 <= b0 && b1 <= a1) || (b0 <= a0 && a1 <= b1);
                    prop_assert!(disjoint || nested);
                }
            }
        }
    }
}
