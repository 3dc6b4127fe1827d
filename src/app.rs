//! Application event loop for interactive mode.
//!
//! The `App` struct ties together the Session, Terminal, and key bindings
//! into a viewer that walks the matches of one search.

use std::ops::Range;

use anyhow::Result;

use crate::keybind::{self, KeyAction};
use crate::navigation::{Annotation, PositionChanged};
use crate::render::{CellStyle, cell_styles};
use crate::session::Session;
use crate::terminal::Terminal;

/// The interactive application state.
pub struct App {
    pub session: Session,
    /// First sample line shown on screen, 0-based.
    pub top_line: usize,
    pub selection: Option<Range<usize>>,
    /// Source range of the selected group in the pattern header.
    pub pattern_selection: Option<Range<usize>>,
    pub status: String,
    pub running: bool,
    styles: Vec<CellStyle>,
}

impl App {
    /// Build a viewer over a session that has already been searched.
    pub fn new(session: Session) -> Self {
        let styles = cell_styles(
            session.sample().len_chars(),
            &session.highlights(),
            session.configuration().palette.match_background,
            None,
        );
        let mut app = Self {
            session,
            top_line: 0,
            selection: None,
            pattern_selection: None,
            status: String::new(),
            running: true,
            styles,
        };
        let annotation = app
            .session
            .location()
            .zip(app.session.structure())
            .map(|(location, structure)| Annotation::new(location, structure));
        app.selection = app.session.location().and_then(|l| app.session.span_of(l));
        app.pattern_selection = annotation.as_ref().and_then(pattern_span);
        app.status = app.status_line(annotation.as_ref());
        app
    }

    /// Run the main event loop.
    pub fn run(&mut self, terminal: &mut dyn Terminal) -> Result<()> {
        terminal.init()?;
        if let Some(span) = self.selection.clone() {
            self.scroll_to(span.start, terminal);
        }

        while self.running {
            self.redraw(terminal);
            let key = match terminal.read_key() {
                Ok(key) => key,
                Err(err) => {
                    terminal.cleanup()?;
                    return Err(err);
                }
            };

            let action = keybind::resolve_key(key);
            self.handle_action(action, terminal);
        }

        terminal.cleanup()?;
        Ok(())
    }

    /// Handle a resolved key action.
    fn handle_action(&mut self, action: KeyAction, terminal: &mut dyn Terminal) {
        match action {
            KeyAction::Navigate(direction) => match self.session.navigate(direction) {
                Some(event) => self.show(&event, terminal),
                None => terminal.beep(),
            },
            KeyAction::Leave => {
                self.session.deactivate();
                self.running = false;
            }
            KeyAction::Resize => {
                if let Some(span) = self.selection.clone() {
                    self.scroll_to(span.start, terminal);
                }
            }
            KeyAction::Ignore => {}
        }
    }

    fn show(&mut self, event: &PositionChanged, terminal: &dyn Terminal) {
        self.selection = self.session.span_of(event.location);
        self.pattern_selection = pattern_span(&event.annotation);
        self.status = self.status_line(Some(&event.annotation));
        self.scroll_to(event.offset, terminal);
    }

    fn status_line(&self, annotation: Option<&Annotation>) -> String {
        let count = self.session.match_count();
        let plural = if count == 1 { "" } else { "es" };
        match annotation {
            Some(annotation) => format!("{annotation} of {count} match{plural}"),
            None => format!("{count} match{plural}"),
        }
    }

    /// Number of screen rows available for sample text, between the pattern
    /// header and the status line.
    fn text_rows(terminal: &dyn Terminal) -> usize {
        usize::from(terminal.size().height.saturating_sub(2)).max(1)
    }

    /// Adjust `top_line` so the line holding `offset` is visible.
    fn scroll_to(&mut self, offset: usize, terminal: &dyn Terminal) {
        let sample = self.session.sample();
        let line = sample.char_to_line(offset.min(sample.len_chars()));
        let rows = Self::text_rows(terminal);
        if line < self.top_line {
            self.top_line = line;
        } else if line >= self.top_line + rows {
            self.top_line = line + 1 - rows;
        }
    }

    fn redraw(&mut self, terminal: &mut dyn Terminal) {
        let size = terminal.size();
        let width = usize::from(size.width);
        let rows = Self::text_rows(terminal);
        let sample = self.session.sample();

        terminal.clear_screen();
        self.draw_pattern(terminal, width);
        for row in 0..rows {
            let line_index = self.top_line + row;
            if line_index >= sample.len_lines() {
                break;
            }
            let start = sample.line_to_char(line_index);
            let text: String = sample
                .line(line_index)
                .chars()
                .take_while(|c| !matches!(c, '\n' | '\r'))
                .take(width)
                .collect();
            let len = text.chars().count();
            let mut styles = self.styles[start..start + len].to_vec();
            if let Some(selection) = &self.selection {
                for (i, style) in styles.iter_mut().enumerate() {
                    style.selected = selection.contains(&(start + i));
                }
            }
            terminal.move_cursor(0, (row + 1) as u16);
            terminal.write_styled(&text, &styles);
            terminal.clear_eol();
        }

        let status: String = self.status.chars().take(width).collect();
        terminal.move_cursor(0, size.height.saturating_sub(1));
        terminal.write_str(&status);
        terminal.clear_eol();
        terminal.flush();
    }

    /// Pattern header in its validity colour, with the selected group
    /// reversed.
    fn draw_pattern(&self, terminal: &mut dyn Terminal, width: usize) {
        let foreground = self.session.validity_colour();
        let text: String = self
            .session
            .pattern()
            .chars()
            .map(|c| if c == '\n' { ' ' } else { c })
            .take(width)
            .collect();
        let styles: Vec<CellStyle> = (0..text.chars().count())
            .map(|i| CellStyle {
                foreground,
                selected: self
                    .pattern_selection
                    .as_ref()
                    .is_some_and(|span| span.contains(&i)),
                ..CellStyle::default()
            })
            .collect();
        terminal.move_cursor(0, 0);
        terminal.write_styled(&text, &styles);
        terminal.clear_eol();
    }
}

fn pattern_span(annotation: &Annotation) -> Option<Range<usize>> {
    annotation.group.as_ref()?.pattern_span.clone()
}
