//! Terminal abstraction layer.
//!
//! Provides a `Terminal` trait for screen-mode I/O and two implementations:
//! - `CrosstermTerminal` for real terminal interaction
//! - `MockTerminal` for testing

use std::io::Write;

use anyhow::Result;
use crossterm::event::{Event, KeyEvent, KeyEventKind};

use crate::render::{CellStyle, write_styled};

/// Terminal dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermSize {
    pub width: u16,
    pub height: u16,
}

/// Abstraction over terminal operations.
pub trait Terminal {
    /// Enter raw mode and prepare the terminal.
    fn init(&mut self) -> Result<()>;

    /// Restore the terminal to its original state.
    fn cleanup(&mut self) -> Result<()>;

    /// Get the current terminal dimensions.
    fn size(&self) -> TermSize;

    /// Move the cursor to (col, row), both 0-based.
    fn move_cursor(&mut self, col: u16, row: u16);

    /// Write a string at the current cursor position.
    fn write_str(&mut self, s: &str);

    /// Write a single line of text, one style per character.
    fn write_styled(&mut self, s: &str, styles: &[CellStyle]);

    /// Clear from cursor to end of line.
    fn clear_eol(&mut self);

    /// Clear the entire screen.
    fn clear_screen(&mut self);

    /// Sound the terminal bell.
    fn beep(&mut self);

    /// Flush output to the terminal.
    fn flush(&mut self);

    /// Block until a key event is received.
    fn read_key(&mut self) -> Result<KeyEvent>;
}

/// Real terminal using crossterm.
pub struct CrosstermTerminal {
    size: TermSize,
}

impl Default for CrosstermTerminal {
    fn default() -> Self {
        Self::new()
    }
}

impl CrosstermTerminal {
    pub fn new() -> Self {
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        Self {
            size: TermSize {
                width: w,
                height: h,
            },
        }
    }
}

impl Terminal for CrosstermTerminal {
    fn init(&mut self) -> Result<()> {
        crossterm::terminal::enable_raw_mode()?;
        crossterm::execute!(
            std::io::stdout(),
            crossterm::terminal::EnterAlternateScreen,
            crossterm::cursor::Hide
        )?;
        let (w, h) = crossterm::terminal::size()?;
        self.size = TermSize {
            width: w,
            height: h,
        };
        Ok(())
    }

    fn cleanup(&mut self) -> Result<()> {
        crossterm::execute!(
            std::io::stdout(),
            crossterm::terminal::LeaveAlternateScreen,
            crossterm::cursor::Show
        )?;
        crossterm::terminal::disable_raw_mode()?;
        Ok(())
    }

    fn size(&self) -> TermSize {
        self.size
    }

    fn move_cursor(&mut self, col: u16, row: u16) {
        crossterm::queue!(std::io::stdout(), crossterm::cursor::MoveTo(col, row)).ok();
    }

    fn write_str(&mut self, s: &str) {
        crossterm::queue!(std::io::stdout(), crossterm::style::Print(s)).ok();
    }

    fn write_styled(&mut self, s: &str, styles: &[CellStyle]) {
        write_styled(&mut std::io::stdout(), s, styles, "\r\n").ok();
    }

    fn clear_eol(&mut self) {
        crossterm::queue!(
            std::io::stdout(),
            crossterm::terminal::Clear(crossterm::terminal::ClearType::UntilNewLine)
        )
        .ok();
    }

    fn clear_screen(&mut self) {
        crossterm::queue!(
            std::io::stdout(),
            crossterm::terminal::Clear(crossterm::terminal::ClearType::All)
        )
        .ok();
    }

    fn beep(&mut self) {
        crossterm::execute!(std::io::stdout(), crossterm::style::Print('\x07')).ok();
    }

    fn flush(&mut self) {
        std::io::stdout().flush().ok();
    }

    fn read_key(&mut self) -> Result<KeyEvent> {
        loop {
            match crossterm::event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => return Ok(key),
                Event::Resize(w, h) => {
                    self.size = TermSize {
                        width: w,
                        height: h,
                    };
                    // Resize events are returned as a special key
                    return Ok(KeyEvent::new(
                        crossterm::event::KeyCode::F(63),
                        crossterm::event::KeyModifiers::NONE,
                    ));
                }
                _ => {} // Ignore releases, mouse events etc.
            }
        }
    }
}

/// Mock terminal for testing; records all operations.
#[cfg(test)]
pub struct MockTerminal {
    pub size: TermSize,
    pub ops: Vec<MockOp>,
    pub key_queue: Vec<KeyEvent>,
}

#[cfg(test)]
#[derive(Debug, Clone, PartialEq)]
pub enum MockOp {
    Init,
    Cleanup,
    MoveCursor(u16, u16),
    WriteStr(String),
    WriteStyled(String, Vec<CellStyle>),
    ClearEol,
    ClearScreen,
    Beep,
    Flush,
}

#[cfg(test)]
impl MockTerminal {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            size: TermSize { width, height },
            ops: Vec::new(),
            key_queue: Vec::new(),
        }
    }

    pub fn push_key(&mut self, key: KeyEvent) {
        self.key_queue.push(key);
    }

    /// Text of every `write_str` call, in order.
    pub fn written(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                MockOp::WriteStr(s) => Some(s.as_str()),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
impl Terminal for MockTerminal {
    fn init(&mut self) -> Result<()> {
        self.ops.push(MockOp::Init);
        Ok(())
    }

    fn cleanup(&mut self) -> Result<()> {
        self.ops.push(MockOp::Cleanup);
        Ok(())
    }

    fn size(&self) -> TermSize {
        self.size
    }

    fn move_cursor(&mut self, col: u16, row: u16) {
        self.ops.push(MockOp::MoveCursor(col, row));
    }

    fn write_str(&mut self, s: &str) {
        self.ops.push(MockOp::WriteStr(s.to_string()));
    }

    fn write_styled(&mut self, s: &str, styles: &[CellStyle]) {
        self.ops.push(MockOp::WriteStyled(s.to_string(), styles.to_vec()));
    }

    fn clear_eol(&mut self) {
        self.ops.push(MockOp::ClearEol);
    }

    fn clear_screen(&mut self) {
        self.ops.push(MockOp::ClearScreen);
    }

    fn beep(&mut self) {
        self.ops.push(MockOp::Beep);
    }

    fn flush(&mut self) {
        self.ops.push(MockOp::Flush);
    }

    fn read_key(&mut self) -> Result<KeyEvent> {
        if self.key_queue.is_empty() {
            anyhow::bail!("No more keys in mock queue");
        }
        Ok(self.key_queue.remove(0))
    }
}
