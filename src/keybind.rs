//! Key bindings for the interactive viewer.
//!
//! Maps crossterm KeyEvents to navigation actions.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::navigation::Move;

/// An action resulting from a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Navigate(Move),
    /// Leave navigation and close the viewer.
    Leave,
    /// Terminal was resized.
    Resize,
    /// No action (ignore the key).
    Ignore,
}

/// Single-letter spelling of a move, shared by the viewer and `--moves`.
pub fn move_for_letter(letter: char) -> Option<Move> {
    match letter {
        'n' => Some(Move::NextMatch),
        'p' => Some(Move::PreviousMatch),
        'g' => Some(Move::NextGroup),
        'G' => Some(Move::PreviousGroup),
        'a' => Some(Move::ToAnchor),
        _ => None,
    }
}

/// Parse a move script such as `"nngGa"`. Whitespace and commas are ignored.
pub fn parse_moves(script: &str) -> Result<Vec<Move>, char> {
    script
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .map(|c| move_for_letter(c).ok_or(c))
        .collect()
}

/// Resolve a KeyEvent to a KeyAction.
pub fn resolve_key(key: KeyEvent) -> KeyAction {
    // Repeats still navigate; releases would move a second time
    if key.kind == KeyEventKind::Release {
        return KeyAction::Ignore;
    }

    // F63 is our resize sentinel from CrosstermTerminal
    if key.code == KeyCode::F(63) && key.modifiers == KeyModifiers::NONE {
        return KeyAction::Resize;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    match (key.code, ctrl, alt) {
        (KeyCode::Right, true, true) => KeyAction::Navigate(Move::NextGroup),
        (KeyCode::Left, true, true) => KeyAction::Navigate(Move::PreviousGroup),
        (KeyCode::Right, false, true) => KeyAction::Navigate(Move::NextMatch),
        (KeyCode::Left, false, true) => KeyAction::Navigate(Move::PreviousMatch),
        (KeyCode::Char('a'), false, true) => KeyAction::Navigate(Move::ToAnchor),
        (KeyCode::Char('q'), true, false) => KeyAction::Leave,
        (KeyCode::Esc, _, _) => KeyAction::Leave,
        (KeyCode::Char('q'), false, false) => KeyAction::Leave,
        (KeyCode::Char(c), false, false) => move_for_letter(c).map_or(KeyAction::Ignore, KeyAction::Navigate),
        _ => KeyAction::Ignore,
    }
}
