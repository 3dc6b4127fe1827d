//! Apply highlight instructions to sample text for a terminal.

use std::io::{self, Write};
use std::ops::Range;

use crossterm::queue;
use crossterm::style::{
    Attribute, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    SetUnderlineColor,
};
use itertools::Itertools;

use crate::colour::Colour;
use crate::highlight::HighlightInstruction;

/// Final formatting of one character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellStyle {
    pub foreground: Option<Colour>,
    pub background: Option<Colour>,
    pub underline: Option<Colour>,
    /// Part of the current navigation target.
    pub selected: bool,
}

/// Resolve per-character styles for `len` characters. Later instructions
/// replace earlier ones on the characters they cover.
pub fn cell_styles(
    len: usize,
    plan: &[HighlightInstruction],
    underline_colour: Colour,
    selection: Option<Range<usize>>,
) -> Vec<CellStyle> {
    let mut cells = vec![CellStyle::default(); len];
    for instruction in plan {
        let end = instruction.end.min(len);
        for cell in cells.iter_mut().take(end).skip(instruction.start) {
            *cell = CellStyle {
                foreground: Some(instruction.foreground),
                background: Some(instruction.background),
                underline: instruction.underline.then_some(underline_colour),
                selected: false,
            };
        }
    }
    if let Some(selection) = selection {
        let end = selection.end.min(len);
        for cell in cells.iter_mut().take(end).skip(selection.start) {
            cell.selected = true;
        }
    }
    cells
}

/// Split `text` into maximal runs sharing one style.
pub fn styled_runs(text: &str, styles: &[CellStyle]) -> Vec<(CellStyle, String)> {
    let chunks = text
        .chars()
        .zip(styles.iter().copied().chain(std::iter::repeat(CellStyle::default())))
        .chunk_by(|(_, style)| *style);
    chunks
        .into_iter()
        .map(|(style, run)| (style, run.map(|(c, _)| c).collect()))
        .collect()
}

/// Write `text` with `styles` applied. Each `\n` is written as `newline`
/// (`"\r\n"` in raw mode) with colours reset around it.
pub fn write_styled<W: Write>(
    out: &mut W,
    text: &str,
    styles: &[CellStyle],
    newline: &str,
) -> io::Result<()> {
    for (style, run) in styled_runs(text, styles) {
        for (i, segment) in run.split('\n').enumerate() {
            if i > 0 {
                queue!(out, Print(newline))?;
            }
            if segment.is_empty() {
                continue;
            }
            apply(out, style)?;
            queue!(
                out,
                Print(segment),
                SetAttribute(Attribute::Reset),
                ResetColor
            )?;
        }
    }
    Ok(())
}

fn apply<W: Write>(out: &mut W, style: CellStyle) -> io::Result<()> {
    if let Some(fg) = style.foreground {
        queue!(out, SetForegroundColor(fg.into()))?;
    }
    if let Some(bg) = style.background {
        queue!(out, SetBackgroundColor(bg.into()))?;
    }
    if let Some(colour) = style.underline {
        queue!(
            out,
            SetUnderlineColor(colour.into()),
            SetAttribute(Attribute::Underlined)
        )?;
    }
    if style.selected {
        queue!(out, SetAttribute(Attribute::Reverse))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::Role;

    fn instruction(start: usize, end: usize, background: Colour, underline: bool) -> HighlightInstruction {
        HighlightInstruction {
            start,
            end,
            role: Role::Group,
            foreground: Colour::WHITE,
            background,
            underline,
        }
    }

    #[test]
    fn later_instructions_replace_earlier() {
        let plan = [
            instruction(0, 4, Colour::YELLOW, false),
            instruction(1, 2, Colour::RED, true),
        ];
        let cells = cell_styles(5, &plan, Colour::YELLOW, None);
        assert_eq!(cells[0].background, Some(Colour::YELLOW));
        assert_eq!(cells[1].background, Some(Colour::RED));
        assert_eq!(cells[1].underline, Some(Colour::YELLOW));
        assert_eq!(cells[2].underline, None);
        assert_eq!(cells[4], CellStyle::default());
    }

    #[test]
    fn out_of_range_is_clamped() {
        let plan = [instruction(2, 10, Colour::RED, false)];
        let cells = cell_styles(3, &plan, Colour::YELLOW, Some(1..9));
        assert_eq!(cells.len(), 3);
        assert!(cells[1].selected && cells[2].selected);
        assert!(!cells[0].selected);
    }

    #[test]
    fn runs_group_equal_styles() {
        let plan = [instruction(1, 3, Colour::RED, false)];
        let cells = cell_styles(5, &plan, Colour::YELLOW, None);
        let runs: Vec<String> = styled_runs("abcde", &cells)
            .into_iter()
            .map(|(_, run)| run)
            .collect();
        assert_eq!(runs, vec!["a", "bc", "de"]);
    }

    #[test]
    fn writes_text_and_newlines() {
        let plan = [instruction(0, 1, Colour::RED, false)];
        let text = "a\nb";
        let cells = cell_styles(3, &plan, Colour::YELLOW, None);
        let mut out = Vec::new();
        write_styled(&mut out, text, &cells, "\r\n").unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("a"));
        assert!(out.contains("\r\nb"));
        // 24-bit background for red
        assert!(out.contains("48;2;255;0;0"));
    }
}
