//! ASCII-only shorthand classes.
//!
//! The engine always matches `\d`, `\w` and `\s` against Unicode. The ASCII
//! option is implemented by rewriting those shorthands into explicit ASCII
//! classes before compiling. `\b` keeps its Unicode meaning.

use super::parser::{SyntaxMode, comment_spans};

/// Members of each shorthand class, written so they are valid both inside
/// and outside a bracketed class.
fn members(class: char) -> Option<&'static str> {
    let members = match class {
        'd' => "0-9",
        'w' => "0-9A-Za-z_",
        's' => r"\t\n\x0B\x0C\r ",
        'D' => r"\x00-\x2F\x3A-\x{10FFFF}",
        'W' => r"\x00-\x2F\x3A-\x40\x5B-\x5E\x60\x7B-\x{10FFFF}",
        'S' => r"\x00-\x08\x0E-\x1F\x21-\x{10FFFF}",
        _ => return None,
    };
    Some(members)
}

/// Rewrite `\d \w \s \D \W \S` in `pattern` into ASCII-only classes.
/// Comments are copied unchanged.
///
/// Parentheses are never added or removed, so group numbering is unchanged.
pub fn ascii_shorthands(pattern: &str, mode: SyntaxMode) -> String {
    let comments = comment_spans(pattern, mode);
    let in_comment = |i: usize| comments.iter().any(|r| r.contains(&i));
    let mut out = String::with_capacity(pattern.len());
    let mut chars = pattern.chars().enumerate().peekable();
    let mut class_depth = 0usize;

    while let Some((i, c)) = chars.next() {
        if in_comment(i) {
            out.push(c);
            continue;
        }
        match c {
            '\\' => {
                let Some((_, next)) = chars.next() else {
                    out.push(c);
                    break;
                };
                match members(next) {
                    Some(m) if class_depth > 0 => out.push_str(m),
                    Some(m) => {
                        out.push('[');
                        out.push_str(m);
                        out.push(']');
                    }
                    None => {
                        out.push(c);
                        out.push(next);
                    }
                }
            }
            '[' => {
                out.push(c);
                class_depth += 1;
                if class_depth == 1 {
                    // Leading '^' and ']' belong to the class body
                    if let Some((_, '^')) = chars.peek() {
                        out.push('^');
                        chars.next();
                    }
                    if let Some((_, ']')) = chars.peek() {
                        out.push(']');
                        chars.next();
                    }
                }
            }
            ']' if class_depth > 0 => {
                out.push(c);
                class_depth -= 1;
            }
            _ => out.push(c),
        }
    }
    out
}
