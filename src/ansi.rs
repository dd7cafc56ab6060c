//! Helpers for strings that may contain ANSI escape sequences.

use crossterm::style::{ContentStyle, StyledContent};
use unicode_width::UnicodeWidthChar;

/// A piece of a line: either an escape sequence or a visible character.
enum Piece<'a> {
    Escape(&'a str),
    Char(char),
}

/// Splits a line into escape sequences (CSI and OSC) and visible characters.
fn pieces(line: &str) -> impl Iterator<Item = Piece<'_>> {
    let mut rest = line;
    std::iter::from_fn(move || {
        let c = rest.chars().next()?;
        if c == '\x1b' {
            let len = escape_len(rest);
            let (escape, tail) = rest.split_at(len);
            rest = tail;
            Some(Piece::Escape(escape))
        } else {
            rest = &rest[c.len_utf8()..];
            Some(Piece::Char(c))
        }
    })
}

/// Byte length of the escape sequence at the start of `s`.
fn escape_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    match bytes.get(1) {
        Some(b'[') => bytes[2..]
            .iter()
            .position(|b| (0x40..=0x7e).contains(b))
            .map(|i| i + 3)
            .unwrap_or(bytes.len()),
        Some(b']') => {
            let mut i = 2;
            while i < bytes.len() {
                if bytes[i] == 0x07 {
                    return i + 1;
                }
                if bytes[i] == 0x1b && bytes.get(i + 1) == Some(&b'\\') {
                    return i + 2;
                }
                i += 1;
            }
            bytes.len()
        }
        Some(_) => 1 + s[1..].chars().next().map_or(0, char::len_utf8),
        None => 1,
    }
}

pub fn strip_ansi(line: &str) -> String {
    pieces(line)
        .filter_map(|piece| match piece {
            Piece::Char(c) => Some(c),
            Piece::Escape(_) => None,
        })
        .collect()
}

/// Number of terminal columns the line occupies once escapes are removed.
pub fn visible_width(line: &str) -> usize {
    pieces(line)
        .map(|piece| match piece {
            Piece::Char(c) => c.width().unwrap_or(0),
            Piece::Escape(_) => 0,
        })
        .sum()
}

/// Cuts a line down to `max` columns. Escape sequences are all kept so that
/// styles opened before the cut are still closed.
pub fn truncate(line: &str, max: usize) -> String {
    let mut out = String::with_capacity(line.len());
    let mut used = 0;
    for piece in pieces(line) {
        match piece {
            Piece::Escape(escape) => out.push_str(escape),
            Piece::Char(c) => {
                let w = c.width().unwrap_or(0);
                if used + w <= max {
                    out.push(c);
                    used += w;
                } else {
                    used = max;
                }
            }
        }
    }
    out
}

const SGR_RESET: &str = "\x1b[0m";

/// Parameters of an SGR sequence (`ESC [ ... m`).
fn sgr_params(escape: &str) -> Option<&str> {
    escape.strip_prefix("\x1b[")?.strip_suffix('m')
}

/// Makes every line carry its own styling: SGR state still open at the end
/// of a line is reset there and replayed at the start of the next line.
pub fn balance_sgr(lines: &mut [String]) {
    let mut active: Vec<String> = Vec::new();
    for line in lines.iter_mut() {
        let mut out = active.concat();
        for piece in pieces(line) {
            match piece {
                Piece::Escape(escape) => {
                    out.push_str(escape);
                    match sgr_params(escape) {
                        Some("") | Some("0") => active.clear(),
                        Some(_) => active.push(escape.to_string()),
                        None => {}
                    }
                }
                Piece::Char(c) => out.push(c),
            }
        }
        if !active.is_empty() {
            out.push_str(SGR_RESET);
        }
        *line = out;
    }
}

/// Wraps `text` in the SGR sequences of `style`. A default style adds nothing.
pub fn paint(text: &str, style: &ContentStyle) -> String {
    if text.is_empty() || *style == ContentStyle::default() {
        return text.to_string();
    }
    StyledContent::new(*style, text).to_string()
}

pub fn spaces(n: usize) -> String {
    " ".repeat(n)
}
