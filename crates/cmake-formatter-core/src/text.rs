//! Document positions and whole-document edits.
//!
//! Positions follow the editor convention: zero-based line, and a character
//! offset counted in UTF-16 code units. `\n`, `\r\n` and a lone `\r` all end
//! a line.

use serde::{Deserialize, Serialize};

/// Zero-based line/character position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub const fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// Half-open range between two positions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextRange {
    pub start: Position,
    pub end: Position,
}

/// Replace `range` with `new_text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextEdit {
    pub range: TextRange,
    pub new_text: String,
}

impl TextEdit {
    /// Edit replacing everything in `current` with `new_text`.
    pub fn replace_all(current: &str, new_text: impl Into<String>) -> Self {
        Self {
            range: full_range(current),
            new_text: new_text.into(),
        }
    }

    /// Apply this edit to `text`.
    pub fn apply_to(&self, text: &str) -> String {
        let start = offset_at(text, self.range.start);
        let end = offset_at(text, self.range.end).max(start);

        let mut out = String::with_capacity(text.len() - (end - start) + self.new_text.len());
        out.push_str(&text[..start]);
        out.push_str(&self.new_text);
        out.push_str(&text[end..]);
        out
    }
}

/// Convert a byte offset into a [`Position`].
///
/// Offsets past the end clamp to the end of the text; offsets inside a
/// multi-byte character resolve to the start of that character.
pub fn position_at(text: &str, offset: usize) -> Position {
    let mut line = 0u32;
    let mut character = 0u32;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, ch)) = chars.next() {
        if idx >= offset {
            break;
        }
        match ch {
            '\r' => {
                // "\r\n" is one line break; stop between the two only if the
                // offset points at the '\n'.
                if let Some(&(next_idx, '\n')) = chars.peek() {
                    if next_idx >= offset {
                        character += 1;
                        break;
                    }
                    chars.next();
                }
                line += 1;
                character = 0;
            }
            '\n' => {
                line += 1;
                character = 0;
            }
            _ => character += ch.len_utf16() as u32,
        }
    }

    Position { line, character }
}

/// Convert a [`Position`] back into a byte offset.
///
/// A character past the end of its line clamps to the line end; a line past
/// the end of the text clamps to the text end.
pub fn offset_at(text: &str, position: Position) -> usize {
    let mut line = 0u32;
    let mut character = 0u32;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, ch)) = chars.next() {
        if line == position.line && character >= position.character {
            return idx;
        }
        match ch {
            '\r' | '\n' => {
                if line == position.line {
                    return idx;
                }
                if ch == '\r' && matches!(chars.peek(), Some(&(_, '\n'))) {
                    chars.next();
                }
                line += 1;
                character = 0;
            }
            _ => character += ch.len_utf16() as u32,
        }
    }

    text.len()
}

/// Range covering the whole of `text`, from offset 0 to end of text.
pub fn full_range(text: &str) -> TextRange {
    TextRange {
        start: Position::default(),
        end: position_at(text, text.len()),
    }
}
