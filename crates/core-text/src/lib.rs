//! Rope-backed text buffer and char-offset selection.
//!
//! Offsets throughout the editor core are *char* indices (Unicode scalar
//! values), not bytes. A caret may sit anywhere in `0..=len_chars()`.

use ropey::Rope;
use std::ops::Range;

pub mod motion;
pub mod status;

pub use status::CursorStatus;

/// A text buffer backed by a `ropey::Rope`.
#[derive(Clone, Default)]
pub struct Buffer {
    rope: Rope,
}

/// Selection (or caret when empty) expressed as char offsets.
///
/// Invariant: `start <= end`. Constructors normalize ordering; callers clamp
/// against a concrete buffer with [`Selection::clamp_to`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    pub fn new(a: usize, b: usize) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    /// Empty selection at `pos`.
    pub fn caret(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Clamp both ends into `0..=len`.
    pub fn clamp_to(self, len: usize) -> Self {
        Self::new(self.start.min(len), self.end.min(len))
    }
}

impl Buffer {
    pub fn from_str(content: &str) -> Self {
        Self {
            rope: Rope::from_str(content),
        }
    }

    /// Total number of chars.
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Number of lines; an empty buffer has one (empty) line.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Full contents as an owned `String`.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// True when the buffer holds exactly `other`.
    pub fn eq_str(&self, other: &str) -> bool {
        self.rope == other
    }

    /// Owned copy of the chars in `range` (clamped to the buffer).
    pub fn slice(&self, range: Range<usize>) -> String {
        let len = self.len_chars();
        let end = range.end.min(len);
        let start = range.start.min(end);
        self.rope.slice(start..end).to_string()
    }

    /// Replace the chars in `range` with `insert`. Returns the char offset
    /// immediately after the inserted text.
    pub fn replace_range(&mut self, range: Range<usize>, insert: &str) -> usize {
        let len = self.len_chars();
        let end = range.end.min(len);
        let start = range.start.min(end);
        if start < end {
            self.rope.remove(start..end);
        }
        if !insert.is_empty() {
            self.rope.insert(start, insert);
        }
        start + insert.chars().count()
    }

    /// Replace the whole contents.
    pub fn set_text(&mut self, content: &str) {
        self.rope = Rope::from_str(content);
    }

    /// Zero-based `(line, char_in_line)` of a char offset (clamped).
    pub fn line_col(&self, char_idx: usize) -> (usize, usize) {
        let idx = char_idx.min(self.len_chars());
        let line = self.rope.char_to_line(idx);
        (line, idx - self.rope.line_to_char(line))
    }

    /// Char offset where `line` starts (clamped to the last line).
    pub fn line_start(&self, line: usize) -> usize {
        let line = line.min(self.line_count().saturating_sub(1));
        self.rope.line_to_char(line)
    }

    /// Char offset of the end of `line`, excluding its line terminator.
    pub fn line_end(&self, line: usize) -> usize {
        let line = line.min(self.line_count().saturating_sub(1));
        let start = self.rope.line_to_char(line);
        let slice = self.rope.line(line);
        let mut len = slice.len_chars();
        if len > 0 && slice.char(len - 1) == '\n' {
            len -= 1;
            if len > 0 && slice.char(len - 1) == '\r' {
                len -= 1;
            }
        }
        start + len
    }

    /// Text of the given line without its terminator.
    pub fn line_text(&self, line: usize) -> Option<String> {
        if line >= self.line_count() {
            return None;
        }
        Some(self.slice(self.line_start(line)..self.line_end(line)))
    }
}

impl std::fmt::Debug for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Buffer")
            .field("len_chars", &self.len_chars())
            .field("lines", &self.line_count())
            .finish()
    }
}

/// Char count of a `str` (the unit every offset in this crate uses).
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Byte index of char offset `char_idx` in `s`, clamped to `s.len()`.
pub fn byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(b, _)| b)
        .unwrap_or(s.len())
}

/// Char offset of byte index `byte_idx` in `s` (must sit on a char boundary).
pub fn char_index(s: &str, byte_idx: usize) -> usize {
    s[..byte_idx.min(s.len())].chars().count()
}
