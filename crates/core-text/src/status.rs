//! Cursor status projection (line / column / character count).
//!
//! Pure read-side derivation re-run after every buffer change. Columns count
//! grapheme clusters so a combining sequence advances the column once.

use crate::Buffer;
use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorStatus {
    /// 1-based line of the caret.
    pub line: usize,
    /// 1-based column of the caret.
    pub column: usize,
    /// Total chars in the buffer.
    pub chars: usize,
    pub lines: usize,
}

impl CursorStatus {
    pub fn compute(buf: &Buffer, caret: usize) -> Self {
        let (line, col_chars) = buf.line_col(caret);
        let start = buf.line_start(line);
        let prefix = buf.slice(start..start + col_chars);
        Self {
            line: line + 1,
            column: prefix.graphemes(true).count() + 1,
            chars: buf.len_chars(),
            lines: buf.line_count(),
        }
    }
}

impl std::fmt::Display for CursorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Ln {}, Col {} | {} chars",
            self.line, self.column, self.chars
        )
    }
}
