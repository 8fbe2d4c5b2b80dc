//! Caret motions used by the Home/End shortcuts.
//!
//! These operate purely on a `Buffer` + caret offset and never touch history.

use crate::Buffer;

/// Start of the line containing `pos`.
pub fn line_start(buf: &Buffer, pos: usize) -> usize {
    let (line, _) = buf.line_col(pos);
    buf.line_start(line)
}

/// End of the line containing `pos` (before the terminator).
pub fn line_end(buf: &Buffer, pos: usize) -> usize {
    let (line, _) = buf.line_col(pos);
    buf.line_end(line)
}

pub fn document_start(_buf: &Buffer) -> usize {
    0
}

pub fn document_end(buf: &Buffer) -> usize {
    buf.len_chars()
}
