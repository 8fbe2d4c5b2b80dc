//! Clipboard edits and select-all.
//!
//! Scope:
//! * Copy only reads the buffer; it never touches history.
//! * Cut writes the clipboard first and mutates only once that succeeded.
//! * Paste reads the clipboard before recording anything, so a failed read
//!   leaves buffer, history and the copy/cut memory as they were.
//!
//! Paste target follows the previous clipboard op: after a copy it replaces
//! the copied range, after a cut it lands at the cut point, otherwise it
//! replaces the current selection. The memory is consumed by the paste.

use crate::clipboard::ClipboardChain;
use crate::error::ClipboardError;
use core_state::{EditorSession, LastOperation};
use core_text::Selection;
use std::ops::Range;

/// Copy the selection. Returns false for an empty selection.
pub fn copy(
    session: &mut EditorSession,
    clipboard: &mut ClipboardChain,
) -> Result<bool, ClipboardError> {
    let sel = session.selection();
    if sel.is_empty() {
        return Ok(false);
    }
    let text = session.buffer().selected_text();
    if let Err(e) = clipboard.write_text(&text) {
        session.set_last_operation(LastOperation::None);
        return Err(e);
    }
    session.set_last_operation(LastOperation::AfterCopy {
        start: sel.start,
        end: sel.end,
    });
    tracing::trace!(target: "actions.dispatch", op = "copy", start = sel.start, end = sel.end, "clipboard_edit");
    Ok(true)
}

/// Cut the selection. Returns false (and does nothing) for an empty selection.
pub fn cut(
    session: &mut EditorSession,
    clipboard: &mut ClipboardChain,
) -> Result<bool, ClipboardError> {
    let sel = session.selection();
    if sel.is_empty() {
        return Ok(false);
    }
    let text = session.buffer().selected_text();
    clipboard.write_text(&text)?;
    session.apply_command_edit(sel.range(), "");
    session.set_last_operation(LastOperation::AfterCut { pos: sel.start });
    tracing::trace!(target: "actions.dispatch", op = "cut", start = sel.start, end = sel.end, "clipboard_edit");
    Ok(true)
}

fn paste_target(op: LastOperation, selection: Selection, len: usize) -> Range<usize> {
    match op {
        LastOperation::AfterCopy { start, end } => Selection::new(start, end).clamp_to(len).range(),
        LastOperation::AfterCut { pos } => {
            let p = pos.min(len);
            p..p
        }
        LastOperation::None => selection.range(),
    }
}

/// Paste clipboard text. An empty clipboard is a no-op and keeps the
/// copy/cut memory.
pub fn paste(
    session: &mut EditorSession,
    clipboard: &mut ClipboardChain,
) -> Result<bool, ClipboardError> {
    let text = clipboard.read_text()?;
    if text.is_empty() {
        return Ok(false);
    }
    let op = session.take_last_operation();
    let target = paste_target(op, session.selection(), session.buffer().len_chars());
    let caret = session.apply_command_edit(target.clone(), &text);
    tracing::trace!(target: "actions.dispatch", op = "paste", ?target, caret, "clipboard_edit");
    Ok(true)
}

pub fn select_all(session: &mut EditorSession) -> bool {
    let before = session.selection();
    let len = session.buffer().len_chars();
    session.buffer_mut().set_selection(Selection::new(0, len));
    session.selection() != before
}
