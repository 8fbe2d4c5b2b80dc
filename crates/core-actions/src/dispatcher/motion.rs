//! Cursor-only navigation (Home / End and their Ctrl variants).
//!
//! Motions collapse the selection to a caret and never touch history.

use super::DispatchResult;
use core_events::MotionKind;
use core_state::EditorSession;
use core_text::{Selection, motion};

pub(crate) fn handle_motion(kind: MotionKind, session: &mut EditorSession) -> DispatchResult {
    let buf = session.buffer().buffer();
    let from = session.selection().start;
    let to = match kind {
        MotionKind::LineStart => motion::line_start(buf, from),
        MotionKind::LineEnd => motion::line_end(buf, from),
        MotionKind::DocumentStart => motion::document_start(buf),
        MotionKind::DocumentEnd => motion::document_end(buf),
    };
    let before = session.selection();
    session.buffer_mut().set_selection(Selection::caret(to));
    tracing::trace!(target: "actions.dispatch", op = "motion", ?kind, from, to, "motion");
    if session.selection() != before {
        DispatchResult::dirty()
    } else {
        DispatchResult::clean()
    }
}
