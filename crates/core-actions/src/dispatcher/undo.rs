//! Undo / redo dispatch. Both are programmatic writes: the session arms the
//! synthetic flag before restoring, so the host's echo is not re-recorded.

use super::DispatchResult;
use core_state::EditorSession;

pub(crate) fn handle_undo(session: &mut EditorSession) -> DispatchResult {
    if session.undo() {
        tracing::trace!(target: "actions.dispatch", op = "undo", undo_depth = session.history().undo_depth(), redo_depth = session.history().redo_depth(), "undo");
        DispatchResult::dirty()
    } else {
        DispatchResult::clean()
    }
}

pub(crate) fn handle_redo(session: &mut EditorSession) -> DispatchResult {
    if session.redo() {
        tracing::trace!(target: "actions.dispatch", op = "redo", undo_depth = session.history().undo_depth(), redo_depth = session.history().redo_depth(), "redo");
        DispatchResult::dirty()
    } else {
        DispatchResult::clean()
    }
}
