//! File commands and the exit flow.
//!
//! Dirty buffers go through the dialog layer before being replaced or
//! abandoned. Saving an untitled buffer asks for a path; cancelling the
//! picker aborts the whole action, and so does a failed write.

use crate::HostContext;
use crate::error::CommandError;
use crate::io_ops;
use core_events::{DialogChoice, PendingAction};
use core_state::EditorSession;

/// Outcome of an exit request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitDecision {
    Exit,
    Stay,
    /// Another exit request is already being resolved.
    AlreadyPending,
}

/// Save to the bound path, or ask for one. Returns false if the user
/// cancelled the path picker.
pub fn save(session: &mut EditorSession, ctx: &mut HostContext<'_>) -> Result<bool, CommandError> {
    if session.buffer().file_path().is_none() {
        return save_as(session, ctx);
    }
    io_ops::write_file(session, ctx.files, None)?;
    Ok(true)
}

/// Save under a freshly picked path and rebind the buffer to it.
pub fn save_as(
    session: &mut EditorSession,
    ctx: &mut HostContext<'_>,
) -> Result<bool, CommandError> {
    let Some(path) = ctx.dialogs.pick_save_path() else {
        tracing::debug!(target: "io", "save_as_cancelled");
        return Ok(false);
    };
    io_ops::write_file(session, ctx.files, Some(&path))?;
    Ok(true)
}

/// Resolve unsaved changes before `action`. Returns true if the action may
/// proceed.
fn confirm_discard(
    session: &mut EditorSession,
    ctx: &mut HostContext<'_>,
    action: PendingAction,
) -> Result<bool, CommandError> {
    if !session.is_dirty() {
        return Ok(true);
    }
    let choice = ctx.dialogs.confirm_unsaved(action);
    tracing::debug!(target: "actions.dispatch", ?action, ?choice, "unsaved_changes_prompt");
    match choice {
        DialogChoice::SaveAndProceed => save(session, ctx),
        DialogChoice::Discard => Ok(true),
        DialogChoice::Cancel => Ok(false),
    }
}

/// Replace the buffer with an empty untitled document.
pub fn new_file(
    session: &mut EditorSession,
    ctx: &mut HostContext<'_>,
) -> Result<bool, CommandError> {
    if !confirm_discard(session, ctx, PendingAction::NewFile)? {
        return Ok(false);
    }
    session.load_document("", None);
    tracing::info!(target: "io", "new_file");
    Ok(true)
}

/// Ask for a path and load it. A read failure keeps the current document.
pub fn open_file(
    session: &mut EditorSession,
    ctx: &mut HostContext<'_>,
) -> Result<bool, CommandError> {
    if !confirm_discard(session, ctx, PendingAction::OpenFile)? {
        return Ok(false);
    }
    let Some(path) = ctx.dialogs.pick_open_path() else {
        return Ok(false);
    };
    io_ops::open_file(session, ctx.files, &path)?;
    Ok(true)
}

/// Exit request. Re-entrant calls while one is being resolved are ignored;
/// the guard is released whenever the editor stays open.
pub fn request_exit(
    session: &mut EditorSession,
    ctx: &mut HostContext<'_>,
) -> Result<ExitDecision, CommandError> {
    if !session.begin_exit() {
        tracing::debug!(target: "actions.dispatch", "exit_already_pending");
        return Ok(ExitDecision::AlreadyPending);
    }
    match confirm_discard(session, ctx, PendingAction::Exit) {
        Ok(true) => {
            tracing::info!(target: "actions.dispatch", "exit_confirmed");
            Ok(ExitDecision::Exit)
        }
        Ok(false) => {
            session.end_exit();
            Ok(ExitDecision::Stay)
        }
        Err(e) => {
            session.end_exit();
            Err(e)
        }
    }
}
