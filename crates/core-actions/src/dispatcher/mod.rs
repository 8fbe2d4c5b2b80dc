//! Dispatcher applying [`Command`] to the editor session.
//!
//! Sub-modules:
//! * `edit`   - cut / copy / paste / select all
//! * `file`   - new / open / save / save as / exit flow
//! * `motion` - cursor-only navigation
//! * `undo`   - undo / redo
//!
//! Failures never escape `dispatch`: they are logged, reported through
//! `PresentationHooks::notify`, and produce a clean result. Session flags
//! (synthetic, composition) are never left armed by a failed command.

use crate::error::CommandError;
use crate::{HostContext, search};
use core_events::{Command, Notice};
use core_state::EditorSession;

pub mod edit;
pub mod file;
mod motion;
mod undo;

pub use file::ExitDecision;

/// Result of dispatching a single `Command`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchResult {
    /// Buffer or selection changed; presentation must re-derive.
    pub dirty: bool,
    pub quit: bool,
    /// The whole document was replaced (new / open); views must drop any
    /// per-line caches.
    pub buffer_replaced: bool,
}

impl DispatchResult {
    pub fn dirty() -> Self {
        Self {
            dirty: true,
            quit: false,
            buffer_replaced: false,
        }
    }
    pub fn clean() -> Self {
        Self {
            dirty: false,
            quit: false,
            buffer_replaced: false,
        }
    }
    pub fn quit() -> Self {
        Self {
            dirty: false,
            quit: true,
            buffer_replaced: false,
        }
    }
    pub fn buffer_replaced() -> Self {
        Self {
            dirty: true,
            quit: false,
            buffer_replaced: true,
        }
    }

    fn changed_if(changed: bool) -> Self {
        if changed { Self::dirty() } else { Self::clean() }
    }
}

/// Apply a command. Presentation hooks are refreshed whenever the result is
/// dirty; errors are reported as notices.
pub fn dispatch(
    command: Command,
    session: &mut EditorSession,
    ctx: &mut HostContext<'_>,
) -> DispatchResult {
    tracing::debug!(target: "actions.dispatch", ?command, "dispatch");
    let result = match run(command, session, ctx) {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!(target: "actions.dispatch", error = %e, "command_failed");
            ctx.hooks.notify(&Notice::error(e.to_string()));
            DispatchResult::clean()
        }
    };
    if result.dirty {
        ctx.hooks
            .on_buffer_changed(session.buffer().buffer(), session.selection());
    }
    result
}

fn run(
    command: Command,
    session: &mut EditorSession,
    ctx: &mut HostContext<'_>,
) -> Result<DispatchResult, CommandError> {
    let result = match command {
        Command::Undo => undo::handle_undo(session),
        Command::Redo => undo::handle_redo(session),
        Command::Cut => DispatchResult::changed_if(edit::cut(session, ctx.clipboard)?),
        Command::Copy => {
            edit::copy(session, ctx.clipboard)?;
            DispatchResult::clean()
        }
        Command::Paste => DispatchResult::changed_if(edit::paste(session, ctx.clipboard)?),
        Command::SelectAll => DispatchResult::changed_if(edit::select_all(session)),
        Command::NewFile => {
            if file::new_file(session, ctx)? {
                DispatchResult::buffer_replaced()
            } else {
                DispatchResult::clean()
            }
        }
        Command::OpenFile => {
            if file::open_file(session, ctx)? {
                DispatchResult::buffer_replaced()
            } else {
                DispatchResult::clean()
            }
        }
        Command::Save => DispatchResult::changed_if(file::save(session, ctx)?),
        Command::SaveAs => DispatchResult::changed_if(file::save_as(session, ctx)?),
        Command::Exit => match file::request_exit(session, ctx)? {
            ExitDecision::Exit => DispatchResult::quit(),
            ExitDecision::Stay | ExitDecision::AlreadyPending => DispatchResult::clean(),
        },
        Command::Motion(kind) => motion::handle_motion(kind, session),
        Command::OpenPanel(panel) => {
            ctx.hooks.open_panel(panel);
            DispatchResult::clean()
        }
        Command::Find(query) => {
            let count = search::find(session, &query)?;
            ctx.hooks.notify(&Notice::info(match_label(session, count)));
            DispatchResult::changed_if(count > 0)
        }
        Command::FindNext => DispatchResult::changed_if(search::find_next(session)?.is_some()),
        Command::FindPrevious => {
            DispatchResult::changed_if(search::find_previous(session)?.is_some())
        }
        Command::ReplaceCurrent(replacement) => {
            search::replace_current(session, &replacement)?;
            DispatchResult::dirty()
        }
        Command::ReplaceAll(replacement) => {
            let count = search::replace_all(session, &replacement)?;
            ctx.hooks
                .notify(&Notice::info(format!("Replaced {count} occurrence(s)")));
            DispatchResult::changed_if(count > 0)
        }
        Command::ClearSearch => {
            search::clear_search(session);
            DispatchResult::clean()
        }
    };
    Ok(result)
}

fn match_label(session: &EditorSession, count: usize) -> String {
    match session.search().progress() {
        Some((current, total)) => format!("{current}/{total}"),
        None if count == 0 => format!("No matches for {:?}", session.search().query),
        None => format!("{count} matches"),
    }
}
