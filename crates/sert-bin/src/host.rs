//! Headless stand-ins for the presentation and dialog layers.

use core_events::{
    DialogChoice, Dialogs, Notice, NoticeLevel, Panel, PendingAction, PresentationHooks, status_of,
};
use core_text::{Buffer, CursorStatus, Selection};
use std::io::Write;
use std::path::PathBuf;

/// Writes notices to `out` and keeps the latest cursor status.
pub struct TextHooks<W: Write> {
    pub out: W,
    pub status: Option<CursorStatus>,
}

impl<W: Write> TextHooks<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            status: None,
        }
    }
}

impl<W: Write> PresentationHooks for TextHooks<W> {
    fn on_buffer_changed(&mut self, buffer: &Buffer, selection: Selection) {
        self.status = Some(status_of(buffer, selection));
    }

    fn notify(&mut self, notice: &Notice) {
        let prefix = match notice.level {
            NoticeLevel::Info => "info",
            NoticeLevel::Error => "error",
        };
        if let Err(e) = writeln!(self.out, "{prefix}: {}", notice.text) {
            tracing::warn!(target: "runtime", error = %e, "notice_write_failed");
        }
    }

    fn open_panel(&mut self, panel: Panel) {
        tracing::debug!(target: "runtime", ?panel, "panel_requested");
    }
}

/// Dialog answers fixed up front: one policy for unsaved changes, and the
/// path a script supplied with its `open` / `save-as` line.
pub struct ScriptDialogs {
    pub on_unsaved: DialogChoice,
    pub next_open: Option<PathBuf>,
    pub next_save: Option<PathBuf>,
}

impl ScriptDialogs {
    pub fn new(on_unsaved: DialogChoice) -> Self {
        Self {
            on_unsaved,
            next_open: None,
            next_save: None,
        }
    }
}

impl Dialogs for ScriptDialogs {
    fn confirm_unsaved(&mut self, action: PendingAction) -> DialogChoice {
        tracing::debug!(target: "runtime", ?action, choice = ?self.on_unsaved, "unsaved_prompt_auto_answer");
        self.on_unsaved
    }
    fn pick_open_path(&mut self) -> Option<PathBuf> {
        self.next_open.take()
    }
    fn pick_save_path(&mut self) -> Option<PathBuf> {
        self.next_save.take()
    }
}
