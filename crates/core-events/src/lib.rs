//! Host boundary types: raw input notifications, key chords, dialog choices
//! and the presentation hooks the editor core calls back into.
//!
//! The host (a webview textarea, or the headless driver in `sert-bin`) owns
//! the physical widget. Every notification carries the widget's live text and
//! selection *after* the change it reports; the core reconciles that against
//! its own buffer and history.

use core_text::{Buffer, CursorStatus, Selection};
use std::fmt;
use std::path::PathBuf;

pub mod live;

pub use live::LiveState;

/// Raw text-mutation notification delivered by the host widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// Generic `input` notification (typed char, delete, host-side paste, or the
    /// echo of a programmatic write).
    Input(LiveState),
    /// IME composition session began. Carries the pre-composition state.
    CompositionStart(LiveState),
    /// Intermediate IME candidate; content may hold uncommitted glyphs.
    CompositionUpdate(LiveState),
    /// IME composition finished; carries the committed widget state.
    CompositionEnd(LiveState),
    /// Caret moved or selection changed without a text change.
    SelectionChanged(Selection),
}

impl InputEvent {
    pub fn live(&self) -> Option<&LiveState> {
        match self {
            InputEvent::Input(l)
            | InputEvent::CompositionStart(l)
            | InputEvent::CompositionUpdate(l)
            | InputEvent::CompositionEnd(l) => Some(l),
            InputEvent::SelectionChanged(_) => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            InputEvent::Input(_) => "input",
            InputEvent::CompositionStart(_) => "composition_start",
            InputEvent::CompositionUpdate(_) => "composition_update",
            InputEvent::CompositionEnd(_) => "composition_end",
            InputEvent::SelectionChanged(_) => "selection_changed",
        }
    }
}

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct KeyModifiers: u8 {
        const CTRL  = 0b0000_0001;
        const ALT   = 0b0000_0010;
        const SHIFT = 0b0000_0100;
        /// Cmd on macOS; treated like CTRL for shortcut purposes.
        const META  = 0b0000_1000;
    }
}

impl KeyModifiers {
    /// True when either CTRL or META is held (the platform "command" key).
    pub fn command(self) -> bool {
        self.intersects(KeyModifiers::CTRL | KeyModifiers::META)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Home,
    End,
    F(u8),
    Escape,
}

/// A key press together with its modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyChord {
    pub key: Key,
    pub mods: KeyModifiers,
}

impl KeyChord {
    pub fn new(key: Key, mods: KeyModifiers) -> Self {
        Self { key, mods }
    }
    pub fn plain(key: Key) -> Self {
        Self::new(key, KeyModifiers::empty())
    }
    pub fn ctrl(c: char) -> Self {
        Self::new(Key::Char(c), KeyModifiers::CTRL)
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}{:?}", self.key, self.mods)
    }
}

/// Cursor-only navigation. Never touches history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionKind {
    LineStart,
    LineEnd,
    DocumentStart,
    DocumentEnd,
}

/// Panels the presentation layer opens on request (find / replace bars).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Find,
    Replace,
}

/// High-level editor command, produced by the shortcut translator or by a
/// menu / panel in the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Undo,
    Redo,
    Cut,
    Copy,
    Paste,
    SelectAll,
    NewFile,
    OpenFile,
    Save,
    SaveAs,
    Exit,
    Motion(MotionKind),
    OpenPanel(Panel),
    /// Run a search for `query` and select the first match.
    Find(String),
    FindNext,
    FindPrevious,
    /// Replace the current match with the given text.
    ReplaceCurrent(String),
    /// Replace every match with the given text.
    ReplaceAll(String),
    ClearSearch,
}

/// Action waiting behind an "unsaved changes" confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    NewFile,
    OpenFile,
    Exit,
}

/// Closed set of answers to an unsaved-changes dialog. For `PendingAction::Exit`
/// the labels read "save and exit / exit without saving / cancel".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogChoice {
    SaveAndProceed,
    Discard,
    Cancel,
}

/// Severity of a user-facing, non-fatal notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

/// Read-side callbacks into the presentation layer (line numbers, status bar,
/// message boxes). Implementations must not feed back into history.
pub trait PresentationHooks {
    /// Called after every buffer mutation or caret move.
    fn on_buffer_changed(&mut self, _buffer: &Buffer, _selection: Selection) {}
    fn notify(&mut self, _notice: &Notice) {}
    /// Show the find or replace bar.
    fn open_panel(&mut self, _panel: Panel) {}
}

/// Default no-op hooks implementation.
pub struct NoopHooks;

impl PresentationHooks for NoopHooks {}

/// Modal dialogs the command layer consults for save-before-action flows.
pub trait Dialogs {
    fn confirm_unsaved(&mut self, action: PendingAction) -> DialogChoice;
    /// Path picker for "open". `None` means the user cancelled.
    fn pick_open_path(&mut self) -> Option<PathBuf>;
    /// Path picker for "save as". `None` means the user cancelled.
    fn pick_save_path(&mut self) -> Option<PathBuf>;
}

/// Convenience: status projection for hooks that only render the status bar.
pub fn status_of(buffer: &Buffer, selection: Selection) -> CursorStatus {
    CursorStatus::compute(buffer, selection.start)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meta_counts_as_command_key() {
        assert!(KeyModifiers::META.command());
        assert!(KeyModifiers::CTRL.command());
        assert!(!(KeyModifiers::SHIFT | KeyModifiers::ALT).command());
    }

    #[test]
    fn key_chord_display() {
        let s = format!("{}", KeyChord::ctrl('z'));
        assert!(s.contains("Char"));
    }

    #[test]
    fn live_accessor_skips_selection_events() {
        let ev = InputEvent::SelectionChanged(Selection::caret(1));
        assert!(ev.live().is_none());
        assert_eq!(ev.kind(), "selection_changed");
        let ev = InputEvent::Input(LiveState::new("x", Selection::caret(1)));
        assert_eq!(ev.live().unwrap().text, "x");
    }
}
