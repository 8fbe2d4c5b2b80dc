#![allow(dead_code)] // Shared across integration tests; each test binary uses a subset of helpers.

use core_actions::{
    ClipboardBackend, ClipboardChain, ClipboardError, Command, DispatchResult, FsFileIo,
    HostContext, InputDisposition, dispatch, handle_input,
};
use core_events::{
    DialogChoice, Dialogs, InputEvent, LiveState, Notice, Panel, PendingAction, PresentationHooks,
};
use core_state::EditorSession;
use core_text::{Buffer, Selection};
use std::collections::VecDeque;
use std::path::PathBuf;

/// Hooks that remember what the presentation layer was told.
#[derive(Default)]
pub struct RecordingHooks {
    pub refreshes: usize,
    pub notices: Vec<Notice>,
    pub panels: Vec<Panel>,
}

impl PresentationHooks for RecordingHooks {
    fn on_buffer_changed(&mut self, _buffer: &Buffer, _selection: Selection) {
        self.refreshes += 1;
    }
    fn notify(&mut self, notice: &Notice) {
        self.notices.push(notice.clone());
    }
    fn open_panel(&mut self, panel: Panel) {
        self.panels.push(panel);
    }
}

/// Dialogs answering from queues; an empty queue means "cancel".
#[derive(Default)]
pub struct ScriptedDialogs {
    pub choices: VecDeque<DialogChoice>,
    pub open_paths: VecDeque<PathBuf>,
    pub save_paths: VecDeque<PathBuf>,
    pub prompts: Vec<PendingAction>,
}

impl Dialogs for ScriptedDialogs {
    fn confirm_unsaved(&mut self, action: PendingAction) -> DialogChoice {
        self.prompts.push(action);
        self.choices.pop_front().unwrap_or(DialogChoice::Cancel)
    }
    fn pick_open_path(&mut self) -> Option<PathBuf> {
        self.open_paths.pop_front()
    }
    fn pick_save_path(&mut self) -> Option<PathBuf> {
        self.save_paths.pop_front()
    }
}

/// Backend that refuses everything, standing in for a denied OS clipboard.
pub struct DeniedClipboard;

impl ClipboardBackend for DeniedClipboard {
    fn name(&self) -> &'static str {
        "denied"
    }
    fn write_text(&mut self, _text: &str) -> Result<(), ClipboardError> {
        Err(ClipboardError::Denied { backend: "denied" })
    }
    fn read_text(&mut self) -> Result<String, ClipboardError> {
        Err(ClipboardError::Denied { backend: "denied" })
    }
}

/// A host: the session plus every service a command can reach.
pub struct Harness {
    pub session: EditorSession,
    pub hooks: RecordingHooks,
    pub dialogs: ScriptedDialogs,
    pub clipboard: ClipboardChain,
}

impl Harness {
    pub fn new(session: EditorSession) -> Self {
        Self {
            session,
            hooks: RecordingHooks::default(),
            dialogs: ScriptedDialogs::default(),
            clipboard: ClipboardChain::memory_only(),
        }
    }

    pub fn with_clipboard(mut self, clipboard: ClipboardChain) -> Self {
        self.clipboard = clipboard;
        self
    }

    /// Dispatch a command, then echo the widget notification a real host
    /// fires after any programmatic write.
    pub fn run(&mut self, command: Command) -> DispatchResult {
        let mut ctx = HostContext {
            hooks: &mut self.hooks,
            dialogs: &mut self.dialogs,
            files: &FsFileIo,
            clipboard: &mut self.clipboard,
        };
        let result = dispatch(command, &mut self.session, &mut ctx);
        if self.session.synthetic_pending() {
            self.echo();
        }
        result
    }

    pub fn echo(&mut self) -> InputDisposition {
        let live = LiveState::new(self.session.text(), self.session.selection());
        self.input(InputEvent::Input(live))
    }

    pub fn input(&mut self, event: InputEvent) -> InputDisposition {
        handle_input(&mut self.session, &event, &mut self.hooks)
    }

    /// The widget reports `text` with the caret at its end.
    pub fn type_to(&mut self, text: &str) -> InputDisposition {
        self.input(InputEvent::Input(LiveState::at_end(text)))
    }

    pub fn select(&mut self, start: usize, end: usize) {
        self.input(InputEvent::SelectionChanged(Selection::new(start, end)));
    }

    pub fn text(&self) -> String {
        self.session.text()
    }
}
