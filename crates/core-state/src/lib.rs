//! Editor session state: the buffer, its undo history, the IME composition
//! tracker and the small amount of cross-command memory (clipboard selection
//! memory, find state, exit guard).
//!
//! One `EditorSession` exists per window and is the single mutator of all of
//! it. The edit coordinator and command layer in `core-actions` borrow it
//! mutably for the duration of one event; nothing here is global.
//!
//! Synthetic writes:
//! - Any programmatic write (undo, redo, file load, command edits) goes
//!   through [`EditorSession::write_programmatic`], which arms the single-shot
//!   `synthetic` flag *before* touching the buffer. The host mirrors the new
//!   text into its widget, the widget echoes an input notification, and the
//!   coordinator consumes the flag instead of recording history.
//!
//! History recording:
//! - Plain typing records the state *before* each change (see
//!   `core_actions::input`). Command edits record their real pre-mutation
//!   state via [`EditorSession::apply_command_edit`].
//! - Every divergent edit clears redo.

use core_events::LiveState;
use core_text::{Buffer, Selection};
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, trace};

pub mod composition;
pub mod search;
pub mod undo;

pub use composition::{CompositionStart, CompositionTracker};
pub use search::SearchState;
pub use undo::{DEFAULT_MAX_UNDO, HistoryStore, RedoCap, Snapshot};

/// Default post-composition suppression window.
pub const DEFAULT_COMMIT_WINDOW: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    pub max_undo: usize,
    pub redo_cap: RedoCap,
    pub commit_window: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            max_undo: DEFAULT_MAX_UNDO,
            redo_cap: RedoCap::default(),
            commit_window: DEFAULT_COMMIT_WINDOW,
        }
    }
}

/// Authoritative text, selection, dirty flag and file binding.
#[derive(Debug, Clone)]
pub struct BufferState {
    buffer: Buffer,
    selection: Selection,
    file_path: Option<PathBuf>,
    dirty: bool,
    /// Content at the last load or save; `dirty` iff the buffer differs.
    saved: String,
}

impl BufferState {
    pub fn new(text: &str) -> Self {
        Self {
            buffer: Buffer::from_str(text),
            selection: Selection::caret(0),
            file_path: None,
            dirty: false,
            saved: text.to_string(),
        }
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }
    pub fn text(&self) -> String {
        self.buffer.text()
    }
    pub fn len_chars(&self) -> usize {
        self.buffer.len_chars()
    }
    pub fn selection(&self) -> Selection {
        self.selection
    }
    pub fn caret(&self) -> usize {
        self.selection.start
    }
    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// File name for titles and prompts; "untitled" when unbound.
    pub fn display_name(&self) -> String {
        self.file_path
            .as_deref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "untitled".to_string())
    }

    /// Selected text (empty for a caret).
    pub fn selected_text(&self) -> String {
        self.buffer.slice(self.selection.range())
    }

    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = selection.clamp_to(self.buffer.len_chars());
    }

    /// Mirror the host widget. Returns true if the text changed.
    fn set_live(&mut self, live: &LiveState) -> bool {
        let changed = !self.buffer.eq_str(&live.text);
        if changed {
            self.buffer.set_text(&live.text);
        }
        self.set_selection(live.selection);
        changed
    }

    fn write(&mut self, text: &str, selection: Selection) {
        self.buffer.set_text(text);
        self.set_selection(selection);
    }

    /// Recompute the dirty flag against the saved baseline.
    pub fn refresh_dirty(&mut self) -> bool {
        self.dirty = !self.buffer.eq_str(&self.saved);
        self.dirty
    }

    /// Rebind wholesale: new contents, new (or no) file, clean.
    fn rebind(&mut self, text: &str, path: Option<PathBuf>) {
        self.buffer.set_text(text);
        self.selection = Selection::caret(0);
        self.file_path = path;
        self.saved = text.to_string();
        self.dirty = false;
    }

    /// Record a successful save. `path` rebinds the file identity when given.
    pub fn mark_saved(&mut self, path: Option<PathBuf>) {
        if let Some(p) = path {
            self.file_path = Some(p);
        }
        self.saved = self.buffer.text();
        self.dirty = false;
    }
}

/// Selection memory consumed by the next paste.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LastOperation {
    #[default]
    None,
    /// Paste replaces the range that was copied.
    AfterCopy { start: usize, end: usize },
    /// Paste lands where the text was cut from.
    AfterCut { pos: usize },
}

/// Single owner of buffer, history, composition and command memory.
pub struct EditorSession {
    buffer: BufferState,
    history: HistoryStore,
    composition: CompositionTracker,
    options: SessionOptions,
    /// Armed before a programmatic write; consumed by the next input notification.
    synthetic_pending: bool,
    /// Content as of the last reconciled input notification.
    last_known: String,
    last_operation: LastOperation,
    search: SearchState,
    exit_in_progress: bool,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(SessionOptions::default())
    }
}

impl EditorSession {
    /// Empty untitled session.
    pub fn new(options: SessionOptions) -> Self {
        Self::with_text("", options)
    }

    /// Session seeded with `text`, history initialized to it. No synthetic
    /// write is armed since the host builds its widget from this state.
    pub fn with_text(text: &str, options: SessionOptions) -> Self {
        let mut history = HistoryStore::new(options.max_undo, options.redo_cap);
        history.initialize(text);
        Self {
            buffer: BufferState::new(text),
            history,
            composition: CompositionTracker::new(),
            options,
            synthetic_pending: false,
            last_known: text.to_string(),
            last_operation: LastOperation::None,
            search: SearchState::default(),
            exit_in_progress: false,
        }
    }

    pub fn buffer(&self) -> &BufferState {
        &self.buffer
    }
    pub fn buffer_mut(&mut self) -> &mut BufferState {
        &mut self.buffer
    }
    pub fn history(&self) -> &HistoryStore {
        &self.history
    }
    pub fn composition(&self) -> &CompositionTracker {
        &self.composition
    }
    pub fn composition_mut(&mut self) -> &mut CompositionTracker {
        &mut self.composition
    }
    pub fn options(&self) -> SessionOptions {
        self.options
    }
    pub fn text(&self) -> String {
        self.buffer.text()
    }
    pub fn selection(&self) -> Selection {
        self.buffer.selection()
    }
    pub fn is_dirty(&self) -> bool {
        self.buffer.is_dirty()
    }

    // --- synthetic write suppression ---

    pub fn synthetic_pending(&self) -> bool {
        self.synthetic_pending
    }
    pub fn mark_synthetic(&mut self) {
        self.synthetic_pending = true;
    }
    /// Consume the single-shot synthetic flag.
    pub fn take_synthetic(&mut self) -> bool {
        std::mem::take(&mut self.synthetic_pending)
    }

    // --- reconciliation helpers used by the coordinator ---

    pub fn last_known(&self) -> &str {
        &self.last_known
    }
    pub fn set_last_known(&mut self, content: String) {
        self.last_known = content;
    }

    /// Mirror the host widget into the buffer. Returns true if text changed.
    pub fn sync_live(&mut self, live: &LiveState) -> bool {
        self.buffer.set_live(live)
    }

    /// Dedup-aware push onto the undo stack.
    pub fn record_snapshot(&mut self, content: &str, cursor: usize) -> bool {
        self.history.record(content, cursor)
    }

    pub fn clear_redo(&mut self) {
        self.history.clear_redo();
    }

    pub fn refresh_dirty(&mut self) -> bool {
        self.buffer.refresh_dirty()
    }

    /// Programmatic write: arms the synthetic flag first, then replaces the
    /// buffer and cached content.
    pub fn write_programmatic(&mut self, text: &str, selection: Selection) {
        self.mark_synthetic();
        self.buffer.write(text, selection);
        self.last_known = text.to_string();
        self.buffer.refresh_dirty();
    }

    /// Command-layer mutation: record the pre-mutation state, splice
    /// `insert` over `range`, clear redo and refresh dirty. Returns the caret
    /// after the inserted text.
    pub fn apply_command_edit(&mut self, range: Range<usize>, insert: &str) -> usize {
        let mut next = self.buffer.buffer().clone();
        let caret = next.replace_range(range, insert);
        self.apply_command_rewrite(&next.text(), Selection::caret(caret));
        caret
    }

    /// Command-layer whole-document rewrite (replace all): same history
    /// discipline as [`EditorSession::apply_command_edit`].
    pub fn apply_command_rewrite(&mut self, text: &str, selection: Selection) {
        let before = self.buffer.text();
        let pre_cursor = self.buffer.caret();
        self.history.record(&before, pre_cursor);
        self.write_programmatic(text, selection);
        self.history.clear_redo();
        self.last_operation = LastOperation::None;
        debug!(target: "state.session", caret = self.buffer.caret(), chars = self.buffer.len_chars(), "command_edit_applied");
    }

    /// Step back one history state. Returns true if the buffer was restored.
    pub fn undo(&mut self) -> bool {
        let live = self.buffer.text();
        let cursor = self.buffer.caret();
        match self.history.undo(&live, cursor) {
            Some(target) => {
                self.restore(&target);
                true
            }
            None => false,
        }
    }

    /// Re-apply the last undone state. Returns true if the buffer was restored.
    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(target) => {
                self.restore(&target);
                true
            }
            None => false,
        }
    }

    fn restore(&mut self, snap: &Snapshot) {
        let len = core_text::char_len(snap.content());
        let pos = snap.cursor().min(len);
        self.write_programmatic(snap.content(), Selection::caret(pos));
        self.last_operation = LastOperation::None;
        trace!(target: "state.undo", cursor = pos, dirty = self.buffer.is_dirty(), "buffer_restored");
    }

    /// Replace the document wholesale (open / new). History, composition and
    /// command memory are reset; the write is synthetic.
    pub fn load_document(&mut self, text: &str, path: Option<PathBuf>) {
        self.buffer.rebind(text, path);
        self.history.initialize(text);
        self.composition.reset();
        self.last_operation = LastOperation::None;
        self.search.clear();
        self.last_known = text.to_string();
        self.mark_synthetic();
        debug!(target: "state.session", name = %self.buffer.display_name(), chars = self.buffer.len_chars(), "document_loaded");
    }

    // --- command memory ---

    pub fn last_operation(&self) -> LastOperation {
        self.last_operation
    }
    pub fn set_last_operation(&mut self, op: LastOperation) {
        self.last_operation = op;
    }
    /// Consume the paste selection memory.
    pub fn take_last_operation(&mut self) -> LastOperation {
        std::mem::take(&mut self.last_operation)
    }

    pub fn search(&self) -> &SearchState {
        &self.search
    }
    pub fn search_mut(&mut self) -> &mut SearchState {
        &mut self.search
    }

    /// Enter the exit flow. Returns false if one is already running.
    pub fn begin_exit(&mut self) -> bool {
        !std::mem::replace(&mut self.exit_in_progress, true)
    }
    pub fn end_exit(&mut self) {
        self.exit_in_progress = false;
    }
    pub fn exit_in_progress(&self) -> bool {
        self.exit_in_progress
    }
}
