use std::collections::VecDeque;
use tracing::trace;

/// Default number of snapshots retained in undo history.
pub const DEFAULT_MAX_UNDO: usize = 50;

/// Bound applied to the redo stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RedoCap {
    /// Same depth as the undo stack; oldest redo entries are evicted.
    #[default]
    MatchUndo,
    Unbounded,
}

/// Immutable (content, cursor) point in edit history.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    content: String,
    cursor: usize,
    /// Logical capture tick; diagnostics only, never used for ordering.
    timestamp: u64,
}

impl Snapshot {
    pub fn content(&self) -> &str {
        &self.content
    }
    pub fn cursor(&self) -> usize {
        self.cursor
    }
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }
    fn same_state(&self, content: &str, cursor: usize) -> bool {
        self.cursor == cursor && self.content == content
    }
}

/// Bounded undo/redo stacks of value snapshots.
///
/// `undo_stack[0]` is the oldest retained state, the back is the most recent.
/// After [`HistoryStore::initialize`] the undo stack is never empty.
pub struct HistoryStore {
    undo_stack: VecDeque<Snapshot>,
    redo_stack: Vec<Snapshot>,
    max_size: usize,
    redo_cap: RedoCap,
    clock: u64,
    snapshots_skipped: u64,
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_UNDO, RedoCap::default())
    }
}

impl HistoryStore {
    pub fn new(max_size: usize, redo_cap: RedoCap) -> Self {
        let mut store = Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            max_size: max_size.max(1),
            redo_cap,
            clock: 0,
            snapshots_skipped: 0,
        };
        store.initialize("");
        store
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }
    pub fn max_size(&self) -> usize {
        self.max_size
    }
    pub fn redo_cap(&self) -> RedoCap {
        self.redo_cap
    }
    pub fn snapshots_skipped(&self) -> u64 {
        self.snapshots_skipped
    }
    pub fn can_undo(&self) -> bool {
        self.undo_stack.len() > 1
    }
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }
    /// Most recent undo entry.
    pub fn top(&self) -> Option<&Snapshot> {
        self.undo_stack.back()
    }
    /// Undo entries, oldest first.
    pub fn undo_entries(&self) -> impl Iterator<Item = &Snapshot> {
        self.undo_stack.iter()
    }
    /// Redo entries, next-to-redo last.
    pub fn redo_entries(&self) -> impl Iterator<Item = &Snapshot> {
        self.redo_stack.iter()
    }

    fn snapshot(&mut self, content: String, cursor: usize) -> Snapshot {
        self.clock += 1;
        Snapshot {
            content,
            cursor,
            timestamp: self.clock,
        }
    }

    /// Drop all history and seed it with a single snapshot of `initial`.
    pub fn initialize(&mut self, initial: &str) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        let snap = self.snapshot(initial.to_string(), 0);
        self.undo_stack.push_back(snap);
        trace!(target: "state.undo", chars = initial.len(), "history_initialized");
    }

    /// Append a snapshot unless it exactly repeats the top (content AND cursor).
    /// Returns true if a snapshot was pushed. Redo is left untouched; callers
    /// clear it when the record reflects a divergent edit.
    pub fn record(&mut self, content: &str, cursor: usize) -> bool {
        if let Some(last) = self.undo_stack.back()
            && last.same_state(content, cursor)
        {
            self.snapshots_skipped += 1;
            trace!(target: "state.undo", undo_depth = self.undo_stack.len(), cursor, "snapshot_dedupe_skip");
            return false;
        }
        let snap = self.snapshot(content.to_string(), cursor);
        self.push_undo(snap);
        trace!(target: "state.undo", undo_depth = self.undo_stack.len(), redo_depth = self.redo_stack.len(), cursor, "push_snapshot");
        true
    }

    fn push_undo(&mut self, snap: Snapshot) {
        self.undo_stack.push_back(snap);
        while self.undo_stack.len() > self.max_size {
            self.undo_stack.pop_front();
            trace!(target: "state.undo", "undo_stack_trimmed");
        }
    }

    fn push_redo(&mut self, snap: Snapshot) {
        self.redo_stack.push(snap);
        if self.redo_cap == RedoCap::MatchUndo && self.redo_stack.len() > self.max_size {
            let excess = self.redo_stack.len() - self.max_size;
            self.redo_stack.drain(..excess);
            trace!(target: "state.undo", "redo_stack_trimmed");
        }
    }

    pub fn clear_redo(&mut self) {
        if !self.redo_stack.is_empty() {
            self.redo_stack.clear();
            trace!(target: "state.undo", "redo_stack_cleared");
        }
    }

    /// Step back one state. `live_*` is the buffer as currently displayed; it
    /// is saved for redo. Returns the snapshot to restore, or `None` when
    /// the live buffer already sits on the root entry.
    ///
    /// Edits are recorded as the state *before* the change, so the top may
    /// lag the live buffer. The top is popped only when it matches the live
    /// content; otherwise it is restored in place and stays as the new top.
    /// That also lets the first edit after `initialize` be undone even though
    /// its pre-edit snapshot deduplicated against the root.
    pub fn undo(&mut self, live_content: &str, live_cursor: usize) -> Option<Snapshot> {
        let top_is_live = self
            .undo_stack
            .back()
            .is_none_or(|top| top.content == live_content);
        if self.undo_stack.len() <= 1 && top_is_live {
            trace!(target: "state.undo", "undo_noop_at_root");
            return None;
        }
        let current = self.snapshot(live_content.to_string(), live_cursor);
        self.push_redo(current);
        if top_is_live {
            self.undo_stack.pop_back();
            trace!(target: "state.undo", undo_depth = self.undo_stack.len(), "undo_pop");
        }
        let target = self.undo_stack.back().cloned();
        trace!(target: "state.undo", undo_depth = self.undo_stack.len(), redo_depth = self.redo_stack.len(), "undo_restore");
        target
    }

    /// Re-apply the most recently undone state. The snapshot moves back onto
    /// the undo stack and a clone is returned for the caller to restore.
    pub fn redo(&mut self) -> Option<Snapshot> {
        let next = self.redo_stack.pop()?;
        self.push_undo(next.clone());
        trace!(target: "state.undo", undo_depth = self.undo_stack.len(), redo_depth = self.redo_stack.len(), "redo_restore");
        Some(next)
    }
}
