//! IME composition session tracking.
//!
//! Only the committed result of a composition is history-worthy. The tracker
//! remembers the pre-composition state and, once a composition commits, opens
//! a short window during which the next plain input notification is treated
//! as the tail of the composition rather than a new edit.

use std::time::{Duration, Instant};
use tracing::trace;

/// Buffer state captured when a composition began.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositionStart {
    pub content: String,
    pub cursor: usize,
}

#[derive(Debug, Default)]
pub struct CompositionTracker {
    active: bool,
    start: Option<CompositionStart>,
    updates: u32,
    just_ended_until: Option<Instant>,
}

impl CompositionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Number of candidate updates seen in the current session.
    pub fn updates(&self) -> u32 {
        self.updates
    }

    pub fn start_state(&self) -> Option<&CompositionStart> {
        self.start.as_ref()
    }

    /// Begin a session. Cancels any pending post-commit window.
    pub fn start(&mut self, content: &str, cursor: usize) {
        if self.active {
            trace!(target: "state.composition", updates = self.updates, "composition_restarted");
        }
        self.active = true;
        self.updates = 0;
        self.just_ended_until = None;
        self.start = Some(CompositionStart {
            content: content.to_string(),
            cursor,
        });
        trace!(target: "state.composition", cursor, "composition_start");
    }

    pub fn note_update(&mut self) {
        if self.active {
            self.updates += 1;
        }
    }

    /// Close the session, handing back the captured start state. `None` if no
    /// session was open (a stray end event).
    pub fn end(&mut self) -> Option<CompositionStart> {
        let was_active = std::mem::replace(&mut self.active, false);
        let start = self.start.take();
        trace!(target: "state.composition", was_active, updates = self.updates, "composition_end");
        if was_active { start } else { None }
    }

    /// Open the post-commit suppression window. A zero window disables it.
    pub fn arm_commit_window(&mut self, now: Instant, window: Duration) {
        self.just_ended_until = if window.is_zero() {
            None
        } else {
            Some(now + window)
        };
    }

    /// True while the post-commit window is open at `now`.
    pub fn in_commit_window(&self, now: Instant) -> bool {
        self.just_ended_until.is_some_and(|until| now < until)
    }

    /// Clear an expired window; returns true if it was cleared.
    pub fn tick(&mut self, now: Instant) -> bool {
        if let Some(until) = self.just_ended_until
            && now >= until
        {
            self.just_ended_until = None;
            return true;
        }
        false
    }

    /// Forget everything (file load, new document).
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
