//! Edit coordinator: reconciles every raw host notification against the
//! session and decides whether it becomes a history entry.
//!
//! Plain input notifications are evaluated in strict priority order:
//! 1. synthetic echo of a programmatic write: consume the flag, no record
//! 2. mid-composition: mirror only, recording waits for composition end
//! 3. inside the post-commit window: sync cached content, no record
//! 4. normal path: record the *pre-edit* state, then clear redo
//!
//! The pre-edit cursor is approximated as `caret - (new_len - old_len)`,
//! clamped into the old text. That is exact for single-point typing;
//! command-layer edits record their real caret instead.

use core_events::{InputEvent, LiveState, PresentationHooks};
use core_state::{EditorSession, LastOperation};
use core_text::char_len;
use std::time::Instant;
use tracing::{debug, trace};

/// What the coordinator did with a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputDisposition {
    /// Echo of a programmatic write; the synthetic flag was consumed.
    SyntheticEcho,
    /// Intermediate composition input; mirrored only.
    Composing,
    /// Input landing right after a composition commit; mirrored only.
    CompositionTail,
    /// Content matched the cached value.
    Unchanged,
    /// A pre-edit snapshot was offered to history.
    Recorded,
    CompositionStarted,
    CompositionCommitted,
    /// Composition ended with no content change.
    CompositionCancelled,
    SelectionOnly,
}

pub fn handle_input(
    session: &mut EditorSession,
    event: &InputEvent,
    hooks: &mut dyn PresentationHooks,
) -> InputDisposition {
    handle_input_at(session, event, hooks, Instant::now())
}

/// Like [`handle_input`] with an explicit clock, for deterministic tests of
/// the post-composition window.
pub fn handle_input_at(
    session: &mut EditorSession,
    event: &InputEvent,
    hooks: &mut dyn PresentationHooks,
    now: Instant,
) -> InputDisposition {
    if session.composition_mut().tick(now) {
        trace!(target: "state.composition", "commit_window_expired");
    }
    let disposition = match event {
        InputEvent::Input(live) => on_input(session, live, now),
        InputEvent::CompositionStart(live) => on_composition_start(session, live),
        InputEvent::CompositionUpdate(live) => {
            if session.composition().is_active() {
                session.composition_mut().note_update();
                session.sync_live(live);
                InputDisposition::Composing
            } else {
                on_input(session, live, now)
            }
        }
        InputEvent::CompositionEnd(live) => on_composition_end(session, live, now),
        InputEvent::SelectionChanged(sel) => {
            session.buffer_mut().set_selection(*sel);
            InputDisposition::SelectionOnly
        }
    };
    debug!(target: "actions.input", kind = event.kind(), ?disposition, undo_depth = session.history().undo_depth(), "input_handled");
    hooks.on_buffer_changed(session.buffer().buffer(), session.selection());
    disposition
}

fn on_input(session: &mut EditorSession, live: &LiveState, now: Instant) -> InputDisposition {
    if session.take_synthetic() {
        session.sync_live(live);
        session.set_last_known(live.text.clone());
        session.refresh_dirty();
        return InputDisposition::SyntheticEcho;
    }
    if session.composition().is_active() {
        session.sync_live(live);
        return InputDisposition::Composing;
    }
    if session.composition().in_commit_window(now) {
        session.sync_live(live);
        session.set_last_known(live.text.clone());
        session.refresh_dirty();
        return InputDisposition::CompositionTail;
    }
    if session.last_known() == live.text {
        session.sync_live(live);
        return InputDisposition::Unchanged;
    }

    let old = session.last_known().to_string();
    let old_len = char_len(&old) as isize;
    let new_len = char_len(&live.text) as isize;
    let previous = (live.caret() as isize - (new_len - old_len)).clamp(0, old_len) as usize;
    session.record_snapshot(&old, previous);
    session.set_last_known(live.text.clone());
    session.sync_live(live);
    session.clear_redo();
    session.refresh_dirty();
    // a typed edit invalidates the copy/cut range memory
    session.set_last_operation(LastOperation::None);
    InputDisposition::Recorded
}

fn on_composition_start(session: &mut EditorSession, live: &LiveState) -> InputDisposition {
    // Anchor the pre-composition text when history lags it, so undoing the
    // committed text lands back here.
    let lagging = session
        .history()
        .top()
        .is_some_and(|top| top.content() != live.text);
    if lagging {
        session.record_snapshot(&live.text, live.caret());
    }
    session.composition_mut().start(&live.text, live.caret());
    session.sync_live(live);
    session.set_last_known(live.text.clone());
    InputDisposition::CompositionStarted
}

fn on_composition_end(
    session: &mut EditorSession,
    live: &LiveState,
    now: Instant,
) -> InputDisposition {
    let Some(start) = session.composition_mut().end() else {
        // stray end without a start: treat like ordinary input
        return on_input(session, live, now);
    };
    session.sync_live(live);
    session.set_last_known(live.text.clone());
    if live.text == start.content {
        trace!(target: "state.composition", "composition_cancelled");
        return InputDisposition::CompositionCancelled;
    }
    session.record_snapshot(&live.text, live.caret());
    session.clear_redo();
    session.refresh_dirty();
    let window = session.options().commit_window;
    session.composition_mut().arm_commit_window(now, window);
    InputDisposition::CompositionCommitted
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_events::NoopHooks;
    use core_state::SessionOptions;
    use core_text::Selection;
    use std::time::Duration;

    fn typed(session: &mut EditorSession, text: &str) -> InputDisposition {
        handle_input(
            session,
            &InputEvent::Input(LiveState::at_end(text)),
            &mut NoopHooks,
        )
    }

    #[test]
    fn typing_records_pre_edit_state() {
        let mut s = EditorSession::default();
        assert_eq!(typed(&mut s, "a"), InputDisposition::Recorded);
        // ("", 0) dedups against the initial snapshot
        assert_eq!(s.history().undo_depth(), 1);
        typed(&mut s, "ab");
        assert_eq!(s.history().top().unwrap().content(), "a");
        assert_eq!(s.history().top().unwrap().cursor(), 1);
        assert!(s.is_dirty());
    }

    #[test]
    fn unchanged_input_does_nothing() {
        let mut s = EditorSession::with_text("x", SessionOptions::default());
        assert_eq!(typed(&mut s, "x"), InputDisposition::Unchanged);
        assert_eq!(s.history().undo_depth(), 1);
    }

    #[test]
    fn synthetic_echo_is_not_recorded() {
        let mut s = EditorSession::default();
        typed(&mut s, "a");
        s.write_programmatic("zzz", Selection::caret(3));
        let depth = s.history().undo_depth();
        assert_eq!(typed(&mut s, "zzz"), InputDisposition::SyntheticEcho);
        assert_eq!(s.history().undo_depth(), depth);
        assert!(!s.synthetic_pending());
    }

    #[test]
    fn pre_edit_cursor_is_clamped() {
        let mut s = EditorSession::with_text("abcdef", SessionOptions::default());
        // delete four chars with the caret reported at 0
        let live = LiveState::new("ef", Selection::caret(0));
        handle_input(&mut s, &InputEvent::Input(live), &mut NoopHooks);
        let top = s.history().top().unwrap();
        assert_eq!(top.content(), "abcdef");
        assert_eq!(top.cursor(), 4);
        let live = LiveState::new("efgh", Selection::caret(1));
        handle_input(&mut s, &InputEvent::Input(live), &mut NoopHooks);
        assert_eq!(s.history().top().unwrap().cursor(), 0);
    }

    #[test]
    fn commit_window_suppresses_tail_input() {
        let opts = SessionOptions {
            commit_window: Duration::from_millis(100),
            ..SessionOptions::default()
        };
        let mut s = EditorSession::new(opts);
        let t0 = Instant::now();
        let mut hooks = NoopHooks;
        let start = InputEvent::CompositionStart(LiveState::default());
        handle_input_at(&mut s, &start, &mut hooks, t0);
        let end = InputEvent::CompositionEnd(LiveState::at_end("日"));
        handle_input_at(&mut s, &end, &mut hooks, t0);
        let depth = s.history().undo_depth();
        let tail = InputEvent::Input(LiveState::at_end("日"));
        let d = handle_input_at(&mut s, &tail, &mut hooks, t0 + Duration::from_millis(10));
        assert_eq!(d, InputDisposition::CompositionTail);
        assert_eq!(s.history().undo_depth(), depth);
        let later = InputEvent::Input(LiveState::at_end("日本"));
        let d = handle_input_at(&mut s, &later, &mut hooks, t0 + Duration::from_millis(500));
        assert_eq!(d, InputDisposition::Recorded);
    }

    #[test]
    fn cancelled_composition_records_nothing() {
        let mut s = EditorSession::with_text("ab", SessionOptions::default());
        let live = LiveState::at_end("ab");
        let depth = s.history().undo_depth();
        handle_input(&mut s, &InputEvent::CompositionStart(live.clone()), &mut NoopHooks);
        let d = handle_input(&mut s, &InputEvent::CompositionEnd(live), &mut NoopHooks);
        assert_eq!(d, InputDisposition::CompositionCancelled);
        assert_eq!(s.history().undo_depth(), depth);
        assert!(!s.is_dirty());
    }

    #[test]
    fn selection_change_moves_caret_only() {
        let mut s = EditorSession::with_text("hello", SessionOptions::default());
        let event = InputEvent::SelectionChanged(Selection::new(1, 3));
        let d = handle_input(&mut s, &event, &mut NoopHooks);
        assert_eq!(d, InputDisposition::SelectionOnly);
        assert_eq!(s.selection(), Selection::new(1, 3));
        assert_eq!(s.history().undo_depth(), 1);
    }
}
