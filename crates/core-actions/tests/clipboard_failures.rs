mod common;
use common::*;

use core_actions::{ClipboardChain, Command, MemoryClipboard};
use core_events::NoticeLevel;
use core_state::{EditorSession, LastOperation, SessionOptions};
use std::io;
use std::sync::{Arc, Mutex};
use tracing::subscriber::with_default;

#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn denied_only() -> ClipboardChain {
    ClipboardChain::new(vec![Box::new(DeniedClipboard)])
}

#[test]
fn failed_cut_leaves_buffer_and_history() {
    let mut h = Harness::new(EditorSession::with_text("hello", SessionOptions::default()))
        .with_clipboard(denied_only());
    h.select(0, 5);
    let result = h.run(Command::Cut);
    assert!(!result.dirty);
    assert_eq!(h.text(), "hello");
    assert_eq!(h.session.history().undo_depth(), 1);
    assert!(!h.session.is_dirty());
    assert!(!h.session.synthetic_pending());
    assert_eq!(h.hooks.notices.len(), 1);
    assert_eq!(h.hooks.notices[0].level, NoticeLevel::Error);
}

#[test]
fn failed_paste_keeps_history_and_memory() {
    let mut h = Harness::new(EditorSession::with_text("abc", SessionOptions::default()))
        .with_clipboard(denied_only());
    h.session.set_last_operation(LastOperation::AfterCut { pos: 1 });
    h.run(Command::Paste);
    assert_eq!(h.text(), "abc");
    assert_eq!(h.session.history().undo_depth(), 1);
    assert_eq!(h.session.last_operation(), LastOperation::AfterCut { pos: 1 });
}

#[test]
fn failed_copy_forgets_selection_memory() {
    let mut h = Harness::new(EditorSession::with_text("abc", SessionOptions::default()))
        .with_clipboard(denied_only());
    h.select(0, 2);
    h.run(Command::Copy);
    assert_eq!(h.session.last_operation(), LastOperation::None);
    assert_eq!(h.hooks.notices.len(), 1);
}

#[test]
fn denied_system_clipboard_falls_back_to_memory() {
    let chain = ClipboardChain::new(vec![
        Box::new(DeniedClipboard),
        Box::new(MemoryClipboard::new()),
    ]);
    let mut h = Harness::new(EditorSession::with_text("abc", SessionOptions::default()))
        .with_clipboard(chain);
    h.select(0, 3);
    h.run(Command::Cut);
    assert_eq!(h.text(), "");
    h.run(Command::Paste);
    assert_eq!(h.text(), "abc");
    assert!(h.hooks.notices.is_empty());
}

#[test]
fn copy_does_not_touch_history() {
    let mut h = Harness::new(EditorSession::with_text("abc", SessionOptions::default()));
    h.select(1, 3);
    let result = h.run(Command::Copy);
    assert!(!result.dirty);
    assert_eq!(h.session.history().undo_depth(), 1);
    assert_eq!(h.session.last_operation(), LastOperation::AfterCopy { start: 1, end: 3 });
}

#[test]
fn empty_clipboard_paste_is_a_no_op() {
    let mut h = Harness::new(EditorSession::with_text("abc def", SessionOptions::default()));
    h.select(0, 3);
    h.run(Command::Copy);
    h.clipboard.write_text("").unwrap();
    let result = h.run(Command::Paste);
    assert!(!result.dirty);
    assert_eq!(h.text(), "abc def");
    assert_eq!(h.session.history().undo_depth(), 1);
    assert_eq!(h.session.last_operation(), LastOperation::AfterCopy { start: 0, end: 3 });
}

#[test]
fn write_fallback_is_logged_per_failed_backend() {
    let logs = LogBuffer::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_target(true)
        .with_ansi(false)
        .without_time()
        .with_writer(move || writer.clone())
        .finish();
    let mut chain = ClipboardChain::new(vec![
        Box::new(DeniedClipboard),
        Box::new(MemoryClipboard::new()),
    ]);

    with_default(subscriber, || chain.write_text("x")).unwrap();

    let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
    assert!(output.contains("WARN actions.clipboard:"));
    assert!(output.contains("clipboard_write_fallback"));
    assert!(output.contains("denied"));
    assert_eq!(output.lines().count(), 1);
}
