//! Model of the host text widget's state.
//!
//! `LiveState` is what the widget reports on each notification. The helpers
//! reproduce what a plain textarea does for a keystroke so hosts without a
//! real widget (the headless driver, tests) can produce faithful events.

use core_text::{Selection, byte_index, char_len};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LiveState {
    pub text: String,
    pub selection: Selection,
}

impl LiveState {
    pub fn new(text: impl Into<String>, selection: Selection) -> Self {
        let text = text.into();
        let selection = selection.clamp_to(char_len(&text));
        Self { text, selection }
    }

    /// Caret at the end of `text`.
    pub fn at_end(text: impl Into<String>) -> Self {
        let text = text.into();
        let end = char_len(&text);
        Self {
            text,
            selection: Selection::caret(end),
        }
    }

    pub fn caret(&self) -> usize {
        self.selection.start
    }

    /// Replace the selection with `s`, leaving the caret after it.
    pub fn insert(&self, s: &str) -> Self {
        let start = byte_index(&self.text, self.selection.start);
        let end = byte_index(&self.text, self.selection.end);
        let mut text = String::with_capacity(self.text.len() + s.len());
        text.push_str(&self.text[..start]);
        text.push_str(s);
        text.push_str(&self.text[end..]);
        let caret = self.selection.start + char_len(s);
        Self {
            text,
            selection: Selection::caret(caret),
        }
    }

    /// Delete the selection, or the char before the caret when empty.
    pub fn backspace(&self) -> Self {
        let sel = if self.selection.is_empty() {
            if self.selection.start == 0 {
                return self.clone();
            }
            Selection::new(self.selection.start - 1, self.selection.start)
        } else {
            self.selection
        };
        let start = byte_index(&self.text, sel.start);
        let end = byte_index(&self.text, sel.end);
        let mut text = self.text.clone();
        text.replace_range(start..end, "");
        Self {
            text,
            selection: Selection::caret(sel.start),
        }
    }

    pub fn with_selection(&self, selection: Selection) -> Self {
        Self::new(self.text.clone(), selection)
    }
}
