//! Command layer and edit coordinator.
//!
//! * [`input`] reconciles raw host notifications with the session (typing,
//!   IME composition, synthetic echoes).
//! * [`dispatcher`] applies high-level [`Command`]s: clipboard ops, find /
//!   replace, file commands, undo / redo, navigation.
//! * [`key_translator`] maps keyboard shortcuts to commands.
//!
//! Everything mutates one `EditorSession` borrowed for the duration of a
//! call. Host services (presentation hooks, dialogs, file and clipboard I/O)
//! are passed in through [`HostContext`].

pub mod clipboard;
pub mod dispatcher;
pub mod error;
pub mod input;
pub mod io_ops;
pub mod key_translator;
pub mod search;

pub use clipboard::{ClipboardBackend, ClipboardChain, MemoryClipboard};
#[cfg(feature = "system-clipboard")]
pub use clipboard::SystemClipboard;
pub use core_events::{Command, MotionKind, Panel};
pub use dispatcher::{DispatchResult, ExitDecision, dispatch};
pub use error::{ClipboardError, CommandError, IoError, SearchError};
pub use input::{InputDisposition, handle_input, handle_input_at};
pub use io_ops::{FileIo, FsFileIo};
pub use key_translator::translate_key;

use core_events::{Dialogs, PresentationHooks};

/// Host-side services a command may need.
pub struct HostContext<'a> {
    pub hooks: &'a mut dyn PresentationHooks,
    pub dialogs: &'a mut dyn Dialogs,
    pub files: &'a dyn FileIo,
    pub clipboard: &'a mut ClipboardChain,
}
