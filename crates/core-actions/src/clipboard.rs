//! Clipboard backend chain.
//!
//! Backends are tried in order. A write lands in the first backend that
//! accepts it; reads start from whichever backend accepted the last write so
//! copy/paste stays coherent when the system clipboard is flaky. Exhausting
//! every backend yields `ClipboardError::Unavailable`.

use crate::error::ClipboardError;
use tracing::{debug, warn};

pub trait ClipboardBackend {
    fn name(&self) -> &'static str;
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
    fn read_text(&mut self) -> Result<String, ClipboardError>;
}

/// In-process clipboard; always available.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: String,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClipboardBackend for MemoryClipboard {
    fn name(&self) -> &'static str {
        "memory"
    }
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.contents.clear();
        self.contents.push_str(text);
        Ok(())
    }
    fn read_text(&mut self) -> Result<String, ClipboardError> {
        Ok(self.contents.clone())
    }
}

/// OS clipboard through `arboard`. The handle is opened lazily and dropped
/// again after a failure so a later attempt can reconnect.
#[cfg(feature = "system-clipboard")]
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

#[cfg(feature = "system-clipboard")]
impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    fn handle(&mut self) -> Result<&mut arboard::Clipboard, ClipboardError> {
        if self.inner.is_none() {
            self.inner = Some(arboard::Clipboard::new().map_err(map_arboard)?);
        }
        self.inner.as_mut().ok_or(ClipboardError::Unavailable)
    }
}

#[cfg(feature = "system-clipboard")]
fn map_arboard(err: arboard::Error) -> ClipboardError {
    match err {
        arboard::Error::ClipboardNotSupported => ClipboardError::Unavailable,
        arboard::Error::ClipboardOccupied => ClipboardError::Denied { backend: "system" },
        other => ClipboardError::Backend {
            backend: "system",
            message: other.to_string(),
        },
    }
}

#[cfg(feature = "system-clipboard")]
impl ClipboardBackend for SystemClipboard {
    fn name(&self) -> &'static str {
        "system"
    }
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        let res = self.handle()?.set_text(text).map_err(map_arboard);
        if res.is_err() {
            self.inner = None;
        }
        res
    }
    fn read_text(&mut self) -> Result<String, ClipboardError> {
        let res = self.handle()?.get_text().map_err(map_arboard);
        if res.is_err() {
            self.inner = None;
        }
        res
    }
}

pub struct ClipboardChain {
    backends: Vec<Box<dyn ClipboardBackend>>,
    /// Index of the backend that accepted the most recent write.
    last_writer: Option<usize>,
}

impl ClipboardChain {
    pub fn new(backends: Vec<Box<dyn ClipboardBackend>>) -> Self {
        Self {
            backends,
            last_writer: None,
        }
    }

    /// System clipboard (when compiled in) backed by the in-process fallback.
    pub fn with_defaults() -> Self {
        let mut backends: Vec<Box<dyn ClipboardBackend>> = Vec::new();
        #[cfg(feature = "system-clipboard")]
        backends.push(Box::new(SystemClipboard::new()));
        backends.push(Box::new(MemoryClipboard::new()));
        Self::new(backends)
    }

    pub fn memory_only() -> Self {
        Self::new(vec![Box::new(MemoryClipboard::new())])
    }

    pub fn backend_names(&self) -> Vec<&'static str> {
        self.backends.iter().map(|b| b.name()).collect()
    }

    pub fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        for (idx, backend) in self.backends.iter_mut().enumerate() {
            match backend.write_text(text) {
                Ok(()) => {
                    self.last_writer = Some(idx);
                    debug!(target: "actions.clipboard", backend = backend.name(), chars = text.chars().count(), "clipboard_write");
                    return Ok(());
                }
                Err(e) => {
                    warn!(target: "actions.clipboard", backend = backend.name(), error = %e, "clipboard_write_fallback");
                }
            }
        }
        warn!(target: "actions.clipboard", "clipboard_write_exhausted");
        Err(ClipboardError::Unavailable)
    }

    pub fn read_text(&mut self) -> Result<String, ClipboardError> {
        let n = self.backends.len();
        let first = self.last_writer.unwrap_or(0);
        for step in 0..n {
            let idx = (first + step) % n;
            let backend = &mut self.backends[idx];
            match backend.read_text() {
                Ok(text) => {
                    debug!(target: "actions.clipboard", backend = backend.name(), chars = text.chars().count(), "clipboard_read");
                    return Ok(text);
                }
                Err(e) => {
                    warn!(target: "actions.clipboard", backend = backend.name(), error = %e, "clipboard_read_fallback");
                }
            }
        }
        warn!(target: "actions.clipboard", "clipboard_read_exhausted");
        Err(ClipboardError::Unavailable)
    }
}

impl Default for ClipboardChain {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Broken;

    impl ClipboardBackend for Broken {
        fn name(&self) -> &'static str {
            "broken"
        }
        fn write_text(&mut self, _text: &str) -> Result<(), ClipboardError> {
            Err(ClipboardError::Denied { backend: "broken" })
        }
        fn read_text(&mut self) -> Result<String, ClipboardError> {
            Err(ClipboardError::Denied { backend: "broken" })
        }
    }

    #[test]
    fn falls_back_to_next_backend() {
        let mut chain =
            ClipboardChain::new(vec![Box::new(Broken), Box::new(MemoryClipboard::new())]);
        chain.write_text("hi").unwrap();
        assert_eq!(chain.read_text().unwrap(), "hi");
    }

    #[test]
    fn exhausted_chain_is_unavailable() {
        let mut chain = ClipboardChain::new(vec![Box::new(Broken)]);
        assert!(matches!(chain.write_text("x"), Err(ClipboardError::Unavailable)));
        assert!(matches!(chain.read_text(), Err(ClipboardError::Unavailable)));
    }

    #[test]
    fn empty_chain_is_unavailable() {
        let mut chain = ClipboardChain::new(Vec::new());
        assert!(matches!(chain.read_text(), Err(ClipboardError::Unavailable)));
    }

    #[test]
    fn reads_prefer_last_writer() {
        let mut chain = ClipboardChain::new(vec![
            Box::new(MemoryClipboard::new()),
            Box::new(MemoryClipboard::new()),
        ]);
        chain.write_text("first").unwrap();
        assert_eq!(chain.read_text().unwrap(), "first");
        assert_eq!(chain.backend_names(), vec!["memory", "memory"]);
    }
}
