//! Typed failures surfaced by the command layer.
//!
//! None of these ever reach the edit coordinator: the command that hit the
//! failure reports it through `PresentationHooks::notify` and returns.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClipboardError {
    /// No backend in the chain could service the request.
    #[error("clipboard unavailable")]
    Unavailable,
    #[error("clipboard access denied ({backend})")]
    Denied { backend: &'static str },
    #[error("clipboard backend {backend} failed: {message}")]
    Backend {
        backend: &'static str,
        message: String,
    },
}

#[derive(Debug, Error)]
pub enum IoError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("buffer has no file path")]
    NoPath,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("search pattern is empty")]
    EmptyPattern,
    #[error("invalid pattern {pattern:?}: {message}")]
    InvalidRegex { pattern: String, message: String },
    #[error("no active match")]
    NoMatch,
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Clipboard(#[from] ClipboardError),
    #[error(transparent)]
    Io(#[from] IoError),
    #[error(transparent)]
    Search(#[from] SearchError),
}
