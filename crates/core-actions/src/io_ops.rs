//! File I/O boundary.
//!
//! Files are round-tripped byte-for-byte as UTF-8 text; no line ending
//! normalization. Failures never touch the session: a read error leaves the
//! old document in place, a write error leaves the dirty flag set.

use crate::error::IoError;
use core_state::EditorSession;
use std::path::{Path, PathBuf};

/// Host file API. `FsFileIo` talks to the real filesystem; tests and
/// embedding hosts can substitute their own.
pub trait FileIo {
    fn read_file(&self, path: &Path) -> Result<String, IoError>;
    fn write_file(&self, path: &Path, text: &str) -> Result<(), IoError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FsFileIo;

impl FileIo for FsFileIo {
    fn read_file(&self, path: &Path) -> Result<String, IoError> {
        std::fs::read_to_string(path).map_err(|source| IoError::Read {
            path: path.to_path_buf(),
            source,
        })
    }

    fn write_file(&self, path: &Path, text: &str) -> Result<(), IoError> {
        std::fs::write(path, text.as_bytes()).map_err(|source| IoError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Read `path` and load it into the session (history reset, synthetic write).
pub fn open_file(
    session: &mut EditorSession,
    io: &dyn FileIo,
    path: &Path,
) -> Result<(), IoError> {
    match io.read_file(path) {
        Ok(content) => {
            tracing::info!(target: "io", path = %path.display(), chars = content.chars().count(), "file_opened");
            session.load_document(&content, Some(path.to_path_buf()));
            Ok(())
        }
        Err(e) => {
            tracing::error!(target: "io", error = %e, "file_open_error");
            Err(e)
        }
    }
}

/// Write the buffer to `target`, or to its bound path. On success the saved
/// baseline moves and the dirty flag clears.
pub fn write_file(
    session: &mut EditorSession,
    io: &dyn FileIo,
    target: Option<&Path>,
) -> Result<PathBuf, IoError> {
    let path = match target {
        Some(p) => p.to_path_buf(),
        None => match session.buffer().file_path() {
            Some(existing) => existing.to_path_buf(),
            None => return Err(IoError::NoPath),
        },
    };
    let content = session.text();
    match io.write_file(&path, &content) {
        Ok(()) => {
            session.buffer_mut().mark_saved(Some(path.clone()));
            tracing::info!(target: "io", path = %path.display(), bytes = content.len(), "file_saved");
            Ok(path)
        }
        Err(e) => {
            tracing::error!(target: "io", error = %e, "file_write_error");
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_state::SessionOptions;
    use core_text::Selection;

    #[test]
    fn open_file_loads_raw_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.txt");
        std::fs::write(&path, "line1\r\nline2\n").unwrap();
        let mut session = EditorSession::default();
        open_file(&mut session, &FsFileIo, &path).unwrap();
        assert_eq!(session.text(), "line1\r\nline2\n");
        assert_eq!(session.buffer().file_path(), Some(path.as_path()));
        assert!(session.synthetic_pending());
        assert!(!session.is_dirty());
    }

    #[test]
    fn open_missing_file_leaves_session_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = EditorSession::with_text("keep", SessionOptions::default());
        let err = open_file(&mut session, &FsFileIo, &dir.path().join("nope.txt"));
        assert!(matches!(err, Err(IoError::Read { .. })));
        assert_eq!(session.text(), "keep");
        assert!(!session.synthetic_pending());
    }

    #[test]
    fn write_file_clears_dirty_and_binds_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let mut session = EditorSession::default();
        session.write_programmatic("a\nb\n", Selection::caret(4));
        assert!(session.is_dirty());
        let written = write_file(&mut session, &FsFileIo, Some(&path)).unwrap();
        assert_eq!(written, path);
        assert!(!session.is_dirty());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a\nb\n");
    }

    #[test]
    fn write_file_without_path_is_no_path() {
        let mut session = EditorSession::default();
        session.write_programmatic("x", Selection::caret(1));
        let res = write_file(&mut session, &FsFileIo, None);
        assert!(matches!(res, Err(IoError::NoPath)));
        assert!(session.is_dirty(), "dirty unchanged when no path");
    }

    #[test]
    fn write_failure_keeps_dirty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing_dir").join("out.txt");
        let mut session = EditorSession::default();
        session.write_programmatic("x", Selection::caret(1));
        let res = write_file(&mut session, &FsFileIo, Some(&path));
        assert!(matches!(res, Err(IoError::Write { .. })));
        assert!(session.is_dirty());
        assert!(session.buffer().file_path().is_none());
    }
}
