//! Configuration loading and parsing.
//!
//! Parses `sert.toml` (or an override path provided by the binary). Every
//! section is optional; unknown fields are ignored so older binaries accept
//! newer files. A missing file or a parse error falls back to defaults.
//!
//! ```toml
//! [history]
//! max_undo = 50
//! redo_cap = "match_undo"   # or "unbounded"
//!
//! [composition]
//! commit_window_ms = 100
//!
//! [search]
//! regex = false
//! case_sensitive = false
//!
//! [log]
//! filter = "info"
//! ```

use anyhow::Result;
use serde::Deserialize;
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::{info, warn};

/// Smallest history that can still undo one step (initial state + one edit).
pub const MIN_UNDO_DEPTH: usize = 2;

/// Policy for the redo stack bound.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RedoCapSetting {
    /// Cap redo at the same depth as undo.
    #[default]
    MatchUndo,
    Unbounded,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HistoryConfig {
    #[serde(default = "HistoryConfig::default_max_undo")]
    pub max_undo: usize,
    #[serde(default)]
    pub redo_cap: RedoCapSetting,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_undo: Self::default_max_undo(),
            redo_cap: RedoCapSetting::default(),
        }
    }
}

impl HistoryConfig {
    const fn default_max_undo() -> usize {
        50
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CompositionConfig {
    #[serde(default = "CompositionConfig::default_commit_window_ms")]
    pub commit_window_ms: u64,
}

impl Default for CompositionConfig {
    fn default() -> Self {
        Self {
            commit_window_ms: Self::default_commit_window_ms(),
        }
    }
}

impl CompositionConfig {
    const fn default_commit_window_ms() -> u64 {
        100
    }

    pub fn commit_window(&self) -> Duration {
        Duration::from_millis(self.commit_window_ms)
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct SearchConfig {
    #[serde(default)]
    pub regex: bool,
    #[serde(default)]
    pub case_sensitive: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    #[serde(default = "LogConfig::default_filter")]
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: Self::default_filter(),
        }
    }
}

impl LogConfig {
    fn default_filter() -> String {
        "info".to_string()
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ConfigFile {
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub composition: CompositionConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub file: ConfigFile,
    /// Path the settings were read from; `None` when running on defaults.
    pub source: Option<PathBuf>,
}

/// Best-effort config path: local `sert.toml`, then the platform config dir.
pub fn discover() -> PathBuf {
    let local = PathBuf::from("sert.toml");
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("sert").join("sert.toml");
    }
    PathBuf::from("sert.toml")
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        info!(target: "config", path = %path.display(), "config_missing_using_defaults");
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            info!(target: "config", path = %path.display(), "config_loaded");
            Ok(Config {
                file,
                source: Some(path),
            })
        }
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_error_using_defaults");
            Ok(Config::default())
        }
    }
}

impl Config {
    /// Effective undo depth. Values below [`MIN_UNDO_DEPTH`] are raised so
    /// the initial snapshot never fills the whole history.
    pub fn effective_max_undo(&self) -> usize {
        let raw = self.file.history.max_undo;
        if raw < MIN_UNDO_DEPTH {
            info!(
                target: "config",
                raw,
                clamped = MIN_UNDO_DEPTH,
                "history_max_undo_clamped"
            );
            return MIN_UNDO_DEPTH;
        }
        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex, MutexGuard};
    use tracing::Level;
    use tracing::subscriber::with_default;
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone)]
    struct BufferWriter {
        inner: Arc<Mutex<Vec<u8>>>,
    }

    impl BufferWriter {
        fn new() -> (Self, Arc<Mutex<Vec<u8>>>) {
            let buf = Arc::new(Mutex::new(Vec::new()));
            (Self { inner: buf.clone() }, buf)
        }
    }

    struct LockedWriter<'a> {
        guard: MutexGuard<'a, Vec<u8>>,
    }

    impl Write for LockedWriter<'_> {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.guard.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for BufferWriter {
        type Writer = LockedWriter<'a>;

        fn make_writer(&'a self) -> Self::Writer {
            LockedWriter {
                guard: self.inner.lock().expect("log buffer poisoned"),
            }
        }
    }

    #[test]
    fn default_config_when_missing_file() {
        let cfg = load_from(Some(PathBuf::from("__nonexistent_hopefully__.toml"))).unwrap();
        assert_eq!(cfg.file.history.max_undo, 50);
        assert_eq!(cfg.file.history.redo_cap, RedoCapSetting::MatchUndo);
        assert_eq!(cfg.file.composition.commit_window(), Duration::from_millis(100));
        assert!(!cfg.file.search.regex);
        assert_eq!(cfg.file.log.filter, "info");
        assert!(cfg.source.is_none());
    }

    #[test]
    fn parses_history_and_composition_sections() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(
            tmp.path(),
            "[history]\nmax_undo = 10\nredo_cap = \"unbounded\"\n[composition]\ncommit_window_ms = 40\n",
        )
        .unwrap();
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.file.history.max_undo, 10);
        assert_eq!(cfg.file.history.redo_cap, RedoCapSetting::Unbounded);
        assert_eq!(cfg.file.composition.commit_window_ms, 40);
        assert_eq!(cfg.effective_max_undo(), 10);
        assert_eq!(cfg.source.as_deref(), Some(tmp.path()));
    }

    #[test]
    fn parse_error_falls_back_to_defaults() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "[history\nmax_undo = ").unwrap();
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.file.history.max_undo, 50);
        assert!(cfg.source.is_none());
    }

    #[test]
    fn parses_search_flags_ignoring_unknown_fields() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(
            tmp.path(),
            "[search]\nregex = true\ncase_sensitive = true\nfuture = 1\n[theme]\nname = \"dark\"\n",
        )
        .unwrap();
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert!(cfg.file.search.regex);
        assert!(cfg.file.search.case_sensitive);
    }

    #[test]
    fn clamp_logging_uses_config_target() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "[history]\nmax_undo = 0\n").unwrap();
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        let (writer, buffer) = BufferWriter::new();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::INFO)
            .with_target(true)
            .with_ansi(false)
            .without_time()
            .with_writer(writer)
            .finish();

        let eff = with_default(subscriber, || cfg.effective_max_undo());

        let log_output = String::from_utf8(buffer.lock().unwrap().clone()).unwrap();
        assert!(log_output.contains("INFO config:"));
        assert!(log_output.contains("history_max_undo_clamped"));
        assert_eq!(eff, MIN_UNDO_DEPTH);
    }
}
