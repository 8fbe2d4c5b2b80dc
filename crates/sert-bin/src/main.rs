//! sert entrypoint: a headless host for the editor core.
//!
//! Reads one gesture per line from `--script` (or stdin) and drives the
//! session through the same coordinator and command layer a GUI host uses.
use anyhow::Result;
use clap::{Parser, ValueEnum};
use core_actions::{ClipboardChain, FsFileIo, io_ops};
use core_config::{Config, RedoCapSetting, load_from};
use core_events::DialogChoice;
use core_state::{EditorSession, RedoCap, SessionOptions};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;

mod host;
mod script;

use script::ScriptHost;

/// Answer given to "unsaved changes" prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum UnsavedPolicy {
    Save,
    Discard,
    Cancel,
}

impl From<UnsavedPolicy> for DialogChoice {
    fn from(p: UnsavedPolicy) -> Self {
        match p {
            UnsavedPolicy::Save => DialogChoice::SaveAndProceed,
            UnsavedPolicy::Discard => DialogChoice::Discard,
            UnsavedPolicy::Cancel => DialogChoice::Cancel,
        }
    }
}

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "sert", version, about = "Headless plain-text editor core")]
struct Args {
    /// Optional file to open at startup.
    pub path: Option<PathBuf>,
    /// Configuration file (overrides discovery of `sert.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
    /// Read commands from this file instead of stdin.
    #[arg(long = "script")]
    pub script: Option<PathBuf>,
    /// How to answer unsaved-changes prompts.
    #[arg(long = "on-unsaved", value_enum, default_value_t = UnsavedPolicy::Cancel)]
    pub on_unsaved: UnsavedPolicy,
    /// Skip the OS clipboard and use the in-process one only.
    #[arg(long = "memory-clipboard")]
    pub memory_clipboard: bool,
}

fn configure_logging(filter: &str) -> Option<WorkerGuard> {
    let log_dir = Path::new(".");
    let log_path = log_dir.join("sert.log");
    if log_path.exists() {
        let _ = std::fs::remove_file(&log_path);
    }

    let file_appender = tracing_appender::rolling::never(log_dir, "sert.log");
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));
    match tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(nb_writer)
        .with_ansi(false)
        .try_init()
    {
        Ok(_) => Some(guard),
        // Global subscriber already installed; dropping the guard shuts the writer down.
        Err(_) => None,
    }
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            tracing::error!(target: "runtime.panic", ?info, "panic");
            default_panic(info);
        }));
    });
}

fn session_options(config: &Config) -> SessionOptions {
    SessionOptions {
        max_undo: config.effective_max_undo(),
        redo_cap: match config.file.history.redo_cap {
            RedoCapSetting::MatchUndo => RedoCap::MatchUndo,
            RedoCapSetting::Unbounded => RedoCap::Unbounded,
        },
        commit_window: config.file.composition.commit_window(),
    }
}

fn build_session(args: &Args, config: &Config) -> EditorSession {
    let mut session = EditorSession::new(session_options(config));
    {
        let search = session.search_mut();
        search.regex = config.file.search.regex;
        search.case_sensitive = config.file.search.case_sensitive;
    }
    if let Some(path) = args.path.as_ref() {
        if let Err(e) = io_ops::open_file(&mut session, &FsFileIo, path) {
            error!(target: "runtime", error = %e, "startup_open_failed");
            eprintln!("sert: {e}");
        }
        // No widget exists yet to echo the load.
        session.take_synthetic();
    }
    session
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_from(args.config.clone())?;
    let _log_guard = configure_logging(&config.file.log.filter);
    install_panic_hook();

    info!(
        target: "runtime",
        config = ?config.source,
        path = ?args.path,
        script = ?args.script,
        "startup"
    );

    let session = build_session(&args, &config);
    let clipboard = if args.memory_clipboard {
        ClipboardChain::memory_only()
    } else {
        ClipboardChain::with_defaults()
    };
    let stdout = std::io::stdout();
    let mut host = ScriptHost::new(session, stdout.lock(), args.on_unsaved.into(), clipboard);

    let flow = match args.script.as_ref() {
        Some(path) => host.run(BufReader::new(File::open(path)?))?,
        None => host.run(std::io::stdin().lock())?,
    };
    host.hooks.out.flush()?;
    info!(target: "runtime", ?flow, dirty = host.session.is_dirty(), "shutdown");
    Ok(())
}
