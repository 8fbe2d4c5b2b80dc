//! Line-driven host loop.
//!
//! Each line is one user gesture. Text-producing lines (`type`, `backspace`,
//! `compose`) are turned into the notifications a textarea would fire and fed
//! to the edit coordinator; everything else becomes a `Command`. After any
//! command that wrote the buffer programmatically the host echoes an input
//! notification, exactly as a real widget does.

use crate::host::{ScriptDialogs, TextHooks};
use anyhow::{Context, Result, anyhow, bail};
use core_actions::{
    ClipboardChain, Command, DispatchResult, FsFileIo, HostContext, dispatch, handle_input,
    translate_key,
};
use core_events::{DialogChoice, InputEvent, Key, KeyChord, KeyModifiers, LiveState, status_of};
use core_state::EditorSession;
use core_text::Selection;
use std::io::{BufRead, Write};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct ScriptHost<W: Write> {
    pub session: EditorSession,
    pub hooks: TextHooks<W>,
    pub dialogs: ScriptDialogs,
    pub clipboard: ClipboardChain,
}

impl<W: Write> ScriptHost<W> {
    pub fn new(
        session: EditorSession,
        out: W,
        on_unsaved: DialogChoice,
        clipboard: ClipboardChain,
    ) -> Self {
        Self {
            session,
            hooks: TextHooks::new(out),
            dialogs: ScriptDialogs::new(on_unsaved),
            clipboard,
        }
    }

    fn live(&self) -> LiveState {
        LiveState::new(self.session.text(), self.session.selection())
    }

    fn deliver(&mut self, event: InputEvent) {
        handle_input(&mut self.session, &event, &mut self.hooks);
    }

    fn command(&mut self, command: Command) -> DispatchResult {
        let mut ctx = HostContext {
            hooks: &mut self.hooks,
            dialogs: &mut self.dialogs,
            files: &FsFileIo,
            clipboard: &mut self.clipboard,
        };
        let result = dispatch(command, &mut self.session, &mut ctx);
        if self.session.synthetic_pending() {
            let echo = self.live();
            self.deliver(InputEvent::Input(echo));
        }
        result
    }

    fn compose(&mut self, candidates: &[&str]) -> Result<()> {
        let Some((last, intermediate)) = candidates.split_last() else {
            bail!("compose needs at least one candidate");
        };
        let start = self.live();
        self.deliver(InputEvent::CompositionStart(start.clone()));
        for c in intermediate {
            self.deliver(InputEvent::CompositionUpdate(start.insert(&unescape(c))));
        }
        self.deliver(InputEvent::CompositionEnd(start.insert(&unescape(last))));
        Ok(())
    }

    fn write_status(&mut self) -> Result<()> {
        let status = status_of(self.session.buffer().buffer(), self.session.selection());
        let history = self.session.history();
        writeln!(
            self.hooks.out,
            "{}{} | {} | undo {} redo {}",
            self.session.buffer().display_name(),
            if self.session.is_dirty() { " *" } else { "" },
            status,
            history.undo_depth(),
            history.redo_depth(),
        )?;
        Ok(())
    }

    /// Execute one script line.
    pub fn run_line(&mut self, line: &str) -> Result<Flow> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() || line.trim_start().starts_with('#') {
            return Ok(Flow::Continue);
        }
        let (verb, rest) = line.split_once(' ').unwrap_or((line, ""));
        tracing::trace!(target: "runtime", verb, "script_line");
        match verb {
            "type" => {
                let next = self.live().insert(&unescape(rest));
                self.deliver(InputEvent::Input(next));
            }
            "backspace" => {
                let next = self.live().backspace();
                self.deliver(InputEvent::Input(next));
            }
            "compose" => {
                let parts: Vec<&str> = rest.split_whitespace().collect();
                self.compose(&parts)?;
            }
            "select" => {
                let (a, b) = rest
                    .split_once(' ')
                    .ok_or_else(|| anyhow!("usage: select START END"))?;
                let a: usize = a.trim().parse().context("select start")?;
                let b: usize = b.trim().parse().context("select end")?;
                self.deliver(InputEvent::SelectionChanged(Selection::new(a, b)));
            }
            "select-all" => {
                self.command(Command::SelectAll);
            }
            "undo" => {
                self.command(Command::Undo);
            }
            "redo" => {
                self.command(Command::Redo);
            }
            "cut" => {
                self.command(Command::Cut);
            }
            "copy" => {
                self.command(Command::Copy);
            }
            "paste" => {
                self.command(Command::Paste);
            }
            "find" => {
                self.command(Command::Find(unescape(rest)));
            }
            "next" => {
                self.command(Command::FindNext);
            }
            "prev" => {
                self.command(Command::FindPrevious);
            }
            "replace" => {
                self.command(Command::ReplaceCurrent(unescape(rest)));
            }
            "replace-all" => {
                self.command(Command::ReplaceAll(unescape(rest)));
            }
            "new" => {
                self.command(Command::NewFile);
            }
            "open" => {
                self.dialogs.next_open = Some(path_arg(rest)?);
                self.command(Command::OpenFile);
            }
            "save" => {
                self.command(Command::Save);
            }
            "save-as" => {
                self.dialogs.next_save = Some(path_arg(rest)?);
                self.command(Command::SaveAs);
            }
            "key" => {
                let chord = parse_chord(rest.trim())?;
                let command =
                    translate_key(&chord).ok_or_else(|| anyhow!("no binding for {}", rest.trim()))?;
                if self.command(command).quit {
                    return Ok(Flow::Quit);
                }
            }
            "print" => {
                let text = self.session.text();
                writeln!(self.hooks.out, "{text}")?;
            }
            "status" => self.write_status()?,
            "quit" => {
                if self.command(Command::Exit).quit {
                    return Ok(Flow::Quit);
                }
            }
            other => bail!("unknown command: {other}"),
        }
        Ok(Flow::Continue)
    }

    /// Run lines until `quit` succeeds or input ends. Bad lines are reported
    /// and skipped.
    pub fn run<R: BufRead>(&mut self, reader: R) -> Result<Flow> {
        for line in reader.lines() {
            let line = line?;
            match self.run_line(&line) {
                Ok(Flow::Quit) => return Ok(Flow::Quit),
                Ok(Flow::Continue) => {}
                Err(e) => {
                    tracing::warn!(target: "runtime", error = %e, line = line.as_str(), "script_line_failed");
                    writeln!(self.hooks.out, "error: {e:#}")?;
                }
            }
        }
        Ok(Flow::Continue)
    }
}

fn path_arg(rest: &str) -> Result<PathBuf> {
    let trimmed = rest.trim();
    if trimmed.is_empty() {
        bail!("missing path");
    }
    Ok(PathBuf::from(trimmed))
}

/// `\n`, `\t` and `\\` escapes so scripts can type control characters.
fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('s') => out.push(' '),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

/// Parse `ctrl+shift+z`, `home`, `shift+f3` style chords.
fn parse_chord(text: &str) -> Result<KeyChord> {
    let mut mods = KeyModifiers::empty();
    let mut key = None;
    for part in text.split('+') {
        let lower = part.to_ascii_lowercase();
        match lower.as_str() {
            "ctrl" => mods |= KeyModifiers::CTRL,
            "alt" => mods |= KeyModifiers::ALT,
            "shift" => mods |= KeyModifiers::SHIFT,
            "meta" | "cmd" => mods |= KeyModifiers::META,
            "home" => key = Some(Key::Home),
            "end" => key = Some(Key::End),
            "esc" => key = Some(Key::Escape),
            f if f.len() > 1 && f.starts_with('f') => {
                let n: u8 = f[1..].parse().with_context(|| format!("bad key {part}"))?;
                key = Some(Key::F(n));
            }
            _ => {
                let mut chars = lower.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => key = Some(Key::Char(c)),
                    _ => bail!("bad key {part}"),
                }
            }
        }
    }
    let key = key.ok_or_else(|| anyhow!("chord {text:?} has no key"))?;
    Ok(KeyChord::new(key, mods))
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_state::SessionOptions;
    use pretty_assertions::assert_eq;

    fn host() -> ScriptHost<Vec<u8>> {
        ScriptHost::new(
            EditorSession::new(SessionOptions::default()),
            Vec::new(),
            DialogChoice::Discard,
            ClipboardChain::memory_only(),
        )
    }

    fn output(h: &ScriptHost<Vec<u8>>) -> String {
        String::from_utf8_lossy(&h.hooks.out).into_owned()
    }

    #[test]
    fn typing_and_undo_through_script() {
        let mut h = host();
        let script = "type a\ntype b\ntype c\nundo\nundo\nprint\n";
        h.run(script.as_bytes()).unwrap();
        assert_eq!(output(&h), "a\n");
    }

    #[test]
    fn compose_commits_once() {
        let mut h = host();
        h.run("compose n に 日\n".as_bytes()).unwrap();
        assert_eq!(h.session.text(), "日");
        assert_eq!(h.session.history().undo_depth(), 2);
    }

    #[test]
    fn cut_paste_round_trip() {
        let mut h = host();
        h.run("type hello\nselect 0 5\ncut\npaste\nprint\n".as_bytes())
            .unwrap();
        assert_eq!(output(&h), "hello\n");
    }

    #[test]
    fn key_chords_dispatch_commands() {
        let mut h = host();
        h.run("type ab\nkey ctrl+z\nprint\nkey ctrl+shift+z\nprint\n".as_bytes())
            .unwrap();
        assert_eq!(output(&h), "\nab\n");
    }

    #[test]
    fn quit_stops_the_loop_when_clean() {
        let mut h = host();
        let flow = h.run("quit\ntype never\n".as_bytes()).unwrap();
        assert_eq!(flow, Flow::Quit);
        assert_eq!(h.session.text(), "");
    }

    #[test]
    fn unknown_command_is_reported_and_skipped() {
        let mut h = host();
        h.run("frobnicate\ntype x\nprint\n".as_bytes()).unwrap();
        assert_eq!(output(&h), "error: unknown command: frobnicate\nx\n");
    }

    #[test]
    fn save_as_and_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.txt");
        let mut h = host();
        let script = format!(
            "type line one\\nline two\nsave-as {p}\nnew\nopen {p}\nprint\nstatus\n",
            p = path.display()
        );
        h.run(script.as_bytes()).unwrap();
        let out = output(&h);
        assert!(out.starts_with("line one\nline two\n"));
        assert!(out.contains("doc.txt | Ln 1, Col 1 | 17 chars | undo 1 redo 0"));
    }

    #[test]
    fn chord_parsing() {
        assert_eq!(
            parse_chord("ctrl+shift+z").unwrap(),
            KeyChord::new(Key::Char('z'), KeyModifiers::CTRL | KeyModifiers::SHIFT)
        );
        assert_eq!(
            parse_chord("shift+f3").unwrap(),
            KeyChord::new(Key::F(3), KeyModifiers::SHIFT)
        );
        assert!(parse_chord("ctrl+").is_err());
    }

    #[test]
    fn unescape_handles_controls() {
        assert_eq!(unescape(r"a\nb\tc\\d"), "a\nb\tc\\d");
    }
}
