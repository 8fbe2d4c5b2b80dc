//! Stateless shortcut translation: `KeyChord` -> `Command`.
//!
//! Ctrl and Meta (Cmd) are interchangeable. Letter keys match case-
//! insensitively because hosts report Shift+Z as either `z` or `Z`.
//! Plain character keys are not commands; the host widget inserts them and
//! the edit coordinator sees the resulting input notification.

use core_events::{Command, Key, KeyChord, KeyModifiers, MotionKind, Panel};

pub fn translate_key(chord: &KeyChord) -> Option<Command> {
    let shift = chord.mods.contains(KeyModifiers::SHIFT);
    let command_key = chord.mods.command();
    let cmd = match chord.key {
        Key::Char(c) if command_key => command_for_char(c.to_ascii_lowercase(), shift)?,
        Key::Home if command_key => Command::Motion(MotionKind::DocumentStart),
        Key::End if command_key => Command::Motion(MotionKind::DocumentEnd),
        Key::Home => Command::Motion(MotionKind::LineStart),
        Key::End => Command::Motion(MotionKind::LineEnd),
        Key::F(3) if shift => Command::FindPrevious,
        Key::F(3) => Command::FindNext,
        Key::Escape => Command::ClearSearch,
        _ => return None,
    };
    tracing::trace!(target: "actions.keymap", %chord, ?cmd, "shortcut");
    Some(cmd)
}

fn command_for_char(c: char, shift: bool) -> Option<Command> {
    Some(match (c, shift) {
        ('z', false) => Command::Undo,
        ('z', true) | ('y', _) => Command::Redo,
        ('x', _) => Command::Cut,
        ('c', _) => Command::Copy,
        ('v', _) => Command::Paste,
        ('a', _) => Command::SelectAll,
        ('s', false) => Command::Save,
        ('s', true) => Command::SaveAs,
        ('n', _) => Command::NewFile,
        ('o', _) => Command::OpenFile,
        ('f', _) => Command::OpenPanel(Panel::Find),
        ('h', _) => Command::OpenPanel(Panel::Replace),
        ('q', _) | ('w', _) => Command::Exit,
        _ => return None,
    })
}
