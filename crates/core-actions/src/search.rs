//! Find / replace over the session buffer.
//!
//! Plain searches step one char past each hit, so overlapping occurrences
//! are all reported ("aa" in "aaa" matches twice). Regex searches use the
//! engine's own non-overlapping iteration and skip empty matches. Replacement
//! text is always literal.
//!
//! A search that fails (empty pattern, bad regex) clears the search state and
//! never touches the buffer or history.

use crate::error::SearchError;
use core_state::EditorSession;
use core_text::{Selection, char_index};
use regex::{Regex, RegexBuilder};
use std::ops::Range;
use tracing::{debug, warn};

fn compile(query: &str, regex: bool, case_sensitive: bool) -> Result<Regex, SearchError> {
    if query.is_empty() {
        return Err(SearchError::EmptyPattern);
    }
    let pattern = if regex {
        query.to_string()
    } else {
        regex::escape(query)
    };
    RegexBuilder::new(&pattern)
        .case_insensitive(!case_sensitive)
        .build()
        .map_err(|e| SearchError::InvalidRegex {
            pattern: query.to_string(),
            message: e.to_string(),
        })
}

/// Byte ranges of non-empty, non-overlapping matches.
fn byte_matches(re: &Regex, text: &str) -> Vec<Range<usize>> {
    re.find_iter(text)
        .filter(|m| !m.is_empty())
        .map(|m| m.range())
        .collect()
}

/// Byte ranges of every plain-text hit, overlapping ones included.
fn overlapping_matches(re: &Regex, text: &str) -> Vec<Range<usize>> {
    let mut out = Vec::new();
    let mut pos = 0;
    while pos <= text.len() {
        let Some(m) = re.find_at(text, pos) else {
            break;
        };
        if m.is_empty() {
            break;
        }
        out.push(m.range());
        let step = text[m.start()..].chars().next().map_or(1, char::len_utf8);
        pos = m.start() + step;
    }
    out
}

fn to_char_ranges(text: &str, ranges: Vec<Range<usize>>) -> Vec<Range<usize>> {
    ranges
        .into_iter()
        .map(|r| char_index(text, r.start)..char_index(text, r.end))
        .collect()
}

/// Char ranges of every match of `query` in `text`.
pub fn find_matches(
    text: &str,
    query: &str,
    regex: bool,
    case_sensitive: bool,
) -> Result<Vec<Range<usize>>, SearchError> {
    let re = compile(query, regex, case_sensitive)?;
    let bytes = if regex {
        byte_matches(&re, text)
    } else {
        overlapping_matches(&re, text)
    };
    Ok(to_char_ranges(text, bytes))
}

fn select_current(session: &mut EditorSession) -> Option<Range<usize>> {
    let current = session.search().current_match()?;
    session
        .buffer_mut()
        .set_selection(Selection::new(current.start, current.end));
    Some(current)
}

/// Recompute matches for the stored query against the live text.
fn refresh(session: &mut EditorSession) -> Result<(), SearchError> {
    let (query, regex, case) = {
        let s = session.search();
        (s.query.clone(), s.regex, s.case_sensitive)
    };
    match find_matches(&session.text(), &query, regex, case) {
        Ok(matches) => {
            session.search_mut().refresh_matches(matches);
            Ok(())
        }
        Err(e) => {
            session.search_mut().clear();
            Err(e)
        }
    }
}

/// Start a new search for `query` and select its first match. Returns the
/// number of matches.
pub fn find(session: &mut EditorSession, query: &str) -> Result<usize, SearchError> {
    session.search_mut().query = query.to_string();
    let (regex, case) = (session.search().regex, session.search().case_sensitive);
    match find_matches(&session.text(), query, regex, case) {
        Ok(matches) => {
            let count = matches.len();
            session.search_mut().set_matches(matches);
            select_current(session);
            debug!(target: "actions.search", count, regex, "search_run");
            Ok(count)
        }
        Err(e) => {
            session.search_mut().clear();
            warn!(target: "actions.search", error = %e, "search_failed");
            Err(e)
        }
    }
}

pub fn find_next(session: &mut EditorSession) -> Result<Option<Range<usize>>, SearchError> {
    refresh(session)?;
    session.search_mut().step_next();
    Ok(select_current(session))
}

pub fn find_previous(session: &mut EditorSession) -> Result<Option<Range<usize>>, SearchError> {
    refresh(session)?;
    session.search_mut().step_previous();
    Ok(select_current(session))
}

/// Replace the current match, then move on to the match that takes its place.
pub fn replace_current(
    session: &mut EditorSession,
    replacement: &str,
) -> Result<Option<Range<usize>>, SearchError> {
    refresh(session)?;
    let Some(target) = session.search().current_match() else {
        return Err(SearchError::NoMatch);
    };
    session.search_mut().replacement = replacement.to_string();
    session
        .buffer_mut()
        .set_selection(Selection::new(target.start, target.end));
    session.apply_command_edit(target, replacement);
    debug!(target: "actions.search", "replace_current");
    refresh(session)?;
    Ok(select_current(session))
}

/// Replace every non-overlapping match. Returns the replacement count; zero
/// leaves buffer and history untouched.
pub fn replace_all(session: &mut EditorSession, replacement: &str) -> Result<usize, SearchError> {
    let (query, regex, case) = {
        let s = session.search();
        (s.query.clone(), s.regex, s.case_sensitive)
    };
    let re = match compile(&query, regex, case) {
        Ok(re) => re,
        Err(e) => {
            session.search_mut().clear();
            return Err(e);
        }
    };
    let text = session.text();
    let hits = byte_matches(&re, &text);
    if hits.is_empty() {
        session.search_mut().clear();
        return Ok(0);
    }
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for r in &hits {
        out.push_str(&text[last..r.start]);
        out.push_str(replacement);
        last = r.end;
    }
    out.push_str(&text[last..]);
    let caret = session.selection().start;
    session.search_mut().replacement = replacement.to_string();
    session.apply_command_rewrite(&out, Selection::caret(caret));
    debug!(target: "actions.search", count = hits.len(), "replace_all");
    refresh(session)?;
    Ok(hits.len())
}

pub fn clear_search(session: &mut EditorSession) {
    let s = session.search_mut();
    s.query.clear();
    s.clear();
}
