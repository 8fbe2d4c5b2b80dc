//! Find / replace session state. Matching itself lives in `core-actions`;
//! this is the data the single-owner session keeps between commands.

use std::ops::Range;

#[derive(Debug, Default, Clone)]
pub struct SearchState {
    pub query: String,
    pub replacement: String,
    pub regex: bool,
    pub case_sensitive: bool,
    matches: Vec<Range<usize>>,
    current: Option<usize>,
}

impl SearchState {
    /// Char ranges of every match, in document order.
    pub fn matches(&self) -> &[Range<usize>] {
        &self.matches
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_match(&self) -> Option<Range<usize>> {
        self.current.and_then(|i| self.matches.get(i).cloned())
    }

    /// Install a fresh match list; the first match (if any) becomes current.
    pub fn set_matches(&mut self, matches: Vec<Range<usize>>) {
        self.current = if matches.is_empty() { None } else { Some(0) };
        self.matches = matches;
    }

    /// Swap in a recomputed match list, keeping the current index while it
    /// is still in range.
    pub fn refresh_matches(&mut self, matches: Vec<Range<usize>>) {
        self.current = match self.current {
            Some(i) if i < matches.len() => Some(i),
            _ if matches.is_empty() => None,
            _ => Some(0),
        };
        self.matches = matches;
    }

    pub fn clear(&mut self) {
        self.matches.clear();
        self.current = None;
    }

    /// Advance with wrap-around; returns the new current match.
    pub fn step_next(&mut self) -> Option<Range<usize>> {
        if self.matches.is_empty() {
            return None;
        }
        let next = match self.current {
            Some(i) => (i + 1) % self.matches.len(),
            None => 0,
        };
        self.current = Some(next);
        self.current_match()
    }

    /// Step back with wrap-around; returns the new current match.
    pub fn step_previous(&mut self) -> Option<Range<usize>> {
        if self.matches.is_empty() {
            return None;
        }
        let prev = match self.current {
            Some(0) | None => self.matches.len() - 1,
            Some(i) => i - 1,
        };
        self.current = Some(prev);
        self.current_match()
    }

    /// "n/m" progress label for the result display.
    pub fn progress(&self) -> Option<(usize, usize)> {
        self.current.map(|i| (i + 1, self.matches.len()))
    }
}
