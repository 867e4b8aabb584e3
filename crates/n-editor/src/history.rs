//! Command-line histories — `:history /`, `:history :`, `:history @`.
//!
//! Each list keeps entries oldest first. Adding an entry that is already
//! present moves it to the end instead of duplicating it, and the oldest
//! entries fall off once the list is full (`'history'`).

use std::collections::VecDeque;

/// Default `'history'` length.
pub const DEFAULT_HISTORY_LEN: usize = 50;

/// Which history a line goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HistoryType {
    /// Search patterns (`/`).
    Search,
    /// Command lines (`:`).
    Command,
    /// `input()` lines (`@`).
    Input,
}

// ---------------------------------------------------------------------------
// HistoryList
// ---------------------------------------------------------------------------

/// One bounded, de-duplicated history.
#[derive(Debug, Clone)]
pub struct HistoryList {
    entries: VecDeque<String>,
    max: usize,
}

impl HistoryList {
    #[must_use]
    pub const fn new(max: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            max,
        }
    }

    /// Add `entry`, moving an existing copy to the end. Empty entries are
    /// ignored.
    pub fn add(&mut self, entry: &str) {
        if entry.is_empty() || self.max == 0 {
            return;
        }
        if let Some(pos) = self.entries.iter().position(|e| e == entry) {
            self.entries.remove(pos);
        }
        self.entries.push_back(entry.to_string());
        while self.entries.len() > self.max {
            self.entries.pop_front();
        }
    }

    /// Change the capacity, dropping the oldest entries that no longer fit.
    pub fn set_max(&mut self, max: usize) {
        self.max = max;
        while self.entries.len() > max {
            self.entries.pop_front();
        }
    }

    /// Most recent entry.
    #[must_use]
    pub fn last(&self) -> Option<&str> {
        self.entries.back().map(String::as_str)
    }

    /// Entries, oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for HistoryList {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LEN)
    }
}

// ---------------------------------------------------------------------------
// Histories
// ---------------------------------------------------------------------------

/// The search, command and input histories.
#[derive(Debug, Clone, Default)]
pub struct Histories {
    search: HistoryList,
    command: HistoryList,
    input: HistoryList,
}

impl Histories {
    #[must_use]
    pub const fn get(&self, kind: HistoryType) -> &HistoryList {
        match kind {
            HistoryType::Search => &self.search,
            HistoryType::Command => &self.command,
            HistoryType::Input => &self.input,
        }
    }

    /// Apply `'history'` to all three lists.
    pub fn set_max(&mut self, max: usize) {
        self.search.set_max(max);
        self.command.set_max(max);
        self.input.set_max(max);
    }

    pub fn add(&mut self, kind: HistoryType, entry: &str) {
        match kind {
            HistoryType::Search => self.search.add(entry),
            HistoryType::Command => self.command.add(entry),
            HistoryType::Input => self.input.add(entry),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entries(list: &HistoryList) -> Vec<&str> {
        list.iter().collect()
    }

    #[test]
    fn add_appends() {
        let mut h = HistoryList::default();
        h.add("a");
        h.add("b");
        assert_eq!(entries(&h), vec!["a", "b"]);
        assert_eq!(h.last(), Some("b"));
    }

    #[test]
    fn duplicate_moves_to_end() {
        let mut h = HistoryList::default();
        h.add("a");
        h.add("b");
        h.add("a");
        assert_eq!(entries(&h), vec!["b", "a"]);
        assert_eq!(h.len(), 2);
    }

    #[test]
    fn oldest_dropped_when_full() {
        let mut h = HistoryList::new(2);
        h.add("a");
        h.add("b");
        h.add("c");
        assert_eq!(entries(&h), vec!["b", "c"]);
    }

    #[test]
    fn empty_entry_ignored() {
        let mut h = HistoryList::default();
        h.add("");
        assert!(h.is_empty());
        assert_eq!(h.last(), None);
    }

    #[test]
    fn zero_length_history_keeps_nothing() {
        let mut h = HistoryList::new(0);
        h.add("a");
        assert!(h.is_empty());
    }

    #[test]
    fn shrinking_drops_oldest() {
        let mut all = Histories::default();
        for e in ["a", "b", "c"] {
            all.add(HistoryType::Command, e);
        }
        all.set_max(1);
        assert_eq!(entries(all.get(HistoryType::Command)), vec!["c"]);
    }

    #[test]
    fn histories_are_separate() {
        let mut all = Histories::default();
        all.add(HistoryType::Search, "foo");
        all.add(HistoryType::Input, "bar");
        assert_eq!(all.get(HistoryType::Search).last(), Some("foo"));
        assert_eq!(all.get(HistoryType::Input).last(), Some("bar"));
        assert!(all.get(HistoryType::Command).is_empty());
    }
}
