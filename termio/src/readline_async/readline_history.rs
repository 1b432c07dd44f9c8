// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{LineController, LineSnapshot, char_count};
use std::collections::VecDeque;

/// Previously accepted lines, oldest first. Owned by [`crate::LineEditor`] so it
/// survives across reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History {
    entries: VecDeque<String>,
    capacity: usize,
}

impl History {
    /// A capacity of zero disables history.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
        }
    }

    /// Returns `false` if the line was not added. Empty lines and a line equal to the
    /// newest entry are skipped.
    pub fn add(&mut self, line: impl Into<String>) -> bool {
        let line = line.into();
        if self.capacity == 0 || line.is_empty() || self.entries.back() == Some(&line) {
            return false;
        }

        self.entries.push_back(line);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
        true
    }

    #[must_use]
    pub fn capacity(&self) -> usize { self.capacity }

    /// Evicts the oldest entries if the new capacity is smaller.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    #[must_use]
    pub fn len(&self) -> usize { self.entries.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    /// Index 0 is the oldest entry.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(String::as_str)
    }

    pub fn clear(&mut self) { self.entries.clear(); }

    /// Case insensitive substring search from the newest entry towards the oldest.
    /// With `before`, only entries older than that index are searched. An empty query
    /// never matches.
    #[must_use]
    pub fn search_backward(&self, query: &str, before: Option<usize>) -> Option<usize> {
        if query.is_empty() {
            return None;
        }
        let query = query.to_lowercase();
        let end = before.unwrap_or(self.entries.len()).min(self.entries.len());
        (0..end)
            .rev()
            .find(|&index| self.entries[index].to_lowercase().contains(&query))
    }
}

/// Up / Down navigation through [`History`] during one read.
///
/// The first step away from the line being edited saves it, so that stepping past
/// the newest entry brings the uncommitted edit back. Navigation does not record undo
/// snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryNavigation {
    index: Option<usize>,
    saved_line: Option<LineSnapshot>,
}

impl HistoryNavigation {
    /// The history index being shown, `None` while on the line being edited.
    #[must_use]
    pub fn index(&self) -> Option<usize> { self.index }

    /// Show the next older entry. Clamps at the oldest. Returns `false` if nothing
    /// changed.
    pub fn previous(&mut self, history: &History, controller: &mut LineController) -> bool {
        let Some(newest) = history.len().checked_sub(1) else {
            return false;
        };
        let index = match self.index {
            None => {
                self.saved_line = Some(controller.snapshot());
                newest
            }
            Some(0) => return false,
            Some(index) => (index - 1).min(newest),
        };
        self.show(history, index, controller)
    }

    /// Show the next newer entry, or the saved line when moving past the newest.
    pub fn next(&mut self, history: &History, controller: &mut LineController) -> bool {
        let Some(index) = self.index else {
            return false;
        };
        if index + 1 < history.len() {
            return self.show(history, index + 1, controller);
        }

        self.index = None;
        if let Some(saved_line) = self.saved_line.take() {
            controller.restore(saved_line);
        }
        true
    }

    fn show(&mut self, history: &History, index: usize, controller: &mut LineController) -> bool {
        let Some(entry) = history.get(index) else {
            return false;
        };
        self.index = Some(index);
        controller.restore(LineSnapshot {
            text: entry.to_owned(),
            cursor: char_count(entry),
            selection_start: 0,
            selection_length: 0,
        });
        true
    }
}

#[cfg(test)]
mod tests_history {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_add_skips_empty_and_consecutive_duplicates() {
        let mut history = History::new(10);
        assert!(history.add("one"));
        assert!(!history.add("one"));
        assert!(!history.add(""));
        assert!(history.add("two"));
        assert!(history.add("one"));
        assert_eq!(history.iter().collect::<Vec<_>>(), vec!["one", "two", "one"]);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut history = History::new(2);
        history.add("a");
        history.add("b");
        history.add("c");
        assert_eq!(history.iter().collect::<Vec<_>>(), vec!["b", "c"]);

        history.set_capacity(1);
        assert_eq!(history.get(0), Some("c"));

        let mut disabled = History::new(0);
        assert!(!disabled.add("a"));
        assert!(disabled.is_empty());
    }

    #[test]
    fn test_search_backward() {
        let mut history = History::new(10);
        history.add("git status");
        history.add("cargo test");
        history.add("GIT log");

        assert_eq!(history.search_backward("git", None), Some(2));
        assert_eq!(history.search_backward("git", Some(2)), Some(0));
        assert_eq!(history.search_backward("git", Some(0)), None);
        assert_eq!(history.search_backward("nope", None), None);
        assert_eq!(history.search_backward("", None), None);
    }
}
