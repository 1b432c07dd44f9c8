// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::{LineController, LineSnapshot};
use crate::{History, char_count};

pub const REVERSE_SEARCH_PROMPT: &str = "(reverse-i-search)";
pub const FAILED_REVERSE_SEARCH_PROMPT: &str = "(failed reverse-i-search)";

/// Incremental search through [`History`] (Ctrl+R).
///
/// While active the line shows the matched entry. Committing keeps it (recording one
/// undo step if the text changed), aborting brings back the line as it was before the
/// search started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReverseSearch {
    query: String,
    match_index: Option<usize>,
    is_failing: bool,
    saved_line: LineSnapshot,
}

impl ReverseSearch {
    #[must_use]
    pub fn start(controller: &LineController) -> Self {
        Self {
            query: String::new(),
            match_index: None,
            is_failing: false,
            saved_line: controller.snapshot(),
        }
    }

    #[must_use]
    pub fn query(&self) -> &str { &self.query }

    #[must_use]
    pub fn match_index(&self) -> Option<usize> { self.match_index }

    /// Shown instead of the normal prompt, eg ``(reverse-i-search)`git': ``.
    #[must_use]
    pub fn prompt(&self) -> String {
        let label = if self.is_failing {
            FAILED_REVERSE_SEARCH_PROMPT
        } else {
            REVERSE_SEARCH_PROMPT
        };
        format!("{label}`{}': ", self.query)
    }

    /// Extend the query and search again from the newest entry.
    pub fn push_str(&mut self, text: &str, history: &History, controller: &mut LineController) {
        self.query.push_str(text);
        self.search_from_newest(history, controller);
    }

    /// Shorten the query and search again from the newest entry.
    pub fn pop_char(&mut self, history: &History, controller: &mut LineController) {
        self.query.pop();
        self.search_from_newest(history, controller);
    }

    /// Continue with entries older than the current match.
    pub fn search_older(&mut self, history: &History, controller: &mut LineController) {
        let before = self.match_index;
        match history.search_backward(&self.query, before) {
            Some(index) => self.show_match(index, history, controller),
            None => self.is_failing = !self.query.is_empty(),
        }
    }

    pub fn commit(self, controller: &mut LineController) {
        if controller.text() != self.saved_line.text {
            controller.push_undo_snapshot(self.saved_line);
        }
    }

    pub fn abort(self, controller: &mut LineController) { controller.restore(self.saved_line); }

    fn search_from_newest(&mut self, history: &History, controller: &mut LineController) {
        if self.query.is_empty() {
            self.match_index = None;
            self.is_failing = false;
            controller.restore(self.saved_line.clone());
            return;
        }
        match history.search_backward(&self.query, None) {
            Some(index) => self.show_match(index, history, controller),
            None => self.is_failing = true,
        }
    }

    fn show_match(&mut self, index: usize, history: &History, controller: &mut LineController) {
        let Some(entry) = history.get(index) else {
            return;
        };
        self.match_index = Some(index);
        self.is_failing = false;
        controller.restore(LineSnapshot {
            text: entry.to_owned(),
            cursor: char_count(entry),
            selection_start: 0,
            selection_length: 0,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn history() -> History {
        let mut history = History::new(10);
        history.add("git status");
        history.add("cargo build");
        history.add("git log");
        history
    }

    fn controller_with(text: &str) -> LineController {
        let mut controller = LineController::new(None, 10);
        controller.insert(text);
        controller
    }

    #[test]
    fn test_incremental_query_and_older_matches() {
        let history = history();
        let mut controller = controller_with("draft");
        let mut search = ReverseSearch::start(&controller);

        search.push_str("gi", &history, &mut controller);
        assert_eq!(controller.text(), "git log");
        assert_eq!(search.match_index(), Some(2));

        search.search_older(&history, &mut controller);
        assert_eq!(controller.text(), "git status");

        search.search_older(&history, &mut controller);
        assert_eq!(controller.text(), "git status");
        assert!(search.prompt().starts_with(FAILED_REVERSE_SEARCH_PROMPT));

        search.push_str("T S", &history, &mut controller);
        assert_eq!(controller.text(), "git status");
        assert_eq!(search.prompt(), "(reverse-i-search)`giT S': ");
    }

    #[test]
    fn test_backspace_to_empty_query_shows_saved_line() {
        let history = history();
        let mut controller = controller_with("draft");
        let mut search = ReverseSearch::start(&controller);

        search.push_str("c", &history, &mut controller);
        assert_eq!(controller.text(), "cargo build");
        search.pop_char(&history, &mut controller);
        assert_eq!(controller.text(), "draft");
        assert_eq!(search.query(), "");
    }

    #[test]
    fn test_commit_records_one_undo_step() {
        let history = history();
        let mut controller = controller_with("draft");
        let mut search = ReverseSearch::start(&controller);
        search.push_str("cargo", &history, &mut controller);
        search.commit(&mut controller);

        assert_eq!(controller.text(), "cargo build");
        assert!(controller.undo());
        assert_eq!(controller.text(), "draft");
    }

    #[test]
    fn test_abort_restores_saved_line() {
        let history = history();
        let mut controller = controller_with("draft");
        controller.move_cursor_to(2, false);
        let before = controller.snapshot();
        let mut search = ReverseSearch::start(&controller);
        search.push_str("git", &history, &mut controller);
        search.abort(&mut controller);
        assert_eq!(controller.snapshot(), before);
    }
}
