// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::LineController;

/// What [`crate::ReadlineHandlers::complete`] is asked to complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionRequest<'a> {
    pub text: &'a str,
    pub cursor: usize,
    pub selection_start: usize,
    pub selection_length: usize,
}

impl<'a> CompletionRequest<'a> {
    #[must_use]
    pub fn from_controller(controller: &'a LineController) -> Self {
        Self {
            text: controller.text(),
            cursor: controller.cursor(),
            selection_start: controller.selection_start(),
            selection_length: controller.selection_length(),
        }
    }

    /// Start (char index) of the whitespace delimited word ending at the cursor.
    #[must_use]
    pub fn word_start_before_cursor(&self) -> usize {
        let chars: Vec<char> = self.text.chars().collect();
        let mut start = self.cursor.min(chars.len());
        while start > 0 && !chars[start - 1].is_whitespace() {
            start -= 1;
        }
        start
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionResult {
    /// Insert at the cursor (replacing the selection).
    Insert(String),
    /// Replace the whole line.
    Replace(String),
    /// Apply the first candidate to `replace_start .. replace_start + replace_length`.
    /// Further completion requests cycle through the rest without asking again.
    Candidates {
        candidates: Vec<String>,
        replace_start: usize,
        replace_length: usize,
    },
}

/// Candidate cycling between consecutive completion requests. Any other event drops
/// it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionSession {
    candidates: Vec<String>,
    index: usize,
    replace_start: usize,
    /// Length of the candidate currently in the buffer.
    applied_length: usize,
}

impl CompletionSession {
    /// Apply the first candidate (or the last one when going backward). Returns `None`
    /// when there is nothing to cycle through.
    pub fn start(
        candidates: Vec<String>,
        replace_start: usize,
        replace_length: usize,
        forward: bool,
        controller: &mut LineController,
    ) -> Option<Self> {
        let last = candidates.len().checked_sub(1)?;
        let mut session = Self {
            candidates,
            index: if forward { 0 } else { last },
            replace_start: replace_start.min(controller.len()),
            applied_length: replace_length,
        };
        session.apply(controller);
        Some(session)
    }

    /// Replace the applied candidate with the next (or previous) one, wrapping around.
    pub fn cycle(&mut self, forward: bool, controller: &mut LineController) {
        let count = self.candidates.len();
        self.index = if forward {
            (self.index + 1) % count
        } else {
            (self.index + count - 1) % count
        };
        self.apply(controller);
    }

    #[must_use]
    pub fn current(&self) -> &str { &self.candidates[self.index] }

    #[must_use]
    pub fn candidates(&self) -> &[String] { &self.candidates }

    /// `max_length` may truncate the candidate, so the applied length is measured from
    /// the buffer rather than taken from the candidate.
    fn apply(&mut self, controller: &mut LineController) {
        let candidate = &self.candidates[self.index];
        let len_before = controller.len();
        let start = self.replace_start.min(len_before);
        let replaced = self.applied_length.min(len_before - start);
        controller.replace(start, replaced, candidate);
        self.applied_length = controller.len() + replaced - len_before;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn controller_with(text: &str) -> LineController {
        let mut controller = LineController::new(None, 100);
        controller.insert(text);
        controller
    }

    fn candidates() -> Vec<String> { vec!["hello".into(), "help".into()] }

    #[test]
    fn test_cycles_forward_and_wraps() {
        let mut controller = controller_with("he");
        let mut session =
            CompletionSession::start(candidates(), 0, 2, true, &mut controller).unwrap();
        assert_eq!(controller.text(), "hello");
        assert_eq!(controller.cursor(), 5);

        session.cycle(true, &mut controller);
        assert_eq!(controller.text(), "help");
        session.cycle(true, &mut controller);
        assert_eq!(controller.text(), "hello");
        assert_eq!(session.current(), "hello");
    }

    #[test]
    fn test_backward_starts_at_last() {
        let mut controller = controller_with("say he");
        let mut session =
            CompletionSession::start(candidates(), 4, 2, false, &mut controller).unwrap();
        assert_eq!(controller.text(), "say help");
        session.cycle(false, &mut controller);
        assert_eq!(controller.text(), "say hello");
    }

    #[test]
    fn test_each_application_is_undoable() {
        let mut controller = controller_with("he");
        let mut session =
            CompletionSession::start(candidates(), 0, 2, true, &mut controller).unwrap();
        session.cycle(true, &mut controller);
        controller.undo();
        assert_eq!(controller.text(), "hello");
        controller.undo();
        assert_eq!(controller.text(), "he");
    }

    #[test]
    fn test_truncated_candidate_keeps_the_rest_of_the_line() {
        let mut controller = LineController::new(Some(5), 100);
        controller.insert("he yy");
        controller.move_cursor_to(2, false);

        let mut session =
            CompletionSession::start(candidates(), 0, 2, true, &mut controller).unwrap();
        assert_eq!(controller.text(), "he yy");
        session.cycle(true, &mut controller);
        assert_eq!(controller.text(), "he yy");
        session.cycle(true, &mut controller);
        assert_eq!(controller.text(), "he yy");
    }

    #[test]
    fn test_truncated_candidate_is_replaced_in_full_on_cycle() {
        let mut controller = LineController::new(Some(6), 100);
        controller.insert("x he");

        let mut session =
            CompletionSession::start(candidates(), 2, 2, true, &mut controller).unwrap();
        assert_eq!(controller.text(), "x hell");
        session.cycle(true, &mut controller);
        assert_eq!(controller.text(), "x help");
        session.cycle(true, &mut controller);
        assert_eq!(controller.text(), "x hell");
    }

    #[test]
    fn test_no_candidates() {
        let mut controller = controller_with("x");
        assert!(CompletionSession::start(vec![], 0, 1, true, &mut controller).is_none());
        assert_eq!(controller.text(), "x");
    }

    #[test]
    fn test_word_start_before_cursor() {
        let controller = controller_with("git che");
        let request = CompletionRequest::from_controller(&controller);
        assert_eq!(request.word_start_before_cursor(), 4);
        assert_eq!(request.cursor, 7);
    }
}
