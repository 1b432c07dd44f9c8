// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The only way to mutate the line under edit.
//!
//! All indices are char indices. Every mutation goes through a single "apply edit,
//! then clamp" step, so the cursor and selection always satisfy:
//!
//! ```text
//! 0 <= cursor <= len
//! selection_start + selection_length <= len
//! ```
//!
//! Out of range arguments are clamped, never rejected. Edits that change the text push
//! the previous [`LineSnapshot`] on the undo stack and clear the redo stack. Cursor and
//! selection changes alone are not recorded.

use crate::{RingBufferHeap, char_count, grapheme_spans, next_boundary, previous_boundary,
            slice_chars, snap_to_boundary, word_end, word_start};

/// Text, cursor and selection at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineSnapshot {
    pub text: String,
    pub cursor: usize,
    pub selection_start: usize,
    pub selection_length: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineController {
    text: String,
    cursor: usize,
    selection_start: usize,
    selection_length: usize,
    /// Fixed end of a selection being extended (shift + arrows, mouse drag).
    anchor: Option<usize>,
    max_length: Option<usize>,
    kill_buffer: String,
    undo_stack: RingBufferHeap<LineSnapshot>,
    redo_stack: RingBufferHeap<LineSnapshot>,
}

impl Default for LineController {
    fn default() -> Self { Self::new(None, crate::DEFAULT_UNDO_CAPACITY) }
}

impl LineController {
    #[must_use]
    pub fn new(max_length: Option<usize>, undo_capacity: usize) -> Self {
        Self {
            text: String::new(),
            cursor: 0,
            selection_start: 0,
            selection_length: 0,
            anchor: None,
            max_length,
            kill_buffer: String::new(),
            undo_stack: RingBufferHeap::new(undo_capacity),
            redo_stack: RingBufferHeap::new(undo_capacity),
        }
    }

    #[must_use]
    pub fn with_kill_buffer(mut self, kill_buffer: impl Into<String>) -> Self {
        self.kill_buffer = kill_buffer.into();
        self
    }
}

/// Accessors.
impl LineController {
    #[must_use]
    pub fn text(&self) -> &str { &self.text }

    /// Length in chars.
    #[must_use]
    pub fn len(&self) -> usize { char_count(&self.text) }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.text.is_empty() }

    #[must_use]
    pub fn cursor(&self) -> usize { self.cursor }

    #[must_use]
    pub fn selection_start(&self) -> usize { self.selection_start }

    #[must_use]
    pub fn selection_length(&self) -> usize { self.selection_length }

    #[must_use]
    pub fn has_selection(&self) -> bool { self.selection_length > 0 }

    #[must_use]
    pub fn selected_text(&self) -> &str {
        slice_chars(
            &self.text,
            self.selection_start,
            self.selection_start + self.selection_length,
        )
    }

    #[must_use]
    pub fn max_length(&self) -> Option<usize> { self.max_length }

    #[must_use]
    pub fn kill_buffer(&self) -> &str { &self.kill_buffer }

    pub fn set_kill_buffer(&mut self, text: impl Into<String>) {
        self.kill_buffer = text.into();
    }

    #[must_use]
    pub fn can_undo(&self) -> bool { !self.undo_stack.is_empty() }

    #[must_use]
    pub fn can_redo(&self) -> bool { !self.redo_stack.is_empty() }

    #[must_use]
    pub fn snapshot(&self) -> LineSnapshot {
        LineSnapshot {
            text: self.text.clone(),
            cursor: self.cursor,
            selection_start: self.selection_start,
            selection_length: self.selection_length,
        }
    }
}

/// Text edits. Each returns `true` if the text changed.
impl LineController {
    /// Insert at the cursor, replacing the selection if there is one. The inserted
    /// text is truncated (at a grapheme boundary) to respect the maximum length.
    pub fn insert(&mut self, text: &str) -> bool {
        let (start, end) = self.selection_or_cursor();
        self.splice(start, end, text)
    }

    /// Remove `length` chars starting at `start`.
    pub fn remove(&mut self, start: usize, length: usize) -> bool {
        self.splice(start, start.saturating_add(length), "")
    }

    /// Replace `length` chars starting at `start` with `text`. The cursor ends up
    /// after the inserted text.
    pub fn replace(&mut self, start: usize, length: usize, text: &str) -> bool {
        self.splice(start, start.saturating_add(length), text)
    }

    /// Replace the whole line. The cursor moves to the end.
    pub fn set_text(&mut self, text: &str) -> bool {
        let len = self.len();
        self.splice(0, len, text)
    }

    pub fn clear(&mut self) -> bool { self.set_text("") }

    /// Delete the selection, or the grapheme before the cursor.
    pub fn delete_backward(&mut self) -> bool {
        if self.has_selection() {
            return self.delete_selection();
        }
        let start = previous_boundary(&self.text, self.cursor);
        self.splice(start, self.cursor, "")
    }

    /// Delete the selection, or the grapheme after the cursor.
    pub fn delete_forward(&mut self) -> bool {
        if self.has_selection() {
            return self.delete_selection();
        }
        let end = next_boundary(&self.text, self.cursor);
        self.splice(self.cursor, end, "")
    }

    pub fn delete_word_backward(&mut self) -> bool {
        if self.has_selection() {
            return self.delete_selection();
        }
        let start = word_start(&self.text, self.cursor);
        self.splice(start, self.cursor, "")
    }

    pub fn delete_word_forward(&mut self) -> bool {
        if self.has_selection() {
            return self.delete_selection();
        }
        let end = word_end(&self.text, self.cursor);
        self.splice(self.cursor, end, "")
    }

    pub fn delete_selection(&mut self) -> bool {
        if !self.has_selection() {
            return false;
        }
        let (start, end) = self.selection_or_cursor();
        self.splice(start, end, "")
    }

    /// Move the text from the cursor to the end into the kill buffer.
    pub fn kill_to_end(&mut self) -> bool {
        let len = self.len();
        self.kill_range(self.cursor, len)
    }

    /// Move the text from the start to the cursor into the kill buffer.
    pub fn kill_to_start(&mut self) -> bool { self.kill_range(0, self.cursor) }

    /// Move the word before the cursor into the kill buffer.
    pub fn kill_word_backward(&mut self) -> bool {
        let start = word_start(&self.text, self.cursor);
        self.kill_range(start, self.cursor)
    }

    /// Move the selection into the kill buffer.
    pub fn cut(&mut self) -> bool {
        if !self.has_selection() {
            return false;
        }
        let (start, end) = self.selection_or_cursor();
        self.kill_range(start, end)
    }

    /// Copy the selection into the kill buffer. Returns `false` if nothing is
    /// selected.
    pub fn copy(&mut self) -> bool {
        if !self.has_selection() {
            return false;
        }
        self.kill_buffer = self.selected_text().to_owned();
        true
    }

    /// Insert the kill buffer at the cursor.
    pub fn paste(&mut self) -> bool {
        if self.kill_buffer.is_empty() {
            return false;
        }
        let kill_buffer = self.kill_buffer.clone();
        self.insert(&kill_buffer)
    }

    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.undo_stack.remove_head() else {
            return false;
        };
        self.redo_stack.add(self.snapshot());
        self.restore(snapshot);
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.redo_stack.remove_head() else {
            return false;
        };
        self.undo_stack.add(self.snapshot());
        self.restore(snapshot);
        true
    }

    fn kill_range(&mut self, start: usize, end: usize) -> bool {
        let removed = slice_chars(&self.text, start, end).to_owned();
        if removed.is_empty() {
            return false;
        }
        self.kill_buffer = removed;
        self.splice(start, end, "")
    }

    /// Replace `start..end` with `text` (clamped and truncated), record undo, put the
    /// cursor after the inserted text and drop the selection.
    fn splice(&mut self, start: usize, end: usize, text: &str) -> bool {
        let len = self.len();
        let start = start.min(len);
        let end = end.clamp(start, len);

        let room = self
            .max_length
            .map_or(usize::MAX, |max| max.saturating_sub(len - (end - start)));
        let text = truncate_to_graphemes(text, room);

        if start == end && text.is_empty() {
            return false;
        }

        let before = self.snapshot();
        let start_byte = crate::char_index_to_byte_offset(&self.text, start);
        let end_byte = crate::char_index_to_byte_offset(&self.text, end);
        self.text.replace_range(start_byte..end_byte, text);
        if self.text == before.text {
            self.cursor = start + char_count(text);
            self.clear_selection();
            self.clamp_indices();
            return false;
        }

        self.push_undo_snapshot(before);
        self.cursor = start + char_count(text);
        self.clear_selection();
        self.clamp_indices();
        true
    }

    fn selection_or_cursor(&self) -> (usize, usize) {
        if self.has_selection() {
            (
                self.selection_start,
                self.selection_start + self.selection_length,
            )
        } else {
            (self.cursor, self.cursor)
        }
    }
}

/// Cursor and selection.
impl LineController {
    /// Move the cursor. With `extend` the selection grows from the anchor (set to the
    /// current cursor on the first extending move), otherwise the selection is dropped.
    pub fn move_cursor_to(&mut self, index: usize, extend: bool) {
        let index = snap_to_boundary(&self.text, index.min(self.len()));
        if extend {
            let anchor = *self.anchor.get_or_insert(self.cursor);
            self.cursor = index;
            self.selection_start = anchor.min(index);
            self.selection_length = anchor.abs_diff(index);
        } else {
            self.cursor = index;
            self.clear_selection();
        }
        self.clamp_indices();
    }

    pub fn move_left(&mut self, extend: bool) {
        let index = previous_boundary(&self.text, self.cursor);
        self.move_cursor_to(index, extend);
    }

    pub fn move_right(&mut self, extend: bool) {
        let index = next_boundary(&self.text, self.cursor);
        self.move_cursor_to(index, extend);
    }

    pub fn move_word_left(&mut self, extend: bool) {
        let index = word_start(&self.text, self.cursor);
        self.move_cursor_to(index, extend);
    }

    pub fn move_word_right(&mut self, extend: bool) {
        let index = word_end(&self.text, self.cursor);
        self.move_cursor_to(index, extend);
    }

    pub fn move_home(&mut self, extend: bool) { self.move_cursor_to(0, extend); }

    pub fn move_end(&mut self, extend: bool) {
        let len = self.len();
        self.move_cursor_to(len, extend);
    }

    /// Select `length` chars from `start`, with the cursor at the end of the range.
    pub fn select(&mut self, start: usize, length: usize) {
        let len = self.len();
        let start = start.min(len);
        let end = start.saturating_add(length).min(len);
        self.anchor = Some(start);
        self.selection_start = start;
        self.selection_length = end - start;
        self.cursor = end;
        self.clamp_indices();
    }

    pub fn select_all(&mut self) {
        let len = self.len();
        self.select(0, len);
    }

    pub fn clear_selection(&mut self) {
        self.anchor = None;
        self.selection_start = self.cursor;
        self.selection_length = 0;
    }
}

/// Used by history navigation, reverse search and completion.
impl LineController {
    /// Replace the whole state without recording undo.
    pub(crate) fn restore(&mut self, snapshot: LineSnapshot) {
        self.text = snapshot.text;
        self.cursor = snapshot.cursor;
        self.selection_start = snapshot.selection_start;
        self.selection_length = snapshot.selection_length;
        self.anchor = (snapshot.selection_length > 0).then_some(snapshot.selection_start);
        self.clamp_indices();
    }

    /// Record `snapshot` as the state to return to on undo, and clear redo.
    pub(crate) fn push_undo_snapshot(&mut self, snapshot: LineSnapshot) {
        self.undo_stack.add(snapshot);
        self.redo_stack.clear();
    }

    fn clamp_indices(&mut self) {
        let len = self.len();
        self.cursor = self.cursor.min(len);
        self.selection_start = self.selection_start.min(len);
        self.selection_length = self.selection_length.min(len - self.selection_start);
        if let Some(anchor) = self.anchor.as_mut() {
            *anchor = (*anchor).min(len);
        }
    }
}

/// The longest prefix of whole grapheme clusters that fits in `max_chars` chars.
fn truncate_to_graphemes(text: &str, max_chars: usize) -> &str {
    if max_chars == usize::MAX {
        return text;
    }
    let end = grapheme_spans(text)
        .map(|span| span.end())
        .take_while(|&end| end <= max_chars)
        .last()
        .unwrap_or(0);
    slice_chars(text, 0, end)
}




#[cfg(test)]
mod tests_undo_redo {
    use super::test_fixtures::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_undo_restores_prior_state_after_each_edit() {
        let mut controller = LineController::new(None, 100);
        let mut before_each_edit = vec![controller.snapshot()];

        controller.insert("hello world");
        controller.select(0, 5);
        before_each_edit.push(controller.snapshot());
        controller.insert("HELLO");
        before_each_edit.push(controller.snapshot());
        controller.delete_word_backward();
        before_each_edit.push(controller.snapshot());
        controller.set_text("replaced");

        for expected in before_each_edit.iter().rev() {
            assert!(controller.undo());
            assert_eq!(&controller.snapshot(), expected);
        }
        assert!(!controller.undo());
    }

    #[test]
    fn test_undo_restores_selection() {
        let mut controller = controller_with("abc");
        controller.select(1, 1);
        let selected = controller.snapshot();
        controller.delete_backward();
        assert_eq!(controller.text(), "ac");
        controller.undo();
        assert_eq!(controller.snapshot(), selected);
    }

    #[test]
    fn test_redo_after_undo_and_cleared_by_new_edit() {
        let mut controller = controller_with("one");
        controller.insert(" two");
        let two = controller.snapshot();

        controller.undo();
        assert_eq!(controller.text(), "one");
        assert!(controller.can_redo());
        controller.redo();
        assert_eq!(controller.snapshot(), two);

        controller.undo();
        controller.insert("!");
        assert!(!controller.can_redo());
        assert!(!controller.redo());
    }

    #[test]
    fn test_cursor_movement_is_not_recorded() {
        let mut controller = controller_with("ab");
        controller.move_home(false);
        controller.move_right(true);
        assert!(controller.undo());
        assert_eq!(controller.text(), "");
        assert!(!controller.can_undo());
    }

    #[test]
    fn test_undo_capacity_drops_oldest() {
        let mut controller = LineController::new(None, 2);
        controller.insert("a");
        controller.insert("b");
        controller.insert("c");
        assert!(controller.undo());
        assert!(controller.undo());
        assert!(!controller.undo());
        assert_eq!(controller.text(), "a");
    }
}
