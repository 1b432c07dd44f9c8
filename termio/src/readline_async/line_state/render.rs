// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Viewport and render pass for the line under edit.
//!
//! When the line is wider than the space after the prompt, a window of it is shown,
//! grown outwards from the cursor one grapheme cluster at a time. A truncated side is
//! marked with [`ELLIPSIS`], which takes one cell:
//!
//! ```text
//! prompt> …quick brown fox jumps ov…
//!         ▲                       ▲
//!         left ellipsis           right ellipsis
//! ```
//!
//! A render pass is a single write to the [`crate::OutputDevice`]: carriage return,
//! prompt, visible text, erase to end of line, then move the terminal cursor back to
//! the column of the editor cursor.

use super::LineController;
use crate::{cell_at_index, char_count, grapheme_spans, grapheme_width_with_tab,
            index_at_cell, slice_chars};
use crossterm::{cursor::{MoveTo, MoveToColumn},
                queue,
                style::{Attribute, Print, SetAttribute},
                terminal::{Clear, ClearType}};
use std::io::{self, Write};

pub const ELLIPSIS: &str = "…";

/// The visible part of the line, in char indices of the full text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewWindow {
    pub start: usize,
    pub end: usize,
    pub left_ellipsis: bool,
    pub right_ellipsis: bool,
}

impl ViewWindow {
    /// The cursor is always inside the returned window (`start <= cursor <= end`).
    /// `available_width` is the number of cells after the prompt, excluding the cell
    /// the cursor needs at the end of the line.
    #[must_use]
    pub fn compute(text: &str, cursor: usize, available_width: usize, tab_width: usize) -> Self {
        let spans: Vec<(usize, usize, usize)> = grapheme_spans(text)
            .map(|span| {
                let width = grapheme_width_with_tab(span.cluster, tab_width);
                (span.start, span.end(), width)
            })
            .collect();
        let len = char_count(text);
        let total_width: usize = spans.iter().map(|&(_, _, width)| width).sum();

        if total_width <= available_width {
            return Self {
                start: 0,
                end: len,
                left_ellipsis: false,
                right_ellipsis: false,
            };
        }

        let count = spans.len();
        let cursor_span = spans
            .iter()
            .position(|&(start, _, _)| start >= cursor)
            .unwrap_or(count);

        let fits = |left: usize, right: usize, used: usize| {
            let ellipses = usize::from(left > 0) + usize::from(right < count);
            used + ellipses <= available_width
        };

        // Grow [left, right) from the cursor, always on the side that has used fewer
        // cells so far, until neither side fits another cluster.
        let (mut left, mut right) = (cursor_span, cursor_span);
        let (mut left_used, mut right_used) = (0, 0);
        loop {
            let grow_left = |left: usize, right: usize, used: usize| {
                left > 0 && fits(left - 1, right, used + spans[left - 1].2)
            };
            let grow_right = |left: usize, right: usize, used: usize| {
                right < count && fits(left, right + 1, used + spans[right].2)
            };
            let used = left_used + right_used;
            let prefer_left = left_used <= right_used;

            if prefer_left && grow_left(left, right, used) {
                left -= 1;
                left_used += spans[left].2;
            } else if grow_right(left, right, used) {
                right_used += spans[right].2;
                right += 1;
            } else if grow_left(left, right, used) {
                left -= 1;
                left_used += spans[left].2;
            } else {
                break;
            }
        }

        Self {
            start: spans.get(left).map_or(len, |&(start, _, _)| start),
            end: spans.get(right).map_or(len, |&(start, _, _)| start),
            left_ellipsis: left > 0,
            right_ellipsis: right < count,
        }
    }

    /// Map a cell column relative to the start of the line area (just after the
    /// prompt) to a char index in the full text. Clicks on the left ellipsis land on
    /// the window start, clicks past the visible text on the window end.
    #[must_use]
    pub fn index_at_column(&self, text: &str, column: usize, tab_width: usize) -> usize {
        let offset = usize::from(self.left_ellipsis);
        let Some(cell) = column.checked_sub(offset) else {
            return self.start;
        };
        let visible = slice_chars(text, self.start, self.end);
        self.start + index_at_cell(visible, cell, tab_width)
    }

    #[must_use]
    pub fn view<'a>(&self, controller: &'a LineController) -> LineView<'a> {
        let text = controller.text();
        let selection_end = controller.selection_start() + controller.selection_length();
        let selection_start = controller.selection_start().clamp(self.start, self.end);
        let selection_end = selection_end.clamp(self.start, self.end);
        LineView {
            text: slice_chars(text, self.start, self.end),
            cursor: controller.cursor().clamp(self.start, self.end) - self.start,
            selection_start: selection_start - self.start,
            selection_length: selection_end - selection_start,
            left_ellipsis: self.left_ellipsis,
            right_ellipsis: self.right_ellipsis,
        }
    }
}

/// What [`crate::ReadlineHandlers::render_line`] gets to style. All indices are
/// relative to `text`, the visible slice of the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineView<'a> {
    pub text: &'a str,
    pub cursor: usize,
    pub selection_start: usize,
    pub selection_length: usize,
    pub left_ellipsis: bool,
    pub right_ellipsis: bool,
}

/// Build one frame and write it with a single lock of the output device.
///
/// `prompt` may contain styling, `prompt_width` is the width of its plain text.
/// Without `line_markup` the visible text is written as is, with the selection in
/// reverse video.
///
/// # Errors
///
/// Returns an error if writing to the output device fails.
pub fn render_frame(
    out: &mut dyn Write,
    prompt: &str,
    prompt_width: usize,
    view: &LineView<'_>,
    line_markup: Option<&str>,
    tab_width: usize,
) -> io::Result<()> {
    let mut frame: Vec<u8> = Vec::new();

    queue!(frame, MoveToColumn(0), Print(prompt))?;
    if view.left_ellipsis {
        queue!(frame, Print(ELLIPSIS))?;
    }

    match line_markup {
        Some(markup) => queue!(frame, Print(markup))?,
        None => {
            let selection_end = view.selection_start + view.selection_length;
            let before = slice_chars(view.text, 0, view.selection_start);
            let selected = slice_chars(view.text, view.selection_start, selection_end);
            let after = slice_chars(view.text, selection_end, char_count(view.text));
            queue!(frame, Print(expand_tabs(before, tab_width)))?;
            if !selected.is_empty() {
                queue!(
                    frame,
                    SetAttribute(Attribute::Reverse),
                    Print(expand_tabs(selected, tab_width)),
                    SetAttribute(Attribute::NoReverse)
                )?;
            }
            queue!(frame, Print(expand_tabs(after, tab_width)))?;
        }
    }

    if view.right_ellipsis {
        queue!(frame, Print(ELLIPSIS))?;
    }

    let column = prompt_width
        + usize::from(view.left_ellipsis)
        + cell_at_index(view.text, view.cursor, tab_width);
    queue!(
        frame,
        Clear(ClearType::UntilNewLine),
        MoveToColumn(u16::try_from(column).unwrap_or(u16::MAX))
    )?;

    out.write_all(&frame)?;
    out.flush()
}

/// Erase the screen and home the cursor.
///
/// # Errors
///
/// Returns an error if writing to the output device fails.
pub fn clear_screen(out: &mut dyn Write) -> io::Result<()> {
    let mut frame: Vec<u8> = Vec::new();
    queue!(frame, Clear(ClearType::All), MoveTo(0, 0))?;
    out.write_all(&frame)?;
    out.flush()
}

/// Move to the start of the next line, eg when a read finishes.
///
/// # Errors
///
/// Returns an error if writing to the output device fails.
pub fn finish_line(out: &mut dyn Write) -> io::Result<()> {
    out.write_all(b"\r\n")?;
    out.flush()
}

fn expand_tabs(text: &str, tab_width: usize) -> String {
    text.replace('\t', &" ".repeat(tab_width))
}


#[cfg(test)]
mod tests_render_frame {
    use super::*;
    use crate::{OutputDevice, OutputDeviceExt, lock_output_device_as_mut};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_plain_frame() {
        let (output_device, stdout_mock) = OutputDevice::new_mock();
        let view = LineView {
            text: "abc",
            cursor: 1,
            selection_start: 1,
            selection_length: 1,
            left_ellipsis: false,
            right_ellipsis: true,
        };
        render_frame(lock_output_device_as_mut!(output_device), "> ", 2, &view, None, 4)
            .unwrap();

        let output = stdout_mock.get_copy_of_buffer_as_string();
        assert_eq!(output, "\x1b[1G> a\x1b[7mb\x1b[27mc…\x1b[K\x1b[4G");
        assert_eq!(stdout_mock.get_copy_of_buffer_as_string_strip_ansi(), "> abc…");
    }

    #[test]
    fn test_markup_replaces_plain_text() {
        let (output_device, stdout_mock) = OutputDevice::new_mock();
        let view = LineView {
            text: "ls",
            cursor: 2,
            selection_start: 2,
            selection_length: 0,
            left_ellipsis: true,
            right_ellipsis: false,
        };
        render_frame(
            lock_output_device_as_mut!(output_device),
            "$ ",
            2,
            &view,
            Some("\x1b[1mls\x1b[22m"),
            4,
        )
        .unwrap();
        assert_eq!(stdout_mock.get_copy_of_buffer_as_string_strip_ansi(), "$ …ls");
        assert!(stdout_mock.get_copy_of_buffer_as_string().ends_with("\x1b[6G"));
    }

    #[test]
    fn test_tabs_are_expanded() {
        let (output_device, stdout_mock) = OutputDevice::new_mock();
        let view = LineView {
            text: "a\tb",
            cursor: 3,
            selection_start: 3,
            selection_length: 0,
            left_ellipsis: false,
            right_ellipsis: false,
        };
        render_frame(lock_output_device_as_mut!(output_device), "", 0, &view, None, 2)
            .unwrap();
        assert_eq!(stdout_mock.get_copy_of_buffer_as_string_strip_ansi(), "a  b");
        assert!(stdout_mock.get_copy_of_buffer_as_string().ends_with("\x1b[5G"));
    }

    #[test]
    fn test_clear_screen() {
        let (output_device, stdout_mock) = OutputDevice::new_mock();
        clear_screen(lock_output_device_as_mut!(output_device)).unwrap();
        assert_eq!(stdout_mock.get_copy_of_buffer_as_string(), "\x1b[2J\x1b[1;1H");
    }
}
