// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Grapheme boundary navigation and the mapping between terminal cells and char indices.
//!
//! ```text
//! text:   "A" "中"  "B"  "e\u{301}"
//! chars:   0   1     2    3 4
//! cells:   0   1 2   3    4
//! ```
//!
//! - [`next_boundary`] / [`previous_boundary`] move by whole clusters, so the cursor
//!   never lands between `e` and its combining accent.
//! - [`index_at_cell`] maps a cell column (for example from a mouse click) back to the
//!   char index of the cluster covering or starting at that cell.
//! - [`cell_at_index`] is the inverse: how many cells precede a char index.

use super::grapheme_width_with_tab;
use unicode_segmentation::UnicodeSegmentation;

/// One grapheme cluster with its position expressed in chars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphemeSpan<'a> {
    pub start: usize,
    pub char_len: usize,
    pub cluster: &'a str,
}

impl GraphemeSpan<'_> {
    #[must_use]
    pub fn end(&self) -> usize { self.start + self.char_len }
}

/// Iterate over the grapheme clusters of `text` with char based positions.
pub fn grapheme_spans(text: &str) -> impl Iterator<Item = GraphemeSpan<'_>> + '_ {
    let mut start = 0;
    text.graphemes(true).map(move |cluster| {
        let char_len = cluster.chars().count();
        let span = GraphemeSpan {
            start,
            char_len,
            cluster,
        };
        start += char_len;
        span
    })
}

#[must_use]
pub fn char_count(text: &str) -> usize { text.chars().count() }

#[must_use]
pub fn grapheme_count(text: &str) -> usize { text.graphemes(true).count() }

/// Convert a char index into a byte offset suitable for slicing. Indices past the end
/// clamp to `text.len()`.
#[must_use]
pub fn char_index_to_byte_offset(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map_or(text.len(), |(byte_offset, _)| byte_offset)
}

/// Slice `text` by char indices. Out of range indices are clamped.
#[must_use]
pub fn slice_chars(text: &str, start: usize, end: usize) -> &str {
    let end = end.max(start);
    let start_byte = char_index_to_byte_offset(text, start);
    let end_byte = char_index_to_byte_offset(text, end);
    &text[start_byte..end_byte]
}

/// The char index of the next grapheme boundary after `index`. Returns the char count
/// when there is none.
#[must_use]
pub fn next_boundary(text: &str, index: usize) -> usize {
    grapheme_spans(text)
        .map(|span| span.end())
        .find(|&end| end > index)
        .unwrap_or_else(|| char_count(text))
}

/// The char index of the previous grapheme boundary before `index`. Returns 0 when
/// there is none.
#[must_use]
pub fn previous_boundary(text: &str, index: usize) -> usize {
    grapheme_spans(text)
        .map(|span| span.start)
        .take_while(|&start| start < index)
        .last()
        .unwrap_or(0)
}

/// Snap `index` back to the start of the cluster containing it.
#[must_use]
pub fn snap_to_boundary(text: &str, index: usize) -> usize {
    grapheme_spans(text)
        .find(|span| index < span.end())
        .map_or_else(|| char_count(text), |span| span.start.min(index))
}

/// The char index whose cluster overlaps or starts at `cell`. Returns the char count
/// when `cell` is past the end of the text.
#[must_use]
pub fn index_at_cell(text: &str, cell: usize, tab_width: usize) -> usize {
    let mut acc = 0;
    for span in grapheme_spans(text) {
        let cluster_width = grapheme_width_with_tab(span.cluster, tab_width);
        if cell < acc + cluster_width {
            return span.start;
        }
        acc += cluster_width;
    }
    char_count(text)
}

/// Number of cells occupied by the clusters that end at or before `index`.
#[must_use]
pub fn cell_at_index(text: &str, index: usize, tab_width: usize) -> usize {
    grapheme_spans(text)
        .take_while(|span| span.end() <= index)
        .map(|span| grapheme_width_with_tab(span.cluster, tab_width))
        .sum()
}
