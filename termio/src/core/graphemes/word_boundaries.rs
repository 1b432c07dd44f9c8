// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Word boundary detection for readline word motion and deletion.
//!
//! A word character is alphanumeric or `_`. Everything else (whitespace, punctuation)
//! separates words.
//!
//! ```text
//! "foo.bar  baz"
//!  0123456789AB
//!
//! word_start(12) = 9    word_start(9) = 4    word_start(4) = 0
//! word_end(0)    = 3    word_end(3)   = 7    word_end(7)   = 12
//! ```

use super::{char_count, grapheme_spans};

#[must_use]
pub fn is_word_char(ch: char) -> bool { ch.is_alphanumeric() || ch == '_' }

/// A cluster belongs to a word when its base char does. Combining marks, ZWJ and
/// variation selectors ride along with the base.
#[must_use]
pub fn is_word_cluster(cluster: &str) -> bool { cluster.chars().next().is_some_and(is_word_char) }

/// `(start, end, is_word)` for each grapheme cluster, in char indices.
fn word_spans(text: &str) -> Vec<(usize, usize, bool)> {
    grapheme_spans(text)
        .map(|span| (span.start, span.end(), is_word_cluster(span.cluster)))
        .collect()
}

/// Start of the word to the left of `index`: skip separators, then skip word
/// clusters. Always a grapheme boundary.
#[must_use]
pub fn word_start(text: &str, index: usize) -> usize {
    let spans = word_spans(text);
    // An index inside a cluster counts from the start of that cluster.
    let mut it = spans
        .iter()
        .position(|&(_, end, _)| end > index)
        .unwrap_or(spans.len());

    while it > 0 && !spans[it - 1].2 {
        it -= 1;
    }
    while it > 0 && spans[it - 1].2 {
        it -= 1;
    }

    spans.get(it).map_or_else(|| char_count(text), |&(start, _, _)| start)
}

/// End of the word to the right of `index`: skip separators, then skip word
/// clusters. Always a grapheme boundary.
#[must_use]
pub fn word_end(text: &str, index: usize) -> usize {
    let spans = word_spans(text);
    let mut it = spans
        .iter()
        .position(|&(start, _, _)| start >= index)
        .unwrap_or(spans.len());

    while it < spans.len() && !spans[it].2 {
        it += 1;
    }
    while it < spans.len() && spans[it].2 {
        it += 1;
    }

    spans.get(it).map_or_else(|| char_count(text), |&(start, _, _)| start)
}

/// Bounds `(start, end)` of the whitespace delimited run containing `index`. When
/// `index` sits on whitespace (or past the end) the range is empty.
#[must_use]
pub fn whitespace_word_bounds(text: &str, index: usize) -> (usize, usize) {
    let chars: Vec<char> = text.chars().collect();
    if index >= chars.len() || chars[index].is_whitespace() {
        let index = index.min(chars.len());
        return (index, index);
    }

    let mut start = index;
    while start > 0 && !chars[start - 1].is_whitespace() {
        start -= 1;
    }
    let mut end = index;
    while end < chars.len() && !chars[end].is_whitespace() {
        end += 1;
    }

    (start, end)
}
