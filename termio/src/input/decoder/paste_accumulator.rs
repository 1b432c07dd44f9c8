// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Bracketed paste body collection. Everything between `ESC [ 200 ~` and `ESC [ 201 ~`
//! is taken verbatim, including escape characters that don't form the end marker.

pub const PASTE_END_MARKER: &str = "\u{1b}[201~";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PasteAccumulator {
    content: String,
    /// Trailing characters that match a prefix of [`PASTE_END_MARKER`].
    held: String,
    discarded_bytes: usize,
}

impl PasteAccumulator {
    /// Feed one character. Returns the paste content once the end marker is complete.
    pub fn push(&mut self, ch: char, max_len: usize) -> Option<String> {
        self.held.push(ch);

        if self.held == PASTE_END_MARKER {
            self.held.clear();
            if self.discarded_bytes > 0 {
                tracing::debug!(
                    message = "Bracketed paste truncated",
                    kept_bytes = self.content.len(),
                    discarded_bytes = self.discarded_bytes
                );
            }
            self.discarded_bytes = 0;
            return Some(std::mem::take(&mut self.content));
        }

        // Release held characters until what remains could still start the marker.
        while !self.held.is_empty() && !PASTE_END_MARKER.starts_with(self.held.as_str()) {
            let first = self.held.remove(0);
            self.append(first, max_len);
        }

        None
    }

    fn append(&mut self, ch: char, max_len: usize) {
        if self.content.len() + ch.len_utf8() <= max_len {
            self.content.push(ch);
        } else {
            self.discarded_bytes += ch.len_utf8();
        }
    }

    /// Bytes of content collected so far, not counting a partial end marker.
    #[must_use]
    pub fn len(&self) -> usize { self.content.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.content.is_empty() && self.held.is_empty() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn feed(acc: &mut PasteAccumulator, text: &str, max_len: usize) -> Option<String> {
        let mut result = None;
        for ch in text.chars() {
            if let Some(content) = acc.push(ch, max_len) {
                result = Some(content);
            }
        }
        result
    }

    #[test]
    fn test_collects_until_marker() {
        let mut acc = PasteAccumulator::default();
        assert_eq!(feed(&mut acc, "hello\nworld", 1024), None);
        assert_eq!(acc.len(), 11);
        assert_eq!(
            feed(&mut acc, PASTE_END_MARKER, 1024),
            Some("hello\nworld".to_string())
        );
        assert!(acc.is_empty());
    }

    #[test]
    fn test_partial_marker_is_content() {
        let mut acc = PasteAccumulator::default();
        let result = feed(&mut acc, "a\u{1b}[20b\u{1b}\u{1b}[201~", 1024);
        assert_eq!(result, Some("a\u{1b}[20b\u{1b}".to_string()));
    }

    #[test]
    fn test_truncates_past_max_len() {
        let mut acc = PasteAccumulator::default();
        let result = feed(&mut acc, "abcdef\u{1b}[201~", 4);
        assert_eq!(result, Some("abcd".to_string()));
    }

    #[test]
    fn test_multibyte_never_split() {
        let mut acc = PasteAccumulator::default();
        let result = feed(&mut acc, "aé\u{1b}[201~", 2);
        assert_eq!(result, Some("a".to_string()));
    }
}
