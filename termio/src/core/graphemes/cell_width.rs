// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Display width of text in terminal cells.
//!
//! Width is computed one grapheme cluster at a time. A cluster's width is the widest
//! scalar inside it, with these adjustments:
//!
//! | Cluster                                    | Width                         |
//! |--------------------------------------------|-------------------------------|
//! | `\t`                                       | tab width (default 4)         |
//! | `\r`, `\n`, `\r\n`                         | 0                             |
//! | contains `U+FE0F` (VS16) or `U+200D` (ZWJ) | 2                             |
//! | regional indicator pair (flag)             | 2                             |
//! | anything else                              | max scalar width (`unicode-width`) |

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthChar;

pub const DEFAULT_TAB_WIDTH: usize = 4;

const VARIATION_SELECTOR_16: char = '\u{FE0F}';
const ZERO_WIDTH_JOINER: char = '\u{200D}';

fn is_regional_indicator(ch: char) -> bool { ('\u{1F1E6}'..='\u{1F1FF}').contains(&ch) }

/// Width of a single scalar. Control characters have no width.
#[must_use]
pub fn char_width(ch: char) -> usize { UnicodeWidthChar::width(ch).unwrap_or(0) }

/// Width of one grapheme cluster, using [`DEFAULT_TAB_WIDTH`] for tabs.
#[must_use]
pub fn grapheme_width(cluster: &str) -> usize {
    grapheme_width_with_tab(cluster, DEFAULT_TAB_WIDTH)
}

#[must_use]
pub fn grapheme_width_with_tab(cluster: &str, tab_width: usize) -> usize {
    match cluster {
        "\t" => return tab_width,
        "\r" | "\n" | "\r\n" => return 0,
        _ => {}
    }

    let mut max_width = 0;
    let mut has_emoji_presentation_hint = false;
    let mut has_regional_indicator = false;

    for ch in cluster.chars() {
        max_width = max_width.max(char_width(ch));
        has_emoji_presentation_hint |= ch == VARIATION_SELECTOR_16 || ch == ZERO_WIDTH_JOINER;
        has_regional_indicator |= is_regional_indicator(ch);
    }

    // Terminals draw these wide even when the base scalar is tabulated as narrow.
    if max_width > 0 && (has_emoji_presentation_hint || has_regional_indicator) {
        return 2;
    }

    max_width
}

/// Width of `text` in terminal cells, using [`DEFAULT_TAB_WIDTH`] for tabs.
#[must_use]
pub fn width(text: &str) -> usize { width_with_tab(text, DEFAULT_TAB_WIDTH) }

#[must_use]
pub fn width_with_tab(text: &str, tab_width: usize) -> usize {
    text.graphemes(true)
        .map(|cluster| grapheme_width_with_tab(cluster, tab_width))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test_case("", 0; "empty")]
    #[test_case("hello", 5; "ascii")]
    #[test_case("😃", 2; "emoji")]
    #[test_case("e\u{301}", 1; "combining acute")]
    #[test_case("A\u{4E2D}B", 4; "cjk between ascii")]
    #[test_case("\u{1F1FA}\u{1F1F8}", 2; "flag")]
    #[test_case("\u{2764}\u{FE0F}", 2; "heart with vs16")]
    #[test_case("👨\u{200D}👩\u{200D}👧", 2; "zwj family")]
    #[test_case("a\tb", 6; "tab")]
    #[test_case("ab\r\n", 2; "crlf")]
    #[test_case("\u{1b}", 0; "control char")]
    fn test_width(text: &str, expected: usize) {
        assert_eq!(width(text), expected);
    }

    #[test]
    fn test_custom_tab_width() {
        assert_eq!(width_with_tab("\t\t", 8), 16);
        assert_eq!(grapheme_width_with_tab("\t", 2), 2);
    }

    #[test]
    fn test_lone_zwj_has_no_width() {
        assert_eq!(grapheme_width("\u{200D}"), 0);
    }
}
