// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Text metrics for terminal rendering and cursor movement.
//!
//! | Module                  | Purpose                                                   |
//! |-------------------------|-----------------------------------------------------------|
//! | `cell_width`            | Display width of clusters and strings (tabs, emoji, CJK)  |
//! | `grapheme_navigation`   | Grapheme boundaries and cell ↔ index mapping              |
//! | `word_boundaries`       | Word character classes and word start/end queries         |
//!
//! Every index in this module is a `char` index (a count of Unicode scalar values from
//! the start of the string), never a byte offset. Use [`char_index_to_byte_offset`] when
//! slicing.

// Skip rustfmt for rest of file.
// https://stackoverflow.com/a/75910283/2085356
#![cfg_attr(rustfmt, rustfmt_skip)]

// Attach sources.
pub mod cell_width;
pub mod grapheme_navigation;
pub mod word_boundaries;

// Re-export.
pub use cell_width::*;
pub use grapheme_navigation::*;
pub use word_boundaries::*;
