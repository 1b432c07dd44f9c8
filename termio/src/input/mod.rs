// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Input events and the two stages that produce and buffer them.
//!
//! | Module              | Purpose                                                       |
//! |---------------------|---------------------------------------------------------------|
//! | `input_event`       | [`InputEvent`], [`KeyPress`], [`MouseInput`], signals         |
//! | `modifier_keys_mask`| Shift / Ctrl / Alt / Meta state carried by keys and mouse     |
//! | `decoder`           | Streaming VT-100 byte/char decoder ([`InputDecoder`])         |
//! | `event_distributor` | Bounded drop-oldest queue with one async reader               |
//! | `key_gesture`       | `Ctrl+Shift+Left` style gestures, parse and format            |
//! | `key_bindings`      | Gesture → [`EditorCommand`] table with shift fallback         |

// Skip rustfmt for rest of file.
// https://stackoverflow.com/a/75910283/2085356
#![cfg_attr(rustfmt, rustfmt_skip)]

// Attach sources.
pub mod decoder;
pub mod event_distributor;
pub mod input_event;
pub mod key_bindings;
pub mod key_gesture;
pub mod modifier_keys_mask;

// Re-export.
pub use decoder::*;
pub use event_distributor::*;
pub use input_event::*;
pub use key_bindings::*;
pub use key_gesture::*;
pub use modifier_keys_mask::*;
