// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Streaming VT-100 input decoder. Turns characters (or raw bytes) read from a terminal
//! in raw mode into [`InputEvent`]s.
//!
//! | Module              | Purpose                                                 |
//! |---------------------|---------------------------------------------------------|
//! | `decoder_options`   | [`DecoderOptions`]                                      |
//! | `input_decoder`     | [`InputDecoder`], the state machine                     |
//! | `csi_sequence`      | CSI / SS3 parameter accumulation and dispatch           |
//! | `control_keys`      | C0 control bytes to [`KeyPress`]                        |
//! | `paste_accumulator` | Bracketed paste body collection and end marker matching |
//!
//! [`InputEvent`]: crate::InputEvent
//! [`KeyPress`]: crate::KeyPress

// Skip rustfmt for rest of file.
// https://stackoverflow.com/a/75910283/2085356
#![cfg_attr(rustfmt, rustfmt_skip)]

// Attach sources.
pub mod control_keys;
pub mod csi_sequence;
pub mod decoder_options;
pub mod input_decoder;
pub mod paste_accumulator;

// Re-export.
pub use control_keys::*;
pub use csi_sequence::*;
pub use decoder_options::*;
pub use input_decoder::*;
pub use paste_accumulator::*;
