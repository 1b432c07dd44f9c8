// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The boundary between the input pipeline and the platform.
//!
//! | Module                  | Purpose                                                  |
//! |-------------------------|----------------------------------------------------------|
//! | `terminal_backend`      | [`TerminalBackend`] trait, capabilities, input options   |
//! | `output_device`         | [`OutputDevice`], the shared lock for rendering          |
//! | `ansi_terminal_backend` | Real terminal: crossterm raw mode + tokio stdin reader   |

// Skip rustfmt for rest of file.
// https://stackoverflow.com/a/75910283/2085356
#![cfg_attr(rustfmt, rustfmt_skip)]

// Attach sources.
pub mod ansi_terminal_backend;
pub mod output_device;
pub mod terminal_backend;

// Re-export.
pub use ansi_terminal_backend::*;
pub use output_device::*;
pub use terminal_backend::*;
