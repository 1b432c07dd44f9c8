// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Async single line editor on top of a [`crate::TerminalBackend`].
//!
//! | Module              | Purpose                                                     |
//! |---------------------|-------------------------------------------------------------|
//! | `line_editor`       | [`LineEditor`] and its `read_line` event loop               |
//! | `readline_options`  | Prompt, echo, mouse editing, limits                         |
//! | `readline_history`  | Bounded [`History`] and Up / Down navigation                |
//! | `handlers`          | [`ReadlineHandlers`]: key, completion and render hooks      |
//! | `line_state`        | Editing state, commands, viewport and rendering of one read |

// Skip rustfmt for rest of file.
// https://stackoverflow.com/a/75910283/2085356
#![cfg_attr(rustfmt, rustfmt_skip)]

// Attach sources.
pub mod handlers;
pub mod line_editor;
pub mod line_state;
pub mod readline_history;
pub mod readline_options;

// Re-export.
pub use handlers::*;
pub use line_editor::*;
pub use line_state::*;
pub use readline_history::*;
pub use readline_options::*;
