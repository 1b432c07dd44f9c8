// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Per-read editing state for [`crate::LineEditor`].
//!
//! | Module            | Responsibility                                                 |
//! |-------------------|----------------------------------------------------------------|
//! | `line_controller` | [`LineController`]: text, cursor, selection, kill buffer, undo |
//! | `completion`      | Completion requests, results and candidate cycling             |
//! | `reverse_search`  | Ctrl+R incremental history search                              |
//! | `render`          | Cursor-centered viewport and the render pass                   |
//! | `editor_state`    | [`LineState`], the state of one read                           |
//! | `event_handlers`  | Event → command dispatch, mouse editing                        |

// Skip rustfmt for rest of file.
// https://stackoverflow.com/a/75910283/2085356
#![cfg_attr(rustfmt, rustfmt_skip)]

// Attach sources.
pub mod completion;
pub mod editor_state;
pub mod event_handlers;
pub mod line_controller;
pub mod render;
pub mod reverse_search;

// Re-export.
pub use completion::*;
pub use editor_state::*;
pub use event_handlers::*;
pub use line_controller::*;
pub use render::*;
pub use reverse_search::*;
