// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! # r3bl_termio
//!
//! The input half of a terminal I/O library. Raw bytes from the terminal flow through
//! three stages:
//!
//! ```text
//! stdin bytes
//!    │
//! ┌──▼───────────────────────────────┐
//! │ InputDecoder (streaming, pure)   │  escape sequences → InputEvent
//! └──────────────────────────────────┘
//!    │ publish
//! ┌──▼───────────────────────────────┐
//! │ EventDistributor (bounded ring)  │  drop-oldest, single async reader
//! └──────────────────────────────────┘
//!    │ read_async
//! ┌──▼───────────────────────────────┐
//! │ LineEditor (readline session)    │  buffer, selection, history, undo/redo,
//! │                                  │  completion, reverse search, mouse
//! └──────────────────────────────────┘
//! ```
//!
//! The leaf modules are [`core::graphemes`] (cell width and grapheme navigation) and
//! [`input::key_gesture`] / [`input::key_bindings`] (textual gestures bound to editor
//! commands).
//!
//! Platform specifics sit behind [`backend::TerminalBackend`]. The
//! [`backend::AnsiTerminalBackend`] puts the terminal in raw mode with `crossterm` and
//! feeds stdin through the decoder; tests use
//! [`core::test_fixtures::MockTerminalBackend`] instead.
//!
//! ```no_run
//! use r3bl_termio::{AnsiTerminalBackend, LineEditor, NoHandlers, ReadlineOptions,
//!                   ReadlineOutcome};
//! use miette::IntoDiagnostic;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn run() -> miette::Result<()> {
//! let mut backend = AnsiTerminalBackend::try_new().into_diagnostic()?;
//! let mut editor = LineEditor::new(ReadlineOptions::default().with_prompt("> "));
//! let cancel = CancellationToken::new();
//! match editor.read_line(&mut backend, &cancel, &mut NoHandlers).await? {
//!     ReadlineOutcome::Accepted(line) => println!("{line}"),
//!     ReadlineOutcome::Canceled | ReadlineOutcome::EndOfInput => {}
//! }
//! # Ok(())
//! # }
//! ```

// https://github.com/rust-lang/rust-clippy
// https://rust-lang.github.io/rust-clippy/master/index.html
#![cfg_attr(not(test), deny(clippy::unwrap_in_result))]

pub mod backend;
pub mod core;
pub mod input;
pub mod readline_async;

#[allow(ambiguous_glob_reexports)]
pub use backend::*;
#[allow(ambiguous_glob_reexports)]
pub use core::*;
#[allow(ambiguous_glob_reexports)]
pub use input::*;
#[allow(ambiguous_glob_reexports)]
pub use readline_async::*;
