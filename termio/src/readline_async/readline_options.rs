// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{DEFAULT_TAB_WIDTH, InputOptions};

pub const DEFAULT_HISTORY_CAPACITY: usize = 100;
pub const DEFAULT_UNDO_CAPACITY: usize = 100;

/// Options for [`crate::LineEditor`]. They apply to every subsequent
/// [`crate::LineEditor::read_line`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadlineOptions {
    pub prompt: String,
    /// When off nothing is written to the output device, eg for password entry.
    pub echo: bool,
    /// Click to place the cursor, drag to select, double click to select a word.
    pub enable_mouse_editing: bool,
    /// End the read with [`crate::ReadlineOutcome::Canceled`] when a
    /// [`crate::InputEventKind::Signal`] arrives. Otherwise signals are ignored and the
    /// Ctrl+C key that follows the signal is handled as a key.
    pub cancel_on_signal: bool,
    /// Maximum line length in chars. Inserts are truncated to fit.
    pub max_length: Option<usize>,
    pub history_capacity: usize,
    pub undo_capacity: usize,
    pub tab_width: usize,
}

impl Default for ReadlineOptions {
    fn default() -> Self {
        Self {
            prompt: String::new(),
            echo: true,
            enable_mouse_editing: false,
            cancel_on_signal: false,
            max_length: None,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            undo_capacity: DEFAULT_UNDO_CAPACITY,
            tab_width: DEFAULT_TAB_WIDTH,
        }
    }
}

impl ReadlineOptions {
    #[must_use]
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    #[must_use]
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    #[must_use]
    pub fn with_mouse_editing(mut self, enable_mouse_editing: bool) -> Self {
        self.enable_mouse_editing = enable_mouse_editing;
        self
    }

    #[must_use]
    pub fn with_cancel_on_signal(mut self, cancel_on_signal: bool) -> Self {
        self.cancel_on_signal = cancel_on_signal;
        self
    }

    #[must_use]
    pub fn with_max_length(mut self, max_length: Option<usize>) -> Self {
        self.max_length = max_length;
        self
    }

    #[must_use]
    pub fn with_history_capacity(mut self, history_capacity: usize) -> Self {
        self.history_capacity = history_capacity;
        self
    }

    #[must_use]
    pub fn with_undo_capacity(mut self, undo_capacity: usize) -> Self {
        self.undo_capacity = undo_capacity;
        self
    }

    #[must_use]
    pub fn with_tab_width(mut self, tab_width: usize) -> Self {
        self.tab_width = tab_width;
        self
    }

    /// What the editor asks of the backend when a read starts.
    #[must_use]
    pub fn input_options(&self) -> InputOptions {
        InputOptions::default().with_mouse(self.enable_mouse_editing)
    }
}
