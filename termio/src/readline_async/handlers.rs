// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{CompletionRequest, CompletionResult, InputEvent, LineController, LineView};

/// What a [`ReadlineHandlers::on_key`] hook did with a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyHandlerResult {
    /// Run the default behavior for the key.
    #[default]
    NotHandled,
    /// Skip the default behavior.
    Handled,
    /// End the read, returning the current text.
    Accept,
    /// End the read with [`crate::ReadlineOutcome::Canceled`].
    Cancel,
}

/// Caller supplied hooks for [`crate::LineEditor::read_line`]. Every method has a
/// default that does nothing, so implement only the ones you need.
///
/// ```
/// use r3bl_termio::{CompletionRequest, CompletionResult, ReadlineHandlers};
///
/// struct Commands;
///
/// impl ReadlineHandlers for Commands {
///     fn complete(
///         &mut self,
///         request: &CompletionRequest<'_>,
///     ) -> miette::Result<Option<CompletionResult>> {
///         let start = request.word_start_before_cursor();
///         let candidates = ["help", "history", "quit"]
///             .iter()
///             .map(ToString::to_string)
///             .collect();
///         Ok(Some(CompletionResult::Candidates {
///             candidates,
///             replace_start: start,
///             replace_length: request.cursor - start,
///         }))
///     }
/// }
/// ```
pub trait ReadlineHandlers {
    /// Called first for every key event. The controller is lent for the duration of
    /// the call only.
    ///
    /// # Errors
    ///
    /// An error ends the read with [`crate::ReadlineError::Handler`].
    fn on_key(
        &mut self,
        _event: &InputEvent,
        _controller: &mut LineController,
    ) -> miette::Result<KeyHandlerResult> {
        Ok(KeyHandlerResult::NotHandled)
    }

    /// Called on the first completion request. Later requests cycle through the
    /// candidates returned here until another event arrives.
    ///
    /// # Errors
    ///
    /// An error ends the read with [`crate::ReadlineError::Handler`].
    fn complete(
        &mut self,
        _request: &CompletionRequest<'_>,
    ) -> miette::Result<Option<CompletionResult>> {
        Ok(None)
    }

    /// Styled version of the prompt, `None` to use it as is.
    ///
    /// # Errors
    ///
    /// Errors are logged and the plain prompt is used.
    fn render_prompt(&mut self, _prompt: &str) -> miette::Result<Option<String>> { Ok(None) }

    /// Styled version of the visible line, `None` for the default rendering (plain
    /// text with the selection in reverse video). The markup must occupy the same
    /// cells as `view.text`.
    fn render_line(&mut self, _view: &LineView<'_>) -> Option<String> { None }
}

/// Use all the default behaviors.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHandlers;

impl ReadlineHandlers for NoHandlers {}
