// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Turn one [`InputEvent`] into edits on the [`LineState`].
//!
//! Key events are resolved in this order, the first match wins:
//!
//! 1. An active reverse search consumes typing, Backspace, Ctrl+R, Enter and Escape.
//!    Any other event commits the search and falls through.
//! 2. [`ReadlineHandlers::on_key`].
//! 3. [`KeyBindings::resolve`] (with the Shift fallback).
//! 4. Navigation keys: arrows, Home / End, Backspace / Delete, with Ctrl or Alt for
//!    the word variants and Shift to extend the selection.
//! 5. Ctrl+letter fallbacks. The cursor motions (A, E, B, F, P, N) need the `emacs`
//!    feature.
//! 6. Printable characters are inserted.

use super::{CompletionRequest, CompletionResult, CompletionSession, EditorContext,
            LineState, ReverseSearch};
use crate::{ControlFlowExtended, EditorCommand, InputEvent, InputEventKind, KeyCode,
            KeyHandlerResult, KeyPress, MouseButton, MouseInput, MouseInputKind,
            ReadlineError, ReadlineHandlers, ReadlineOutcome, whitespace_word_bounds};

pub type EventControlFlow = ControlFlowExtended<ReadlineOutcome, ReadlineError>;

/// Behaviors reachable only through the hard-coded fallbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FallbackAction {
    Command(EditorCommand),
    /// Ctrl+W.
    KillWordBackward,
    /// Ctrl+C.
    CopyOrCancel,
    /// Ctrl+D.
    DeleteForwardOrEndOfInput,
}

impl LineState {
    pub(crate) fn apply_event<H: ReadlineHandlers + ?Sized>(
        &mut self,
        event: &InputEvent,
        ctx: &mut EditorContext<'_, H>,
    ) -> EventControlFlow {
        // Cycling survives only until the next event that edits or moves the cursor.
        let completion = self.completion.take();

        if self.reverse_search.is_some() && self.apply_reverse_search_event(event, ctx) {
            return ControlFlowExtended::Continue;
        }

        match &event.kind {
            InputEventKind::Key(key_press) => {
                self.apply_key_event(event, *key_press, completion, ctx)
            }
            InputEventKind::Text(text) | InputEventKind::Paste(text) => self.insert_text(text),
            InputEventKind::Mouse(mouse_input) => {
                let is_edit = ctx.options.enable_mouse_editing
                    && self.apply_mouse_event(mouse_input, ctx.options.tab_width);
                if !is_edit {
                    self.completion = completion;
                }
                ControlFlowExtended::Continue
            }
            InputEventKind::Resize(size) => {
                self.term_size = *size;
                // The terminal may reflow, so the next click locates the line again.
                self.editor_row = None;
                self.completion = completion;
                ControlFlowExtended::Continue
            }
            InputEventKind::Signal(signal) => {
                if ctx.options.cancel_on_signal {
                    return ControlFlowExtended::ReturnOk(ReadlineOutcome::Canceled);
                }
                tracing::debug!(message = "Signal ignored", ?signal);
                self.completion = completion;
                ControlFlowExtended::Continue
            }
        }
    }

    /// Returns `true` if the event was consumed by the search.
    fn apply_reverse_search_event<H: ReadlineHandlers + ?Sized>(
        &mut self,
        event: &InputEvent,
        ctx: &mut EditorContext<'_, H>,
    ) -> bool {
        let Some(mut search) = self.reverse_search.take() else {
            return false;
        };
        let history = ctx.history;
        let controller = &mut self.controller;

        match &event.kind {
            InputEventKind::Key(key_press) => {
                let command = ctx.bindings.resolve(key_press);
                let is_plain = !key_press.mask.is_ctrl() && !key_press.mask.is_alt();

                if command == Some(EditorCommand::ReverseSearch)
                    || key_press.ctrl_letter() == Some('r')
                {
                    search.search_older(history, controller);
                } else if key_press.is(KeyCode::Escape) {
                    search.abort(controller);
                    return true;
                } else if key_press.is(KeyCode::Enter) || command == Some(EditorCommand::Accept)
                {
                    search.commit(controller);
                    return true;
                } else if key_press.is(KeyCode::Backspace) && is_plain {
                    search.pop_char(history, controller);
                } else if let Some(ch) = key_press.printable_char() {
                    search.push_str(ch.encode_utf8(&mut [0; 4]), history, controller);
                } else {
                    search.commit(controller);
                    return false;
                }
            }
            InputEventKind::Text(text) => search.push_str(text, history, controller),
            InputEventKind::Resize(size) => self.term_size = *size,
            _ => {
                search.commit(controller);
                return false;
            }
        }

        self.reverse_search = Some(search);
        true
    }

    fn apply_key_event<H: ReadlineHandlers + ?Sized>(
        &mut self,
        event: &InputEvent,
        key_press: KeyPress,
        completion: Option<CompletionSession>,
        ctx: &mut EditorContext<'_, H>,
    ) -> EventControlFlow {
        match ctx.handlers.on_key(event, &mut self.controller) {
            Ok(KeyHandlerResult::NotHandled) => {}
            Ok(KeyHandlerResult::Handled) => return ControlFlowExtended::Continue,
            Ok(KeyHandlerResult::Accept) => return self.accept(),
            Ok(KeyHandlerResult::Cancel) => {
                return ControlFlowExtended::ReturnOk(ReadlineOutcome::Canceled);
            }
            Err(report) => {
                return ControlFlowExtended::ReturnError(ReadlineError::Handler(
                    report.to_string(),
                ));
            }
        }

        if let Some(command) = ctx.bindings.resolve(&key_press) {
            return self.execute_command(command, completion, ctx);
        }

        if let Some(action) = fallback_action(&key_press) {
            return match action {
                FallbackAction::Command(command) => {
                    self.execute_command(command, completion, ctx)
                }
                FallbackAction::KillWordBackward => {
                    self.controller.kill_word_backward();
                    ControlFlowExtended::Continue
                }
                FallbackAction::CopyOrCancel => {
                    if self.controller.copy() {
                        ControlFlowExtended::Continue
                    } else {
                        ControlFlowExtended::ReturnOk(ReadlineOutcome::Canceled)
                    }
                }
                FallbackAction::DeleteForwardOrEndOfInput => {
                    if self.controller.is_empty() {
                        ControlFlowExtended::ReturnOk(ReadlineOutcome::EndOfInput)
                    } else {
                        self.controller.delete_forward();
                        ControlFlowExtended::Continue
                    }
                }
            };
        }

        if let Some(ch) = key_press.printable_char() {
            self.controller.insert(ch.encode_utf8(&mut [0; 4]));
        }
        ControlFlowExtended::Continue
    }

    fn execute_command<H: ReadlineHandlers + ?Sized>(
        &mut self,
        command: EditorCommand,
        completion: Option<CompletionSession>,
        ctx: &mut EditorContext<'_, H>,
    ) -> EventControlFlow {
        let controller = &mut self.controller;
        match command {
            EditorCommand::Accept => return self.accept(),
            EditorCommand::Cancel => {
                return ControlFlowExtended::ReturnOk(ReadlineOutcome::Canceled);
            }
            EditorCommand::EndOfInput => {
                return ControlFlowExtended::ReturnOk(ReadlineOutcome::EndOfInput);
            }
            EditorCommand::Complete => return self.complete(true, completion, ctx),
            EditorCommand::CompletePrevious => return self.complete(false, completion, ctx),

            EditorCommand::ClearLine => _ = controller.clear(),
            EditorCommand::MoveLeft => controller.move_left(false),
            EditorCommand::MoveRight => controller.move_right(false),
            EditorCommand::MoveWordLeft => controller.move_word_left(false),
            EditorCommand::MoveWordRight => controller.move_word_right(false),
            EditorCommand::MoveHome => controller.move_home(false),
            EditorCommand::MoveEnd => controller.move_end(false),
            EditorCommand::SelectLeft => controller.move_left(true),
            EditorCommand::SelectRight => controller.move_right(true),
            EditorCommand::SelectWordLeft => controller.move_word_left(true),
            EditorCommand::SelectWordRight => controller.move_word_right(true),
            EditorCommand::SelectHome => controller.move_home(true),
            EditorCommand::SelectEnd => controller.move_end(true),
            EditorCommand::SelectAll => controller.select_all(),
            EditorCommand::DeleteBackward => _ = controller.delete_backward(),
            EditorCommand::DeleteForward => _ = controller.delete_forward(),
            EditorCommand::DeleteWordBackward => _ = controller.delete_word_backward(),
            EditorCommand::DeleteWordForward => _ = controller.delete_word_forward(),
            EditorCommand::KillToEnd => _ = controller.kill_to_end(),
            EditorCommand::KillToStart => _ = controller.kill_to_start(),
            EditorCommand::Cut => _ = controller.cut(),
            EditorCommand::Copy => _ = controller.copy(),
            EditorCommand::Paste => _ = controller.paste(),
            EditorCommand::Undo => _ = controller.undo(),
            EditorCommand::Redo => _ = controller.redo(),
            EditorCommand::HistoryPrevious => {
                self.navigation.previous(ctx.history, controller);
            }
            EditorCommand::HistoryNext => {
                self.navigation.next(ctx.history, controller);
            }
            EditorCommand::ReverseSearch => {
                self.reverse_search = Some(ReverseSearch::start(controller));
            }
            EditorCommand::ClearScreen => {
                self.needs_clear_screen = true;
                self.editor_row = Some(0);
            }
        }
        ControlFlowExtended::Continue
    }

    fn complete<H: ReadlineHandlers + ?Sized>(
        &mut self,
        forward: bool,
        previous: Option<CompletionSession>,
        ctx: &mut EditorContext<'_, H>,
    ) -> EventControlFlow {
        if let Some(mut session) = previous {
            session.cycle(forward, &mut self.controller);
            self.completion = Some(session);
            return ControlFlowExtended::Continue;
        }

        let request = CompletionRequest::from_controller(&self.controller);
        let result = match ctx.handlers.complete(&request) {
            Ok(result) => result,
            Err(report) => {
                return ControlFlowExtended::ReturnError(ReadlineError::Handler(
                    report.to_string(),
                ));
            }
        };

        match result {
            None => {}
            Some(CompletionResult::Insert(text)) => _ = self.controller.insert(&text),
            Some(CompletionResult::Replace(text)) => _ = self.controller.set_text(&text),
            Some(CompletionResult::Candidates {
                candidates,
                replace_start,
                replace_length,
            }) => {
                self.completion = CompletionSession::start(
                    candidates,
                    replace_start,
                    replace_length,
                    forward,
                    &mut self.controller,
                );
            }
        }
        ControlFlowExtended::Continue
    }

    /// Insert, or for text containing a line break insert what precedes it and
    /// accept.
    fn insert_text(&mut self, text: &str) -> EventControlFlow {
        match text.find(['\r', '\n']) {
            Some(line_break) => {
                self.controller.insert(&text[..line_break]);
                self.accept()
            }
            None => {
                self.controller.insert(text);
                ControlFlowExtended::Continue
            }
        }
    }

    /// Returns `true` if the cursor or selection moved.
    ///
    /// The line's screen row is not known up front. The first left click claims its
    /// row, and later events on any other row are ignored, except that a release
    /// anywhere ends a drag.
    fn apply_mouse_event(&mut self, mouse_input: &MouseInput, tab_width: usize) -> bool {
        let is_left_click = mouse_input.button == MouseButton::Left
            && matches!(
                mouse_input.kind,
                MouseInputKind::Down | MouseInputKind::DoubleClick
            );
        match self.editor_row {
            Some(row) if row != mouse_input.row => {
                if mouse_input.kind == MouseInputKind::Up {
                    self.is_mouse_selecting = false;
                }
                return false;
            }
            None if is_left_click => self.editor_row = Some(mouse_input.row),
            _ => {}
        }

        let text = self.controller.text();
        let index = match usize::from(mouse_input.col).checked_sub(self.prompt_width) {
            Some(column) => self.view_window.index_at_column(text, column, tab_width),
            None => self.view_window.start,
        };

        match mouse_input.kind {
            MouseInputKind::Down if mouse_input.button == MouseButton::Left => {
                self.controller.move_cursor_to(index, false);
                self.is_mouse_selecting = true;
                true
            }
            MouseInputKind::Drag | MouseInputKind::Move if self.is_mouse_selecting => {
                self.controller.move_cursor_to(index, true);
                true
            }
            MouseInputKind::DoubleClick if mouse_input.button == MouseButton::Left => {
                let (start, end) = whitespace_word_bounds(text, index);
                self.controller.select(start, end - start);
                self.is_mouse_selecting = false;
                true
            }
            MouseInputKind::Up => {
                self.is_mouse_selecting = false;
                false
            }
            _ => false,
        }
    }

    fn accept(&self) -> EventControlFlow {
        ControlFlowExtended::ReturnOk(ReadlineOutcome::Accepted(
            self.controller.text().to_owned(),
        ))
    }
}

fn fallback_action(key_press: &KeyPress) -> Option<FallbackAction> {
    let is_word = key_press.mask.is_ctrl() || key_press.mask.is_alt();
    let extend = key_press.mask.is_shift();

    let command = match (key_press.code, is_word, extend) {
        (KeyCode::Left, false, false) => EditorCommand::MoveLeft,
        (KeyCode::Left, true, false) => EditorCommand::MoveWordLeft,
        (KeyCode::Left, false, true) => EditorCommand::SelectLeft,
        (KeyCode::Left, true, true) => EditorCommand::SelectWordLeft,
        (KeyCode::Right, false, false) => EditorCommand::MoveRight,
        (KeyCode::Right, true, false) => EditorCommand::MoveWordRight,
        (KeyCode::Right, false, true) => EditorCommand::SelectRight,
        (KeyCode::Right, true, true) => EditorCommand::SelectWordRight,
        (KeyCode::Home, _, false) => EditorCommand::MoveHome,
        (KeyCode::Home, _, true) => EditorCommand::SelectHome,
        (KeyCode::End, _, false) => EditorCommand::MoveEnd,
        (KeyCode::End, _, true) => EditorCommand::SelectEnd,
        (KeyCode::Backspace, false, _) => EditorCommand::DeleteBackward,
        (KeyCode::Backspace, true, _) => EditorCommand::DeleteWordBackward,
        (KeyCode::Delete, false, _) => EditorCommand::DeleteForward,
        (KeyCode::Delete, true, _) => EditorCommand::DeleteWordForward,
        (KeyCode::Unknown, _, _) => {
            return key_press.ctrl_letter().and_then(ctrl_letter_action);
        }
        _ => return None,
    };
    Some(FallbackAction::Command(command))
}

fn ctrl_letter_action(letter: char) -> Option<FallbackAction> {
    let action = match letter {
        #[cfg(feature = "emacs")]
        'a' => FallbackAction::Command(EditorCommand::MoveHome),
        #[cfg(feature = "emacs")]
        'e' => FallbackAction::Command(EditorCommand::MoveEnd),
        #[cfg(feature = "emacs")]
        'b' => FallbackAction::Command(EditorCommand::MoveLeft),
        #[cfg(feature = "emacs")]
        'f' => FallbackAction::Command(EditorCommand::MoveRight),
        #[cfg(feature = "emacs")]
        'p' => FallbackAction::Command(EditorCommand::HistoryPrevious),
        #[cfg(feature = "emacs")]
        'n' => FallbackAction::Command(EditorCommand::HistoryNext),
        'c' => FallbackAction::CopyOrCancel,
        'd' => FallbackAction::DeleteForwardOrEndOfInput,
        'h' => FallbackAction::Command(EditorCommand::DeleteBackward),
        'k' => FallbackAction::Command(EditorCommand::KillToEnd),
        'l' => FallbackAction::Command(EditorCommand::ClearScreen),
        'u' => FallbackAction::Command(EditorCommand::KillToStart),
        'v' | 'y' => FallbackAction::Command(EditorCommand::Paste),
        'w' => FallbackAction::KillWordBackward,
        'x' => FallbackAction::Command(EditorCommand::Cut),
        _ => return None,
    };
    Some(action)
}
