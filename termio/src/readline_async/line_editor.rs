// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{DistributorError, EditorContext, History, KeyBindings, LineState,
            ReadlineHandlers, ReadlineOptions, TerminalBackend};
use miette::Diagnostic;
use std::io;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// How a [`LineEditor::read_line`] call ended. An accepted empty line and the end of
/// input are different outcomes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadlineOutcome {
    /// Enter (or a bound Accept, or text containing a line break).
    Accepted(String),
    /// Ctrl+C without a selection, a signal when
    /// [`ReadlineOptions::cancel_on_signal`] is set, or the cancellation token.
    Canceled,
    /// The input stream closed, or Ctrl+D on an empty line.
    EndOfInput,
}

/// Error returned from [`LineEditor::read_line`]. Cancellation and end of input are
/// outcomes, not errors.
#[derive(Debug, Error, Diagnostic)]
pub enum ReadlineError {
    /// An internal I/O error occurred.
    #[error(transparent)]
    #[diagnostic(code(r3bl_termio::readline::io))]
    IO(#[from] io::Error),

    #[error("another read is already waiting for input")]
    #[diagnostic(
        code(r3bl_termio::readline::reader_already_waiting),
        help("Only one read may be in flight per terminal, serialize your reads")
    )]
    ReaderAlreadyWaiting,

    /// A [`ReadlineHandlers`] hook returned an error.
    #[error("readline handler failed: {0}")]
    #[diagnostic(code(r3bl_termio::readline::handler))]
    Handler(String),
}

/// Internal control flow for the event loop. This is used primarily to make testing
/// easier.
#[derive(Debug, PartialEq, Clone)]
pub enum ControlFlowExtended<T, E> {
    ReturnOk(T),
    ReturnError(E),
    Continue,
}

/// An interactive line editor. This is the explicit handle applications keep around:
/// the history, the key bindings and the kill buffer live here and carry over from
/// one [`LineEditor::read_line`] call to the next.
#[derive(Debug, Clone)]
pub struct LineEditor {
    options: ReadlineOptions,
    bindings: KeyBindings,
    history: History,
    kill_buffer: String,
}

impl Default for LineEditor {
    fn default() -> Self { Self::new(ReadlineOptions::default()) }
}

impl LineEditor {
    #[must_use]
    pub fn new(options: ReadlineOptions) -> Self {
        Self {
            history: History::new(options.history_capacity),
            options,
            bindings: KeyBindings::default(),
            kill_buffer: String::new(),
        }
    }

    #[must_use]
    pub fn with_key_bindings(mut self, bindings: KeyBindings) -> Self {
        self.bindings = bindings;
        self
    }

    #[must_use]
    pub fn options(&self) -> &ReadlineOptions { &self.options }

    pub fn set_options(&mut self, options: ReadlineOptions) {
        self.history.set_capacity(options.history_capacity);
        self.options = options;
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.options.prompt = prompt.into();
    }

    #[must_use]
    pub fn key_bindings(&self) -> &KeyBindings { &self.bindings }

    pub fn key_bindings_mut(&mut self) -> &mut KeyBindings { &mut self.bindings }

    #[must_use]
    pub fn history(&self) -> &History { &self.history }

    pub fn history_mut(&mut self) -> &mut History { &mut self.history }

    /// Same rules as accepted lines: empty lines and repeats of the newest entry are
    /// skipped.
    pub fn add_history_entry(&mut self, line: impl Into<String>) -> bool {
        self.history.add(line)
    }

    #[must_use]
    pub fn kill_buffer(&self) -> &str { &self.kill_buffer }

    /// Read one line.
    ///
    /// Starts input on the backend if needed (this is idempotent), then loops: await an
    /// event, apply it, re-render. Only the await is a suspension point, and the output
    /// device is locked only while a frame is written. An accepted line is added to the
    /// history.
    ///
    /// # Errors
    ///
    /// - [`ReadlineError::IO`] if the backend can't start or rendering fails.
    /// - [`ReadlineError::ReaderAlreadyWaiting`] if another read is in flight.
    /// - [`ReadlineError::Handler`] if a handler hook fails.
    pub async fn read_line<B, H>(
        &mut self,
        backend: &mut B,
        cancel: &CancellationToken,
        handlers: &mut H,
    ) -> Result<ReadlineOutcome, ReadlineError>
    where
        B: TerminalBackend,
        H: ReadlineHandlers + ?Sized,
    {
        let input_options = self
            .options
            .input_options()
            .restricted_to(&backend.capabilities());
        backend.start_input(&input_options)?;

        let output_device = backend.output_device();
        let mut line_state = LineState::new(
            &self.options,
            backend.window_size(),
            std::mem::take(&mut self.kill_buffer),
        );

        let result = {
            let mut ctx = EditorContext {
                options: &self.options,
                bindings: &self.bindings,
                history: &self.history,
                handlers,
                output_device: &output_device,
            };
            match run_event_loop(&mut line_state, &mut ctx, backend, cancel).await {
                Ok(outcome) => line_state
                    .finish(&ctx)
                    .map(|()| outcome)
                    .map_err(ReadlineError::from),
                Err(error) => Err(error),
            }
        };

        self.kill_buffer = line_state.controller.kill_buffer().to_owned();

        let outcome = result?;
        tracing::debug!(message = "Read line finished", ?outcome);
        if let ReadlineOutcome::Accepted(line) = &outcome {
            self.history.add(line.clone());
        }
        Ok(outcome)
    }
}

async fn run_event_loop<B, H>(
    line_state: &mut LineState,
    ctx: &mut EditorContext<'_, H>,
    backend: &mut B,
    cancel: &CancellationToken,
) -> Result<ReadlineOutcome, ReadlineError>
where
    B: TerminalBackend,
    H: ReadlineHandlers + ?Sized,
{
    line_state.render(ctx)?;

    loop {
        let event = match backend.read_event_async(cancel).await {
            Ok(event) => event,
            Err(DistributorError::Canceled) => return Ok(ReadlineOutcome::Canceled),
            Err(DistributorError::Closed) => return Ok(ReadlineOutcome::EndOfInput),
            Err(DistributorError::ReaderAlreadyWaiting) => {
                return Err(ReadlineError::ReaderAlreadyWaiting);
            }
        };
        tracing::trace!(message = "Line editor event", ?event);

        match line_state.apply_event(&event, ctx) {
            ControlFlowExtended::ReturnOk(outcome) => return Ok(outcome),
            ControlFlowExtended::ReturnError(error) => return Err(error),
            ControlFlowExtended::Continue => line_state.render(ctx)?,
        }
    }
}






#[cfg(test)]
mod tests_mouse {
    use super::test_fixtures::*;
    use pretty_assertions::assert_eq;

    fn mouse_editor() -> LineEditor {
        LineEditor::new(
            ReadlineOptions::default()
                .with_prompt("> ")
                .with_mouse_editing(true),
        )
    }

    #[tokio::test]
    async fn test_click_and_drag_selects() {
        let mut editor = mouse_editor();
        let input = vec![
            InputEvent::text("hello world"),
            mouse(8, MouseInputKind::Down),
            mouse(13, MouseInputKind::Drag),
            mouse(13, MouseInputKind::Up),
            ctrl('x'),
            special(KeyCode::Enter),
        ];
        assert_eq!(read_once(&mut editor, input).await.unwrap(), accepted("hello "));
        assert_eq!(editor.kill_buffer(), "world");
    }

    #[tokio::test]
    async fn test_double_click_selects_word() {
        let mut editor = mouse_editor();
        let input = events(vec![
            vec![
                InputEvent::text("hello world"),
                mouse(3, MouseInputKind::Down),
                mouse(3, MouseInputKind::Up),
                mouse(3, MouseInputKind::Down),
                mouse(3, MouseInputKind::Up),
            ],
            typed("X"),
            vec![special(KeyCode::Enter)],
        ]);
        assert_eq!(read_once(&mut editor, input).await.unwrap(), accepted("X world"));
    }

    #[tokio::test]
    async fn test_clicks_on_other_rows_do_not_move_the_cursor() {
        let mut editor = mouse_editor();
        let at_row = |col, row, kind| {
            InputEvent::mouse(MouseInput::new(col, row, MouseButton::Left, kind))
        };
        let input = events(vec![
            vec![
                InputEvent::text("hello world"),
                at_row(3, 4, MouseInputKind::Down),
                at_row(3, 4, MouseInputKind::Up),
                at_row(10, 2, MouseInputKind::Down),
                at_row(10, 2, MouseInputKind::Up),
                at_row(13, 0, MouseInputKind::Down),
                at_row(13, 0, MouseInputKind::Up),
            ],
            typed("X"),
            vec![special(KeyCode::Enter)],
        ]);
        assert_eq!(read_once(&mut editor, input).await.unwrap(), accepted("hXello world"));
    }

    #[tokio::test]
    async fn test_release_off_the_line_ends_the_drag() {
        let mut editor = mouse_editor();
        let input = vec![
            InputEvent::text("hello world"),
            mouse(8, MouseInputKind::Down),
            mouse(13, MouseInputKind::Drag),
            InputEvent::mouse(MouseInput::new(13, 3, MouseButton::Left, MouseInputKind::Up)),
            mouse(4, MouseInputKind::Move),
            ctrl('x'),
            special(KeyCode::Enter),
        ];
        assert_eq!(read_once(&mut editor, input).await.unwrap(), accepted("hello "));
        assert_eq!(editor.kill_buffer(), "world");
    }

    #[tokio::test]
    async fn test_mouse_ignored_unless_enabled() {
        let mut editor = LineEditor::new(ReadlineOptions::default().with_prompt("> "));
        let input = events(vec![
            vec![InputEvent::text("hello"), mouse(2, MouseInputKind::Down)],
            typed("!"),
            vec![special(KeyCode::Enter)],
        ]);
        assert_eq!(read_once(&mut editor, input).await.unwrap(), accepted("hello!"));
    }
}

#[cfg(test)]
mod tests_handlers {
    use super::test_fixtures::*;
    use pretty_assertions::assert_eq;

    #[derive(Debug)]
    struct UppercaseX;

    impl ReadlineHandlers for UppercaseX {
        fn on_key(
            &mut self,
            event: &InputEvent,
            controller: &mut LineController,
        ) -> miette::Result<KeyHandlerResult> {
            match event.as_key_press() {
                Some(key_press) if key_press.ch == Some('x') => {
                    controller.insert("X");
                    Ok(KeyHandlerResult::Handled)
                }
                Some(key_press) if key_press.is(KeyCode::F5) => Ok(KeyHandlerResult::Accept),
                Some(key_press) if key_press.is(KeyCode::F6) => Ok(KeyHandlerResult::Cancel),
                Some(key_press) if key_press.is(KeyCode::F7) => miette::bail!("F7 is broken"),
                _ => Ok(KeyHandlerResult::NotHandled),
            }
        }
    }

    async fn read_with_handler(input: Vec<InputEvent>) -> Result<ReadlineOutcome, ReadlineError> {
        let mut editor = LineEditor::default();
        let mut backend = MockTerminalBackend::new_mock(input);
        editor
            .read_line(&mut backend, &CancellationToken::new(), &mut UppercaseX)
            .await
    }

    #[tokio::test]
    async fn test_handler_runs_before_default_behavior() {
        let input = events(vec![typed("axb"), vec![special(KeyCode::F5)]]);
        assert_eq!(read_with_handler(input).await.unwrap(), accepted("aXb"));

        let input = events(vec![typed("a"), vec![special(KeyCode::F6)]]);
        assert_eq!(
            read_with_handler(input).await.unwrap(),
            ReadlineOutcome::Canceled
        );
    }

    #[tokio::test]
    async fn test_handler_error_propagates() {
        let input = events(vec![typed("a"), vec![special(KeyCode::F7)]]);
        let error = read_with_handler(input).await.unwrap_err();
        assert!(matches!(error, ReadlineError::Handler(message) if message.contains("F7")));
    }

    #[derive(Debug)]
    struct FailingPrompt;

    impl ReadlineHandlers for FailingPrompt {
        fn render_prompt(&mut self, _prompt: &str) -> miette::Result<Option<String>> {
            miette::bail!("no colors today")
        }
    }

    #[tokio::test]
    async fn test_prompt_renderer_failure_falls_back_to_plain_prompt() {
        let mut editor = LineEditor::new(ReadlineOptions::default().with_prompt("$ "));
        let mut backend = MockTerminalBackend::new_mock(events(vec![
            typed("ls"),
            vec![special(KeyCode::Enter)],
        ]));
        let outcome = editor
            .read_line(&mut backend, &CancellationToken::new(), &mut FailingPrompt)
            .await
            .unwrap();

        assert_eq!(outcome, accepted("ls"));
        let output = backend.stdout_mock().get_copy_of_buffer_as_string_strip_ansi();
        assert!(output.contains("$ ls"));
    }
}

#[cfg(test)]
mod tests_render {
    use super::test_fixtures::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_long_line_is_shown_with_ellipsis() {
        let mut editor = LineEditor::new(ReadlineOptions::default().with_prompt("> "));
        let mut backend = MockTerminalBackend::new_mock(vec![
            InputEvent::text("abcdefghijklmnopqrstuvwxyz"),
            special(KeyCode::Enter),
        ])
        .with_window_size(Size::new(12, 5));
        editor
            .read_line(&mut backend, &CancellationToken::new(), &mut NoHandlers)
            .await
            .unwrap();

        let output = backend.stdout_mock().get_copy_of_buffer_as_string_strip_ansi();
        assert!(output.contains("> …stuvwxyz"));
        // Stripping drops the carriage return, so check the line end on the raw bytes.
        let raw_output = backend.stdout_mock().get_copy_of_buffer_as_string();
        assert!(raw_output.ends_with("\r\n"));
    }

    #[tokio::test]
    async fn test_echo_off_writes_nothing() {
        let mut editor = LineEditor::new(
            ReadlineOptions::default()
                .with_prompt("password: ")
                .with_echo(false),
        );
        let mut backend = MockTerminalBackend::new_mock(events(vec![
            typed("secret"),
            vec![special(KeyCode::Enter)],
        ]));
        let outcome = editor
            .read_line(&mut backend, &CancellationToken::new(), &mut NoHandlers)
            .await
            .unwrap();

        assert_eq!(outcome, accepted("secret"));
        assert_eq!(backend.stdout_mock().get_copy_of_buffer_as_string(), "");
    }

    #[tokio::test]
    async fn test_ctrl_l_clears_screen() {
        let mut editor = LineEditor::default();
        let mut backend =
            MockTerminalBackend::new_mock(vec![ctrl('l'), special(KeyCode::Enter)]);
        editor
            .read_line(&mut backend, &CancellationToken::new(), &mut NoHandlers)
            .await
            .unwrap();
        assert!(
            backend
                .stdout_mock()
                .get_copy_of_buffer_as_string()
                .contains("\x1b[2J")
        );
    }

    #[tokio::test]
    async fn test_resize_widens_viewport() {
        let mut editor = LineEditor::default();
        let mut backend = MockTerminalBackend::new_mock(vec![
            InputEvent::text("abcdefghij"),
            InputEvent::resize(Size::new(40, 5)),
            special(KeyCode::Enter),
        ])
        .with_window_size(Size::new(6, 5));
        editor
            .read_line(&mut backend, &CancellationToken::new(), &mut NoHandlers)
            .await
            .unwrap();

        let output = backend.stdout_mock().get_copy_of_buffer_as_string_strip_ansi();
        assert!(output.contains("…ghij"));
        assert!(output.contains("abcdefghij"));
    }
}
