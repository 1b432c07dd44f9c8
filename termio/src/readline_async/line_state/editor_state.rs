// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::{CompletionSession, LineController, ReverseSearch, ViewWindow, clear_screen,
            finish_line, render_frame};
use crate::{History, HistoryNavigation, KeyBindings, OutputDevice, ReadlineHandlers,
            ReadlineOptions, Size, lock_output_device_as_mut, width_with_tab};
use std::io;

/// Everything an event handler may consult besides the [`LineState`] itself. Built
/// once per read by [`crate::LineEditor::read_line`].
pub(crate) struct EditorContext<'a, H: ?Sized> {
    pub options: &'a ReadlineOptions,
    pub bindings: &'a KeyBindings,
    pub history: &'a History,
    pub handlers: &'a mut H,
    pub output_device: &'a OutputDevice,
}

/// State of one [`crate::LineEditor::read_line`] call. Dropped when the read ends,
/// except for the kill buffer which the editor carries over.
#[derive(Debug)]
pub struct LineState {
    pub controller: LineController,
    pub navigation: HistoryNavigation,
    /// Present only between consecutive completion requests.
    pub completion: Option<CompletionSession>,
    pub reverse_search: Option<ReverseSearch>,
    pub is_mouse_selecting: bool,
    /// Screen row of the line, claimed by the first left click.
    pub editor_row: Option<u16>,
    pub term_size: Size,
    /// Viewport and prompt width from the last render, used to map mouse columns.
    pub view_window: ViewWindow,
    pub prompt_width: usize,
    pub needs_clear_screen: bool,
}

impl LineState {
    #[must_use]
    pub fn new(options: &ReadlineOptions, term_size: Size, kill_buffer: String) -> Self {
        Self {
            controller: LineController::new(options.max_length, options.undo_capacity)
                .with_kill_buffer(kill_buffer),
            navigation: HistoryNavigation::default(),
            completion: None,
            reverse_search: None,
            is_mouse_selecting: false,
            editor_row: None,
            term_size,
            view_window: ViewWindow::default(),
            prompt_width: 0,
            needs_clear_screen: false,
        }
    }

    /// Recompute the viewport and, if echo is on, draw the prompt and line.
    pub(crate) fn render<H: ReadlineHandlers + ?Sized>(
        &mut self,
        ctx: &mut EditorContext<'_, H>,
    ) -> io::Result<()> {
        let tab_width = ctx.options.tab_width;
        let (plain_prompt, prompt) = match &self.reverse_search {
            Some(search) => {
                let prompt = search.prompt();
                (prompt.clone(), prompt)
            }
            None => (ctx.options.prompt.clone(), styled_prompt(ctx)),
        };

        self.prompt_width = width_with_tab(&plain_prompt, tab_width);
        let available_width = usize::from(self.term_size.cols)
            .saturating_sub(self.prompt_width + 1)
            .max(1);
        self.view_window = ViewWindow::compute(
            self.controller.text(),
            self.controller.cursor(),
            available_width,
            tab_width,
        );

        let needs_clear_screen = std::mem::take(&mut self.needs_clear_screen);
        if !ctx.options.echo {
            return Ok(());
        }

        let view = self.view_window.view(&self.controller);
        let line_markup = ctx.handlers.render_line(&view);

        let out = lock_output_device_as_mut!(ctx.output_device);
        if needs_clear_screen {
            clear_screen(&mut *out)?;
        }
        render_frame(
            out,
            &prompt,
            self.prompt_width,
            &view,
            line_markup.as_deref(),
            tab_width,
        )
    }

    /// Leave the edited line on screen and move to the next one.
    pub(crate) fn finish<H: ?Sized>(&self, ctx: &EditorContext<'_, H>) -> io::Result<()> {
        if !ctx.options.echo {
            return Ok(());
        }
        finish_line(lock_output_device_as_mut!(ctx.output_device))
    }
}

fn styled_prompt<H: ReadlineHandlers + ?Sized>(ctx: &mut EditorContext<'_, H>) -> String {
    match ctx.handlers.render_prompt(&ctx.options.prompt) {
        Ok(Some(markup)) => markup,
        Ok(None) => ctx.options.prompt.clone(),
        Err(report) => {
            tracing::warn!(
                message = "Prompt renderer failed, using the plain prompt",
                error = %report
            );
            ctx.options.prompt.clone()
        }
    }
}
