// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{DecoderOptions, DistributorError, DistributorOptions, InputEvent,
            OutputDevice, Size, DEFAULT_EVENT_CAPACITY};
use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Fallback when the terminal size can't be queried (eg output is redirected).
pub const DEFAULT_WINDOW_SIZE: Size = Size::new(80, 24);

/// What the terminal on the other side supports. Query this before enabling decoder or
/// editor features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TerminalCapabilities {
    pub mouse: bool,
    pub cursor_positioning: bool,
    pub bracketed_paste: bool,
    pub output_redirected: bool,
}

impl TerminalCapabilities {
    /// An interactive VT-100 compatible terminal.
    #[must_use]
    pub fn interactive() -> Self {
        Self {
            mouse: true,
            cursor_positioning: true,
            bracketed_paste: true,
            output_redirected: false,
        }
    }

    /// Output is going to a pipe or file.
    #[must_use]
    pub fn redirected() -> Self {
        Self {
            output_redirected: true,
            ..Self::default()
        }
    }
}

/// Passed to [`TerminalBackend::start_input`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputOptions {
    pub enable_mouse: bool,
    pub enable_bracketed_paste: bool,
    pub capture_ctrl_c: bool,
    pub treat_control_c_as_input: bool,
    pub event_capacity: usize,
}

impl Default for InputOptions {
    fn default() -> Self {
        Self {
            enable_mouse: false,
            enable_bracketed_paste: true,
            capture_ctrl_c: true,
            treat_control_c_as_input: false,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl InputOptions {
    #[must_use]
    pub fn with_mouse(mut self, enable_mouse: bool) -> Self {
        self.enable_mouse = enable_mouse;
        self
    }

    #[must_use]
    pub fn with_bracketed_paste(mut self, enable_bracketed_paste: bool) -> Self {
        self.enable_bracketed_paste = enable_bracketed_paste;
        self
    }

    #[must_use]
    pub fn with_treat_control_c_as_input(mut self, treat_control_c_as_input: bool) -> Self {
        self.treat_control_c_as_input = treat_control_c_as_input;
        self
    }

    /// Turn off features the terminal can't do.
    #[must_use]
    pub fn restricted_to(mut self, capabilities: &TerminalCapabilities) -> Self {
        self.enable_mouse &= capabilities.mouse;
        self.enable_bracketed_paste &= capabilities.bracketed_paste;
        self
    }

    #[must_use]
    pub fn decoder_options(&self) -> DecoderOptions {
        DecoderOptions::default()
            .with_mouse(self.enable_mouse)
            .with_capture_ctrl_c(self.capture_ctrl_c)
            .with_treat_control_c_as_input(self.treat_control_c_as_input)
    }

    #[must_use]
    pub fn distributor_options(&self) -> DistributorOptions {
        DistributorOptions::default()
            .with_capacity(self.event_capacity)
            .with_mouse_events(self.enable_mouse)
    }
}

/// A source of input events and a sink for rendering.
///
/// [`Self::start_input`] and [`Self::stop_input`] are idempotent. Only one consumer may
/// read events at a time.
pub trait TerminalBackend {
    fn capabilities(&self) -> TerminalCapabilities;

    /// Start feeding events (raw mode, mouse and paste reporting, reader task).
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal can't be put into the requested mode.
    fn start_input(&mut self, options: &InputOptions) -> std::io::Result<()>;

    /// Stop feeding events and restore the terminal.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal mode can't be restored.
    fn stop_input(&mut self) -> std::io::Result<()>;

    fn try_read_event(&mut self) -> Option<InputEvent>;

    /// Wait for the next event.
    fn read_event_async(
        &mut self,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<InputEvent, DistributorError>> + Send;

    /// Only used to size the render viewport.
    fn window_size(&self) -> Size;

    fn output_device(&self) -> OutputDevice;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_options_restricted_to_capabilities() {
        let options = InputOptions::default().with_mouse(true);
        let restricted = options.restricted_to(&TerminalCapabilities::redirected());
        assert!(!restricted.enable_mouse);
        assert!(!restricted.enable_bracketed_paste);

        let kept = options.restricted_to(&TerminalCapabilities::interactive());
        assert_eq!(kept, options);
    }

    #[test]
    fn test_derived_options() {
        let options = InputOptions::default()
            .with_mouse(true)
            .with_treat_control_c_as_input(true);
        let decoder_options = options.decoder_options();
        assert!(decoder_options.enable_mouse);
        assert!(!decoder_options.emits_interrupt_signal());
        assert!(options.distributor_options().mouse_events_enabled);
    }
}
