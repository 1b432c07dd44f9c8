// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

/// Upper bound on bracketed paste content. Anything past it is discarded, the paste
/// event is still emitted with what fit.
pub const DEFAULT_MAX_PASTE_LEN: usize = 1024 * 1024;

/// CSI sequences longer than this are dropped.
pub const MAX_CSI_LEN: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderOptions {
    /// Emit mouse events for SGR mouse reports. When off, reports are still consumed.
    pub enable_mouse: bool,
    /// Emit [`SignalKind::Interrupt`] before the `Ctrl+C` key.
    ///
    /// [`SignalKind::Interrupt`]: crate::SignalKind::Interrupt
    pub capture_ctrl_c: bool,
    /// Treat `Ctrl+C` as a plain key, never as a signal.
    pub treat_control_c_as_input: bool,
    /// Deliver runs of printable characters in one chunk as a single `Text` event.
    pub coalesce_text: bool,
    pub max_paste_len: usize,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            enable_mouse: false,
            capture_ctrl_c: true,
            treat_control_c_as_input: false,
            coalesce_text: false,
            max_paste_len: DEFAULT_MAX_PASTE_LEN,
        }
    }
}

impl DecoderOptions {
    #[must_use]
    pub fn with_mouse(mut self, enable_mouse: bool) -> Self {
        self.enable_mouse = enable_mouse;
        self
    }

    #[must_use]
    pub fn with_capture_ctrl_c(mut self, capture_ctrl_c: bool) -> Self {
        self.capture_ctrl_c = capture_ctrl_c;
        self
    }

    #[must_use]
    pub fn with_treat_control_c_as_input(mut self, treat_control_c_as_input: bool) -> Self {
        self.treat_control_c_as_input = treat_control_c_as_input;
        self
    }

    #[must_use]
    pub fn with_coalesce_text(mut self, coalesce_text: bool) -> Self {
        self.coalesce_text = coalesce_text;
        self
    }

    #[must_use]
    pub fn with_max_paste_len(mut self, max_paste_len: usize) -> Self {
        self.max_paste_len = max_paste_len;
        self
    }

    /// Whether `0x03` should produce a [`SignalKind::Interrupt`] event.
    ///
    /// [`SignalKind::Interrupt`]: crate::SignalKind::Interrupt
    #[must_use]
    pub fn emits_interrupt_signal(&self) -> bool {
        self.capture_ctrl_c && !self.treat_control_c_as_input
    }
}
