// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Incremental CSI (`ESC [`) and SS3 (`ESC O`) parsing.
//!
//! A [`CsiSequence`] is fed one character at a time (everything after `ESC [`). Once a
//! final byte arrives, [`CsiSequence::dispatch`] interprets it:
//!
//! | Sequence                | Meaning                                     |
//! |-------------------------|---------------------------------------------|
//! | `CSI A..D`, `CSI H`/`F` | Arrows, Home, End                           |
//! | `CSI 1;<m>C`            | Same keys with xterm modifier `m`           |
//! | `CSI P..S`              | F1..F4 (with modifiers: `CSI 1;<m>P`)       |
//! | `CSI <n>~`              | Insert, Delete, Page keys, Home/End, F-keys |
//! | `CSI 200~` / `CSI 201~` | Bracketed paste start / end                 |
//! | `CSI Z`                 | Shift+Tab                                   |
//! | `CSI < b;x;y M`/`m`     | SGR mouse press / release                   |
//! | `CSI 8;rows;cols t`     | Window size report                          |
//! | `CSI I` / `CSI O`       | Focus in / out (dropped)                    |

use crate::{DecoderOptions, InputEvent, KeyCode, KeyPress, ModifierKeysMask, MouseButton,
            MouseInput, MouseInputKind, Size};
use smallvec::SmallVec;

pub const PASTE_START_PARAM: u16 = 200;
pub const PASTE_END_PARAM: u16 = 201;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CsiStep {
    /// Parameter or intermediate byte, keep feeding.
    Continue,
    /// Final byte.
    Complete(char),
    /// A character that can't appear inside a CSI sequence.
    Invalid,
}

#[derive(Debug, Clone)]
pub enum CsiOutcome {
    Event(InputEvent),
    PasteStart,
    PasteEnd,
    /// Recognized, or at least well formed, but produces nothing.
    Dropped(&'static str),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsiSequence {
    marker: Option<char>,
    params: SmallVec<[u16; 4]>,
    current: Option<u16>,
    has_intermediates: bool,
    len: usize,
}

impl CsiSequence {
    /// Number of characters pushed so far.
    #[must_use]
    pub fn len(&self) -> usize { self.len }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.len == 0 }

    #[must_use]
    pub fn params(&self) -> &[u16] { &self.params }

    #[must_use]
    pub fn param(&self, index: usize) -> Option<u16> { self.params.get(index).copied() }

    pub fn push(&mut self, ch: char) -> CsiStep {
        self.len += 1;
        match ch {
            '0'..='9' => {
                let digit = ch as u16 - '0' as u16;
                let value = self.current.unwrap_or(0);
                self.current = Some(value.saturating_mul(10).saturating_add(digit));
                CsiStep::Continue
            }
            ';' | ':' => {
                self.params.push(self.current.take().unwrap_or(0));
                CsiStep::Continue
            }
            '<' | '=' | '>' | '?' if self.len == 1 => {
                self.marker = Some(ch);
                CsiStep::Continue
            }
            '\u{20}'..='\u{2f}' => {
                self.has_intermediates = true;
                CsiStep::Continue
            }
            '\u{40}'..='\u{7e}' => {
                if let Some(value) = self.current.take() {
                    self.params.push(value);
                }
                CsiStep::Complete(ch)
            }
            _ => CsiStep::Invalid,
        }
    }

    /// Interpret a complete sequence ending in `final_char`.
    #[must_use]
    pub fn dispatch(&self, final_char: char, options: &DecoderOptions) -> CsiOutcome {
        match self.marker {
            Some('<') if matches!(final_char, 'M' | 'm') => {
                return self.dispatch_sgr_mouse(final_char, options);
            }
            Some(_) => return CsiOutcome::Dropped("private marker"),
            None => {}
        }

        if self.has_intermediates {
            return CsiOutcome::Dropped("intermediate bytes");
        }

        let cursor_key = |code: KeyCode| {
            let mask = self
                .param(1)
                .map(ModifierKeysMask::from_xterm_param)
                .unwrap_or_default();
            CsiOutcome::Event(InputEvent::key(KeyPress::new(code, None, mask)))
        };

        match final_char {
            'A' => cursor_key(KeyCode::Up),
            'B' => cursor_key(KeyCode::Down),
            'C' => cursor_key(KeyCode::Right),
            'D' => cursor_key(KeyCode::Left),
            'H' => cursor_key(KeyCode::Home),
            'F' => cursor_key(KeyCode::End),
            'P' => cursor_key(KeyCode::F1),
            'Q' => cursor_key(KeyCode::F2),
            'R' => cursor_key(KeyCode::F3),
            'S' => cursor_key(KeyCode::F4),
            'Z' => CsiOutcome::Event(InputEvent::key(KeyPress::new(
                KeyCode::Tab,
                None,
                ModifierKeysMask::new().with_shift(),
            ))),
            '~' => self.dispatch_tilde(),
            't' => self.dispatch_window_report(),
            'I' | 'O' => CsiOutcome::Dropped("focus report"),
            _ => CsiOutcome::Dropped("unknown final byte"),
        }
    }

    fn dispatch_tilde(&self) -> CsiOutcome {
        let Some(number) = self.param(0) else {
            return CsiOutcome::Dropped("missing key number");
        };

        let code = match number {
            PASTE_START_PARAM => return CsiOutcome::PasteStart,
            PASTE_END_PARAM => return CsiOutcome::PasteEnd,
            1 | 7 => KeyCode::Home,
            2 => KeyCode::Insert,
            3 => KeyCode::Delete,
            4 | 8 => KeyCode::End,
            5 => KeyCode::PageUp,
            6 => KeyCode::PageDown,
            11..=15 => match KeyCode::function(number - 10) {
                Some(code) => code,
                None => return CsiOutcome::Dropped("function key"),
            },
            17..=21 => match KeyCode::function(number - 11) {
                Some(code) => code,
                None => return CsiOutcome::Dropped("function key"),
            },
            23 => KeyCode::F11,
            24 => KeyCode::F12,
            _ => return CsiOutcome::Dropped("unknown key number"),
        };

        let mask = self
            .param(1)
            .map(ModifierKeysMask::from_xterm_param)
            .unwrap_or_default();
        CsiOutcome::Event(InputEvent::key(KeyPress::new(code, None, mask)))
    }

    fn dispatch_window_report(&self) -> CsiOutcome {
        match self.params() {
            [8, rows, cols] => {
                CsiOutcome::Event(InputEvent::resize(Size::new(*cols, *rows)))
            }
            _ => CsiOutcome::Dropped("window report"),
        }
    }

    fn dispatch_sgr_mouse(&self, final_char: char, options: &DecoderOptions) -> CsiOutcome {
        let [code, x, y] = self.params() else {
            return CsiOutcome::Dropped("malformed SGR mouse report");
        };

        let Some(mouse_input) = decode_sgr_mouse(*code, *x, *y, final_char == 'M') else {
            return CsiOutcome::Dropped("unsupported SGR mouse button");
        };

        if options.enable_mouse {
            CsiOutcome::Event(InputEvent::mouse(mouse_input))
        } else {
            CsiOutcome::Dropped("mouse disabled")
        }
    }
}

/// Decode one SGR mouse report. Coordinates arrive 1-based and are returned 0-based.
///
/// Button code bits: `0b11` button (3 = none), `4` Shift, `8` Alt, `16` Ctrl, `32`
/// motion, `64` wheel (low bit: 0 = up, 1 = down).
#[must_use]
pub fn decode_sgr_mouse(code: u16, x: u16, y: u16, is_press: bool) -> Option<MouseInput> {
    let col = x.saturating_sub(1);
    let row = y.saturating_sub(1);

    let mut mask = ModifierKeysMask::new();
    if code & 4 != 0 {
        mask = mask.with_shift();
    }
    if code & 8 != 0 {
        mask = mask.with_alt();
    }
    if code & 16 != 0 {
        mask = mask.with_ctrl();
    }

    let button = match code & 0b11 {
        0 => MouseButton::Left,
        1 => MouseButton::Middle,
        2 => MouseButton::Right,
        _ => MouseButton::None,
    };

    let mut mouse_input = if code & 64 != 0 {
        let wheel_delta = match code & 0b11 {
            0 => 1,
            1 => -1,
            // Horizontal scroll.
            _ => return None,
        };
        let mut it = MouseInput::new(col, row, MouseButton::None, MouseInputKind::Wheel);
        it.wheel_delta = wheel_delta;
        it
    } else if code & 32 != 0 {
        match button {
            MouseButton::None => MouseInput::new(col, row, button, MouseInputKind::Move),
            _ => MouseInput::new(col, row, button, MouseInputKind::Drag),
        }
    } else if is_press && button != MouseButton::None {
        MouseInput::new(col, row, button, MouseInputKind::Down)
    } else {
        MouseInput::new(col, row, button, MouseInputKind::Up)
    };

    mouse_input.mask = mask;
    Some(mouse_input)
}

/// Keys sent as `ESC O <ch>` (application cursor mode, and F1..F4 on most terminals).
#[must_use]
pub fn ss3_key_press(ch: char) -> Option<KeyPress> {
    let code = match ch {
        'A' => KeyCode::Up,
        'B' => KeyCode::Down,
        'C' => KeyCode::Right,
        'D' => KeyCode::Left,
        'H' => KeyCode::Home,
        'F' => KeyCode::End,
        'P' => KeyCode::F1,
        'Q' => KeyCode::F2,
        'R' => KeyCode::F3,
        'S' => KeyCode::F4,
        _ => return None,
    };
    Some(KeyPress::new(code, None, ModifierKeysMask::new()))
}
