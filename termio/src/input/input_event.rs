// Copyright (c) 2022-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::ModifierKeysMask;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use strum_macros::{Display, EnumIter, EnumString};

/// Build a [`KeyPress`].
///
/// ```rust
/// use r3bl_termio::{KeyCode, KeyPress, ModifierKeysMask, key_press};
///
/// let a = key_press!(@char 'a');
/// assert_eq!(a, KeyPress::new(KeyCode::Unknown, Some('a'), ModifierKeysMask::new()));
///
/// let ctrl_left = key_press!(@special ModifierKeysMask::new().with_ctrl(), KeyCode::Left);
/// assert!(ctrl_left.mask.is_ctrl());
/// ```
#[macro_export]
macro_rules! key_press {
    // @char
    (@char $arg_char : expr) => {
        $crate::KeyPress::new($crate::KeyCode::Unknown, Some($arg_char), $crate::ModifierKeysMask::new())
    };

    (@char $arg_modifiers : expr, $arg_char : expr) => {
        $crate::KeyPress::new($crate::KeyCode::Unknown, Some($arg_char), $arg_modifiers)
    };

    // @special
    (@special $arg_special : expr) => {
        $crate::KeyPress::new($arg_special, None, $crate::ModifierKeysMask::new())
    };

    (@special $arg_modifiers : expr, $arg_special : expr) => {
        $crate::KeyPress::new($arg_special, None, $arg_modifiers)
    };
}

/// One input event, stamped with the instant it was created. Events are never mutated
/// after construction.
#[derive(Debug, Clone)]
pub struct InputEvent {
    pub kind: InputEventKind,
    pub created_at: Instant,
}

impl InputEvent {
    #[must_use]
    pub fn new(kind: InputEventKind) -> Self {
        Self {
            kind,
            created_at: Instant::now(),
        }
    }

    #[must_use]
    pub fn key(key_press: KeyPress) -> Self { Self::new(InputEventKind::Key(key_press)) }

    #[must_use]
    pub fn text(text: impl Into<String>) -> Self { Self::new(InputEventKind::Text(text.into())) }

    #[must_use]
    pub fn paste(text: impl Into<String>) -> Self {
        Self::new(InputEventKind::Paste(text.into()))
    }

    #[must_use]
    pub fn mouse(mouse_input: MouseInput) -> Self { Self::new(InputEventKind::Mouse(mouse_input)) }

    #[must_use]
    pub fn resize(size: Size) -> Self { Self::new(InputEventKind::Resize(size)) }

    #[must_use]
    pub fn signal(signal: SignalKind) -> Self { Self::new(InputEventKind::Signal(signal)) }

    #[must_use]
    pub fn as_key_press(&self) -> Option<&KeyPress> {
        match &self.kind {
            InputEventKind::Key(key_press) => Some(key_press),
            _ => None,
        }
    }
}

impl From<InputEventKind> for InputEvent {
    fn from(kind: InputEventKind) -> Self { Self::new(kind) }
}

impl From<KeyPress> for InputEvent {
    fn from(key_press: KeyPress) -> Self { Self::key(key_press) }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEventKind {
    Key(KeyPress),
    /// A run of printable text delivered at once (IME composition, or fast delivery
    /// when the decoder coalesces text).
    Text(String),
    /// The full content of a bracketed paste, newlines included.
    Paste(String),
    Mouse(MouseInput),
    Resize(Size),
    Signal(SignalKind),
}

/// Printable keys use [`KeyCode::Unknown`] and carry their character. Ctrl+letter
/// carries the control character, eg `Ctrl+R` is `'\x12'`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyPress {
    pub code: KeyCode,
    pub ch: Option<char>,
    pub mask: ModifierKeysMask,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum KeyCode {
    Unknown,
    Enter,
    Escape,
    Backspace,
    Tab,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Insert,
    Delete,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
}

impl KeyCode {
    /// `F1` for `1` through `F12` for `12`.
    #[must_use]
    pub fn function(number: u16) -> Option<Self> {
        Some(match number {
            1 => KeyCode::F1,
            2 => KeyCode::F2,
            3 => KeyCode::F3,
            4 => KeyCode::F4,
            5 => KeyCode::F5,
            6 => KeyCode::F6,
            7 => KeyCode::F7,
            8 => KeyCode::F8,
            9 => KeyCode::F9,
            10 => KeyCode::F10,
            11 => KeyCode::F11,
            12 => KeyCode::F12,
            _ => return None,
        })
    }
}

/// Map a letter to its control character (`'r'` → `'\x12'`). Other chars are returned
/// unchanged.
#[must_use]
pub fn to_control_char(ch: char) -> char {
    if ch.is_ascii_alphabetic() {
        char::from(ch.to_ascii_lowercase() as u8 - b'a' + 1)
    } else {
        ch
    }
}

/// Map a control character back to its lowercase letter (`'\x12'` → `'r'`).
#[must_use]
pub fn from_control_char(ch: char) -> Option<char> {
    match ch {
        '\u{1}'..='\u{1a}' => Some(char::from(ch as u8 - 1 + b'a')),
        _ => None,
    }
}

impl KeyPress {
    #[must_use]
    pub const fn new(code: KeyCode, ch: Option<char>, mask: ModifierKeysMask) -> Self {
        Self { code, ch, mask }
    }

    #[must_use]
    pub fn with_mask(mut self, mask: ModifierKeysMask) -> Self {
        self.mask = mask;
        self
    }

    /// The letter of a Ctrl+letter press, lowercase. Accepts both encodings: the control
    /// character (as decoded from a terminal) and a plain letter with Ctrl set.
    #[must_use]
    pub fn ctrl_letter(&self) -> Option<char> {
        if self.code != KeyCode::Unknown || !self.mask.is_ctrl() {
            return None;
        }
        let ch = self.ch?;
        from_control_char(ch).or_else(|| {
            ch.is_ascii_alphabetic()
                .then(|| ch.to_ascii_lowercase())
        })
    }

    /// The character to insert for this key, if it is plain text input. Shift is allowed
    /// since it is already reflected in the character.
    #[must_use]
    pub fn printable_char(&self) -> Option<char> {
        if self.code != KeyCode::Unknown
            || self.mask.is_ctrl()
            || self.mask.is_alt()
            || self.mask.is_meta()
        {
            return None;
        }
        self.ch.filter(|ch| !ch.is_control())
    }

    #[must_use]
    pub fn is(&self, code: KeyCode) -> bool { self.code == code }
}

/// Terminal size in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Size {
    pub cols: u16,
    pub rows: u16,
}

impl Size {
    #[must_use]
    pub const fn new(cols: u16, rows: u16) -> Self { Self { cols, rows } }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    Interrupt,
    Break,
}

/// Column and row are 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseInput {
    pub col: u16,
    pub row: u16,
    pub button: MouseButton,
    pub kind: MouseInputKind,
    pub mask: ModifierKeysMask,
    /// Positive scrolls up (away from the user), negative scrolls down. Zero unless
    /// `kind` is [`MouseInputKind::Wheel`].
    pub wheel_delta: i8,
}

impl MouseInput {
    #[must_use]
    pub fn new(col: u16, row: u16, button: MouseButton, kind: MouseInputKind) -> Self {
        Self {
            col,
            row,
            button,
            kind,
            mask: ModifierKeysMask::new(),
            wheel_delta: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseInputKind {
    Move,
    Down,
    Up,
    DoubleClick,
    Drag,
    Wheel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    None,
    Left,
    Middle,
    Right,
}
