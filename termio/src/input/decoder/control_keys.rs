// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! C0 control bytes and `DEL` as sent by a terminal in raw mode.
//!
//! | Byte          | Key                                   |
//! |---------------|---------------------------------------|
//! | `0x00`        | `Ctrl+Space`                          |
//! | `0x08`        | `Ctrl+Backspace` (xterm)              |
//! | `0x09`        | `Tab`                                 |
//! | `0x0A`, `0x0D`| `Enter` (raw mode sends CR)           |
//! | `0x01..=0x1A` | `Ctrl+<letter>`, carried as the byte  |
//! | `0x1C..=0x1F` | `Ctrl+\`, `Ctrl+]`, `Ctrl+^`, `Ctrl+_`|
//! | `0x7F`        | `Backspace`                           |

use crate::{KeyCode, KeyPress, ModifierKeysMask};

pub const ASCII_ESC: char = '\u{1b}';
pub const ASCII_DEL: char = '\u{7f}';
pub const ASCII_ETX: char = '\u{3}';

/// Map a control character to a key press. Returns `None` for anything that is not a
/// C0 control or `DEL`, and for `ESC` which starts a sequence instead.
#[must_use]
pub fn control_key_press(ch: char) -> Option<KeyPress> {
    let ctrl = ModifierKeysMask::new().with_ctrl();
    let key_press = match ch {
        '\r' | '\n' => KeyPress::new(KeyCode::Enter, None, ModifierKeysMask::new()),
        '\t' => KeyPress::new(KeyCode::Tab, None, ModifierKeysMask::new()),
        ASCII_DEL => KeyPress::new(KeyCode::Backspace, None, ModifierKeysMask::new()),
        '\u{8}' => KeyPress::new(KeyCode::Backspace, None, ctrl),
        '\u{0}' => KeyPress::new(KeyCode::Unknown, Some(' '), ctrl),
        ASCII_ESC => return None,
        '\u{1}'..='\u{1f}' => KeyPress::new(KeyCode::Unknown, Some(ch), ctrl),
        _ => return None,
    };
    Some(key_press)
}

/// A key that stands for itself, ie not a control character.
#[must_use]
pub fn printable_key_press(ch: char) -> KeyPress {
    KeyPress::new(KeyCode::Unknown, Some(ch), ModifierKeysMask::new())
}
