// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Textual key gestures, eg `Ctrl+R`, `Ctrl+Shift+Left`, `Alt+b`, `F5`.
//!
//! # Grammar
//!
//! ```text
//! gesture  := (modifier "+")* key
//! modifier := CTRL | CONTROL | SHIFT | ALT | META | SUPER | WIN      (any case)
//! key      := named-key | single-char
//! ```
//!
//! Named keys: `enter`, `escape`/`esc`, `backspace`, `tab`, `space`, `up`, `down`,
//! `left`, `right`, `home`, `end`, `pageup`/`pgup`, `pagedown`/`pgdn`, `insert`/`ins`,
//! `delete`/`del`, `f1`..`f12`.
//!
//! A letter combined with `CTRL` becomes its control character, which is what a
//! terminal actually sends for that chord (`Ctrl+R` is `0x12`).
//!
//! # Normalization of printable keys
//!
//! The character of a printable key already encodes Shift (`A` vs `a`), so Shift is
//! dropped from printable gestures. Shift stays on named keys (`Shift+Tab`,
//! `Shift+Left`) and on control characters.

use super::{KeyCode, KeyPress, ModifierKeysMask, from_control_char, to_control_char};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::{fmt::{self, Display, Formatter},
          str::FromStr};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum KeyGestureParseError {
    #[error("key gesture is empty")]
    #[diagnostic(code(r3bl_termio::key_gesture::empty))]
    Empty,

    #[error("key gesture `{0}` ends with a `+` separator")]
    #[diagnostic(
        code(r3bl_termio::key_gesture::trailing_separator),
        help("Write the key after the last `+`, eg `Ctrl+R`")
    )]
    TrailingSeparator(String),

    #[error("key gesture `{0}` has modifiers but no key")]
    #[diagnostic(code(r3bl_termio::key_gesture::missing_key))]
    MissingKey(String),

    #[error("unknown token `{0}` in key gesture")]
    #[diagnostic(
        code(r3bl_termio::key_gesture::unknown_token),
        help("Modifiers are CTRL, SHIFT, ALT, META; keys are named keys, f1..f12 or one character")
    )]
    UnknownToken(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct KeyGesture {
    pub code: KeyCode,
    pub ch: Option<char>,
    pub mask: ModifierKeysMask,
}

impl KeyGesture {
    #[must_use]
    pub fn new(code: KeyCode, ch: Option<char>, mask: ModifierKeysMask) -> Self {
        normalize(Self { code, ch, mask })
    }

    #[must_use]
    pub fn named(code: KeyCode, mask: ModifierKeysMask) -> Self { Self::new(code, None, mask) }

    #[must_use]
    pub fn char(ch: char, mask: ModifierKeysMask) -> Self {
        Self::new(KeyCode::Unknown, Some(ch), mask)
    }

    /// `Ctrl+<letter>`.
    #[must_use]
    pub fn ctrl(letter: char) -> Self { Self::char(letter, ModifierKeysMask::new().with_ctrl()) }

    /// The same gesture with Shift released. Used for binding lookup fallback.
    #[must_use]
    pub fn without_shift(&self) -> Self {
        Self {
            mask: self.mask.without_shift(),
            ..*self
        }
    }
}

fn normalize(mut gesture: KeyGesture) -> KeyGesture {
    if gesture.code != KeyCode::Unknown {
        gesture.ch = None;
        return gesture;
    }

    if let Some(ch) = gesture.ch {
        if gesture.mask.is_ctrl() && ch.is_ascii_alphabetic() {
            gesture.ch = Some(to_control_char(ch));
        } else if !ch.is_control() {
            if gesture.mask.is_shift() && ch.is_ascii_lowercase() {
                gesture.ch = Some(ch.to_ascii_uppercase());
            }
            gesture.mask = gesture.mask.without_shift();
        }
    }

    gesture
}

impl From<&KeyPress> for KeyGesture {
    fn from(key_press: &KeyPress) -> Self {
        KeyGesture::new(key_press.code, key_press.ch, key_press.mask)
    }
}

impl From<KeyPress> for KeyGesture {
    fn from(key_press: KeyPress) -> Self { KeyGesture::from(&key_press) }
}

fn parse_modifier(token: &str, mask: &mut ModifierKeysMask) -> bool {
    match token.to_ascii_lowercase().as_str() {
        "ctrl" | "control" => *mask = mask.with_ctrl(),
        "shift" => *mask = mask.with_shift(),
        "alt" => *mask = mask.with_alt(),
        "meta" | "super" | "win" => *mask = mask.with_meta(),
        _ => return false,
    }
    true
}

fn parse_named_key(token: &str) -> Option<(KeyCode, Option<char>)> {
    let code = match token.to_ascii_lowercase().as_str() {
        "space" | "spacebar" => return Some((KeyCode::Unknown, Some(' '))),
        "enter" | "return" => KeyCode::Enter,
        "escape" | "esc" => KeyCode::Escape,
        "backspace" => KeyCode::Backspace,
        "tab" => KeyCode::Tab,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" | "pgup" => KeyCode::PageUp,
        "pagedown" | "pgdn" => KeyCode::PageDown,
        "insert" | "ins" => KeyCode::Insert,
        "delete" | "del" => KeyCode::Delete,
        lower => {
            let number = lower.strip_prefix('f')?.parse::<u16>().ok()?;
            KeyCode::function(number)?
        }
    };
    Some((code, None))
}

impl FromStr for KeyGesture {
    type Err = KeyGestureParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let input = input.trim();
        if input.is_empty() {
            return Err(KeyGestureParseError::Empty);
        }
        if input.ends_with('+') {
            return Err(KeyGestureParseError::TrailingSeparator(input.to_string()));
        }

        let tokens: Vec<&str> = input.split('+').map(str::trim).collect();
        let Some((key_token, modifier_tokens)) = tokens.split_last() else {
            return Err(KeyGestureParseError::Empty);
        };

        let mut mask = ModifierKeysMask::new();
        for token in modifier_tokens {
            if !parse_modifier(token, &mut mask) {
                return Err(KeyGestureParseError::UnknownToken((*token).to_string()));
            }
        }

        if parse_modifier(key_token, &mut ModifierKeysMask::new()) {
            return Err(KeyGestureParseError::MissingKey(input.to_string()));
        }

        let (code, ch) = if let Some(named) = parse_named_key(key_token) {
            named
        } else {
            let mut chars = key_token.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) => (KeyCode::Unknown, Some(ch)),
                _ => return Err(KeyGestureParseError::UnknownToken((*key_token).to_string())),
            }
        };

        Ok(KeyGesture::new(code, ch, mask))
    }
}

impl TryFrom<String> for KeyGesture {
    type Error = KeyGestureParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> { value.parse() }
}

impl From<KeyGesture> for String {
    fn from(gesture: KeyGesture) -> Self { gesture.to_string() }
}

impl Display for KeyGesture {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.mask.is_ctrl() {
            f.write_str("Ctrl+")?;
        }
        if self.mask.is_shift() {
            f.write_str("Shift+")?;
        }
        if self.mask.is_alt() {
            f.write_str("Alt+")?;
        }
        if self.mask.is_meta() {
            f.write_str("Meta+")?;
        }

        match (self.code, self.ch) {
            (KeyCode::Unknown, Some(' ')) => f.write_str("Space"),
            (KeyCode::Unknown, Some(ch)) => match from_control_char(ch) {
                Some(letter) => write!(f, "{}", letter.to_ascii_uppercase()),
                None => write!(f, "{ch}"),
            },
            (code, _) => write!(f, "{code}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key_press;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn ctrl() -> ModifierKeysMask { ModifierKeysMask::new().with_ctrl() }

    #[test]
    fn test_parse_ctrl_letter_maps_to_control_char() {
        let gesture: KeyGesture = "CTRL+R".parse().unwrap();
        assert_eq!(gesture, KeyGesture::new(KeyCode::Unknown, Some('\u{12}'), ctrl()));
        assert_eq!("control+r".parse::<KeyGesture>().unwrap(), gesture);
        assert_eq!(KeyGesture::ctrl('r'), gesture);
    }

    #[test]
    fn test_parse_named_keys_and_aliases() {
        let expect = |code| KeyGesture::named(code, ModifierKeysMask::new());
        assert_eq!("enter".parse::<KeyGesture>().unwrap(), expect(KeyCode::Enter));
        assert_eq!("ESC".parse::<KeyGesture>().unwrap(), expect(KeyCode::Escape));
        assert_eq!("pgup".parse::<KeyGesture>().unwrap(), expect(KeyCode::PageUp));
        assert_eq!("PgDn".parse::<KeyGesture>().unwrap(), expect(KeyCode::PageDown));
        assert_eq!("ins".parse::<KeyGesture>().unwrap(), expect(KeyCode::Insert));
        assert_eq!("del".parse::<KeyGesture>().unwrap(), expect(KeyCode::Delete));
        assert_eq!("f1".parse::<KeyGesture>().unwrap(), expect(KeyCode::F1));
        assert_eq!("F12".parse::<KeyGesture>().unwrap(), expect(KeyCode::F12));
        assert_eq!(
            "space".parse::<KeyGesture>().unwrap(),
            KeyGesture::char(' ', ModifierKeysMask::new())
        );
    }

    #[test]
    fn test_parse_modifier_aliases() {
        let gesture: KeyGesture = "win+Super+META+alt+Shift+left".parse().unwrap();
        assert_eq!(
            gesture.mask,
            ModifierKeysMask::new().with_meta().with_alt().with_shift()
        );
        assert_eq!(gesture.code, KeyCode::Left);
    }

    #[test]
    fn test_shift_is_dropped_for_printable_keys_only() {
        let shift_a: KeyGesture = "Shift+a".parse().unwrap();
        assert_eq!(shift_a, KeyGesture::char('A', ModifierKeysMask::new()));

        let shift_tab: KeyGesture = "Shift+Tab".parse().unwrap();
        assert!(shift_tab.mask.is_shift());

        let shift_left: KeyGesture = "shift+left".parse().unwrap();
        assert!(shift_left.mask.is_shift());
    }

    #[test]
    fn test_from_key_press_normalizes() {
        let shifted = key_press!(@char ModifierKeysMask::new().with_shift(), 'X');
        assert_eq!(
            KeyGesture::from(&shifted),
            KeyGesture::char('X', ModifierKeysMask::new())
        );

        let decoded_ctrl_r = key_press!(@char ctrl(), '\u{12}');
        let backend_ctrl_r = key_press!(@char ctrl(), 'r');
        assert_eq!(KeyGesture::from(&decoded_ctrl_r), KeyGesture::ctrl('r'));
        assert_eq!(KeyGesture::from(&backend_ctrl_r), KeyGesture::ctrl('r'));
    }

    #[test_case("" ; "empty")]
    #[test_case("   " ; "blank")]
    #[test_case("Ctrl+" ; "trailing separator")]
    #[test_case("Ctrl+Foo" ; "unknown trailing token")]
    #[test_case("Hyper+A" ; "unknown modifier")]
    #[test_case("Ctrl+Alt" ; "modifiers only")]
    #[test_case("a+b" ; "two keys")]
    #[test_case("f13" ; "no such function key")]
    fn test_malformed_gestures_fail(input: &str) {
        assert!(input.parse::<KeyGesture>().is_err());
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!("".parse::<KeyGesture>(), Err(KeyGestureParseError::Empty));
        assert_eq!(
            "Ctrl+".parse::<KeyGesture>(),
            Err(KeyGestureParseError::TrailingSeparator("Ctrl+".into()))
        );
        assert_eq!(
            "Ctrl+Foo".parse::<KeyGesture>(),
            Err(KeyGestureParseError::UnknownToken("Foo".into()))
        );
    }

    #[test_case("Ctrl+R" ; "ctrl letter")]
    #[test_case("Ctrl+Shift+Left" ; "ctrl shift arrow")]
    #[test_case("Alt+b" ; "alt letter")]
    #[test_case("Shift+Tab" ; "shift tab")]
    #[test_case("F5" ; "function key")]
    #[test_case("Ctrl+Space" ; "ctrl space")]
    #[test_case("Meta+Enter" ; "meta enter")]
    #[test_case("PageDown" ; "page down")]
    fn test_format_is_canonical(text: &str) {
        let gesture: KeyGesture = text.parse().unwrap();
        assert_eq!(gesture.to_string(), text);
    }

    #[test]
    fn test_serde_as_string() {
        let gesture = KeyGesture::ctrl('z');
        let json = serde_json::to_string(&gesture).unwrap();
        assert_eq!(json, "\"Ctrl+Z\"");
        let back: KeyGesture = serde_json::from_str(&json).unwrap();
        assert_eq!(back, gesture);
        assert!(serde_json::from_str::<KeyGesture>("\"Ctrl+\"").is_err());
    }
}
