// Copyright (c) 2022-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ModifierKeysMask {
    pub shift_key_state: KeyState,
    pub ctrl_key_state: KeyState,
    pub alt_key_state: KeyState,
    pub meta_key_state: KeyState,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyState {
    Pressed,
    #[default]
    NotPressed,
}

impl From<bool> for KeyState {
    fn from(pressed: bool) -> Self {
        if pressed {
            KeyState::Pressed
        } else {
            KeyState::NotPressed
        }
    }
}

impl ModifierKeysMask {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub fn with_shift(mut self) -> Self {
        self.shift_key_state = KeyState::Pressed;
        self
    }

    #[must_use]
    pub fn with_ctrl(mut self) -> Self {
        self.ctrl_key_state = KeyState::Pressed;
        self
    }

    #[must_use]
    pub fn with_alt(mut self) -> Self {
        self.alt_key_state = KeyState::Pressed;
        self
    }

    #[must_use]
    pub fn with_meta(mut self) -> Self {
        self.meta_key_state = KeyState::Pressed;
        self
    }

    #[must_use]
    pub fn without_shift(mut self) -> Self {
        self.shift_key_state = KeyState::NotPressed;
        self
    }

    #[must_use]
    pub fn is_shift(&self) -> bool { self.shift_key_state == KeyState::Pressed }

    #[must_use]
    pub fn is_ctrl(&self) -> bool { self.ctrl_key_state == KeyState::Pressed }

    #[must_use]
    pub fn is_alt(&self) -> bool { self.alt_key_state == KeyState::Pressed }

    #[must_use]
    pub fn is_meta(&self) -> bool { self.meta_key_state == KeyState::Pressed }

    #[must_use]
    pub fn is_empty(&self) -> bool { *self == Self::default() }

    /// Only Ctrl is pressed.
    #[must_use]
    pub fn is_ctrl_only(&self) -> bool { *self == Self::new().with_ctrl() }

    /// Only Alt is pressed.
    #[must_use]
    pub fn is_alt_only(&self) -> bool { *self == Self::new().with_alt() }

    /// Decode the xterm modifier parameter used in `CSI 1 ; m X` and SGR mouse reports.
    /// The parameter is `1 + bitfield` where Shift = 1, Alt = 2, Ctrl = 4, Meta = 8.
    #[must_use]
    pub fn from_xterm_param(param: u16) -> Self {
        let bits = param.saturating_sub(1);
        Self {
            shift_key_state: (bits & 1 != 0).into(),
            alt_key_state: (bits & 2 != 0).into(),
            ctrl_key_state: (bits & 4 != 0).into(),
            meta_key_state: (bits & 8 != 0).into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_mask() {
        let mask = ModifierKeysMask::new();
        assert!(mask.is_empty());
        assert!(!mask.is_shift());
        assert!(!mask.is_ctrl());
        assert!(!mask.is_alt());
        assert!(!mask.is_meta());
    }

    #[test]
    fn test_builders() {
        let mask = ModifierKeysMask::new().with_ctrl().with_shift();
        assert!(mask.is_ctrl());
        assert!(mask.is_shift());
        assert!(!mask.is_ctrl_only());
        assert!(mask.without_shift().is_ctrl_only());
        assert!(ModifierKeysMask::new().with_alt().is_alt_only());
    }

    #[test]
    fn test_from_xterm_param() {
        assert_eq!(ModifierKeysMask::from_xterm_param(1), ModifierKeysMask::new());
        assert_eq!(
            ModifierKeysMask::from_xterm_param(2),
            ModifierKeysMask::new().with_shift()
        );
        assert_eq!(
            ModifierKeysMask::from_xterm_param(3),
            ModifierKeysMask::new().with_alt()
        );
        assert_eq!(
            ModifierKeysMask::from_xterm_param(5),
            ModifierKeysMask::new().with_ctrl()
        );
        assert_eq!(
            ModifierKeysMask::from_xterm_param(6),
            ModifierKeysMask::new().with_ctrl().with_shift()
        );
        assert_eq!(
            ModifierKeysMask::from_xterm_param(9),
            ModifierKeysMask::new().with_meta()
        );
        assert_eq!(ModifierKeysMask::from_xterm_param(0), ModifierKeysMask::new());
    }
}
