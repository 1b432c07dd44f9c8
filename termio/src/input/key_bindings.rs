// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Map [`KeyGesture`]s to a closed set of [`EditorCommand`]s.
//!
//! Lookup order for a key press (see [`KeyBindings::resolve`]):
//! 1. The normalized gesture as pressed.
//! 2. If Shift is held and there is no binding, the same gesture without Shift.
//!
//! Bindings can be customized from JSON. Keys are gesture strings, values are command
//! names (any case) or `null` to remove a default binding:
//!
//! ```json
//! { "bindings": { "Ctrl+J": "Accept", "Escape": null } }
//! ```

use super::{KeyCode, KeyGesture, KeyGestureParseError, KeyPress, ModifierKeysMask};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use strum_macros::{Display, EnumIter, EnumString};
use thiserror::Error;

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
pub enum EditorCommand {
    Accept,
    Cancel,
    EndOfInput,
    ClearLine,
    MoveLeft,
    MoveRight,
    MoveWordLeft,
    MoveWordRight,
    MoveHome,
    MoveEnd,
    SelectLeft,
    SelectRight,
    SelectWordLeft,
    SelectWordRight,
    SelectHome,
    SelectEnd,
    SelectAll,
    DeleteBackward,
    DeleteForward,
    DeleteWordBackward,
    DeleteWordForward,
    KillToEnd,
    KillToStart,
    Cut,
    Copy,
    Paste,
    Undo,
    Redo,
    HistoryPrevious,
    HistoryNext,
    Complete,
    CompletePrevious,
    ReverseSearch,
    ClearScreen,
}

#[derive(Debug, Error, Diagnostic)]
pub enum KeyBindingsConfigError {
    #[error("key bindings config is not valid JSON")]
    #[diagnostic(code(r3bl_termio::key_bindings::json))]
    Json(#[from] serde_json::Error),

    #[error("invalid gesture `{gesture}` in key bindings config")]
    #[diagnostic(code(r3bl_termio::key_bindings::gesture))]
    Gesture {
        gesture: String,
        #[source]
        #[diagnostic_source]
        source: KeyGestureParseError,
    },

    #[error("unknown editor command `{0}` in key bindings config")]
    #[diagnostic(
        code(r3bl_termio::key_bindings::unknown_command),
        help("Command names are EditorCommand variants, eg MoveWordLeft")
    )]
    UnknownCommand(String),
}

#[derive(Debug, Deserialize)]
struct KeyBindingsConfig {
    #[serde(default)]
    bindings: BTreeMap<String, Option<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBindings {
    map: HashMap<KeyGesture, EditorCommand>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let none = ModifierKeysMask::new();
        let shift = ModifierKeysMask::new().with_shift();
        let ctrl = ModifierKeysMask::new().with_ctrl();
        let ctrl_shift = ctrl.with_shift();
        let alt = ModifierKeysMask::new().with_alt();

        let named = KeyGesture::named;
        let table = [
            (named(KeyCode::Enter, none), EditorCommand::Accept),
            (named(KeyCode::Escape, none), EditorCommand::ClearLine),
            // Motion.
            (named(KeyCode::Left, none), EditorCommand::MoveLeft),
            (named(KeyCode::Right, none), EditorCommand::MoveRight),
            (named(KeyCode::Home, none), EditorCommand::MoveHome),
            (named(KeyCode::End, none), EditorCommand::MoveEnd),
            (named(KeyCode::Left, ctrl), EditorCommand::MoveWordLeft),
            (named(KeyCode::Right, ctrl), EditorCommand::MoveWordRight),
            (KeyGesture::char('b', alt), EditorCommand::MoveWordLeft),
            (KeyGesture::char('f', alt), EditorCommand::MoveWordRight),
            // Selection.
            (named(KeyCode::Left, shift), EditorCommand::SelectLeft),
            (named(KeyCode::Right, shift), EditorCommand::SelectRight),
            (named(KeyCode::Home, shift), EditorCommand::SelectHome),
            (named(KeyCode::End, shift), EditorCommand::SelectEnd),
            (named(KeyCode::Left, ctrl_shift), EditorCommand::SelectWordLeft),
            (named(KeyCode::Right, ctrl_shift), EditorCommand::SelectWordRight),
            // Deletion.
            (named(KeyCode::Backspace, none), EditorCommand::DeleteBackward),
            (named(KeyCode::Delete, none), EditorCommand::DeleteForward),
            (named(KeyCode::Backspace, ctrl), EditorCommand::DeleteWordBackward),
            (named(KeyCode::Backspace, alt), EditorCommand::DeleteWordBackward),
            (named(KeyCode::Delete, ctrl), EditorCommand::DeleteWordForward),
            (KeyGesture::char('d', alt), EditorCommand::DeleteWordForward),
            (named(KeyCode::Insert, shift), EditorCommand::Paste),
            // History, completion, search.
            (named(KeyCode::Up, none), EditorCommand::HistoryPrevious),
            (named(KeyCode::Down, none), EditorCommand::HistoryNext),
            (named(KeyCode::Tab, none), EditorCommand::Complete),
            (named(KeyCode::Tab, shift), EditorCommand::CompletePrevious),
            (KeyGesture::ctrl('r'), EditorCommand::ReverseSearch),
            (KeyGesture::ctrl('z'), EditorCommand::Undo),
            (KeyGesture::ctrl('y'), EditorCommand::Redo),
        ];

        Self {
            map: table.into_iter().collect(),
        }
    }
}

impl KeyBindings {
    /// A table with no bindings at all.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    /// Bind `gesture`, returning the command it was previously bound to.
    pub fn bind(
        &mut self,
        gesture: KeyGesture,
        command: EditorCommand,
    ) -> Option<EditorCommand> {
        self.map.insert(gesture, command)
    }

    pub fn unbind(&mut self, gesture: &KeyGesture) -> Option<EditorCommand> {
        self.map.remove(gesture)
    }

    #[must_use]
    pub fn get(&self, gesture: &KeyGesture) -> Option<EditorCommand> {
        self.map.get(gesture).copied()
    }

    /// Resolve a key press to a command, falling back to the gesture without Shift.
    #[must_use]
    pub fn resolve(&self, key_press: &KeyPress) -> Option<EditorCommand> {
        let gesture = KeyGesture::from(key_press);
        self.get(&gesture).or_else(|| {
            if gesture.mask.is_shift() {
                self.get(&gesture.without_shift())
            } else {
                None
            }
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&KeyGesture, &EditorCommand)> {
        self.map.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize { self.map.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.map.is_empty() }

    /// Apply a JSON config on top of the default table.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed, a gesture fails to parse, or a command
    /// name is unknown.
    pub fn from_json_str(json: &str) -> Result<Self, KeyBindingsConfigError> {
        let mut it = Self::default();
        it.apply_json_str(json)?;
        Ok(it)
    }

    /// Apply a JSON config on top of the current table.
    ///
    /// # Errors
    ///
    /// See [`Self::from_json_str`].
    pub fn apply_json_str(&mut self, json: &str) -> Result<(), KeyBindingsConfigError> {
        let config: KeyBindingsConfig = serde_json::from_str(json)?;

        for (gesture_str, maybe_command) in config.bindings {
            let gesture: KeyGesture =
                gesture_str
                    .parse()
                    .map_err(|source| KeyBindingsConfigError::Gesture {
                        gesture: gesture_str.clone(),
                        source,
                    })?;

            match maybe_command {
                Some(command_str) => {
                    let command: EditorCommand = command_str
                        .parse()
                        .map_err(|_| KeyBindingsConfigError::UnknownCommand(command_str))?;
                    self.bind(gesture, command);
                }
                None => {
                    self.unbind(&gesture);
                }
            }
        }

        tracing::debug!(message = "Applied key bindings config", bindings = self.len());
        Ok(())
    }
}
