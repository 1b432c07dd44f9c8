// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Stateful decoder for terminal input. See [`InputDecoder`] docs.

use super::{ASCII_ESC, ASCII_ETX, CsiOutcome, CsiSequence, CsiStep, DecoderOptions,
            MAX_CSI_LEN, PasteAccumulator, control_key_press, printable_key_press,
            ss3_key_press};
use crate::{InputEvent, KeyCode, KeyPress, ModifierKeysMask, SignalKind};

#[derive(Debug, Clone, Default)]
enum DecoderState {
    #[default]
    Ground,
    /// Saw `ESC`, next char decides between a sequence, Alt+key, or a lone Escape.
    Escape,
    Csi(CsiSequence),
    /// Over-long CSI sequence. Swallow until its final byte.
    CsiOverflow,
    Ss3,
    Paste(PasteAccumulator),
}

/// Streaming decoder that turns terminal input into [`InputEvent`]s.
///
/// One instance is reused for a whole input session. State persists across calls to
/// [`decode`], so an escape sequence split across chunks still resolves, and feeding one
/// character at a time yields the same events as feeding the whole sequence.
///
/// The `is_final_chunk` flag resolves `ESC` ambiguity:
/// - `false`: more input may follow, a trailing `ESC` is held pending.
/// - `true`: no more input right now, a trailing `ESC` is the Escape key.
///
/// A backend reading stdin passes `read_count < buffer_len` as `is_final_chunk`, since a
/// read that filled the buffer likely left more bytes waiting.
///
/// Malformed input never fails. Unrecognized or truncated sequences are dropped (and
/// logged at debug level).
///
/// [`decode`]: InputDecoder::decode
#[derive(Debug, Default)]
pub struct InputDecoder {
    state: DecoderState,
    /// Characters of the escape sequence being resolved.
    pending: String,
    /// Incomplete UTF-8 sequence left over from [`InputDecoder::decode_bytes`].
    utf8_tail: Vec<u8>,
    waiting_for_final_chunk: bool,
    text_run: String,
}

impl InputDecoder {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Decode `chunk`, returning the events it completes.
    pub fn decode(
        &mut self,
        chunk: &str,
        is_final_chunk: bool,
        options: &DecoderOptions,
    ) -> Vec<InputEvent> {
        let mut events = Vec::new();

        for ch in chunk.chars() {
            self.advance(ch, options, &mut events);
        }
        self.flush_text_run(&mut events);

        if is_final_chunk {
            self.resolve_ambiguous_prefix(&mut events);
        }

        self.waiting_for_final_chunk = match &self.state {
            DecoderState::Escape | DecoderState::Ss3 => true,
            DecoderState::Csi(seq) => seq.is_empty(),
            _ => false,
        };

        if !events.is_empty() {
            tracing::trace!(message = "Decoded input", count = events.len(), ?events);
        }

        events
    }

    /// Decode raw bytes. An incomplete UTF-8 sequence at the end of `bytes` is kept for
    /// the next call (unless this is the final chunk). Invalid bytes become `U+FFFD`.
    pub fn decode_bytes(
        &mut self,
        bytes: &[u8],
        is_final_chunk: bool,
        options: &DecoderOptions,
    ) -> Vec<InputEvent> {
        let mut input = std::mem::take(&mut self.utf8_tail);
        input.extend_from_slice(bytes);

        let mut text = String::with_capacity(input.len());
        let mut rest = input.as_slice();
        loop {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    text.push_str(valid);
                    break;
                }
                Err(error) => {
                    let (valid, after_valid) = rest.split_at(error.valid_up_to());
                    text.push_str(&String::from_utf8_lossy(valid));
                    match error.error_len() {
                        Some(invalid_len) => {
                            text.push(char::REPLACEMENT_CHARACTER);
                            rest = &after_valid[invalid_len..];
                        }
                        None if is_final_chunk => {
                            text.push(char::REPLACEMENT_CHARACTER);
                            break;
                        }
                        None => {
                            self.utf8_tail = after_valid.to_vec();
                            break;
                        }
                    }
                }
            }
        }

        self.decode(&text, is_final_chunk, options)
    }

    /// A trailing `ESC` (or `ESC [` / `ESC O`) is waiting on a final chunk to resolve.
    #[must_use]
    pub fn is_waiting_for_final_chunk(&self) -> bool { self.waiting_for_final_chunk }

    /// Anything at all is buffered: a partial sequence, paste body, or UTF-8 tail.
    #[must_use]
    pub fn has_pending_input(&self) -> bool {
        !matches!(self.state, DecoderState::Ground) || !self.utf8_tail.is_empty()
    }

    #[must_use]
    pub fn is_in_paste(&self) -> bool { matches!(self.state, DecoderState::Paste(_)) }

    /// Drop all buffered state.
    pub fn reset(&mut self) { *self = Self::default(); }

    fn advance(&mut self, ch: char, options: &DecoderOptions, events: &mut Vec<InputEvent>) {
        match std::mem::take(&mut self.state) {
            DecoderState::Ground => self.advance_ground(ch, options, events),

            DecoderState::Escape => match ch {
                '[' => {
                    self.pending.push(ch);
                    self.state = DecoderState::Csi(CsiSequence::default());
                }
                'O' => {
                    self.pending.push(ch);
                    self.state = DecoderState::Ss3;
                }
                ASCII_ESC => {
                    // First ESC was the Escape key, the second one starts over.
                    self.push_key(events, escape_key_press());
                    self.state = DecoderState::Escape;
                }
                _ => {
                    self.pending.clear();
                    let key_press = control_key_press(ch).unwrap_or_else(|| printable_key_press(ch));
                    self.push_key(events, key_press.with_mask(key_press.mask.with_alt()));
                }
            },

            DecoderState::Csi(mut seq) => {
                self.pending.push(ch);
                match seq.push(ch) {
                    CsiStep::Continue if seq.len() > MAX_CSI_LEN => {
                        tracing::debug!(message = "Dropping over-long CSI sequence", len = seq.len());
                        self.pending.clear();
                        self.state = DecoderState::CsiOverflow;
                    }
                    CsiStep::Continue => self.state = DecoderState::Csi(seq),
                    CsiStep::Complete(final_char) => {
                        self.dispatch_csi(&seq, final_char, options, events);
                    }
                    CsiStep::Invalid => {
                        tracing::debug!(message = "Dropping malformed CSI sequence", sequence = ?self.pending);
                        self.pending.clear();
                        self.advance_ground(ch, options, events);
                    }
                }
            }

            DecoderState::CsiOverflow => match ch {
                '\u{40}'..='\u{7e}' => {}
                ASCII_ESC => {
                    self.pending.push(ch);
                    self.state = DecoderState::Escape;
                }
                _ => self.state = DecoderState::CsiOverflow,
            },

            DecoderState::Ss3 => {
                self.pending.clear();
                match ss3_key_press(ch) {
                    Some(key_press) => self.push_key(events, key_press),
                    // Not a function key after all: `ESC O` was Alt+O, and this char
                    // stands on its own.
                    None => {
                        tracing::debug!(message = "Unknown SS3 final, taking ESC O as Alt+O", final_char = ?ch);
                        self.push_key(events, alt_key_press('O'));
                        self.advance_ground(ch, options, events);
                    }
                }
            }

            DecoderState::Paste(mut accumulator) => {
                match accumulator.push(ch, options.max_paste_len) {
                    Some(content) => events.push(InputEvent::paste(content)),
                    None => self.state = DecoderState::Paste(accumulator),
                }
            }
        }
    }

    fn advance_ground(
        &mut self,
        ch: char,
        options: &DecoderOptions,
        events: &mut Vec<InputEvent>,
    ) {
        if ch == ASCII_ESC {
            self.flush_text_run(events);
            self.pending.clear();
            self.pending.push(ch);
            self.state = DecoderState::Escape;
            return;
        }

        if ch == ASCII_ETX && options.emits_interrupt_signal() {
            self.flush_text_run(events);
            events.push(InputEvent::signal(SignalKind::Interrupt));
        }

        if let Some(key_press) = control_key_press(ch) {
            self.push_key(events, key_press);
        } else if options.coalesce_text {
            self.text_run.push(ch);
        } else {
            self.push_key(events, printable_key_press(ch));
        }
    }

    fn dispatch_csi(
        &mut self,
        seq: &CsiSequence,
        final_char: char,
        options: &DecoderOptions,
        events: &mut Vec<InputEvent>,
    ) {
        match seq.dispatch(final_char, options) {
            CsiOutcome::Event(event) => {
                self.flush_text_run(events);
                events.push(event);
            }
            CsiOutcome::PasteStart => {
                self.flush_text_run(events);
                self.state = DecoderState::Paste(PasteAccumulator::default());
            }
            CsiOutcome::PasteEnd => {
                tracing::debug!(message = "Dropping paste end marker without a start");
            }
            CsiOutcome::Dropped(reason) => {
                tracing::debug!(message = "Dropping CSI sequence", reason, sequence = ?self.pending);
            }
        }
        self.pending.clear();
    }

    /// Called on a final chunk. Prefixes that could still have become sequences are
    /// taken literally.
    fn resolve_ambiguous_prefix(&mut self, events: &mut Vec<InputEvent>) {
        let key_press = match &self.state {
            DecoderState::Escape => escape_key_press(),
            DecoderState::Csi(seq) if seq.is_empty() => alt_key_press('['),
            DecoderState::Ss3 => alt_key_press('O'),
            _ => return,
        };
        self.state = DecoderState::Ground;
        self.pending.clear();
        self.push_key(events, key_press);
    }

    fn push_key(&mut self, events: &mut Vec<InputEvent>, key_press: KeyPress) {
        self.flush_text_run(events);
        events.push(InputEvent::key(key_press));
    }

    fn flush_text_run(&mut self, events: &mut Vec<InputEvent>) {
        if self.text_run.is_empty() {
            return;
        }
        let run = std::mem::take(&mut self.text_run);
        let mut chars = run.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => events.push(InputEvent::key(printable_key_press(ch))),
            _ => events.push(InputEvent::text(run)),
        }
    }
}

fn escape_key_press() -> KeyPress {
    KeyPress::new(KeyCode::Escape, None, ModifierKeysMask::new())
}

fn alt_key_press(ch: char) -> KeyPress {
    KeyPress::new(KeyCode::Unknown, Some(ch), ModifierKeysMask::new().with_alt())
}





#[cfg(test)]
mod tests_mouse {
    use super::test_fixtures::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn enabled_yields_event() {
        let options = DecoderOptions::default().with_mouse(true);
        assert_eq!(
            decode_whole("\u{1b}[<0;10;5M", &options),
            vec![InputEventKind::Mouse(MouseInput::new(
                9,
                4,
                MouseButton::Left,
                MouseInputKind::Down
            ))]
        );
    }

    #[test]
    fn disabled_yields_nothing() {
        let options = DecoderOptions::default();
        let mut decoder = InputDecoder::new();
        assert!(decoder.decode("\u{1b}[<0;10;5M", true, &options).is_empty());
        assert!(!decoder.has_pending_input());
        // The decoder is back in ground state.
        assert_eq!(
            kinds(decoder.decode("a", true, &options)),
            vec![key(key_press!(@char 'a'))]
        );
    }
}


#[cfg(test)]
mod tests_ctrl_c {
    use super::test_fixtures::*;
    use pretty_assertions::assert_eq;

    fn ctrl_c() -> InputEventKind {
        key(key_press!(@char ModifierKeysMask::new().with_ctrl(), '\u{3}'))
    }

    #[test]
    fn captured_emits_signal_then_key() {
        assert_eq!(
            decode_whole("\u{3}", &DecoderOptions::default()),
            vec![InputEventKind::Signal(SignalKind::Interrupt), ctrl_c()]
        );
    }

    #[test]
    fn treated_as_input_emits_key_only() {
        let options = DecoderOptions::default().with_treat_control_c_as_input(true);
        assert_eq!(decode_whole("\u{3}", &options), vec![ctrl_c()]);
    }

    #[test]
    fn not_captured_emits_key_only() {
        let options = DecoderOptions::default().with_capture_ctrl_c(false);
        assert_eq!(decode_whole("\u{3}", &options), vec![ctrl_c()]);
    }
}


#[cfg(test)]
mod tests_decode_bytes {
    use super::test_fixtures::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn utf8_split_across_reads() {
        let options = DecoderOptions::default();
        let mut decoder = InputDecoder::new();
        let bytes = "é".as_bytes();

        assert!(decoder.decode_bytes(&bytes[..1], false, &options).is_empty());
        assert!(decoder.has_pending_input());
        assert_eq!(
            kinds(decoder.decode_bytes(&bytes[1..], true, &options)),
            vec![key(key_press!(@char 'é'))]
        );
    }

    #[test]
    fn invalid_bytes_replaced() {
        let options = DecoderOptions::default();
        let mut decoder = InputDecoder::new();
        assert_eq!(
            kinds(decoder.decode_bytes(b"a\xffb", true, &options)),
            vec![
                key(key_press!(@char 'a')),
                key(key_press!(@char char::REPLACEMENT_CHARACTER)),
                key(key_press!(@char 'b')),
            ]
        );
    }

    #[test]
    fn truncated_utf8_in_final_chunk_replaced() {
        let options = DecoderOptions::default();
        let mut decoder = InputDecoder::new();
        let bytes = "中".as_bytes();
        assert_eq!(
            kinds(decoder.decode_bytes(&bytes[..2], true, &options)),
            vec![key(key_press!(@char char::REPLACEMENT_CHARACTER))]
        );
        assert!(!decoder.has_pending_input());
    }
}
