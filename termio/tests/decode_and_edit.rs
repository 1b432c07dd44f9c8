// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Raw terminal input through the decoder, the distributor and the line editor.

use pretty_assertions::assert_eq;
use r3bl_termio::{CompletionRequest, CompletionResult, LineEditor, MockTerminalBackend,
                  NoHandlers, ReadlineHandlers, ReadlineOptions, ReadlineOutcome};
use test_case::test_case;
use tokio_util::sync::CancellationToken;

async fn read(editor: &mut LineEditor, input: &str) -> ReadlineOutcome {
    let mut backend = MockTerminalBackend::new_mock_from_input(input);
    editor
        .read_line(&mut backend, &CancellationToken::new(), &mut NoHandlers)
        .await
        .unwrap()
}

fn accepted(line: &str) -> ReadlineOutcome { ReadlineOutcome::Accepted(line.into()) }

#[test_case("ac\x1b[Db\r", "abc" ; "left arrow then insert")]
#[test_case("hello world\x1b[1;5DX\r", "hello Xworld" ; "ctrl left")]
#[test_case("hello world\x08\r", "hello " ; "ctrl backspace")]
#[test_case("hello world\x1b\x7f\r", "hello " ; "alt backspace")]
#[test_case("hello world\x1b[1;5D\x08\r", "world" ; "ctrl left then ctrl backspace")]
#[test_case("abc\x1b[H\x1b[3~\r", "bc" ; "home then delete")]
#[test_case("ab\x1az\r", "az" ; "ctrl z undoes the last key")]
#[test_case("one two\x17\x16\x16\r", "one twotwo" ; "kill word then paste twice")]
#[test_case("\x1b[200~one\ntwo\x1b[201~", "one" ; "bracketed paste with line break")]
#[tokio::test]
async fn test_decoded_input_is_edited(input: &str, expected: &str) {
    let mut editor = LineEditor::default();
    assert_eq!(read(&mut editor, input).await, accepted(expected));
}

#[tokio::test]
async fn test_end_of_input() {
    let mut editor = LineEditor::default();
    assert_eq!(read(&mut editor, "\x04").await, ReadlineOutcome::EndOfInput);
    assert_eq!(read(&mut editor, "typed but no enter").await, ReadlineOutcome::EndOfInput);
    assert_eq!(read(&mut editor, "\x03").await, ReadlineOutcome::Canceled);
}

#[tokio::test]
async fn test_history_and_reverse_search() {
    let mut editor = LineEditor::default();
    assert_eq!(read(&mut editor, "git status\r").await, accepted("git status"));
    assert_eq!(read(&mut editor, "cargo build\r").await, accepted("cargo build"));

    assert_eq!(read(&mut editor, "\x1b[A\x1b[A\r").await, accepted("git status"));
    assert_eq!(read(&mut editor, "\x12sta\r\r").await, accepted("git status"));
    assert_eq!(editor.history().len(), 2);
}

#[tokio::test]
async fn test_sgr_mouse_drag_selection() {
    let mut editor = LineEditor::new(
        ReadlineOptions::default()
            .with_prompt("> ")
            .with_mouse_editing(true),
    );
    // Press on cell 9 (col 8), drag to cell 14, release, then Ctrl+X.
    let input = "hello world\x1b[<0;9;1M\x1b[<32;14;1M\x1b[<0;14;1m\x18\r";
    assert_eq!(read(&mut editor, input).await, accepted("hello "));
    assert_eq!(editor.kill_buffer(), "world");
}

#[derive(Debug)]
struct Commands;

impl ReadlineHandlers for Commands {
    fn complete(
        &mut self,
        request: &CompletionRequest<'_>,
    ) -> miette::Result<Option<CompletionResult>> {
        let start = request.word_start_before_cursor();
        Ok(Some(CompletionResult::Candidates {
            candidates: vec!["hello".into(), "help".into()],
            replace_start: start,
            replace_length: request.cursor - start,
        }))
    }
}

#[test_case("he\t\r", "hello" ; "tab")]
#[test_case("he\t\t\r", "help" ; "tab twice")]
#[test_case("he\t\t\t\r", "hello" ; "tab wraps around")]
#[test_case("he\x1b[Z\r", "help" ; "shift tab")]
#[tokio::test]
async fn test_decoded_completion(input: &str, expected: &str) {
    let mut editor = LineEditor::default();
    let mut backend = MockTerminalBackend::new_mock_from_input(input);
    let outcome = editor
        .read_line(&mut backend, &CancellationToken::new(), &mut Commands)
        .await
        .unwrap();
    assert_eq!(outcome, accepted(expected));
}
