// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Interactive demo of the line editor. Every accepted line is echoed back, and Tab
//! completes words typed on earlier lines. Ctrl+D on an empty line or Ctrl+C exits.

use clap::{Args, Parser};
use miette::{Context, IntoDiagnostic};
use r3bl_termio::{AnsiTerminalBackend, CompletionRequest, CompletionResult, KeyBindings,
                  LineEditor, ReadlineHandlers, ReadlineOptions, ReadlineOutcome,
                  TerminalBackend, TracingConfig, lock_output_device_as_mut,
                  try_initialize_logging_global};
use std::{collections::BTreeSet, io::Write};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Parser)]
#[command(
    bin_name = "termio-readline",
    about = "Read lines from the terminal and echo them back 🦀",
    version
)]
pub struct CLIArg {
    #[arg(long, short = 'p', default_value = "> ", help = "Prompt to show")]
    pub prompt: String,

    #[arg(
        long,
        short = 'b',
        help = "JSON file with key bindings, eg { \"bindings\": { \"Ctrl+J\": \"Accept\" } }"
    )]
    pub bindings: Option<String>,

    #[arg(long, short = 'm', help = "Click, drag and double click to edit the line")]
    pub mouse: bool,

    #[command(flatten)]
    pub global_options: GlobalOption,
}

#[derive(Debug, Args)]
pub struct GlobalOption {
    #[arg(
        global = true,
        long,
        short = 'l',
        help = "Log app output to a file named `log.txt` for debugging."
    )]
    pub enable_logging: bool,
}

/// Completes the word before the cursor from words seen on accepted lines.
#[derive(Debug, Default)]
struct SeenWords {
    words: BTreeSet<String>,
}

impl SeenWords {
    fn learn(&mut self, line: &str) {
        self.words
            .extend(line.split_whitespace().map(ToString::to_string));
    }
}

impl ReadlineHandlers for SeenWords {
    fn complete(
        &mut self,
        request: &CompletionRequest<'_>,
    ) -> miette::Result<Option<CompletionResult>> {
        let start = request.word_start_before_cursor();
        let prefix: String = request
            .text
            .chars()
            .skip(start)
            .take(request.cursor - start)
            .collect();
        if prefix.is_empty() {
            return Ok(None);
        }

        let candidates: Vec<String> = self
            .words
            .iter()
            .filter(|word| word.starts_with(&prefix) && **word != prefix)
            .cloned()
            .collect();
        if candidates.is_empty() {
            return Ok(None);
        }

        Ok(Some(CompletionResult::Candidates {
            candidates,
            replace_start: start,
            replace_length: request.cursor - start,
        }))
    }
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    let cli_arg = CLIArg::parse();

    let enable_logging = cli_arg.global_options.enable_logging;
    enable_logging.then(|| {
        try_initialize_logging_global(TracingConfig::new_file(
            "log.txt",
            tracing_core::LevelFilter::DEBUG,
        ))
        .ok();
        // % is Display, ? is Debug.
        tracing::debug!(message = "Start logging...", cli_arg = ?cli_arg);
    });

    let bindings = match &cli_arg.bindings {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .into_diagnostic()
                .wrap_err_with(|| format!("can't read key bindings from {path}"))?;
            KeyBindings::from_json_str(&json)?
        }
        None => KeyBindings::default(),
    };

    let options = ReadlineOptions::default()
        .with_prompt(cli_arg.prompt)
        .with_mouse_editing(cli_arg.mouse);
    let mut editor = LineEditor::new(options).with_key_bindings(bindings);

    let mut backend = AnsiTerminalBackend::try_new()
        .into_diagnostic()
        .wrap_err("termio-readline needs an interactive terminal")?;
    let result = run_repl(&mut editor, &mut backend).await;
    backend.stop_input().into_diagnostic()?;

    enable_logging.then(|| {
        tracing::debug!(message = "Stop logging...");
    });

    result
}

async fn run_repl(
    editor: &mut LineEditor,
    backend: &mut AnsiTerminalBackend,
) -> miette::Result<()> {
    let cancel = CancellationToken::new();
    let output_device = backend.output_device();
    let mut seen_words = SeenWords::default();

    loop {
        match editor.read_line(backend, &cancel, &mut seen_words).await? {
            ReadlineOutcome::Accepted(line) => {
                seen_words.learn(&line);
                let out = lock_output_device_as_mut!(output_device);
                write!(out, "you typed: {line}\r\n").into_diagnostic()?;
                out.flush().into_diagnostic()?;
            }
            ReadlineOutcome::Canceled | ReadlineOutcome::EndOfInput => break,
        }
    }

    Ok(())
}
