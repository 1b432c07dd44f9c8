// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! A [`TerminalBackend`] for a real VT-100 terminal.
//!
//! ```text
//! stdin bytes ──▶ stdin reader task ──▶ InputDecoder ──▶ EventDistributor ──▶ consumer
//!                 (tokio::io::stdin)    (decode_bytes)   (publish)            (read_event_async)
//! SIGWINCH ─────▶ resize watcher task ─────────────────▶ publish(Resize)
//! ```
//!
//! Raw mode, mouse capture, and bracketed paste mode are toggled with crossterm. The
//! final-chunk flag passed to the decoder is "the read did not fill the buffer", which
//! resolves a lone `ESC` as soon as the user presses it.
//!
//! [`tokio::io::stdin`] reads on the blocking thread pool. When the reader task is
//! canceled an in-flight read keeps running until the next byte arrives, and that byte
//! is lost.

use super::{DEFAULT_WINDOW_SIZE, InputOptions, OutputDevice, TerminalBackend,
            TerminalCapabilities};
use crate::{DecoderOptions, DistributorError, EventDistributor, InputDecoder, InputEvent,
            Size};
use crossterm::{event::{DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste,
                        EnableMouseCapture},
                execute, terminal};
use std::{future::Future,
          io::{IsTerminal, stdout}};
use tokio::{io::AsyncReadExt, task::JoinHandle};
use tokio_util::sync::CancellationToken;

/// Bytes per stdin read.
pub const STDIN_READ_BUFFER_SIZE: usize = 1024;

#[derive(Debug)]
struct RunningInput {
    options: InputOptions,
    shutdown: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
}

#[derive(Debug)]
pub struct AnsiTerminalBackend {
    distributor: EventDistributor,
    output_device: OutputDevice,
    capabilities: TerminalCapabilities,
    running: Option<RunningInput>,
}

impl AnsiTerminalBackend {
    /// Detect capabilities from stdin / stdout. Nothing is changed on the terminal until
    /// [`TerminalBackend::start_input`].
    ///
    /// # Errors
    ///
    /// Returns an error if stdin is not a terminal.
    pub fn try_new() -> std::io::Result<Self> {
        if !std::io::stdin().is_terminal() {
            return Err(std::io::Error::other("stdin is not a terminal"));
        }

        let capabilities = if stdout().is_terminal() {
            TerminalCapabilities::interactive()
        } else {
            TerminalCapabilities::redirected()
        };
        tracing::debug!(message = "Detected terminal capabilities", ?capabilities);

        Ok(Self {
            distributor: EventDistributor::default(),
            output_device: OutputDevice::new_stdout(),
            capabilities,
            running: None,
        })
    }

    /// The queue the reader task publishes into.
    #[must_use]
    pub fn distributor(&self) -> &EventDistributor { &self.distributor }

    fn set_terminal_modes(options: &InputOptions, enable: bool) -> std::io::Result<()> {
        let mut stdout = stdout();
        if enable {
            terminal::enable_raw_mode()?;
            if options.enable_bracketed_paste {
                execute!(stdout, EnableBracketedPaste)?;
            }
            if options.enable_mouse {
                execute!(stdout, EnableMouseCapture)?;
            }
        } else {
            if options.enable_mouse {
                execute!(stdout, DisableMouseCapture)?;
            }
            if options.enable_bracketed_paste {
                execute!(stdout, DisableBracketedPaste)?;
            }
            terminal::disable_raw_mode()?;
        }
        Ok(())
    }
}

impl TerminalBackend for AnsiTerminalBackend {
    fn capabilities(&self) -> TerminalCapabilities { self.capabilities }

    fn start_input(&mut self, options: &InputOptions) -> std::io::Result<()> {
        if self.running.is_some() {
            return Ok(());
        }

        let options = options.restricted_to(&self.capabilities);
        Self::set_terminal_modes(&options, true)?;
        self.distributor.set_options(options.distributor_options());

        let shutdown = CancellationToken::new();
        let mut tasks = vec![tokio::spawn(read_stdin_task(
            self.distributor.clone(),
            options.decoder_options(),
            shutdown.clone(),
        ))];
        #[cfg(unix)]
        tasks.push(tokio::spawn(watch_resize_task(
            self.distributor.clone(),
            shutdown.clone(),
        )));

        tracing::debug!(message = "Started terminal input", ?options);
        self.running = Some(RunningInput {
            options,
            shutdown,
            tasks,
        });
        Ok(())
    }

    fn stop_input(&mut self) -> std::io::Result<()> {
        let Some(running) = self.running.take() else {
            return Ok(());
        };

        running.shutdown.cancel();
        for task in running.tasks {
            task.abort();
        }

        tracing::debug!(message = "Stopped terminal input");
        Self::set_terminal_modes(&running.options, false)
    }

    fn try_read_event(&mut self) -> Option<InputEvent> { self.distributor.try_read() }

    fn read_event_async(
        &mut self,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<InputEvent, DistributorError>> + Send {
        self.distributor.read_async(cancel)
    }

    fn window_size(&self) -> Size {
        terminal::size()
            .map(|(cols, rows)| Size::new(cols, rows))
            .unwrap_or(DEFAULT_WINDOW_SIZE)
    }

    fn output_device(&self) -> OutputDevice { self.output_device.clone() }
}

impl Drop for AnsiTerminalBackend {
    fn drop(&mut self) {
        if let Err(error) = self.stop_input() {
            tracing::error!(message = "Failed to restore terminal", ?error);
        }
    }
}

/// Read stdin until EOF, an error, or `shutdown`. EOF closes the distributor so a
/// waiting reader sees end of input.
async fn read_stdin_task(
    distributor: EventDistributor,
    options: DecoderOptions,
    shutdown: CancellationToken,
) {
    let mut stdin = tokio::io::stdin();
    let mut decoder = InputDecoder::new();
    let mut buffer = [0_u8; STDIN_READ_BUFFER_SIZE];

    loop {
        let read_result = tokio::select! {
            () = shutdown.cancelled() => break,
            it = stdin.read(&mut buffer) => it,
        };

        match read_result {
            Ok(0) => {
                distributor.publish_all(decoder.decode_bytes(&[], true, &options));
                distributor.close();
                tracing::debug!(message = "stdin reached EOF");
                break;
            }
            Ok(read_count) => {
                let is_final_chunk = read_count < buffer.len();
                distributor.publish_all(decoder.decode_bytes(
                    &buffer[..read_count],
                    is_final_chunk,
                    &options,
                ));
            }
            Err(error) => {
                tracing::error!(message = "Failed to read stdin", ?error);
                distributor.close();
                break;
            }
        }
    }
}

#[cfg(unix)]
async fn watch_resize_task(distributor: EventDistributor, shutdown: CancellationToken) {
    use tokio::signal::unix::{SignalKind, signal};

    let mut window_change = match signal(SignalKind::window_change()) {
        Ok(it) => it,
        Err(error) => {
            tracing::warn!(message = "Can't watch for SIGWINCH", ?error);
            return;
        }
    };

    loop {
        tokio::select! {
            () = shutdown.cancelled() => break,
            maybe_signal = window_change.recv() => {
                if maybe_signal.is_none() {
                    break;
                }
                if let Ok((cols, rows)) = terminal::size() {
                    distributor.publish(InputEvent::resize(Size::new(cols, rows)));
                }
            }
        }
    }
}
