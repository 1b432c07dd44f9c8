// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::{OutputDeviceExt, StdoutMock};
use crate::{DecoderOptions, DistributorError, DistributorOptions, EventDistributor,
            InputDecoder, InputEvent, InputOptions, OutputDevice, Size, TerminalBackend,
            TerminalCapabilities, DEFAULT_EVENT_CAPACITY, DEFAULT_WINDOW_SIZE};
use std::future::Future;
use tokio_util::sync::CancellationToken;

/// A [`TerminalBackend`] that replays canned events and captures rendered output.
///
/// [`MockTerminalBackend::new_mock`] publishes the events and closes the distributor,
/// so once they are consumed the next read fails with [`DistributorError::Closed`]
/// (end of input). [`MockTerminalBackend::new_mock_open`] leaves it open, publish more
/// events through [`MockTerminalBackend::distributor`].
#[derive(Debug)]
pub struct MockTerminalBackend {
    distributor: EventDistributor,
    output_device: OutputDevice,
    stdout_mock: StdoutMock,
    capabilities: TerminalCapabilities,
    window_size: Size,
    start_count: usize,
    is_started: bool,
}

impl MockTerminalBackend {
    #[must_use]
    pub fn new_mock(events: Vec<InputEvent>) -> Self {
        let it = Self::new_mock_open(events.len());
        it.distributor.publish_all(events);
        it.distributor.close();
        it
    }

    /// Decode `input` as if typed into a terminal, then behave like
    /// [`Self::new_mock`].
    #[must_use]
    pub fn new_mock_from_input(input: &str) -> Self {
        let mut decoder = InputDecoder::new();
        let events = decoder.decode(input, true, &DecoderOptions::default().with_mouse(true));
        Self::new_mock(events)
    }

    #[must_use]
    pub fn new_mock_open(expected_event_count: usize) -> Self {
        let (output_device, stdout_mock) = OutputDevice::new_mock();
        let distributor = EventDistributor::new(
            DistributorOptions::default()
                .with_capacity(expected_event_count.max(DEFAULT_EVENT_CAPACITY))
                .with_mouse_events(true),
        );
        Self {
            distributor,
            output_device,
            stdout_mock,
            capabilities: TerminalCapabilities::interactive(),
            window_size: DEFAULT_WINDOW_SIZE,
            start_count: 0,
            is_started: false,
        }
    }

    #[must_use]
    pub fn with_window_size(mut self, window_size: Size) -> Self {
        self.window_size = window_size;
        self
    }

    #[must_use]
    pub fn with_capabilities(mut self, capabilities: TerminalCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    #[must_use]
    pub fn distributor(&self) -> &EventDistributor { &self.distributor }

    /// Everything rendered so far.
    #[must_use]
    pub fn stdout_mock(&self) -> StdoutMock { self.stdout_mock.clone() }

    /// How many times input was actually started (repeat calls are no-ops).
    #[must_use]
    pub fn start_count(&self) -> usize { self.start_count }

    #[must_use]
    pub fn is_started(&self) -> bool { self.is_started }
}

impl TerminalBackend for MockTerminalBackend {
    fn capabilities(&self) -> TerminalCapabilities { self.capabilities }

    fn start_input(&mut self, _options: &InputOptions) -> std::io::Result<()> {
        if !self.is_started {
            self.is_started = true;
            self.start_count += 1;
        }
        Ok(())
    }

    fn stop_input(&mut self) -> std::io::Result<()> {
        self.is_started = false;
        Ok(())
    }

    fn try_read_event(&mut self) -> Option<InputEvent> { self.distributor.try_read() }

    fn read_event_async(
        &mut self,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<InputEvent, DistributorError>> + Send {
        self.distributor.read_async(cancel)
    }

    fn window_size(&self) -> Size { self.window_size }

    fn output_device(&self) -> OutputDevice { self.output_device.clone() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{InputEventKind, key_press};
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_replays_then_closes() {
        let mut backend = MockTerminalBackend::new_mock(vec![
            InputEvent::key(key_press!(@char 'a')),
            InputEvent::key(key_press!(@char 'b')),
        ]);
        let cancel = CancellationToken::new();

        let first = backend.read_event_async(&cancel).await.unwrap();
        assert_eq!(first.kind, InputEventKind::Key(key_press!(@char 'a')));
        assert!(backend.try_read_event().is_some());
        assert_eq!(
            backend.read_event_async(&cancel).await.unwrap_err(),
            DistributorError::Closed
        );
    }

    #[test]
    fn test_start_stop_idempotent() {
        let mut backend = MockTerminalBackend::new_mock(vec![]);
        let options = InputOptions::default();
        backend.start_input(&options).unwrap();
        backend.start_input(&options).unwrap();
        assert_eq!(backend.start_count(), 1);
        backend.stop_input().unwrap();
        backend.stop_input().unwrap();
        assert!(!backend.is_started());
    }

    #[test]
    fn test_from_input() {
        let mut backend = MockTerminalBackend::new_mock_from_input("hi\u{1b}[D");
        let kinds: Vec<_> = std::iter::from_fn(|| backend.try_read_event())
            .map(|event| event.kind)
            .collect();
        assert_eq!(kinds.len(), 3);
    }
}
