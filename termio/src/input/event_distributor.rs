// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Bounded, drop-oldest event queue between the input producer (decoder or backend)
//! and the single consumer (line editor or key reader).
//!
//! ```text
//! producer ──publish()──▶ [ filters ] ──▶ RingBufferHeap ──▶ try_read() / read_async()
//!                              │                 ▲
//!                              └─ DoubleClick ───┘
//! ```
//!
//! - [`EventDistributor::publish`] never blocks and never fails. When the queue is
//!   full the oldest event is evicted.
//! - Exactly one reader may wait in [`EventDistributor::read_async`] at a time.
//! - [`EventDistributor::close`] wakes that reader. Events queued before the close are
//!   still handed out, after that readers get [`DistributorError::Closed`].

use crate::{InputEvent, InputEventKind, MouseButton, MouseInputKind, RingBufferHeap,
            StdMutex, lock_or_recover};
use miette::Diagnostic;
use std::{sync::Arc,
          time::{Duration, Instant}};
use thiserror::Error;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

pub const DEFAULT_EVENT_CAPACITY: usize = 1024;
pub const DEFAULT_DOUBLE_CLICK_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DistributorOptions {
    pub capacity: usize,
    pub mouse_events_enabled: bool,
    pub resize_events_enabled: bool,
    pub double_click_interval: Duration,
}

impl Default for DistributorOptions {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_EVENT_CAPACITY,
            mouse_events_enabled: false,
            resize_events_enabled: true,
            double_click_interval: DEFAULT_DOUBLE_CLICK_INTERVAL,
        }
    }
}

impl DistributorOptions {
    #[must_use]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    #[must_use]
    pub fn with_mouse_events(mut self, enabled: bool) -> Self {
        self.mouse_events_enabled = enabled;
        self
    }

    #[must_use]
    pub fn with_resize_events(mut self, enabled: bool) -> Self {
        self.resize_events_enabled = enabled;
        self
    }

    #[must_use]
    pub fn with_double_click_interval(mut self, interval: Duration) -> Self {
        self.double_click_interval = interval;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Diagnostic)]
pub enum DistributorError {
    #[error("event distributor is closed")]
    #[diagnostic(code(r3bl_termio::event_distributor::closed))]
    Closed,

    #[error("read was canceled")]
    #[diagnostic(code(r3bl_termio::event_distributor::canceled))]
    Canceled,

    #[error("another reader is already waiting for events")]
    #[diagnostic(
        code(r3bl_termio::event_distributor::reader_already_waiting),
        help("Only one consumer may read input at a time, serialize your reads")
    )]
    ReaderAlreadyWaiting,
}

#[derive(Debug, Clone, Copy)]
struct LastMouseDown {
    button: MouseButton,
    col: u16,
    row: u16,
    at: Instant,
}

#[derive(Debug)]
struct DistributorState {
    queue: RingBufferHeap<InputEvent>,
    options: DistributorOptions,
    closed: bool,
    reader_waiting: bool,
    last_mouse_down: Option<LastMouseDown>,
    evicted_count: u64,
}

impl DistributorState {
    fn push(&mut self, event: InputEvent) {
        if let Some(evicted) = self.queue.add(event) {
            self.evicted_count += 1;
            tracing::debug!(
                message = "Event queue full, dropped oldest event",
                evicted = ?evicted.kind,
                evicted_count = self.evicted_count
            );
        }
    }

    /// Returns `false` if the options filter this event out.
    fn accepts(&self, event: &InputEvent) -> bool {
        match event.kind {
            InputEventKind::Mouse(_) => self.options.mouse_events_enabled,
            InputEventKind::Resize(_) => self.options.resize_events_enabled,
            _ => true,
        }
    }

    /// A second Down of the same button on the same cell within the interval.
    fn synthesize_double_click(&mut self, event: &InputEvent) -> Option<InputEvent> {
        let InputEventKind::Mouse(mouse_input) = &event.kind else {
            return None;
        };
        if mouse_input.kind != MouseInputKind::Down {
            return None;
        }

        let this_down = LastMouseDown {
            button: mouse_input.button,
            col: mouse_input.col,
            row: mouse_input.row,
            at: event.created_at,
        };

        let is_double = self.last_mouse_down.is_some_and(|last| {
            last.button == this_down.button
                && last.col == this_down.col
                && last.row == this_down.row
                && this_down.at.saturating_duration_since(last.at)
                    <= self.options.double_click_interval
        });

        if is_double {
            self.last_mouse_down = None;
            let mut double_click = *mouse_input;
            double_click.kind = MouseInputKind::DoubleClick;
            Some(InputEvent::mouse(double_click))
        } else {
            self.last_mouse_down = Some(this_down);
            None
        }
    }
}

#[derive(Debug)]
struct DistributorInner {
    state: StdMutex<DistributorState>,
    notify: Notify,
}

/// Cheap to clone, all clones share the same queue.
#[derive(Debug, Clone)]
pub struct EventDistributor {
    inner: Arc<DistributorInner>,
}

impl Default for EventDistributor {
    fn default() -> Self { Self::new(DistributorOptions::default()) }
}

impl EventDistributor {
    #[must_use]
    pub fn new(options: DistributorOptions) -> Self {
        let state = DistributorState {
            queue: RingBufferHeap::new(options.capacity),
            options,
            closed: false,
            reader_waiting: false,
            last_mouse_down: None,
            evicted_count: 0,
        };
        Self {
            inner: Arc::new(DistributorInner {
                state: StdMutex::new(state),
                notify: Notify::new(),
            }),
        }
    }

    /// Queue an event, evicting the oldest one if full. Events published after
    /// [`Self::close`] are ignored.
    pub fn publish(&self, event: InputEvent) {
        {
            let mut state = lock_or_recover(&self.inner.state);

            if state.closed {
                tracing::trace!(message = "Distributor closed, ignoring event", ?event);
                return;
            }

            if !state.accepts(&event) {
                tracing::trace!(message = "Event filtered out", kind = ?event.kind);
                return;
            }

            let maybe_double_click = state.synthesize_double_click(&event);
            state.push(event);
            if let Some(double_click) = maybe_double_click {
                state.push(double_click);
            }
        }
        self.inner.notify.notify_one();
    }

    pub fn publish_all(&self, events: impl IntoIterator<Item = InputEvent>) {
        for event in events {
            self.publish(event);
        }
    }

    /// Take the oldest queued event, if any.
    #[must_use]
    pub fn try_read(&self) -> Option<InputEvent> {
        lock_or_recover(&self.inner.state).queue.remove()
    }

    /// Wait for the next event.
    ///
    /// # Errors
    ///
    /// - [`DistributorError::Canceled`] if `cancel` fires first (or already has).
    /// - [`DistributorError::Closed`] once closed and drained.
    /// - [`DistributorError::ReaderAlreadyWaiting`] if another read is in flight.
    pub async fn read_async(
        &self,
        cancel: &CancellationToken,
    ) -> Result<InputEvent, DistributorError> {
        {
            let mut state = lock_or_recover(&self.inner.state);
            if state.reader_waiting {
                return Err(DistributorError::ReaderAlreadyWaiting);
            }
            state.reader_waiting = true;
        }
        let _reader_guard = ReaderGuard {
            inner: &self.inner,
        };

        loop {
            if cancel.is_cancelled() {
                return Err(DistributorError::Canceled);
            }

            let notified = self.inner.notify.notified();
            {
                let mut state = lock_or_recover(&self.inner.state);
                if let Some(event) = state.queue.remove() {
                    return Ok(event);
                }
                if state.closed {
                    return Err(DistributorError::Closed);
                }
            }

            tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(DistributorError::Canceled),
                () = notified => {}
            }
        }
    }

    /// Stop accepting events and wake a waiting reader.
    pub fn close(&self) {
        lock_or_recover(&self.inner.state).closed = true;
        self.inner.notify.notify_one();
        tracing::debug!(message = "Event distributor closed");
    }

    #[must_use]
    pub fn is_closed(&self) -> bool { lock_or_recover(&self.inner.state).closed }

    #[must_use]
    pub fn len(&self) -> usize { lock_or_recover(&self.inner.state).queue.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { lock_or_recover(&self.inner.state).queue.is_empty() }

    /// Drop every queued event.
    pub fn clear(&self) {
        let mut state = lock_or_recover(&self.inner.state);
        state.queue.clear();
        state.last_mouse_down = None;
    }

    /// Number of events evicted because the queue was full.
    #[must_use]
    pub fn evicted_count(&self) -> u64 { lock_or_recover(&self.inner.state).evicted_count }

    #[must_use]
    pub fn options(&self) -> DistributorOptions { lock_or_recover(&self.inner.state).options }

    /// Replace the options. A capacity change keeps the newest events that fit.
    pub fn set_options(&self, options: DistributorOptions) {
        let mut state = lock_or_recover(&self.inner.state);
        if options.capacity != state.options.capacity {
            let mut resized = RingBufferHeap::new(options.capacity);
            while let Some(event) = state.queue.remove() {
                resized.add(event);
            }
            state.queue = resized;
        }
        state.options = options;
    }
}

struct ReaderGuard<'a> {
    inner: &'a DistributorInner,
}

impl Drop for ReaderGuard<'_> {
    fn drop(&mut self) { lock_or_recover(&self.inner.state).reader_waiting = false; }
}

#[cfg(test)]
mod tests_queue {
    use super::*;
    use crate::{MouseInput, key_press};
    use pretty_assertions::assert_eq;

    fn char_event(ch: char) -> InputEvent { InputEvent::key(key_press!(@char ch)) }

    fn read_char(distributor: &EventDistributor) -> Option<char> {
        distributor
            .try_read()
            .and_then(|event| event.as_key_press().and_then(|key_press| key_press.ch))
    }

    #[test]
    fn bounded_drop_oldest() {
        let capacity = 4;
        let distributor =
            EventDistributor::new(DistributorOptions::default().with_capacity(capacity));
        let chars = ['a', 'b', 'c', 'd', 'e', 'f'];
        for ch in chars {
            distributor.publish(char_event(ch));
        }

        // capacity + 2 published, the first 2 were dropped.
        assert_eq!(distributor.len(), capacity);
        assert_eq!(distributor.evicted_count(), 2);
        assert_eq!(read_char(&distributor), Some('c'));
        assert_eq!(read_char(&distributor), Some('d'));
        assert_eq!(read_char(&distributor), Some('e'));
        assert_eq!(read_char(&distributor), Some('f'));
        assert_eq!(read_char(&distributor), None);
    }

    #[test]
    fn filters() {
        let distributor = EventDistributor::new(
            DistributorOptions::default()
                .with_mouse_events(false)
                .with_resize_events(false),
        );
        distributor.publish(InputEvent::mouse(MouseInput::new(
            0,
            0,
            MouseButton::Left,
            MouseInputKind::Down,
        )));
        distributor.publish(InputEvent::resize(crate::Size::new(80, 24)));
        assert!(distributor.is_empty());

        distributor.set_options(distributor.options().with_mouse_events(true));
        distributor.publish(InputEvent::mouse(MouseInput::new(
            0,
            0,
            MouseButton::Left,
            MouseInputKind::Down,
        )));
        assert_eq!(distributor.len(), 1);
    }

    #[test]
    fn double_click_synthesized() {
        let distributor =
            EventDistributor::new(DistributorOptions::default().with_mouse_events(true));
        let down = MouseInput::new(3, 0, MouseButton::Left, MouseInputKind::Down);
        let up = MouseInput::new(3, 0, MouseButton::Left, MouseInputKind::Up);

        distributor.publish(InputEvent::mouse(down));
        distributor.publish(InputEvent::mouse(up));
        distributor.publish(InputEvent::mouse(down));

        let kinds: Vec<MouseInputKind> = std::iter::from_fn(|| distributor.try_read())
            .filter_map(|event| match event.kind {
                InputEventKind::Mouse(mouse_input) => Some(mouse_input.kind),
                _ => None,
            })
            .collect();
        assert_eq!(
            kinds,
            vec![
                MouseInputKind::Down,
                MouseInputKind::Up,
                MouseInputKind::Down,
                MouseInputKind::DoubleClick,
            ]
        );
    }

    #[test]
    fn no_double_click_on_different_cell() {
        let distributor =
            EventDistributor::new(DistributorOptions::default().with_mouse_events(true));
        distributor.publish(InputEvent::mouse(MouseInput::new(
            3,
            0,
            MouseButton::Left,
            MouseInputKind::Down,
        )));
        distributor.publish(InputEvent::mouse(MouseInput::new(
            4,
            0,
            MouseButton::Left,
            MouseInputKind::Down,
        )));
        assert_eq!(distributor.len(), 2);
    }

    #[test]
    fn shrink_keeps_newest() {
        let distributor = EventDistributor::default();
        for ch in ['a', 'b', 'c'] {
            distributor.publish(char_event(ch));
        }
        distributor.set_options(distributor.options().with_capacity(2));
        assert_eq!(read_char(&distributor), Some('b'));
        assert_eq!(read_char(&distributor), Some('c'));
    }

    #[test]
    fn clear_and_closed_publish() {
        let distributor = EventDistributor::default();
        distributor.publish(char_event('a'));
        distributor.clear();
        assert!(distributor.is_empty());

        distributor.close();
        distributor.publish(char_event('b'));
        assert!(distributor.is_empty());
        assert!(distributor.is_closed());
    }
}
