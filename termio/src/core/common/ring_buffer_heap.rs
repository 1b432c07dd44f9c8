// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! A fixed-capacity ring buffer using heap allocation. The capacity is chosen at runtime
//! so that the event distributor and the undo stack can be configured.
//!
//! Adding to a full buffer evicts the oldest item (drop-oldest backpressure). Items can
//! be removed from either end, which makes it usable both as a FIFO queue
//! ([`RingBufferHeap::remove`]) and as a bounded stack ([`RingBufferHeap::remove_head`]).

use std::fmt::Debug;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RingBufferHeap<T> {
    internal_storage: Vec<Option<T>>,
    capacity: usize,
    head: usize,
    tail: usize,
    count: usize,
}

impl<T> RingBufferHeap<T> {
    /// A capacity of zero is bumped to one, so that the newest item is always kept.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            internal_storage: Vec::with_capacity(capacity),
            capacity,
            head: 0,
            tail: 0,
            count: 0,
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize { self.capacity }

    #[must_use]
    pub fn len(&self) -> usize { self.count }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.count == 0 }

    #[must_use]
    pub fn is_full(&self) -> bool { self.count == self.capacity }

    pub fn clear(&mut self) {
        self.head = 0;
        self.tail = 0;
        self.count = 0;
        self.internal_storage.iter_mut().for_each(|x| *x = None);
    }

    /// Index 0 is the oldest item.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.count {
            return None;
        }
        let actual_index = (self.tail + index) % self.capacity;
        self.internal_storage
            .get(actual_index)
            .and_then(|item| item.as_ref())
    }

    /// The newest item.
    #[must_use]
    pub fn peek_head(&self) -> Option<&T> {
        self.count.checked_sub(1).and_then(|index| self.get(index))
    }

    /// Insert at head (ie, insert the newest item). When the buffer is full the oldest
    /// item is evicted and returned.
    pub fn add(&mut self, value: T) -> Option<T> {
        let evicted = if self.is_full() { self.remove() } else { None };
        if self.head < self.internal_storage.len() {
            self.internal_storage[self.head] = Some(value);
        } else {
            self.internal_storage.push(Some(value));
        }
        self.head = (self.head + 1) % self.capacity;
        self.count += 1;
        evicted
    }

    /// Remove from tail (ie, remove the oldest item).
    pub fn remove(&mut self) -> Option<T> {
        if self.count == 0 {
            return None;
        }
        let value = self.internal_storage[self.tail].take();
        self.tail = (self.tail + 1) % self.capacity;
        self.count -= 1;
        value
    }

    /// Remove from head (ie, remove the newest item). This is the opposite of
    /// [`Self::remove`].
    pub fn remove_head(&mut self) -> Option<T> {
        if self.count == 0 {
            return None;
        }
        self.head = (self.head + self.capacity - 1) % self.capacity;
        let value = self.internal_storage[self.head].take();
        self.count -= 1;
        value
    }

    /// Iterate from the oldest to the newest item.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        (0..self.count).filter_map(move |index| self.get(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_add_and_remove_fifo() {
        let mut ring_buffer = RingBufferHeap::new(3);
        assert!(ring_buffer.is_empty());

        ring_buffer.add(1);
        ring_buffer.add(2);
        ring_buffer.add(3);
        assert!(ring_buffer.is_full());
        assert_eq!(ring_buffer.len(), 3);

        assert_eq!(ring_buffer.remove(), Some(1));
        assert_eq!(ring_buffer.remove(), Some(2));
        assert_eq!(ring_buffer.remove(), Some(3));
        assert_eq!(ring_buffer.remove(), None);
    }

    #[test]
    fn test_add_when_full_evicts_oldest() {
        let mut ring_buffer = RingBufferHeap::new(3);
        for it in 1..=3 {
            assert_eq!(ring_buffer.add(it), None);
        }
        assert_eq!(ring_buffer.add(4), Some(1));
        assert_eq!(ring_buffer.add(5), Some(2));

        let items: Vec<_> = ring_buffer.iter().copied().collect();
        assert_eq!(items, vec![3, 4, 5]);
        assert_eq!(ring_buffer.get(0), Some(&3));
        assert_eq!(ring_buffer.peek_head(), Some(&5));
    }

    #[test]
    fn test_remove_head_is_lifo() {
        let mut ring_buffer = RingBufferHeap::new(2);
        ring_buffer.add("a");
        ring_buffer.add("b");
        ring_buffer.add("c");

        assert_eq!(ring_buffer.remove_head(), Some("c"));
        assert_eq!(ring_buffer.remove_head(), Some("b"));
        assert_eq!(ring_buffer.remove_head(), None);
    }

    #[test]
    fn test_wraparound_after_mixed_operations() {
        let mut ring_buffer = RingBufferHeap::new(3);
        ring_buffer.add(1);
        ring_buffer.add(2);
        assert_eq!(ring_buffer.remove(), Some(1));
        ring_buffer.add(3);
        ring_buffer.add(4);
        ring_buffer.add(5);

        let items: Vec<_> = ring_buffer.iter().copied().collect();
        assert_eq!(items, vec![3, 4, 5]);
        assert_eq!(ring_buffer.remove_head(), Some(5));
        assert_eq!(ring_buffer.remove(), Some(3));
        assert_eq!(ring_buffer.len(), 1);
    }

    #[test]
    fn test_add_after_remove_head_reuses_slot() {
        let mut ring_buffer = RingBufferHeap::new(3);
        ring_buffer.add('a');
        assert_eq!(ring_buffer.remove_head(), Some('a'));
        ring_buffer.add('b');
        ring_buffer.add('c');

        let items: Vec<_> = ring_buffer.iter().copied().collect();
        assert_eq!(items, vec!['b', 'c']);
    }

    #[test]
    fn test_clear() {
        let mut ring_buffer = RingBufferHeap::new(2);
        ring_buffer.add(1);
        ring_buffer.add(2);
        ring_buffer.clear();
        assert!(ring_buffer.is_empty());
        assert_eq!(ring_buffer.get(0), None);
        ring_buffer.add(7);
        assert_eq!(ring_buffer.peek_head(), Some(&7));
    }

    #[test]
    fn test_zero_capacity_keeps_newest() {
        let mut ring_buffer = RingBufferHeap::new(0);
        assert_eq!(ring_buffer.capacity(), 1);
        ring_buffer.add(1);
        assert_eq!(ring_buffer.add(2), Some(1));
        assert_eq!(ring_buffer.remove(), Some(2));
    }
}
