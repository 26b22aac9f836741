// SPDX-License-Identifier: MPL-2.0
//! Fixed-size event history.

use std::collections::VecDeque;

pub use crate::domain::BufferCapacity;

/// Ring of the most recent entries.
///
/// Once `capacity` entries are held, every push drops the oldest one and
/// counts it as overwritten.
///
/// # Example
///
/// ```
/// use overlay_regions::diagnostics::{BufferCapacity, CircularBuffer};
///
/// let mut history = CircularBuffer::new(BufferCapacity::new(50));
/// for n in 0..60 {
///     history.push(n);
/// }
/// assert_eq!(history.iter().next(), Some(&10));
/// assert_eq!(history.overwritten(), 10);
/// ```
#[derive(Debug, Clone)]
pub struct CircularBuffer<T> {
    entries: VecDeque<T>,
    capacity: BufferCapacity,
    overwritten: u64,
}

impl<T> CircularBuffer<T> {
    #[must_use]
    pub fn new(capacity: BufferCapacity) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.value()),
            capacity,
            overwritten: 0,
        }
    }

    /// Appends `entry`, returning the entry it displaced, if any.
    pub fn push(&mut self, entry: T) -> Option<T> {
        let displaced = if self.entries.len() == self.capacity.value() {
            self.overwritten += 1;
            self.entries.pop_front()
        } else {
            None
        };
        self.entries.push_back(entry);
        displaced
    }

    /// Oldest entry first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> {
        self.entries.iter()
    }

    /// Most recent entry.
    #[must_use]
    pub fn latest(&self) -> Option<&T> {
        self.entries.back()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> BufferCapacity {
        self.capacity
    }

    /// Entries lost to wrap-around since creation.
    #[must_use]
    pub fn overwritten(&self) -> u64 {
        self.overwritten
    }

    /// Empties the ring. The overwrite counter is kept.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
