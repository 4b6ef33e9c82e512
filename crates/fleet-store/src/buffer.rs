//! Fixed-capacity FIFO ring with oldest-first eviction.

use std::collections::VecDeque;

/// An ordered sequence of `T` with a capacity fixed at construction.
///
/// Invariants:
/// - `len() <= capacity()` at all times.
/// - Insertion order is preserved; eviction is strictly oldest-first.
/// - After any sequence of N pushes the buffer holds exactly
///   `min(N, capacity)` most recent elements.
#[derive(Debug, Clone)]
pub struct BoundedBuffer<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T: Clone> BoundedBuffer<T> {
    /// Create an empty buffer.
    ///
    /// A zero capacity is clamped to 1 so a push always retains the newest
    /// element.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an element, evicting the oldest when at capacity. O(1) amortized.
    pub fn push(&mut self, item: T) {
        if self.items.len() == self.capacity {
            self.items.pop_front();
        }
        self.items.push_back(item);
    }

    /// Copy of the current contents in insertion order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<T> {
        self.items.iter().cloned().collect()
    }

    /// Number of buffered elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the buffer is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The fixed capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
