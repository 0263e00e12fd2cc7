//! Fixed-capacity FIFO that overwrites its oldest entry when full.
//!
//! Backed by a ring of `capacity` slots allocated once. `push` writes at
//! the head cursor; the oldest live entry sits `len` slots behind it.
//! Push, pop and peek are O(1) and never allocate.

use serde::{Serialize, Serializer};

/// Bounded queue with evict-oldest overflow.
///
/// ```
/// use turnworks::notify::BoundedQueue;
///
/// let mut q = BoundedQueue::new(2);
/// q.push("one");
/// q.push("two");
/// assert_eq!(q.push("three"), Some("one")); // evicted
/// assert_eq!(q.pop(), Some("two"));
/// assert_eq!(q.peek(), Some(&"three"));
/// ```
#[derive(Clone, Debug)]
pub struct BoundedQueue<T> {
    slots: Box<[Option<T>]>,
    /// Slot the next push writes to.
    head: usize,
    len: usize,
}

impl<T> BoundedQueue<T> {
    /// Create an empty queue holding at most `capacity` entries.
    ///
    /// Panics on a zero capacity; configuration validation rejects that
    /// before any queue is built.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Queue capacity must be at least 1");
        Self {
            slots: (0..capacity).map(|_| None).collect(),
            head: 0,
            len: 0,
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    /// Slot holding the oldest entry.
    fn tail(&self) -> usize {
        (self.head + self.capacity() - self.len) % self.capacity()
    }

    /// Insert `value` as the newest entry.
    ///
    /// When the queue is full the oldest entry is removed first and
    /// returned. Never fails.
    pub fn push(&mut self, value: T) -> Option<T> {
        let evicted = if self.is_full() { self.pop() } else { None };
        if evicted.is_some() {
            tracing::trace!(capacity = self.capacity(), "bounded queue full, evicted oldest entry");
        }
        self.slots[self.head] = Some(value);
        self.head = (self.head + 1) % self.capacity();
        self.len += 1;
        evicted
    }

    /// Remove and return the oldest entry.
    pub fn pop(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        let tail = self.tail();
        self.len -= 1;
        self.slots[tail].take()
    }

    /// Borrow the oldest entry without removing it.
    #[must_use]
    pub fn peek(&self) -> Option<&T> {
        if self.is_empty() {
            return None;
        }
        self.slots[self.tail()].as_ref()
    }

    /// Iterate from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        let tail = self.tail();
        (0..self.len).filter_map(move |i| self.slots[(tail + i) % self.capacity()].as_ref())
    }

    /// Drop every entry, keeping the allocation.
    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = None;
        }
        self.head = 0;
        self.len = 0;
    }
}

impl<T: PartialEq> PartialEq for BoundedQueue<T> {
    fn eq(&self, other: &Self) -> bool {
        self.capacity() == other.capacity() && self.iter().eq(other.iter())
    }
}

impl<T: Serialize> Serialize for BoundedQueue<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let mut q = BoundedQueue::new(5);
        for s in ["one", "two", "three", "four", "five"] {
            assert_eq!(q.push(s), None);
        }
        assert!(q.is_full());
        for s in ["one", "two", "three", "four", "five"] {
            assert_eq!(q.pop(), Some(s));
        }
        assert!(q.is_empty());
        assert_eq!(q.pop(), None);
        assert_eq!(q.peek(), None);
    }

    #[test]
    fn test_overflow_evicts_oldest() {
        let mut q = BoundedQueue::new(5);
        for s in ["one", "two", "three", "four", "five"] {
            q.push(s);
        }
        assert_eq!(q.push("six"), Some("one"));
        assert_eq!(q.len(), 5);

        for s in ["two", "three", "four", "five", "six"] {
            assert_eq!(q.peek(), Some(&s));
            assert_eq!(q.pop(), Some(s));
        }
        assert!(q.is_empty());
    }

    #[test]
    fn test_capacity_one() {
        let mut q = BoundedQueue::new(1);
        assert_eq!(q.push(1), None);
        assert_eq!(q.push(2), Some(1));
        assert_eq!(q.push(3), Some(2));
        assert_eq!(q.pop(), Some(3));
        assert_eq!(q.pop(), None);
    }

    #[test]
    fn test_interleaved_push_pop_wraps() {
        let mut q = BoundedQueue::new(3);
        q.push(1);
        q.push(2);
        assert_eq!(q.pop(), Some(1));
        q.push(3);
        q.push(4);
        assert_eq!(q.iter().copied().collect::<Vec<_>>(), vec![2, 3, 4]);
        assert_eq!(q.push(5), Some(2));
        assert_eq!(q.iter().copied().collect::<Vec<_>>(), vec![3, 4, 5]);
    }

    #[test]
    fn test_clear() {
        let mut q = BoundedQueue::new(2);
        q.push('a');
        q.push('b');
        q.clear();
        assert!(q.is_empty());
        assert_eq!(q.capacity(), 2);
        q.push('c');
        assert_eq!(q.peek(), Some(&'c'));
    }

    #[test]
    fn test_serializes_oldest_first() {
        let mut q = BoundedQueue::new(2);
        q.push(1);
        q.push(2);
        q.push(3);
        assert_eq!(serde_json::to_string(&q).unwrap(), "[2,3]");
    }

    #[test]
    #[should_panic(expected = "Queue capacity must be at least 1")]
    fn test_zero_capacity() {
        let _: BoundedQueue<u8> = BoundedQueue::new(0);
    }
}
