//! Bounded single-producer/single-consumer streams.

use std::collections::vec_deque::{self, VecDeque};

use crate::Error;

/// Bounded FIFO connecting exactly one writer process to exactly one reader process.
///
/// Items are moved in and out by value; ownership of each item is transferred exactly once.
#[derive(Debug, Clone)]
pub struct Stream<T> {
    name: &'static str,
    depth: usize,
    queue: VecDeque<T>,
}

impl<T> Stream<T> {
    /// Creates a new stream holding at most `depth` items.
    pub fn new(name: &'static str, depth: usize) -> Self {
        assert!(depth > 0, "stream `{}` must have a non-zero depth", name);
        Self { name, depth, queue: VecDeque::with_capacity(depth) }
    }

    /// Name of the stream, used in error messages and traces.
    pub fn name(&self) -> &'static str { self.name }

    /// Maximum number of items.
    pub fn depth(&self) -> usize { self.depth }

    /// Number of items currently stored.
    pub fn len(&self) -> usize { self.queue.len() }

    /// Returns `true` if a read would fail.
    pub fn is_empty(&self) -> bool { self.queue.is_empty() }

    /// Returns `true` if a write would fail.
    pub fn is_full(&self) -> bool { self.queue.len() >= self.depth }

    /// Number of writes that can be accepted right now.
    pub fn vacancy(&self) -> usize { self.depth - self.queue.len() }

    /// Returns the next item without consuming it.
    pub fn peek(&self) -> Option<&T> { self.queue.front() }

    /// Consumes the next item.
    pub fn read(&mut self) -> Result<T, Error> {
        self.queue.pop_front().ok_or(Error::StreamEmpty { stream: self.name })
    }

    /// Consumes the next item if there is one.
    pub fn try_read(&mut self) -> Option<T> { self.queue.pop_front() }

    /// Appends an item.
    pub fn write(&mut self, value: T) -> Result<(), Error> {
        if self.is_full() {
            return Err(Error::StreamFull { stream: self.name });
        }
        self.queue.push_back(value);
        Ok(())
    }

    /// Removes and returns every stored item, oldest first.
    pub fn drain(&mut self) -> vec_deque::Drain<'_, T> { self.queue.drain(..) }

    /// Iterates over the stored items, oldest first.
    pub fn iter(&self) -> vec_deque::Iter<'_, T> { self.queue.iter() }
}
