//! FIFO occupancy tracker.

use shellflow::Stream;
use thiserror::Error;

use crate::SaturatingCounter;

/// Occupancy tracker errors.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TrackerError {
    /// A chunk was enqueued while no slot was free.
    #[error("enqueue while the buffer has no free slot")]
    Overflow,

    /// A chunk was dequeued while every slot was already free.
    #[error("dequeue while the buffer holds no chunk (free = {capacity})")]
    Underflow {
        /// Capacity of the tracked buffer.
        capacity: usize,
    },
}

/// Tracks the free slots of a bounded buffer from its enqueue and dequeue events.
///
/// The free count starts at `capacity - 1` and saturates within `[0, capacity]`. Slots promised to
/// requests whose data has not arrived yet are tracked separately as reservations: each enqueue
/// consumes one, so [`available`](OccupancyTracker::available) never counts a slot twice.
#[derive(Debug, Clone)]
pub struct OccupancyTracker {
    free: SaturatingCounter,
    reserved: usize,
}

impl OccupancyTracker {
    /// Creates a tracker for a buffer of `capacity` slots.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "tracked buffer must have a non-zero capacity");
        Self { free: SaturatingCounter::new(capacity - 1, capacity), reserved: 0 }
    }

    /// Capacity of the tracked buffer.
    pub fn capacity(&self) -> usize { self.free.max() }

    /// Free slots.
    pub fn free(&self) -> usize { self.free.value() }

    /// Slots promised to outstanding requests.
    pub fn reserved(&self) -> usize { self.reserved }

    /// Free slots not promised to any outstanding request.
    pub fn available(&self) -> usize { self.free.value().saturating_sub(self.reserved) }

    /// Promises `slots` slots to a request whose data will be enqueued later.
    pub fn reserve(&mut self, slots: usize) { self.reserved += slots; }

    /// Applies at most one enqueue and one dequeue event.
    ///
    /// When both are pending they cancel out and the free count is unchanged.
    pub fn tick(&mut self, enq: &mut Stream<()>, deq: &mut Stream<()>) -> Result<(), TrackerError> {
        let enqueued = enq.try_read().is_some();
        let dequeued = deq.try_read().is_some();
        if enqueued {
            self.reserved = self.reserved.saturating_sub(1);
        }

        match (enqueued, dequeued) {
            (true, false) if !self.free.decr() => Err(TrackerError::Overflow),
            (false, true) if !self.free.incr() => Err(TrackerError::Underflow { capacity: self.capacity() }),
            _ => Ok(()),
        }
    }
}
