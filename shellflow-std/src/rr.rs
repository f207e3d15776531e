//! Round-robin selection.

use crate::Bitmap;

/// Round-robin selector over the set bits of a [`Bitmap`].
///
/// The search starts just after the last serviced index and wraps at the bitmap size, so with `N`
/// requesters continuously pending each one is selected once within `N` consecutive services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoundRobin {
    next: usize,
}

impl RoundRobin {
    /// Creates a selector starting at index 0.
    pub fn new() -> Self { Self::default() }

    /// Index at which the next search starts.
    pub fn next(&self) -> usize { self.next }

    /// Returns the index which should be serviced next, without committing to it.
    pub fn select(&self, pending: &Bitmap) -> Option<usize> { pending.next_set_from(self.next) }

    /// Records that `index` was serviced.
    pub fn serviced(&mut self, index: usize, len: usize) { self.next = if len == 0 { 0 } else { (index + 1) % len }; }
}
