//! Counters.

/// Countdown used to retry a request whose reply does not arrive in time.
///
/// The watchdog is armed when a request is sent and ticked on every cycle spent waiting for the
/// reply. It never fires on its own: the owner decides what an expiry means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Watchdog {
    reload: u32,
    remaining: u32,
}

impl Watchdog {
    /// Creates a disarmed watchdog which counts `reload` cycles once armed.
    pub fn new(reload: u32) -> Self { Self { reload: reload.max(1), remaining: 0 } }

    /// Number of cycles counted after each arming.
    pub fn reload(&self) -> u32 { self.reload }

    /// Cycles left before expiry.
    pub fn remaining(&self) -> u32 { self.remaining }

    /// Restarts the countdown.
    pub fn arm(&mut self) { self.remaining = self.reload; }

    /// Counts one cycle down. Returns `true` when the countdown reaches zero.
    pub fn tick(&mut self) -> bool {
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining == 0
    }
}

/// Up/down counter saturating at `0` and `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaturatingCounter {
    value: usize,
    max: usize,
}

impl SaturatingCounter {
    /// Creates a new counter. `value` is clamped to `max`.
    pub fn new(value: usize, max: usize) -> Self { Self { value: value.min(max), max } }

    /// Current value.
    pub fn value(&self) -> usize { self.value }

    /// Upper bound.
    pub fn max(&self) -> usize { self.max }

    /// Increments the counter. Returns `false` if it was already saturated at `max`.
    pub fn incr(&mut self) -> bool {
        if self.value == self.max {
            return false;
        }
        self.value += 1;
        true
    }

    /// Decrements the counter. Returns `false` if it was already at zero.
    pub fn decr(&mut self) -> bool {
        if self.value == 0 {
            return false;
        }
        self.value -= 1;
        true
    }
}
