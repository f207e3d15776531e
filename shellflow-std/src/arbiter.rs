//! Mutex arbiter.

/// Holder of the arbitrated resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grant {
    /// Nobody holds the resource.
    Idle,

    /// The high-priority requester holds the resource.
    High,

    /// The low-priority requester holds the resource.
    Low,
}

/// Grants exclusive access to a shared resource to one of two requesters.
///
/// From `Idle`, a pending high-priority request is granted before a pending low-priority one. A
/// grant is held until its requester deasserts its request, after which the arbiter spends one
/// cycle in `Idle`. The low-priority requester can therefore be delayed indefinitely while the
/// high-priority one keeps requesting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutexArbiter {
    grant: Grant,
}

impl Default for MutexArbiter {
    fn default() -> Self { Self { grant: Grant::Idle } }
}

impl MutexArbiter {
    /// Creates an idle arbiter.
    pub fn new() -> Self { Self::default() }

    /// Current grant.
    pub fn grant(&self) -> Grant { self.grant }

    /// Updates the grant from this cycle's requests.
    pub fn tick(&mut self, high: bool, low: bool) -> Grant {
        self.grant = match self.grant {
            Grant::Idle if high => Grant::High,
            Grant::Idle if low => Grant::Low,
            Grant::Idle => Grant::Idle,
            Grant::High if !high => Grant::Idle,
            Grant::Low if !low => Grant::Idle,
            held => held,
        };
        self.grant
    }
}
