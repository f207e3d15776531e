//! Observability sink for faults reported by processes.

use std::collections::VecDeque;
use std::fmt;

use itertools::Itertools;
use linked_hash_map::LinkedHashMap;
use log::Level;

/// A fault reported by a process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fault<E> {
    /// Cycle at which the fault was reported.
    pub cycle: u64,

    /// Trace name of the reporting process, e.g. `TSIF/RDp`.
    pub origin: &'static str,

    /// Severity used when the fault was logged.
    pub level: Level,

    /// The fault itself.
    pub error: E,
}

/// Collects faults: logs them, counts them per origin and keeps the most recent ones.
///
/// None of the reported conditions halt a process; the monitor only makes them observable.
#[derive(Debug, Clone)]
pub struct Monitor<E> {
    cycle: u64,
    history: usize,
    faults: VecDeque<Fault<E>>,
    counts: LinkedHashMap<&'static str, u64>,
    total: u64,
}

impl<E: fmt::Display> Monitor<E> {
    /// Creates a monitor retaining at most `history` faults.
    pub fn new(history: usize) -> Self {
        Self { cycle: 0, history, faults: VecDeque::with_capacity(history), counts: LinkedHashMap::new(), total: 0 }
    }

    /// Current cycle.
    pub fn cycle(&self) -> u64 { self.cycle }

    /// Moves to the next cycle.
    pub fn advance(&mut self) { self.cycle += 1; }

    /// Logs, counts and records a fault.
    pub fn report(&mut self, origin: &'static str, level: Level, error: E) {
        log::log!(target: origin, level, "[cycle {}] {}", self.cycle, error);
        *self.counts.entry(origin).or_insert(0) += 1;
        self.total += 1;

        if self.history == 0 {
            return;
        }
        if self.faults.len() == self.history {
            let _ = self.faults.pop_front();
        }
        self.faults.push_back(Fault { cycle: self.cycle, origin, level, error });
    }

    /// Total number of faults reported so far, including the ones no longer retained.
    pub fn total(&self) -> u64 { self.total }

    /// Number of faults reported by `origin`.
    pub fn count(&self, origin: &str) -> u64 { self.counts.get(origin).copied().unwrap_or(0) }

    /// Retained faults, oldest first.
    pub fn faults(&self) -> impl Iterator<Item = &Fault<E>> { self.faults.iter() }

    /// Removes and returns the retained faults.
    pub fn take_faults(&mut self) -> Vec<Fault<E>> { self.faults.drain(..).collect() }

    /// One-line summary of fault counts per origin, in order of first appearance.
    pub fn summary(&self) -> String {
        self.counts.iter().map(|(origin, count)| format!("{}={}", origin, count)).join(", ")
    }
}

impl<E: fmt::Display> Default for Monitor<E> {
    fn default() -> Self { Self::new(256) }
}
