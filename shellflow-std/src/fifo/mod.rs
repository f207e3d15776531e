//! FIFO bookkeeping.

mod tracker;

pub use tracker::*;
