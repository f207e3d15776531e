//! Stream errors.

use thiserror::Error;

/// Stream misuse.
///
/// A well-behaved process checks readiness before touching a stream, so these errors flag a bug in
/// the process rather than a condition of the traffic.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Wrote into a full stream.
    #[error("stream `{stream}` is full")]
    StreamFull {
        /// Name of the stream.
        stream: &'static str,
    },

    /// Read from an empty stream.
    #[error("stream `{stream}` is empty")]
    StreamEmpty {
        /// Name of the stream.
        stream: &'static str,
    },
}
