//! Synthetic payload of the transmit test mode.

use shellflow_std::axis::{len_to_tkeep, AxisChunk, CHUNK_BYTES};

use crate::constants::pattern::{GEN_CHK0, GEN_CHK1};

/// Repeating two-chunk test payload of a given length.
///
/// Chunks alternate between `"Hi from "` and `"FMKU60!\n"`, starting with the former. The final
/// chunk is flagged `tlast` and keeps only the remaining bytes.
#[derive(Debug, Clone, Default)]
pub struct TestPattern {
    remaining: usize,
    phase: usize,
}

impl TestPattern {
    /// Creates a pattern of `len` bytes.
    pub fn new(len: usize) -> Self { Self { remaining: len, phase: 0 } }

    /// Bytes not generated yet.
    pub fn remaining(&self) -> usize { self.remaining }
}

impl Iterator for TestPattern {
    type Item = AxisChunk;

    fn next(&mut self) -> Option<AxisChunk> {
        if self.remaining == 0 {
            return None;
        }
        let len = self.remaining.min(CHUNK_BYTES);
        self.remaining -= len;
        let word = [GEN_CHK0, GEN_CHK1][self.phase];
        self.phase ^= 1;
        Some(AxisChunk::from_u64(word, len_to_tkeep(len), self.remaining == 0))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let chunks = shellflow::units_of(self.remaining, CHUNK_BYTES);
        (chunks, Some(chunks))
    }
}

impl ExactSizeIterator for TestPattern {}
