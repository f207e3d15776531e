//! AXI4-Stream chunks.
//!
//! A chunk is one 64-bit transfer of an AXI4-Stream: `tdata`, a byte-enable `tkeep` and `tlast`.
//! Byte `i` of `tdata` is valid iff bit `i` of `tkeep` is set; valid bytes are contiguous from
//! byte 0.

mod chunk;

pub use chunk::*;

/// Number of data bytes carried by a chunk.
pub const CHUNK_BYTES: usize = 8;

/// AXI4-Stream transfer.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AxisChunk {
    /// AXI4-Stream TDATA, in transmission order.
    pub tdata: [u8; CHUNK_BYTES],

    /// AXI4-Stream TKEEP
    pub tkeep: u8,

    /// AXI4-Stream TLAST
    pub tlast: bool,
}

impl AxisChunk {
    /// Creates a new chunk.
    pub fn new(tdata: [u8; CHUNK_BYTES], tkeep: u8, tlast: bool) -> Self { Self { tdata, tkeep, tlast } }

    /// Creates a chunk from up to `CHUNK_BYTES` bytes; extra bytes are ignored.
    pub fn from_bytes(bytes: &[u8], tlast: bool) -> Self {
        let len = bytes.len().min(CHUNK_BYTES);
        let mut tdata = [0; CHUNK_BYTES];
        tdata[..len].copy_from_slice(&bytes[..len]);
        Self { tdata, tkeep: len_to_tkeep(len), tlast }
    }

    /// Creates a chunk carrying a 64-bit word, most-significant byte first.
    pub fn from_u64(word: u64, tkeep: u8, tlast: bool) -> Self {
        let mut chunk = Self { tdata: word.to_be_bytes(), tkeep, tlast };
        chunk.clear_unused_bytes();
        chunk
    }

    /// Number of valid bytes.
    pub fn len(&self) -> usize { self.tkeep.count_ones() as usize }

    /// Returns `true` if no byte is valid.
    pub fn is_empty(&self) -> bool { self.tkeep == 0 }

    /// Valid bytes.
    pub fn bytes(&self) -> &[u8] { &self.tdata[..self.len()] }

    /// Returns `true` if the valid bytes are contiguous from byte 0.
    pub fn is_keep_contiguous(&self) -> bool { self.tkeep == len_to_tkeep(self.len()) }

    /// Zeroes the bytes which are not flagged by `tkeep`.
    pub fn clear_unused_bytes(&mut self) {
        for (i, byte) in self.tdata.iter_mut().enumerate() {
            if self.tkeep & (1 << i) == 0 {
                *byte = 0;
            }
        }
    }
}

/// Returns the `tkeep` mask flagging the first `len` bytes.
pub const fn len_to_tkeep(len: usize) -> u8 {
    if len >= CHUNK_BYTES {
        0xFF
    } else {
        ((1u16 << len) - 1) as u8
    }
}
