//! Splice a payload to chunks, and glue chunks back into a payload.

use super::*;

/// Splices `payload` into chunks of `CHUNK_BYTES`, flagging the final one with `tlast`.
///
/// An empty payload yields no chunk.
pub fn chunks(payload: &[u8]) -> impl Iterator<Item = AxisChunk> + '_ {
    let count = shellflow::units_of(payload.len(), CHUNK_BYTES);
    payload.chunks(CHUNK_BYTES).enumerate().map(move |(i, bytes)| AxisChunk::from_bytes(bytes, i + 1 == count))
}

/// Concatenates the valid bytes of `chunks`.
pub fn payload<'a, I: IntoIterator<Item = &'a AxisChunk>>(chunks: I) -> Vec<u8> {
    chunks.into_iter().flat_map(|chunk| chunk.bytes().iter().copied()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splice_and_glue() {
        let data = (0..20u8).collect::<Vec<_>>();
        let spliced = chunks(&data).collect::<Vec<_>>();
        assert_eq!(spliced.len(), 3);
        assert_eq!(spliced.iter().filter(|c| c.tlast).count(), 1);
        assert!(spliced[2].tlast);
        assert_eq!(spliced[2].tkeep, 0x0F);
        assert_eq!(payload(&spliced), data);
    }

    #[test]
    fn aligned_payload_ends_on_full_chunk() {
        let spliced = chunks(&[7u8; 16]).collect::<Vec<_>>();
        assert_eq!(spliced.len(), 2);
        assert_eq!(spliced[1].tkeep, 0xFF);
        assert!(spliced[1].tlast);
    }

    #[test]
    fn empty_payload() { assert_eq!(chunks(&[]).count(), 0); }
}
