//! Fixed-size bitmap.

/// One bit per slot, e.g. the pending-interrupt bit of every session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    words: Vec<u64>,
    len: usize,
}

impl Bitmap {
    /// Creates an all-zero bitmap of `len` bits.
    pub fn new(len: usize) -> Self { Self { words: vec![0; shellflow::units_of(len, 64)], len } }

    /// Number of bits.
    pub fn len(&self) -> usize { self.len }

    /// Returns `true` if no bit is set.
    pub fn is_empty(&self) -> bool { self.words.iter().all(|w| *w == 0) }

    /// Number of set bits.
    pub fn count_ones(&self) -> usize { self.words.iter().map(|w| w.count_ones() as usize).sum() }

    /// Returns bit `index`. Out-of-range bits read as zero.
    pub fn get(&self, index: usize) -> bool { index < self.len && self.words[index / 64] & (1 << (index % 64)) != 0 }

    /// Sets bit `index`.
    pub fn set(&mut self, index: usize) {
        assert!(index < self.len, "bit {} out of range ({})", index, self.len);
        self.words[index / 64] |= 1 << (index % 64);
    }

    /// Clears bit `index`.
    pub fn clear(&mut self, index: usize) {
        assert!(index < self.len, "bit {} out of range ({})", index, self.len);
        self.words[index / 64] &= !(1 << (index % 64));
    }

    /// Returns the lowest set bit at or after `start`, wrapping around to the lowest set bit before it.
    pub fn next_set_from(&self, start: usize) -> Option<usize> {
        if self.len == 0 {
            return None;
        }
        let start = start % self.len;
        self.first_set_in(start, self.len).or_else(|| self.first_set_in(0, start))
    }

    /// Iterates over the set bits in increasing order.
    pub fn iter_ones(&self) -> impl Iterator<Item = usize> + '_ { (0..self.len).filter(move |i| self.get(*i)) }

    fn first_set_in(&self, from: usize, to: usize) -> Option<usize> {
        let mut index = from;
        while index < to {
            let word = self.words[index / 64] >> (index % 64);
            if word == 0 {
                index = (index / 64 + 1) * 64;
                continue;
            }
            let found = index + word.trailing_zeros() as usize;
            return (found < to).then_some(found);
        }
        None
    }
}
