use crate::WordOrd;

/// The last `max_length` words seen, oldest first.
///
/// Every word is stored twice, at `i` and `i + max_length`, so that the current window is always
/// a contiguous slice of the buffer.
#[derive(Clone, Debug, Default)]
pub struct ContextHistory {
    buffer: Vec<WordOrd>,
    offset: usize,
    max_length: usize,
}

impl ContextHistory {
    pub fn new(max_length: usize) -> Self {
        Self {
            buffer: vec![0; 2 * max_length],
            offset: 0,
            max_length,
        }
    }

    #[inline(always)]
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub fn push(&mut self, ord: WordOrd) {
        if self.max_length == 0 {
            return;
        }

        let pos = self.offset % self.max_length;
        self.buffer[pos] = ord;
        self.buffer[pos + self.max_length] = ord;

        self.offset += 1;
        if self.offset >= 2 * self.max_length {
            self.offset -= self.max_length;
        }
    }

    /// The current window, oldest word first.
    pub fn as_slice(&self) -> &[WordOrd] {
        if self.offset < self.max_length {
            return &self.buffer[..self.offset];
        }
        let begin = self.offset % self.max_length;
        &self.buffer[begin..begin + self.max_length]
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.offset.min(self.max_length)
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.offset == 0
    }

    /// The `length` most recent words, oldest first.
    ///
    /// # Panics
    /// Panics if fewer than `length` words are available.
    #[inline(always)]
    pub fn suffix(&self, length: usize) -> &[WordOrd] {
        let window = self.as_slice();
        &window[window.len() - length..]
    }

    /// Packs the `length` most recent words into a single key, keeping the lowest `cell_bits` of
    /// each word. `length * cell_bits` must not exceed 64.
    ///
    /// For words narrower than `cell_bits` this is the rolling key
    /// `(key * 2^cell_bits + ord) mod 2^(cell_bits * length)`; a wider word keeps only its low
    /// bits instead of carrying into the cell before it.
    pub fn packed(&self, length: usize, cell_bits: u32) -> u64 {
        let mask = if cell_bits >= u64::BITS {
            u64::MAX
        } else {
            (1_u64 << cell_bits) - 1
        };
        self.suffix(length)
            .iter()
            .fold(0, |key, &ord| key.checked_shl(cell_bits).unwrap_or(0) | (ord & mask))
    }
}
