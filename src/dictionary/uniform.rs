use crate::dictionary::{Dictionary, ProbabilityStats};
use crate::{WordOrd, COUNT_NUM_BITS};

/// Every word has probability `1 / max_ord`, forever.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UniformDictionary {
    max_ord: WordOrd,
}

impl UniformDictionary {
    /// # Panics
    /// Panics if the alphabet is empty.
    pub fn new(max_ord: WordOrd) -> Self {
        assert!(max_ord > 0, "The alphabet can't be empty");
        Self { max_ord }
    }
}

impl Dictionary for UniformDictionary {
    type Count = u64;
    const COUNT_NUM_BITS: u32 = COUNT_NUM_BITS;

    #[inline(always)]
    fn max_ord(&self) -> WordOrd {
        self.max_ord
    }

    #[inline(always)]
    fn word_ord(&self, cumulative: u64) -> WordOrd {
        cumulative
    }

    #[inline(always)]
    fn probability_stats(&mut self, ord: WordOrd) -> ProbabilityStats<u64> {
        ProbabilityStats::new(ord, ord + 1, self.max_ord)
    }

    #[inline(always)]
    fn total_words_cnt(&self) -> u64 {
        self.max_ord
    }
}
