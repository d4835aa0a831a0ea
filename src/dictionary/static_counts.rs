use crate::dictionary::cumulative_count::CumulativeCount;
use crate::dictionary::{upper_bound, Dictionary, ProbabilityStats};
use crate::{WordOrd, COUNT_NUM_BITS};

/// A fixed distribution given by the count of every word. Words that are not listed have no
/// mass and can't be coded.
#[derive(Clone, Debug)]
pub struct StaticDictionary {
    cnt: CumulativeCount,
}

impl StaticDictionary {
    /// Builds the dictionary from `(word, count)` pairs; repeated words add up.
    ///
    /// # Panics
    /// Panics if a word is outside of `[0, max_ord)`.
    pub fn new(max_ord: WordOrd, counts: impl IntoIterator<Item = (WordOrd, u64)>) -> Self {
        let mut cnt = CumulativeCount::new(max_ord);
        for (ord, count) in counts {
            cnt.increase_ord_count(ord, count);
        }
        Self { cnt }
    }
}

impl Dictionary for StaticDictionary {
    type Count = u64;
    const COUNT_NUM_BITS: u32 = COUNT_NUM_BITS;

    #[inline(always)]
    fn max_ord(&self) -> WordOrd {
        self.cnt.max_ord()
    }

    fn word_ord(&self, cumulative: u64) -> WordOrd {
        upper_bound(self.max_ord(), cumulative, |ord| self.cnt.cumulative_count(ord))
    }

    fn probability_stats(&mut self, ord: WordOrd) -> ProbabilityStats<u64> {
        ProbabilityStats::new(
            self.cnt.lower_cumulative_count(ord),
            self.cnt.cumulative_count(ord),
            self.cnt.total_words_cnt(),
        )
    }

    fn total_words_cnt(&self) -> u64 {
        self.cnt.total_words_cnt()
    }
}
