use crate::dictionary::cumulative_count::CumulativeCount;
use crate::dictionary::{upper_bound, Dictionary, ProbabilityStats};
use crate::{WordOrd, COUNT_NUM_BITS};

/// A known multiset of words: each word starts with the given count and loses one occurrence
/// every time it is coded.
///
/// Coding the whole multiset in any order costs exactly `log2` of its number of permutations.
#[derive(Clone, Debug)]
pub struct DecreasingOnUpdateDictionary {
    cnt: CumulativeCount,
}

impl DecreasingOnUpdateDictionary {
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

impl Dictionary for DecreasingOnUpdateDictionary {
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
        let stats = ProbabilityStats::new(
            self.cnt.lower_cumulative_count(ord),
            self.cnt.cumulative_count(ord),
            self.cnt.total_words_cnt(),
        );
        if self.cnt.count(ord) > 0 {
            self.cnt.decrease_ord_count(ord, 1);
        }
        stats
    }

    fn total_words_cnt(&self) -> u64 {
        self.cnt.total_words_cnt()
    }
}

/// Codes a strictly decreasing sequence of positive values: after coding `v`, the next value
/// is known to be in `[1, v)` and all of them are equally likely.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecreasingCountDictionary {
    current: u64,
}

impl DecreasingCountDictionary {
    /// The first value will be in `[1, initial]`.
    pub fn new(initial: u64) -> Self {
        Self { current: initial }
    }
}

impl Dictionary for DecreasingCountDictionary {
    type Count = u64;
    const COUNT_NUM_BITS: u32 = COUNT_NUM_BITS;

    #[inline(always)]
    fn max_ord(&self) -> WordOrd {
        self.current + 1
    }

    #[inline(always)]
    fn word_ord(&self, cumulative: u64) -> WordOrd {
        cumulative + 1
    }

    fn probability_stats(&mut self, ord: WordOrd) -> ProbabilityStats<u64> {
        let stats = ProbabilityStats::new(ord.saturating_sub(1), ord, self.current);
        self.current = ord;
        stats
    }

    #[inline(always)]
    fn total_words_cnt(&self) -> u64 {
        self.current
    }
}
