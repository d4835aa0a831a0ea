use crate::dictionary::word_counts::WordCounts;
use crate::dictionary::{upper_bound, AdaptiveModel, Dictionary, ProbabilityStats};
use crate::{WordOrd, COUNT_NUM_BITS};

/// Adaptive model solving the zero-frequency problem with method A.
///
/// Until every word has been seen, one unit of mass is reserved for each unseen word and the
/// real counts are scaled by `M - u`, so that the whole escape mass is as large as one
/// occurrence:
///
/// - `total = (M - u) * (T + 1)`,
/// - seen word: `count * (M - u)`,
/// - unseen word: `1`.
///
/// Once `u == M` the real counts are used as they are.
#[derive(Clone, Debug)]
pub struct AdaptiveADictionary {
    counts: WordCounts,
}

impl AdaptiveADictionary {
    /// # Panics
    /// Panics if the alphabet is empty.
    pub fn new(max_ord: WordOrd) -> Self {
        assert!(max_ord > 0, "The alphabet can't be empty");
        Self {
            counts: WordCounts::new(max_ord),
        }
    }

    pub(crate) fn lower_cumulative_cnt(&self, ord: WordOrd) -> u64 {
        let real_lower = self.counts.lower(ord);
        if self.all_seen() {
            return real_lower;
        }
        self.counts.unseen() * real_lower + ord - self.counts.unique_lower(ord)
    }

    pub(crate) fn word_cnt(&self, ord: WordOrd) -> u64 {
        let real = self.counts.count(ord);
        match (self.all_seen(), real) {
            (true, _) => real,
            (false, 0) => 1,
            (false, _) => real * self.counts.unseen(),
        }
    }

    pub(crate) fn stats(&self, ord: WordOrd) -> ProbabilityStats<u64> {
        let low = self.lower_cumulative_cnt(ord);
        ProbabilityStats::new(low, low + self.word_cnt(ord), self.total_words_cnt())
    }

    #[inline(always)]
    fn all_seen(&self) -> bool {
        self.counts.unseen() == 0
    }
}

impl AdaptiveModel for AdaptiveADictionary {
    fn with_max_ord(max_ord: WordOrd) -> Self {
        Self::new(max_ord)
    }

    #[inline(always)]
    fn update(&mut self, ord: WordOrd) {
        self.counts.update(ord);
    }
}

impl Dictionary for AdaptiveADictionary {
    type Count = u64;
    const COUNT_NUM_BITS: u32 = COUNT_NUM_BITS;

    #[inline(always)]
    fn max_ord(&self) -> WordOrd {
        self.counts.max_ord()
    }

    fn word_ord(&self, cumulative: u64) -> WordOrd {
        upper_bound(self.max_ord(), cumulative, |ord| {
            self.lower_cumulative_cnt(ord + 1)
        })
    }

    fn probability_stats(&mut self, ord: WordOrd) -> ProbabilityStats<u64> {
        let stats = self.stats(ord);
        self.update(ord);
        stats
    }

    fn total_words_cnt(&self) -> u64 {
        let total = self.counts.total();
        if self.all_seen() {
            return total;
        }
        self.counts.unseen() * (total + 1)
    }
}
