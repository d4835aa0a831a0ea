use crate::dictionary::word_counts::WordCounts;
use crate::dictionary::{upper_bound, AdaptiveModel, Dictionary, ProbabilityStats};
use crate::{WordOrd, COUNT_NUM_BITS};

/// Adaptive model solving the zero-frequency problem with method D.
///
/// Every seen word gives half an occurrence to the escape mass, which is then shared uniformly
/// among the unseen words. Scaled by `2 * (M - u)` to stay integral:
///
/// - `total = 2 * (M - u) * T`,
/// - seen word: `(M - u) * (2 * count - 1)`,
/// - unseen word: `u`.
///
/// The model starts uniform (`T == 0`) and uses real counts once `u == M`.
#[derive(Clone, Debug)]
pub struct AdaptiveDDictionary {
    counts: WordCounts,
}

impl AdaptiveDDictionary {
    /// # Panics
    /// Panics if the alphabet is empty.
    pub fn new(max_ord: WordOrd) -> Self {
        assert!(max_ord > 0, "The alphabet can't be empty");
        Self {
            counts: WordCounts::new(max_ord),
        }
    }

    pub(crate) fn lower_cumulative_cnt(&self, ord: WordOrd) -> u64 {
        if self.counts.total() == 0 {
            return ord;
        }
        let real_lower = self.counts.lower(ord);
        if self.counts.unseen() == 0 {
            return real_lower;
        }

        let unique = self.counts.unique();
        2 * self.counts.unseen() * real_lower + ord * unique
            - self.max_ord() * self.counts.unique_lower(ord)
    }

    pub(crate) fn word_cnt(&self, ord: WordOrd) -> u64 {
        let real = self.counts.count(ord);
        if self.counts.total() == 0 {
            return 1;
        }
        if self.counts.unseen() == 0 {
            return real;
        }

        let unique = self.counts.unique();
        2 * self.counts.unseen() * real + unique - self.max_ord() * self.counts.seen(ord)
    }

    pub(crate) fn stats(&self, ord: WordOrd) -> ProbabilityStats<u64> {
        let low = self.lower_cumulative_cnt(ord);
        ProbabilityStats::new(low, low + self.word_cnt(ord), self.total_words_cnt())
    }
}

impl AdaptiveModel for AdaptiveDDictionary {
    fn with_max_ord(max_ord: WordOrd) -> Self {
        Self::new(max_ord)
    }

    #[inline(always)]
    fn update(&mut self, ord: WordOrd) {
        self.counts.update(ord);
    }
}

impl Dictionary for AdaptiveDDictionary {
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
        if total == 0 {
            return self.max_ord();
        }
        if self.counts.unseen() == 0 {
            return total;
        }
        2 * self.counts.unseen() * total
    }
}
