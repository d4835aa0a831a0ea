use crate::dictionary::cumulative_count::CumulativeCount;
use crate::dictionary::cumulative_unique_count::CumulativeUniqueCount;
use crate::WordOrd;

/// Real counts of the words seen so far together with the set of distinct ones.
///
/// This is the state shared by the adaptive models and by every context of the PPM models.
#[derive(Clone, Debug, Default)]
pub struct WordCounts {
    cnt: CumulativeCount,
    unique_cnt: CumulativeUniqueCount,
}

impl WordCounts {
    pub fn new(max_ord: WordOrd) -> Self {
        Self {
            cnt: CumulativeCount::new(max_ord),
            unique_cnt: CumulativeUniqueCount::new(max_ord),
        }
    }

    /// Records one more occurrence of `ord`.
    #[inline(always)]
    pub fn update(&mut self, ord: WordOrd) {
        self.cnt.increase_ord_count(ord, 1);
        self.unique_cnt.update(ord);
    }

    #[inline(always)]
    pub fn max_ord(&self) -> WordOrd {
        self.cnt.max_ord()
    }

    /// Real count of `ord`.
    #[inline(always)]
    pub fn count(&self, ord: WordOrd) -> u64 {
        self.cnt.count(ord)
    }

    /// 1 if `ord` was seen, 0 otherwise.
    #[inline(always)]
    pub fn seen(&self, ord: WordOrd) -> u64 {
        self.unique_cnt.count(ord)
    }

    /// Real count of the words `[0, ord)`.
    #[inline(always)]
    pub fn lower(&self, ord: WordOrd) -> u64 {
        self.cnt.lower_cumulative_count(ord)
    }

    /// Number of distinct words in `[0, ord)`.
    #[inline(always)]
    pub fn unique_lower(&self, ord: WordOrd) -> u64 {
        self.unique_cnt.lower_cumulative_count(ord)
    }

    /// Total real count, `T`.
    #[inline(always)]
    pub fn total(&self) -> u64 {
        self.cnt.total_words_cnt()
    }

    /// Number of distinct words seen, `u`.
    #[inline(always)]
    pub fn unique(&self) -> u64 {
        self.unique_cnt.total_words_cnt()
    }

    /// Number of words never seen, `M - u`.
    #[inline(always)]
    pub fn unseen(&self) -> u64 {
        self.max_ord() - self.unique()
    }

    /// Iterates the seen words with their real counts, in increasing order.
    pub fn iter(&self) -> impl Iterator<Item = (WordOrd, u64)> + '_ {
        self.cnt.iter()
    }
}
