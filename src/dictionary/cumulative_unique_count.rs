use crate::dictionary::cumulative_count::CumulativeCount;
use crate::WordOrd;

/// The set of distinct words seen so far, with the same prefix-sum queries as
/// [`CumulativeCount`]: every word contributes at most one.
#[derive(Clone, Debug, Default)]
pub struct CumulativeUniqueCount {
    cnt: CumulativeCount,
}

impl CumulativeUniqueCount {
    pub fn new(max_ord: WordOrd) -> Self {
        Self {
            cnt: CumulativeCount::new(max_ord),
        }
    }

    /// Marks `ord` as seen. Returns `true` if it wasn't seen before.
    pub fn update(&mut self, ord: WordOrd) -> bool {
        if self.cnt.count(ord) > 0 {
            return false;
        }
        self.cnt.increase_ord_count(ord, 1);
        true
    }

    /// 1 if `ord` was seen, 0 otherwise.
    #[inline(always)]
    pub fn count(&self, ord: WordOrd) -> u64 {
        self.cnt.count(ord)
    }

    #[inline(always)]
    pub fn contains(&self, ord: WordOrd) -> bool {
        self.count(ord) > 0
    }

    pub fn cumulative_count(&self, ord: WordOrd) -> u64 {
        self.cnt.cumulative_count(ord)
    }

    /// Number of distinct words in `[0, ord)`.
    pub fn lower_cumulative_count(&self, ord: WordOrd) -> u64 {
        self.cnt.lower_cumulative_count(ord)
    }

    /// Number of distinct words seen.
    #[inline(always)]
    pub fn total_words_cnt(&self) -> u64 {
        self.cnt.total_words_cnt()
    }

    pub fn iter(&self) -> impl Iterator<Item = WordOrd> + '_ {
        self.cnt.iter().map(|(ord, _)| ord)
    }
}
