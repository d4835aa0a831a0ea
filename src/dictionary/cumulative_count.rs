use std::collections::{BTreeMap, HashMap};

use crate::WordOrd;

/// Point counts over the words `[0, max_ord)` with prefix-sum queries.
///
/// Prefix sums are kept in a Fenwick tree whose nodes live in a hash map, so that only the
/// nodes touched by an update take memory. Point counts are also stored in an ordered map to
/// allow iterating the words seen so far.
#[derive(Clone, Debug, Default)]
pub struct CumulativeCount {
    max_ord: WordOrd,

    /// Fenwick tree nodes, 1-based: node `i` covers the words `(i - lowbit(i), i]` shifted by one.
    tree: HashMap<u64, u64>,

    /// The count of every word with a nonzero count.
    counts: BTreeMap<WordOrd, u64>,

    total: u64,
}

impl CumulativeCount {
    pub fn new(max_ord: WordOrd) -> Self {
        Self {
            max_ord,
            ..Self::default()
        }
    }

    #[inline(always)]
    pub fn max_ord(&self) -> WordOrd {
        self.max_ord
    }

    /// Adds `delta` to the count of `ord`.
    ///
    /// # Panics
    /// Panics if `ord` is outside of the alphabet.
    pub fn increase_ord_count(&mut self, ord: WordOrd, delta: u64) {
        assert!(ord < self.max_ord, "Word {} is out of [0, {})", ord, self.max_ord);
        if delta == 0 {
            return;
        }

        *self.counts.entry(ord).or_default() += delta;
        self.total += delta;

        let mut index = ord + 1;
        while index <= self.max_ord {
            *self.tree.entry(index).or_default() += delta;
            match index.checked_add(index & index.wrapping_neg()) {
                Some(next) => index = next,
                None => break,
            }
        }
    }

    /// Removes `delta` from the count of `ord`.
    ///
    /// # Panics
    /// Panics if the count of `ord` is smaller than `delta`.
    pub fn decrease_ord_count(&mut self, ord: WordOrd, delta: u64) {
        let current = self.count(ord);
        assert!(current >= delta, "Count of word {} would become negative", ord);
        if delta == 0 {
            return;
        }

        if current == delta {
            self.counts.remove(&ord);
        } else {
            self.counts.insert(ord, current - delta);
        }
        self.total -= delta;

        let mut index = ord + 1;
        while index <= self.max_ord {
            if let Some(node) = self.tree.get_mut(&index) {
                *node -= delta;
                if *node == 0 {
                    self.tree.remove(&index);
                }
            }
            match index.checked_add(index & index.wrapping_neg()) {
                Some(next) => index = next,
                None => break,
            }
        }
    }

    #[inline(always)]
    pub fn count(&self, ord: WordOrd) -> u64 {
        self.counts.get(&ord).copied().unwrap_or(0)
    }

    /// Sum of the counts of the words `[0, ord]`.
    pub fn cumulative_count(&self, ord: WordOrd) -> u64 {
        self.prefix_sum(ord.saturating_add(1))
    }

    /// Sum of the counts of the words `[0, ord)`. `ord` may be equal to `max_ord`, in which case
    /// the total is returned.
    pub fn lower_cumulative_count(&self, ord: WordOrd) -> u64 {
        self.prefix_sum(ord)
    }

    #[inline(always)]
    pub fn total_words_cnt(&self) -> u64 {
        self.total
    }

    /// Number of words with a nonzero count.
    pub fn distinct_words_cnt(&self) -> u64 {
        self.counts.len() as u64
    }

    /// Iterates the words with a nonzero count, in increasing order.
    pub fn iter(&self) -> impl Iterator<Item = (WordOrd, u64)> + '_ {
        self.counts.iter().map(|(&ord, &count)| (ord, count))
    }

    fn prefix_sum(&self, end: u64) -> u64 {
        if end >= self.max_ord {
            return self.total;
        }

        let mut sum = 0;
        let mut index = end;
        while index > 0 {
            sum += self.tree.get(&index).copied().unwrap_or(0);
            index &= index - 1;
        }
        sum
    }
}
