use anyhow::{bail, Result};

use crate::arith::Count;
use crate::error::CoderError;
use crate::WordOrd;

pub mod adaptive;
pub mod adaptive_a;
pub mod adaptive_d;
pub mod context;
pub mod contextual;
pub mod cumulative_count;
pub mod cumulative_unique_count;
pub mod decreasing;
pub mod ppm;
pub mod ppma;
pub mod ppmd;
pub mod static_counts;
pub mod uniform;
pub mod word_counts;

/// The half-open interval `[low, high)` assigned to a word inside `[0, total)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ProbabilityStats<C> {
    pub low: C,
    pub high: C,
    pub total: C,
}

impl<C: Count> ProbabilityStats<C> {
    pub fn new(low: C, high: C, total: C) -> Self {
        Self { low, high, total }
    }

    /// The mass assigned to the word.
    pub fn width(&self) -> C {
        self.high - self.low
    }

    pub fn is_valid(&self) -> bool {
        self.low < self.high && self.high <= self.total
    }

    /// Returns the stats if they describe a non-empty interval inside `[0, total)`.
    pub(crate) fn validated(self) -> Result<Self> {
        if !self.is_valid() {
            bail!(CoderError::InvalidStats {
                low: self.low.to_string(),
                high: self.high.to_string(),
                total: self.total.to_string(),
            });
        }
        Ok(self)
    }
}

/// A probability model over the words `[0, max_ord)`.
///
/// The encoder calls [`probability_stats`](Dictionary::probability_stats) with the known word;
/// the decoder calls [`total_words_cnt`](Dictionary::total_words_cnt), then
/// [`word_ord`](Dictionary::word_ord) and finally `probability_stats` with the recovered word.
/// Both sides must drive their own instance through the same sequence of calls.
pub trait Dictionary {
    type Count: Count;

    /// The width `W` of the coding range used with this dictionary.
    const COUNT_NUM_BITS: u32;

    fn max_ord(&self) -> WordOrd;

    /// Returns the word whose cumulative interval contains `cumulative`.
    fn word_ord(&self, cumulative: Self::Count) -> WordOrd;

    /// Returns the current interval of `ord` and then applies the model update.
    fn probability_stats(&mut self, ord: WordOrd) -> ProbabilityStats<Self::Count>;

    /// The current normalising constant.
    fn total_words_cnt(&self) -> Self::Count;
}

/// Counting dictionaries that can be built from the alphabet size alone and updated without
/// computing any interval. Contextual models keep one of them per context.
pub trait AdaptiveModel: Dictionary {
    fn with_max_ord(max_ord: WordOrd) -> Self;

    /// Records one occurrence of `ord`.
    fn update(&mut self, ord: WordOrd);
}

/// Returns the first `ord` in `[0, max_ord)` whose key is greater than `cumulative`, or
/// `max_ord` if there is none. `key` must be non-decreasing.
pub(crate) fn upper_bound<C: Ord>(
    max_ord: WordOrd,
    cumulative: C,
    key: impl Fn(WordOrd) -> C,
) -> WordOrd {
    let (mut lo, mut hi) = (0, max_ord);

    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if key(mid) <= cumulative {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    lo
}
