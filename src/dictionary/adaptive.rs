use anyhow::{bail, Result};

use crate::dictionary::cumulative_count::CumulativeCount;
use crate::dictionary::{upper_bound, Dictionary, ProbabilityStats};
use crate::error::CoderError;
use crate::{WordOrd, COUNT_NUM_BITS};

/// Parameters of an [`AdaptiveDictionary`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AdaptiveConstructInfo {
    pub max_ord: WordOrd,
    /// Weight of one real occurrence against the floor of one unit every word has.
    pub ratio: u64,
}

impl Default for AdaptiveConstructInfo {
    fn default() -> Self {
        Self {
            max_ord: 2,
            ratio: 4,
        }
    }
}

/// Ratio-smoothed adaptive model: every word has a floor mass of 1 and each real occurrence
/// adds `ratio` on top of it.
///
/// `[ord + ratio * lower(ord), ord + ratio * lower(ord) + ratio * count(ord) + 1)` out of
/// `max_ord + ratio * T`.
#[derive(Clone, Debug)]
pub struct AdaptiveDictionary {
    cnt: CumulativeCount,
    ratio: u64,
}

impl AdaptiveDictionary {
    pub fn new(info: AdaptiveConstructInfo) -> Result<Self> {
        if info.max_ord == 0 {
            bail!(CoderError::InvalidParameters("the alphabet can't be empty"));
        }
        if info.ratio == 0 {
            bail!(CoderError::InvalidParameters("ratio must be positive"));
        }

        Ok(Self {
            cnt: CumulativeCount::new(info.max_ord),
            ratio: info.ratio,
        })
    }

    pub fn ratio(&self) -> u64 {
        self.ratio
    }

    fn lower_cumulative_cnt(&self, ord: WordOrd) -> u64 {
        ord + self.ratio * self.cnt.lower_cumulative_count(ord)
    }
}

impl Dictionary for AdaptiveDictionary {
    type Count = u64;
    const COUNT_NUM_BITS: u32 = COUNT_NUM_BITS;

    #[inline(always)]
    fn max_ord(&self) -> WordOrd {
        self.cnt.max_ord()
    }

    fn word_ord(&self, cumulative: u64) -> WordOrd {
        upper_bound(self.max_ord(), cumulative, |ord| {
            self.lower_cumulative_cnt(ord + 1)
        })
    }

    fn probability_stats(&mut self, ord: WordOrd) -> ProbabilityStats<u64> {
        let low = self.lower_cumulative_cnt(ord);
        let high = low + self.ratio * self.cnt.count(ord) + 1;
        let stats = ProbabilityStats::new(low, high, self.total_words_cnt());
        self.cnt.increase_ord_count(ord, 1);
        stats
    }

    fn total_words_cnt(&self) -> u64 {
        self.max_ord() + self.ratio * self.cnt.total_words_cnt()
    }
}
