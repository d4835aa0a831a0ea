use anyhow::{bail, Result};

use crate::dictionary::word_counts::WordCounts;
use crate::dictionary::{upper_bound, ProbabilityStats};
use crate::error::CoderError;
use crate::esc::adaptive_a::{new_word_ord, new_word_stats};
use crate::esc::{EscDictionary, StatsSeq};
use crate::{WordOrd, COUNT_NUM_BITS};

/// Escape-coded adaptive model, method D.
///
/// Every seen word gives half an occurrence to the escape: a seen word gets
/// `(2 * count - 1) / (2 * T)` and the escape `u / (2 * T)`. Before the first word the escape is
/// certain.
#[derive(Clone, Debug)]
pub struct EscAdaptiveDDictionary {
    counts: WordCounts,
}

impl EscAdaptiveDDictionary {
    /// # Panics
    /// Panics if the alphabet is empty.
    pub fn new(max_ord: WordOrd) -> Self {
        assert!(max_ord > 0, "The alphabet can't be empty");
        Self {
            counts: WordCounts::new(max_ord),
        }
    }

    /// Mass of the seen words before `ord`.
    fn lower_cumulative_cnt(&self, ord: WordOrd) -> u64 {
        2 * self.counts.lower(ord) - self.counts.unique_lower(ord)
    }

    fn seen_stats(&self, ord: WordOrd) -> ProbabilityStats<u64> {
        let low = self.lower_cumulative_cnt(ord);
        ProbabilityStats::new(
            low,
            low + 2 * self.counts.count(ord) - 1,
            2 * self.counts.total(),
        )
    }

    fn esc_stats(&self) -> ProbabilityStats<u64> {
        let total = 2 * self.counts.total();
        if total == 0 {
            return ProbabilityStats::new(0, 1, 1);
        }
        ProbabilityStats::new(total - self.counts.unique(), total, total)
    }
}

impl EscDictionary for EscAdaptiveDDictionary {
    type Count = u64;
    const COUNT_NUM_BITS: u32 = COUNT_NUM_BITS;

    /// Whether an escape was just decoded.
    type DecodeState = bool;

    #[inline(always)]
    fn max_ord(&self) -> WordOrd {
        self.counts.max_ord()
    }

    fn probability_stats(&mut self, ord: WordOrd) -> StatsSeq<u64> {
        let stats = if self.counts.count(ord) > 0 {
            vec![self.seen_stats(ord)]
        } else {
            vec![self.esc_stats(), new_word_stats(&self.counts, ord)]
        };
        self.counts.update(ord);
        stats
    }

    fn decode_total_words_cnt(&self, esc_just_decoded: &bool) -> u64 {
        if *esc_just_decoded {
            self.counts.unseen()
        } else {
            self.esc_stats().total
        }
    }

    fn decode_word_ord(&self, esc_just_decoded: &bool, cumulative: u64) -> WordOrd {
        if *esc_just_decoded {
            return new_word_ord(&self.counts, cumulative);
        }
        if cumulative >= self.esc_stats().low {
            return self.max_ord();
        }
        upper_bound(self.max_ord(), cumulative, |ord| {
            self.lower_cumulative_cnt(ord + 1)
        })
    }

    fn decode_probability_stats(
        &mut self,
        esc_just_decoded: &mut bool,
        ord: WordOrd,
    ) -> Result<ProbabilityStats<u64>> {
        if self.is_esc(ord) {
            if *esc_just_decoded || self.counts.unseen() == 0 {
                bail!(CoderError::ValueOutOfRange);
            }
            *esc_just_decoded = true;
            return Ok(self.esc_stats());
        }

        let stats = if *esc_just_decoded {
            new_word_stats(&self.counts, ord)
        } else {
            self.seen_stats(ord)
        };
        *esc_just_decoded = false;
        self.counts.update(ord);
        Ok(stats)
    }
}
