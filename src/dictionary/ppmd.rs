use anyhow::Result;
use primitive_types::U256;

use crate::dictionary::ppm::{blend_level, check_blended_ctx_length, PpmConstructInfo, PpmContexts};
use crate::dictionary::{upper_bound, Dictionary, ProbabilityStats};
use crate::{WordOrd, PPM_COUNT_NUM_BITS};

/// Blended PPM model with method D escapes.
///
/// A context with real total `T` and `u` distinct words gives `2c - 1` halves out of `2T` to a
/// word seen `c` times and the remaining `u / 2T` to the levels below it, as in
/// [`AdaptiveDDictionary`](crate::dictionary::adaptive_d::AdaptiveDDictionary). The escape
/// probabilities of the levels above are carried in `ucp`, the product of their `u`.
#[derive(Clone, Debug)]
pub struct PpmDDictionary {
    contexts: PpmContexts,
}

impl PpmDDictionary {
    pub fn new(info: PpmConstructInfo) -> Result<Self> {
        check_blended_ctx_length(&info, PPM_COUNT_NUM_BITS)?;
        Ok(Self {
            contexts: PpmContexts::new(info.max_ord, info.ctx_length),
        })
    }

    /// Returns the blended `(lower, count, total)` of `ord`. `ord` may be `max_ord`.
    fn blend(&self, ord: WordOrd) -> (U256, U256, U256) {
        let mut lower = U256::zero();
        let mut count = U256::zero();
        let mut total = U256::one();
        let mut ucp = U256::one();

        let scaled = |part: u64, ucp: U256| U256::from(part).saturating_mul(ucp);

        for counts in self.contexts.active() {
            let base = U256::from(2 * counts.total());
            let lower_part = 2 * counts.lower(ord) - counts.unique_lower(ord);
            let count_part = 2 * counts.count(ord) - counts.seen(ord);
            lower = blend_level(lower, base, scaled(lower_part, ucp));
            count = blend_level(count, base, scaled(count_part, ucp));
            total = total.saturating_mul(base);
            ucp = ucp.saturating_mul(U256::from(counts.unique()));
        }

        let zero = self.contexts.zero();
        let base = U256::from(2 * zero.total());
        let lower_part = 2 * zero.lower(ord) - zero.unique_lower(ord);
        let count_part = 2 * zero.count(ord) - zero.seen(ord);
        lower = blend_level(lower, base, scaled(lower_part, ucp));
        count = blend_level(count, base, scaled(count_part, ucp));
        if zero.total() != 0 {
            total = total.saturating_mul(base);
            ucp = ucp.saturating_mul(U256::from(zero.unique()));
        }

        let unseen = zero.unseen();
        if unseen > 0 {
            let unseen = U256::from(unseen);
            lower = blend_level(lower, unseen, scaled(ord - zero.unique_lower(ord), ucp));
            count = blend_level(count, unseen, scaled(1 - zero.seen(ord), ucp));
            total = total.saturating_mul(unseen);
        }
        (lower, count, total)
    }
}

impl Dictionary for PpmDDictionary {
    type Count = U256;
    const COUNT_NUM_BITS: u32 = PPM_COUNT_NUM_BITS;

    #[inline(always)]
    fn max_ord(&self) -> WordOrd {
        self.contexts.max_ord()
    }

    fn word_ord(&self, cumulative: U256) -> WordOrd {
        upper_bound(self.max_ord(), cumulative, |ord| self.blend(ord + 1).0)
    }

    fn probability_stats(&mut self, ord: WordOrd) -> ProbabilityStats<U256> {
        let (lower, count, total) = self.blend(ord);
        self.contexts.update(ord);
        ProbabilityStats::new(lower, lower.saturating_add(count), total)
    }

    fn total_words_cnt(&self) -> U256 {
        let mut total = U256::one();
        for counts in self.contexts.active().chain([self.contexts.zero()]) {
            if counts.total() != 0 {
                total = total.saturating_mul(U256::from(2 * counts.total()));
            }
        }
        let unseen = self.contexts.zero().unseen();
        if unseen > 0 {
            total = total.saturating_mul(U256::from(unseen));
        }
        total
    }
}
