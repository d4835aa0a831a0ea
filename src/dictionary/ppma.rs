use anyhow::Result;
use primitive_types::U256;

use crate::dictionary::ppm::{blend_level, check_blended_ctx_length, PpmConstructInfo, PpmContexts};
use crate::dictionary::{upper_bound, Dictionary, ProbabilityStats};
use crate::{WordOrd, PPM_COUNT_NUM_BITS};

/// Blended PPM model with method A escapes.
///
/// Instead of emitting escape events, the distributions of every context of the current
/// history are mixed into a single one: a level with real total `T` gives its escape mass
/// `1 / (T + 1)` to the levels below it, down to the empty context and then to a uniform
/// distribution over the words never seen. All the levels are multiplied together, hence the
/// 256-bit counts.
#[derive(Clone, Debug)]
pub struct PpmADictionary {
    contexts: PpmContexts,
}

impl PpmADictionary {
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

        for counts in self.contexts.active().chain([self.contexts.zero()]) {
            let base = U256::from(counts.total() + 1);
            lower = blend_level(lower, base, U256::from(counts.lower(ord)));
            count = blend_level(count, base, U256::from(counts.count(ord)));
            total = total.saturating_mul(base);
        }

        let zero = self.contexts.zero();
        let unseen = zero.unseen();
        if unseen > 0 {
            let unseen = U256::from(unseen);
            lower = blend_level(lower, unseen, U256::from(ord - zero.unique_lower(ord)));
            count = blend_level(count, unseen, U256::from(1 - zero.seen(ord)));
            total = total.saturating_mul(unseen);
        }
        (lower, count, total)
    }
}

impl Dictionary for PpmADictionary {
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
            total = total.saturating_mul(U256::from(counts.total() + 1));
        }
        let unseen = self.contexts.zero().unseen();
        if unseen > 0 {
            total = total.saturating_mul(U256::from(unseen));
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(low: u64, high: u64, total: u64) -> ProbabilityStats<U256> {
        ProbabilityStats::new(U256::from(low), U256::from(high), U256::from(total))
    }

    #[test]
    fn init_stats_are_uniform() {
        let info = PpmConstructInfo::new(256, 1);
        assert_eq!(PpmADictionary::new(info).unwrap().total_words_cnt(), U256::from(256_u64));
        for ord in [0, 42, 255] {
            let mut dict = PpmADictionary::new(info).unwrap();
            assert_eq!(dict.probability_stats(ord), stats(ord, ord + 1, 256));
        }
    }

    #[test]
    fn repeated_word_blends_context_and_empty_context() {
        let mut dict = PpmADictionary::new(PpmConstructInfo::new(256, 1)).unwrap();
        let _ = dict.probability_stats(42);
        assert_eq!(dict.probability_stats(42), stats(42, 807, 1020));
    }

    #[test]
    fn new_word_gets_the_escape_mass_of_every_level() {
        let mut dict = PpmADictionary::new(PpmConstructInfo::new(256, 1)).unwrap();
        let _ = dict.probability_stats(42);
        assert_eq!(dict.probability_stats(45), stats(809, 810, 1020));
    }

    #[test]
    fn intervals_tile_the_whole_total() {
        let mut dict = PpmADictionary::new(PpmConstructInfo::new(16, 2)).unwrap();
        for ord in [3, 5, 3, 5, 3, 0, 15, 3, 5] {
            let _ = dict.probability_stats(ord);

            let total = dict.total_words_cnt();
            let mut expected_low = U256::zero();
            for ord in 0..16 {
                let (lower, count, blended_total) = dict.blend(ord);
                assert_eq!(lower, expected_low);
                assert_eq!(blended_total, total);
                assert!(!count.is_zero());
                assert_eq!(dict.word_ord(lower), ord);
                expected_low = lower + count;
            }
            assert_eq!(expected_low, total);
        }
    }

    #[test]
    fn too_long_contexts_are_rejected() {
        assert!(PpmADictionary::new(PpmConstructInfo::new(256, 7)).is_err());
    }
}
