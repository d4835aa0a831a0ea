use anyhow::{bail, Result};

use crate::dictionary::word_counts::WordCounts;
use crate::dictionary::{upper_bound, ProbabilityStats};
use crate::error::CoderError;
use crate::esc::{EscDictionary, StatsSeq};
use crate::{WordOrd, COUNT_NUM_BITS};

/// Escape-coded adaptive model, method A.
///
/// A seen word gets `count / (T + 1)`; the remaining unit is the escape, after which the word is
/// coded uniformly among the `M - u` words never seen.
#[derive(Clone, Debug)]
pub struct EscAdaptiveADictionary {
    counts: WordCounts,
}

impl EscAdaptiveADictionary {
    /// # Panics
    /// Panics if the alphabet is empty.
    pub fn new(max_ord: WordOrd) -> Self {
        assert!(max_ord > 0, "The alphabet can't be empty");
        Self {
            counts: WordCounts::new(max_ord),
        }
    }

    fn seen_stats(&self, ord: WordOrd) -> ProbabilityStats<u64> {
        let low = self.counts.lower(ord);
        ProbabilityStats::new(low, low + self.counts.count(ord), self.counts.total() + 1)
    }

    fn esc_stats(&self) -> ProbabilityStats<u64> {
        let total = self.counts.total();
        ProbabilityStats::new(total, total + 1, total + 1)
    }
}

/// Uniform interval of a word never seen, among the `M - u` such words.
pub(crate) fn new_word_stats(counts: &WordCounts, ord: WordOrd) -> ProbabilityStats<u64> {
    let low = ord - counts.unique_lower(ord);
    ProbabilityStats::new(low, low + 1, counts.unseen())
}

/// Inverse of [`new_word_stats`].
pub(crate) fn new_word_ord(counts: &WordCounts, cumulative: u64) -> WordOrd {
    upper_bound(counts.max_ord(), cumulative, |ord| {
        ord + 1 - counts.unique_lower(ord + 1)
    })
}

impl EscDictionary for EscAdaptiveADictionary {
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
            self.counts.total() + 1
        }
    }

    fn decode_word_ord(&self, esc_just_decoded: &bool, cumulative: u64) -> WordOrd {
        if *esc_just_decoded {
            return new_word_ord(&self.counts, cumulative);
        }
        if cumulative >= self.counts.total() {
            return self.max_ord();
        }
        upper_bound(self.max_ord(), cumulative, |ord| self.counts.lower(ord + 1))
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_word_escapes_to_the_uniform_level() {
        let mut dict = EscAdaptiveADictionary::new(42);
        assert_eq!(dict.decode_total_words_cnt(&false), 1);
        assert_eq!(dict.decode_word_ord(&false, 0), 42);
        assert_eq!(
            dict.probability_stats(3),
            vec![ProbabilityStats::new(0, 1, 1), ProbabilityStats::new(3, 4, 42)]
        );
        assert_eq!(dict.probability_stats(3), vec![ProbabilityStats::new(0, 1, 2)]);
    }

    #[test]
    fn new_words_skip_the_seen_ones() {
        let mut dict = EscAdaptiveADictionary::new(42);
        let _ = dict.probability_stats(3);
        assert_eq!(
            dict.probability_stats(37),
            vec![ProbabilityStats::new(1, 2, 2), ProbabilityStats::new(36, 37, 41)]
        );
    }

    #[test]
    fn escape_and_word_totals() {
        let mut dict = EscAdaptiveADictionary::new(256);
        let expected = [
            (b'I', vec![1, 256]),
            (b'F', vec![2, 255]),
            (b'_', vec![3, 254]),
            (b'W', vec![4, 253]),
            (b'E', vec![5, 252]),
            (b'_', vec![6]),
            (b'C', vec![7, 251]),
            (b'A', vec![8, 250]),
        ];

        for (ord, totals) in expected {
            let stats = dict.probability_stats(ord as WordOrd);
            assert!(stats.iter().all(|s| s.width() == 1));
            assert_eq!(stats.iter().map(|s| s.total).collect::<Vec<_>>(), totals);
        }
    }

    #[test]
    fn decoding_walks_the_same_cascade() {
        let mut dec = EscAdaptiveADictionary::new(8);

        for ord in [5, 2] {
            let mut state = false;
            let esc = dec.decode_word_ord(&state, dec.decode_total_words_cnt(&state) - 1);
            assert!(dec.is_esc(esc));
            dec.decode_probability_stats(&mut state, esc).unwrap();
            assert!(state);

            let unseen = ord - dec.counts.unique_lower(ord);
            assert_eq!(dec.decode_word_ord(&state, unseen), ord);
            dec.decode_probability_stats(&mut state, ord).unwrap();
            assert!(!state);
        }

        let state = false;
        assert_eq!(dec.decode_word_ord(&state, 0), 2);
        assert_eq!(dec.decode_word_ord(&state, 1), 5);
        assert_eq!(dec.decode_word_ord(&state, 2), 8);
    }

    #[test]
    fn double_escapes_are_rejected() {
        let mut dict = EscAdaptiveADictionary::new(4);
        let mut state = true;
        assert!(dict.decode_probability_stats(&mut state, 4).is_err());
    }
}
