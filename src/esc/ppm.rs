use std::marker::PhantomData;

use anyhow::{bail, Result};

use crate::dictionary::ppm::{PpmConstructInfo, PpmContexts};
use crate::dictionary::word_counts::WordCounts;
use crate::dictionary::{upper_bound, ProbabilityStats};
use crate::error::CoderError;
use crate::esc::adaptive_a::{new_word_ord, new_word_stats};
use crate::esc::{EscDictionary, StatsSeq};
use crate::{WordOrd, COUNT_NUM_BITS};

/// Longest context of the escape-coded PPM models.
pub const MAX_ESC_CTX_LENGTH: usize = 16;

/// The counts of a context level with the words of the previously consulted level removed.
///
/// Contexts are nested: every word of a longer context was also seen after its suffixes, so the
/// excluded words are all present in `counts`.
#[derive(Clone, Debug)]
pub struct LevelView<'a> {
    counts: &'a WordCounts,

    /// Excluded words, increasing.
    excluded: Vec<WordOrd>,

    /// `excluded_lower[i]` is the count in `counts` of the first `i` excluded words.
    excluded_lower: Vec<u64>,
}

impl<'a> LevelView<'a> {
    pub fn new(counts: &'a WordCounts, exclude: Option<&WordCounts>) -> Self {
        let excluded: Vec<WordOrd> = exclude
            .into_iter()
            .flat_map(|cell| cell.iter().map(|(ord, _)| ord))
            .filter(|&ord| counts.count(ord) > 0)
            .collect();
        let excluded_lower = std::iter::once(0)
            .chain(excluded.iter().scan(0, |sum, &ord| {
                *sum += counts.count(ord);
                Some(*sum)
            }))
            .collect();

        Self {
            counts,
            excluded,
            excluded_lower,
        }
    }

    /// How many excluded words are smaller than `ord`.
    #[inline(always)]
    fn excluded_before(&self, ord: WordOrd) -> usize {
        self.excluded.partition_point(|&excluded| excluded < ord)
    }

    pub fn count(&self, ord: WordOrd) -> u64 {
        if self.excluded.binary_search(&ord).is_ok() {
            0
        } else {
            self.counts.count(ord)
        }
    }

    pub fn lower(&self, ord: WordOrd) -> u64 {
        self.counts.lower(ord) - self.excluded_lower[self.excluded_before(ord)]
    }

    pub fn unique_lower(&self, ord: WordOrd) -> u64 {
        self.counts.unique_lower(ord) - self.excluded_before(ord) as u64
    }

    pub fn total(&self) -> u64 {
        self.counts.total() - self.excluded_lower[self.excluded.len()]
    }

    pub fn unique(&self) -> u64 {
        self.counts.unique() - self.excluded.len() as u64
    }
}

/// How a context level shares its mass between its words and the escape.
pub trait EscMethod {
    /// Mass of the words of the level before `ord`.
    fn lower(view: &LevelView, ord: WordOrd) -> u64;

    fn width(view: &LevelView, ord: WordOrd) -> u64;

    /// Total of a level holding at least one word.
    fn total(view: &LevelView) -> u64;
}

/// Method A: real counts, one unit for the escape.
#[derive(Clone, Copy, Debug, Default)]
pub struct MethodA;

impl EscMethod for MethodA {
    #[inline(always)]
    fn lower(view: &LevelView, ord: WordOrd) -> u64 {
        view.lower(ord)
    }

    #[inline(always)]
    fn width(view: &LevelView, ord: WordOrd) -> u64 {
        view.count(ord)
    }

    #[inline(always)]
    fn total(view: &LevelView) -> u64 {
        view.total() + 1
    }
}

/// Method D: doubled counts, each word giving one unit to the escape.
#[derive(Clone, Copy, Debug, Default)]
pub struct MethodD;

impl EscMethod for MethodD {
    #[inline(always)]
    fn lower(view: &LevelView, ord: WordOrd) -> u64 {
        2 * view.lower(ord) - view.unique_lower(ord)
    }

    #[inline(always)]
    fn width(view: &LevelView, ord: WordOrd) -> u64 {
        2 * view.count(ord) - 1
    }

    #[inline(always)]
    fn total(view: &LevelView) -> u64 {
        2 * view.total()
    }
}

/// # Escape-coded PPM
/// Codes every word at the longest context of the history that has already been followed by it.
///
/// The levels are consulted longest first: the contexts of the current history that exist, then
/// the empty context, then a uniform level over the words never seen. Each level the word is
/// missing from costs an escape. With exclusion, the words of the previous level are removed from
/// the current one, since the word is known not to be among them; a level left empty escapes
/// with `{0, 1, 1}`, which costs nothing.
#[derive(Clone, Debug)]
pub struct EscPpmDictionary<M> {
    contexts: PpmContexts,
    exclusion: bool,
    _marker: PhantomData<M>,
}

pub type EscPpmADictionary = EscPpmDictionary<MethodA>;
pub type EscPpmDDictionary = EscPpmDictionary<MethodD>;

impl<M: EscMethod> EscPpmDictionary<M> {
    pub fn new(info: PpmConstructInfo) -> Result<Self> {
        if info.max_ord == 0 {
            bail!(CoderError::InvalidParameters("the alphabet can't be empty"));
        }
        if info.ctx_length > MAX_ESC_CTX_LENGTH {
            bail!(CoderError::PpmContextTooLong {
                ctx_length: info.ctx_length,
                count_num_bits: COUNT_NUM_BITS,
            });
        }

        Ok(Self {
            contexts: PpmContexts::new(info.max_ord, info.ctx_length),
            exclusion: true,
            _marker: PhantomData,
        })
    }

    /// Enables or disables the exclusion of the words of the previous level.
    pub fn with_exclusion(mut self, exclusion: bool) -> Self {
        self.exclusion = exclusion;
        self
    }

    /// The counts of every context level, longest first, the empty context last.
    fn levels(&self) -> Vec<&WordCounts> {
        self.contexts
            .active()
            .chain(std::iter::once(self.contexts.zero()))
            .collect()
    }

    /// The view of the `index`-th level, or `None` for the uniform one.
    fn level_view<'a>(&self, levels: &[&'a WordCounts], index: usize) -> Option<LevelView<'a>> {
        let counts = *levels.get(index)?;
        let previous = match index {
            0 => None,
            _ if !self.exclusion => None,
            _ => Some(levels[index - 1]),
        };
        Some(LevelView::new(counts, previous))
    }

    fn symbol_stats(view: &LevelView, ord: WordOrd) -> ProbabilityStats<u64> {
        let low = M::lower(view, ord);
        ProbabilityStats::new(low, low + M::width(view, ord), M::total(view))
    }

    fn esc_stats(view: &LevelView) -> ProbabilityStats<u64> {
        if view.total() == 0 {
            return ProbabilityStats::new(0, 1, 1);
        }
        let total = M::total(view);
        ProbabilityStats::new(M::lower(view, view.counts.max_ord()), total, total)
    }
}

impl<M: EscMethod> EscDictionary for EscPpmDictionary<M> {
    type Count = u64;
    const COUNT_NUM_BITS: u32 = COUNT_NUM_BITS;

    /// How many escapes have been decoded for the current word.
    type DecodeState = usize;

    #[inline(always)]
    fn max_ord(&self) -> WordOrd {
        self.contexts.max_ord()
    }

    fn probability_stats(&mut self, ord: WordOrd) -> StatsSeq<u64> {
        let mut stats = Vec::new();
        {
            let levels = self.levels();
            let mut found = false;
            for index in 0..levels.len() {
                if let Some(view) = self.level_view(&levels, index) {
                    if view.count(ord) > 0 {
                        stats.push(Self::symbol_stats(&view, ord));
                        found = true;
                        break;
                    }
                    stats.push(Self::esc_stats(&view));
                }
            }
            if !found {
                stats.push(new_word_stats(self.contexts.zero(), ord));
            }
        }

        self.contexts.update(ord);
        stats
    }

    fn decode_total_words_cnt(&self, escapes: &usize) -> u64 {
        let levels = self.levels();
        match self.level_view(&levels, *escapes) {
            Some(view) => Self::esc_stats(&view).total,
            None => self.contexts.zero().unseen(),
        }
    }

    fn decode_word_ord(&self, escapes: &usize, cumulative: u64) -> WordOrd {
        let levels = self.levels();
        let Some(view) = self.level_view(&levels, *escapes) else {
            return new_word_ord(self.contexts.zero(), cumulative);
        };

        if view.total() == 0 || cumulative >= Self::esc_stats(&view).low {
            return self.max_ord();
        }
        upper_bound(self.max_ord(), cumulative, |ord| M::lower(&view, ord + 1))
    }

    fn decode_probability_stats(
        &mut self,
        escapes: &mut usize,
        ord: WordOrd,
    ) -> Result<ProbabilityStats<u64>> {
        let stats = {
            let levels = self.levels();
            let view = self.level_view(&levels, *escapes);
            match (view, self.is_esc(ord)) {
                (Some(view), true) => Self::esc_stats(&view),
                (Some(view), false) => Self::symbol_stats(&view, ord),
                (None, true) => bail!(CoderError::ValueOutOfRange),
                (None, false) => new_word_stats(self.contexts.zero(), ord),
            }
        };

        if self.is_esc(ord) {
            *escapes += 1;
        } else {
            *escapes = 0;
            self.contexts.update(ord);
        }
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widths_and_totals(stats: &StatsSeq<u64>) -> Vec<(u64, u64)> {
        stats.iter().map(|s| (s.width(), s.total)).collect()
    }

    fn if_we_ca<M: EscMethod>(dict: &mut EscPpmDictionary<M>) -> Vec<Vec<(u64, u64)>> {
        b"IF_WE_CA"
            .iter()
            .map(|&ord| widths_and_totals(&dict.probability_stats(ord as WordOrd)))
            .collect()
    }

    #[test]
    fn first_words_escape_to_the_uniform_level() {
        let mut dict = EscPpmDDictionary::new(PpmConstructInfo::new(42, 3)).unwrap();
        assert_eq!(dict.decode_total_words_cnt(&0), 1);
        assert_eq!(dict.decode_word_ord(&0, 0), 42);
        assert_eq!(
            dict.probability_stats(3),
            vec![ProbabilityStats::new(0, 1, 1), ProbabilityStats::new(3, 4, 42)]
        );
        assert_eq!(
            dict.probability_stats(37),
            vec![ProbabilityStats::new(1, 2, 2), ProbabilityStats::new(36, 37, 41)]
        );
    }

    #[test]
    fn repeated_word_is_coded_at_the_empty_context() {
        let mut dict = EscPpmDDictionary::new(PpmConstructInfo::new(8, 3)).unwrap();
        let _ = dict.probability_stats(0);
        assert_eq!(dict.probability_stats(0), vec![ProbabilityStats::new(0, 1, 2)]);
    }

    #[test]
    fn ppmd_cascade_without_exclusion() {
        let mut dict = EscPpmDDictionary::new(PpmConstructInfo::new(256, 5))
            .unwrap()
            .with_exclusion(false);
        let expected = vec![
            vec![(1, 1), (1, 256)],
            vec![(1, 2), (1, 255)],
            vec![(2, 4), (1, 254)],
            vec![(3, 6), (1, 253)],
            vec![(4, 8), (1, 252)],
            vec![(1, 10)],
            vec![(1, 2), (5, 12), (1, 251)],
            vec![(6, 14), (1, 250)],
        ];
        assert_eq!(if_we_ca(&mut dict), expected);
    }

    #[test]
    fn ppmd_cascade_with_exclusion() {
        let mut dict = EscPpmDDictionary::new(PpmConstructInfo::new(256, 5)).unwrap();
        let cascades = if_we_ca(&mut dict);
        // After "_" only "W" was seen, which can't be "C" at the empty context either.
        assert_eq!(cascades[6], vec![(1, 2), (4, 10), (1, 251)]);
        assert_eq!(cascades[7], vec![(6, 14), (1, 250)]);
    }

    #[test]
    fn ppma_cascade() {
        let mut dict = EscPpmADictionary::new(PpmConstructInfo::new(256, 5)).unwrap();
        let expected = vec![
            vec![(1, 1), (1, 256)],
            vec![(1, 2), (1, 255)],
            vec![(1, 3), (1, 254)],
            vec![(1, 4), (1, 253)],
            vec![(1, 5), (1, 252)],
            vec![(1, 6)],
            vec![(1, 2), (1, 6), (1, 251)],
            vec![(1, 8), (1, 250)],
        ];
        assert_eq!(if_we_ca(&mut dict), expected);
    }

    #[test]
    fn emptied_levels_escape_for_free() {
        let mut dict = EscPpmADictionary::new(PpmConstructInfo::new(4, 1)).unwrap();
        for ord in [1, 1] {
            let _ = dict.probability_stats(ord);
        }

        // Context [1] holds only 1, so nothing is left at the empty context once it is excluded.
        assert_eq!(
            dict.probability_stats(3),
            vec![
                ProbabilityStats::new(1, 2, 2),
                ProbabilityStats::new(0, 1, 1),
                ProbabilityStats::new(2, 3, 3),
            ]
        );
    }

    #[test]
    fn exclusion_removes_the_words_of_the_previous_level() {
        let mut dict = EscPpmADictionary::new(PpmConstructInfo::new(4, 1)).unwrap();
        for ord in [1, 2, 1] {
            let _ = dict.probability_stats(ord);
        }

        // Context [1] holds 2; the empty context holds 1 twice and 2 once.
        assert_eq!(
            dict.probability_stats(3),
            vec![
                ProbabilityStats::new(1, 2, 2),
                ProbabilityStats::new(2, 3, 3),
                ProbabilityStats::new(1, 2, 2),
            ]
        );
    }

    #[test]
    fn decoding_follows_the_levels() {
        let mut enc = EscPpmDDictionary::new(PpmConstructInfo::new(8, 2)).unwrap();
        let mut dec = enc.clone();
        let ords = [3, 5, 3, 5, 3, 6, 3, 5];

        for ord in ords {
            let mut escapes = 0;
            for stats in enc.probability_stats(ord) {
                assert_eq!(dec.decode_total_words_cnt(&escapes), stats.total);
                let decoded = dec.decode_word_ord(&escapes, stats.low);
                assert_eq!(dec.decode_probability_stats(&mut escapes, decoded).unwrap(), stats);
            }
            assert_eq!(escapes, 0);
        }
    }

    #[test]
    fn context_length_is_bounded() {
        assert!(EscPpmADictionary::new(PpmConstructInfo::new(256, 16)).is_ok());
        assert!(EscPpmADictionary::new(PpmConstructInfo::new(256, 17)).is_err());
        assert!(EscPpmDDictionary::new(PpmConstructInfo::new(0, 1)).is_err());
    }
}
