use std::collections::HashMap;

use anyhow::{bail, Result};
use primitive_types::U256;

use crate::dictionary::context::ContextHistory;
use crate::dictionary::word_counts::WordCounts;
use crate::error::CoderError;
use crate::{WordOrd, PPM_LEVEL_BITS};

/// Parameters of the PPM dictionaries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PpmConstructInfo {
    pub max_ord: WordOrd,
    /// Longest context tracked, `L`.
    pub ctx_length: usize,
}

impl PpmConstructInfo {
    pub fn new(max_ord: WordOrd, ctx_length: usize) -> Self {
        Self {
            max_ord,
            ctx_length,
        }
    }
}

impl Default for PpmConstructInfo {
    fn default() -> Self {
        Self {
            max_ord: 2,
            ctx_length: 0,
        }
    }
}

/// Checks that a blended model of the given context length fits into `count_num_bits`.
pub(crate) fn check_blended_ctx_length(info: &PpmConstructInfo, count_num_bits: u32) -> Result<()> {
    if info.max_ord == 0 {
        bail!(CoderError::InvalidParameters("the alphabet can't be empty"));
    }
    let needed_bits = (info.ctx_length as u64).saturating_mul(PPM_LEVEL_BITS as u64);
    if needed_bits > count_num_bits as u64 {
        bail!(CoderError::PpmContextTooLong {
            ctx_length: info.ctx_length,
            count_num_bits,
        });
    }
    Ok(())
}

/// Appends one level to a blended count: `acc * base + part`.
///
/// Saturates at `U256::MAX`. A saturated total is above every coding range, so the coders reject
/// it with [`CoderError::InvalidTotal`] instead of overflowing.
#[inline(always)]
pub(crate) fn blend_level(acc: U256, base: U256, part: U256) -> U256 {
    acc.saturating_mul(base).saturating_add(part)
}

/// The counts of every context seen so far, plus the empty context.
///
/// Contexts are keyed by their words, oldest first. Every word updates all the suffixes of the
/// current history, so the set of contexts is closed under taking suffixes.
#[derive(Clone, Debug)]
pub struct PpmContexts {
    max_ord: WordOrd,
    history: ContextHistory,
    contexts: HashMap<Vec<WordOrd>, WordCounts>,
    zero: WordCounts,
}

impl PpmContexts {
    pub fn new(max_ord: WordOrd, ctx_length: usize) -> Self {
        Self {
            max_ord,
            history: ContextHistory::new(ctx_length),
            contexts: HashMap::new(),
            zero: WordCounts::new(max_ord),
        }
    }

    #[inline(always)]
    pub fn max_ord(&self) -> WordOrd {
        self.max_ord
    }

    /// Counts of the empty context.
    #[inline(always)]
    pub fn zero(&self) -> &WordCounts {
        &self.zero
    }

    /// Number of non-empty contexts seen so far.
    pub fn contexts_cnt(&self) -> usize {
        self.contexts.len()
    }

    /// Counts of the contexts of the current history, longest first. Contexts never seen are
    /// skipped.
    pub fn active(&self) -> impl Iterator<Item = &WordCounts> + '_ {
        let window = self.history.as_slice();
        (1..=window.len())
            .rev()
            .filter_map(move |length| self.contexts.get(&window[window.len() - length..]))
    }

    /// Records `ord` in every context of the current history and in the empty one, then appends
    /// it to the history.
    pub fn update(&mut self, ord: WordOrd) {
        let window = self.history.as_slice();
        for length in 1..=window.len() {
            let ctx = &window[window.len() - length..];
            match self.contexts.get_mut(ctx) {
                Some(counts) => counts.update(ord),
                None => {
                    let mut counts = WordCounts::new(self.max_ord);
                    counts.update(ord);
                    self.contexts.insert(ctx.to_vec(), counts);
                }
            }
        }
        self.zero.update(ord);
        self.history.push(ord);
    }
}
