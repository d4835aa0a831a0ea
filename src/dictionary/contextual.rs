use std::collections::HashMap;
use std::marker::PhantomData;

use anyhow::{bail, Result};

use crate::arith::Count;
use crate::dictionary::adaptive_a::AdaptiveADictionary;
use crate::dictionary::adaptive_d::AdaptiveDDictionary;
use crate::dictionary::context::ContextHistory;
use crate::dictionary::{AdaptiveModel, Dictionary, ProbabilityStats};
use crate::error::CoderError;
use crate::{WordOrd, CONTEXT_BITS_BUDGET};

/// Widest words a contextual dictionary accepts.
pub const MAX_WORD_NUM_BITS: u32 = 32;

/// Parameters of a [`ContextualDictionary`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContextualConstructInfo {
    /// The alphabet is `[0, 2^word_num_bits)`.
    pub word_num_bits: u32,
    /// Longest context tracked.
    pub ctx_length: usize,
    /// Bits of every word kept in the context key.
    pub ctx_cell_bits: u32,
}

impl ContextualConstructInfo {
    pub fn new(word_num_bits: u32, ctx_length: usize, ctx_cell_bits: u32) -> Self {
        Self {
            word_num_bits,
            ctx_length,
            ctx_cell_bits,
        }
    }
}

impl Default for ContextualConstructInfo {
    fn default() -> Self {
        Self::new(8, 2, 8)
    }
}

/// Decides whether a context is trusted to code the next word, given the total of its model
/// (zero for a context never seen).
pub trait ContextTrigger {
    fn is_active<C: Count>(ctx_total: C, ctx_length: usize) -> bool;
}

/// Any context seen at least once is used.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExistingContext;

impl ContextTrigger for ExistingContext {
    #[inline(always)]
    fn is_active<C: Count>(ctx_total: C, _ctx_length: usize) -> bool {
        ctx_total > C::zero()
    }
}

/// A context of length `l` is used only once the total of its model reaches `l`.
#[derive(Clone, Copy, Debug, Default)]
pub struct MatureContext;

impl ContextTrigger for MatureContext {
    #[inline(always)]
    fn is_active<C: Count>(ctx_total: C, ctx_length: usize) -> bool {
        ctx_total >= C::from_u64(ctx_length as u64)
    }
}

/// Wraps an adaptive model with a fallback chain of context-conditioned copies of it.
///
/// Every context of length `1..=ctx_length` seen so far owns its own dictionary. A word is coded
/// by the longest context whose trigger fires, or by the base dictionary if none does. Each
/// word updates every context of the current history and the base dictionary.
#[derive(Clone, Debug)]
pub struct ContextualDictionary<D, T> {
    base: D,
    contexts: HashMap<(usize, u64), D>,
    history: ContextHistory,
    ctx_cell_bits: u32,
    _trigger: PhantomData<T>,
}

pub type AdaptiveAContextualDictionary = ContextualDictionary<AdaptiveADictionary, ExistingContext>;
pub type AdaptiveAContextualDictionaryImproved =
    ContextualDictionary<AdaptiveADictionary, MatureContext>;
pub type AdaptiveDContextualDictionary = ContextualDictionary<AdaptiveDDictionary, ExistingContext>;
pub type AdaptiveDContextualDictionaryImproved =
    ContextualDictionary<AdaptiveDDictionary, MatureContext>;

impl<D: AdaptiveModel, T: ContextTrigger> ContextualDictionary<D, T> {
    pub fn new(info: ContextualConstructInfo) -> Result<Self> {
        if info.word_num_bits == 0 || info.word_num_bits > MAX_WORD_NUM_BITS {
            bail!(CoderError::InvalidParameters(
                "word_num_bits must be in [1, 32]"
            ));
        }
        if info.ctx_length > 0 && info.ctx_cell_bits == 0 {
            bail!(CoderError::InvalidParameters(
                "ctx_cell_bits must be positive"
            ));
        }
        let ctx_bits = (info.ctx_length as u64).saturating_mul(info.ctx_cell_bits as u64);
        if ctx_bits > CONTEXT_BITS_BUDGET as u64 {
            bail!(CoderError::ContextTooLong {
                ctx_length: info.ctx_length,
                cell_bits: info.ctx_cell_bits,
                max_bits: CONTEXT_BITS_BUDGET,
            });
        }

        Ok(Self {
            base: D::with_max_ord(1 << info.word_num_bits),
            contexts: HashMap::new(),
            history: ContextHistory::new(info.ctx_length),
            ctx_cell_bits: info.ctx_cell_bits,
            _trigger: PhantomData,
        })
    }

    /// Number of contexts seen so far.
    pub fn contexts_cnt(&self) -> usize {
        self.contexts.len()
    }

    #[inline(always)]
    fn context_key(&self, length: usize) -> (usize, u64) {
        (length, self.history.packed(length, self.ctx_cell_bits))
    }

    /// The model of the context of the given length, if it is trusted.
    fn trusted_context(&self, length: usize) -> Option<&D> {
        self.contexts
            .get(&self.context_key(length))
            .filter(|dict| T::is_active(dict.total_words_cnt(), length))
    }

    /// The dictionary coding the next word.
    fn active_dict(&self) -> &D {
        (1..=self.history.len())
            .rev()
            .find_map(|length| self.trusted_context(length))
            .unwrap_or(&self.base)
    }
}

impl<D: AdaptiveModel, T: ContextTrigger> Dictionary for ContextualDictionary<D, T> {
    type Count = D::Count;
    const COUNT_NUM_BITS: u32 = D::COUNT_NUM_BITS;

    #[inline(always)]
    fn max_ord(&self) -> WordOrd {
        self.base.max_ord()
    }

    fn word_ord(&self, cumulative: D::Count) -> WordOrd {
        self.active_dict().word_ord(cumulative)
    }

    fn probability_stats(&mut self, ord: WordOrd) -> ProbabilityStats<D::Count> {
        let max_ord = self.max_ord();
        let mut ctx_stats = None;

        for length in (1..=self.history.len()).rev() {
            let trusted = ctx_stats.is_none() && self.trusted_context(length).is_some();
            let key = self.context_key(length);
            let dict = self
                .contexts
                .entry(key)
                .or_insert_with(|| D::with_max_ord(max_ord));

            if trusted {
                ctx_stats = Some(dict.probability_stats(ord));
            } else {
                dict.update(ord);
            }
        }

        let base_stats = self.base.probability_stats(ord);
        self.history.push(ord);
        ctx_stats.unwrap_or(base_stats)
    }

    fn total_words_cnt(&self) -> D::Count {
        self.active_dict().total_words_cnt()
    }
}
