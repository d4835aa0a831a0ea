use anyhow::{bail, Result};
use log::{debug, trace};

use crate::bits::BitSource;
use crate::coder::decoder::ArithmeticDecoder;
use crate::error::CoderError;
use crate::esc::EscDictionary;
use crate::WordOrd;

/// # Escape Arithmetic Decoder
/// Decodes the streams of an [`EscArithmeticCoder`](crate::esc::EscArithmeticCoder).
///
/// Limits count intervals, escapes included. A call may stop inside an escape cascade: the
/// cascade state is kept and the next call resumes from it.
#[derive(Clone, Debug)]
pub struct EscArithmeticDecoder<D: EscDictionary, S> {
    inner: ArithmeticDecoder<D::Count, S>,
    state: D::DecodeState,
}

impl<D: EscDictionary, S: BitSource> EscArithmeticDecoder<D, S> {
    pub fn new(source: S, bits_limit: usize) -> Self {
        Self {
            inner: ArithmeticDecoder::new(source, bits_limit),
            state: D::DecodeState::default(),
        }
    }

    pub fn unbounded(source: S) -> Self {
        Self::new(source, usize::MAX)
    }

    pub fn bits_read(&self) -> usize {
        self.inner.bits_read()
    }

    pub fn into_source(self) -> S {
        self.inner.into_source()
    }

    /// Decodes the next `words_limit` intervals, returning the real words among them.
    pub fn decode(&mut self, dict: &mut D, words_limit: usize) -> Result<Vec<WordOrd>> {
        let mut session = self.inner.session_for(D::COUNT_NUM_BITS)?;
        let mut ords = Vec::new();

        for _ in 0..words_limit {
            let cumulative = session.scaled_cumulative(dict.decode_total_words_cnt(&self.state))?;
            let ord = dict.decode_word_ord(&self.state, cumulative);
            let is_esc = dict.is_esc(ord);
            if !is_esc && ord >= dict.max_ord() {
                bail!(CoderError::ValueOutOfRange);
            }

            let stats = dict.decode_probability_stats(&mut self.state, ord)?;
            trace!("Decoded word {} (escape: {}) as {:?}", ord, is_esc, stats);
            self.inner.decode_stats(&mut session, stats)?;
            if !is_esc {
                ords.push(ord);
            }
        }

        self.inner.store_session(session);
        debug!(
            "Decoded {} words out of {} intervals reading {} bits",
            ords.len(),
            words_limit,
            self.inner.bits_read()
        );
        Ok(ords)
    }
}
