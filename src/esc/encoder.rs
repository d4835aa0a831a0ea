use anyhow::{bail, Result};
use log::trace;

use crate::arith::Count;
use crate::bits::{BitSink, BitWriter};
use crate::coder::encoder::ArithmeticCoder;
use crate::coder::EncodeRet;
use crate::error::CoderError;
use crate::esc::EscDictionary;
use crate::WordOrd;

/// # Escape Arithmetic Coder
/// Encodes words with an [`EscDictionary`], one interval per step of every escape cascade.
///
/// It shares the interval arithmetic and the stream layout of
/// [`ArithmeticCoder`](crate::coder::ArithmeticCoder): the two differ only in how many intervals
/// a word takes.
#[derive(Clone, Debug)]
pub struct EscArithmeticCoder<C, S = BitWriter> {
    inner: ArithmeticCoder<C, S>,
}

impl<C: Count> EscArithmeticCoder<C, BitWriter> {
    pub fn new() -> Self {
        Self::with_sink(BitWriter::new())
    }
}

impl<C: Count> Default for EscArithmeticCoder<C, BitWriter> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Count, S: BitSink> EscArithmeticCoder<C, S> {
    pub fn with_sink(sink: S) -> Self {
        Self {
            inner: ArithmeticCoder::with_sink(sink),
        }
    }

    pub fn sink_mut(&mut self) -> &mut S {
        self.inner.sink_mut()
    }

    /// How many intervals have been encoded, escapes included.
    pub fn words_count(&self) -> usize {
        self.inner.words_count()
    }

    pub fn bits_encoded(&self) -> usize {
        self.inner.bits_encoded()
    }

    /// Encodes every word of `ords`, updating `dict` after each of them.
    pub fn encode<D>(
        &mut self,
        ords: impl IntoIterator<Item = WordOrd>,
        dict: &mut D,
    ) -> Result<&mut Self>
    where
        D: EscDictionary<Count = C>,
    {
        let mut session = self.inner.session_for(D::COUNT_NUM_BITS)?;

        for ord in ords {
            let max_ord = dict.max_ord();
            if ord >= max_ord {
                bail!(CoderError::WordOutOfRange { ord, max_ord });
            }

            let stats_seq = dict.probability_stats(ord);
            trace!("Encoding word {} with {} intervals", ord, stats_seq.len());
            for stats in stats_seq {
                self.inner.encode_stats(&mut session, stats)?;
                self.inner.count_word();
            }
        }

        self.inner.store_session(session);
        Ok(self)
    }

    pub fn finalize(self) -> EncodeRet<S> {
        self.inner.finalize()
    }
}
