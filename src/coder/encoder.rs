use anyhow::{bail, Result};
use log::{debug, trace};

use crate::arith::Count;
use crate::bits::{BitSink, BitWriter};
use crate::coder::EncodeRet;
use crate::dictionary::{Dictionary, ProbabilityStats};
use crate::error::CoderError;
use crate::range::{Range, RangeCase, RangesCalc};
use crate::WordOrd;

/// The interval and the pending bits carried from a word to the next.
#[derive(Clone, Copy, Debug)]
pub(crate) struct EncoderSession<C> {
    calc: RangesCalc<C>,
    range: Range<C>,

    /// Bits to follow: opposite bits owed to the sink once the next settled bit is known.
    btf: usize,
}

/// # Arithmetic Coder
/// Encodes sequences of words with the probabilities given by a [`Dictionary`], emitting bits to
/// a [`BitSink`] as soon as they are settled.
///
/// The coder may be driven by several [`encode`](Self::encode) calls, even with different
/// dictionaries, as long as all of them count with the same width. The stream is terminated by
/// [`finalize`](Self::finalize). After an error the coder must be discarded.
#[derive(Clone, Debug)]
pub struct ArithmeticCoder<C, S = BitWriter> {
    sink: S,

    /// `None` until the first word is encoded.
    session: Option<EncoderSession<C>>,

    /// How many intervals have been encoded.
    words_count: usize,

    /// How many bits have been emitted, the final ones included.
    bits_encoded: usize,
}

impl<C: Count> ArithmeticCoder<C, BitWriter> {
    /// Creates a coder writing to a new [`BitWriter`].
    pub fn new() -> Self {
        Self::with_sink(BitWriter::new())
    }
}

impl<C: Count> Default for ArithmeticCoder<C, BitWriter> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Count, S: BitSink> ArithmeticCoder<C, S> {
    pub fn with_sink(sink: S) -> Self {
        Self {
            sink,
            session: None,
            words_count: 0,
            bits_encoded: 0,
        }
    }

    /// Gives access to the sink, for instance to write a header before the coded words.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn words_count(&self) -> usize {
        self.words_count
    }

    pub fn bits_encoded(&self) -> usize {
        self.bits_encoded
    }
}

/// Encoding functions
impl<C: Count, S: BitSink> ArithmeticCoder<C, S> {
    /// Encodes every word of `ords`, updating `dict` after each of them.
    pub fn encode<D>(
        &mut self,
        ords: impl IntoIterator<Item = WordOrd>,
        dict: &mut D,
    ) -> Result<&mut Self>
    where
        D: Dictionary<Count = C>,
    {
        let mut session = self.session_for(D::COUNT_NUM_BITS)?;

        for ord in ords {
            let max_ord = dict.max_ord();
            if ord >= max_ord {
                bail!(CoderError::WordOutOfRange { ord, max_ord });
            }

            let stats = dict.probability_stats(ord);
            trace!("Encoding word {} as {:?}", ord, stats);
            self.encode_stats(&mut session, stats)?;
            self.words_count += 1;
        }

        self.session = Some(session);
        Ok(self)
    }

    /// Terminates the stream with enough bits to single out the current interval.
    ///
    /// An empty stream takes 2 bits.
    pub fn finalize(mut self) -> EncodeRet<S> {
        let (choose_lower, btf) = match &self.session {
            Some(session) => (session.range.low < session.calc.quarter, session.btf),
            None => (true, 0),
        };

        self.bits_encoded += btf + 2;
        self.sink.put_bit(!choose_lower);
        self.sink.put_bits_repeat(choose_lower, btf + 1);

        debug!(
            "Encoded {} words into {} bits",
            self.words_count, self.bits_encoded
        );

        EncodeRet {
            sink: self.sink,
            words_count: self.words_count,
            bits_encoded: self.bits_encoded,
        }
    }

    /// Returns the session to continue with, starting a new one on the first call.
    pub(crate) fn session_for(&self, num_bits: u32) -> Result<EncoderSession<C>> {
        match self.session {
            None => {
                let calc = RangesCalc::new(num_bits);
                Ok(EncoderSession {
                    calc,
                    range: calc.full_range(),
                    btf: 0,
                })
            }
            Some(session) if session.calc.num_bits == num_bits => Ok(session),
            Some(session) => bail!(CoderError::CountWidthMismatch {
                expected: session.calc.num_bits,
                found: num_bits,
            }),
        }
    }

    pub(crate) fn store_session(&mut self, session: EncoderSession<C>) {
        self.session = Some(session);
    }

    pub(crate) fn count_word(&mut self) {
        self.words_count += 1;
    }

    /// Narrows the interval to `stats` and emits every bit that gets settled.
    pub(crate) fn encode_stats(
        &mut self,
        session: &mut EncoderSession<C>,
        stats: ProbabilityStats<C>,
    ) -> Result<()> {
        if stats.total > session.calc.quarter {
            bail!(CoderError::InvalidTotal {
                total: stats.total.to_string(),
                num_bits: session.calc.num_bits,
            });
        }
        let stats = stats.validated()?;

        session.range = session.calc.narrow(session.range, &stats);

        while let Some(case) = session.calc.case(&session.range) {
            match case {
                RangeCase::Lower => {
                    self.bits_encoded += session.btf + 1;
                    self.sink.put_bit(false);
                    self.sink.put_bits_repeat_with_reset(true, &mut session.btf);
                }
                RangeCase::Upper => {
                    self.bits_encoded += session.btf + 1;
                    self.sink.put_bit(true);
                    self.sink.put_bits_repeat_with_reset(false, &mut session.btf);
                }
                RangeCase::Middle => session.btf += 1,
            }
            session.range = session.calc.recalc(session.range, case);
        }
        Ok(())
    }
}
