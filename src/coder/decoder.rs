use anyhow::{bail, Result};
use log::{debug, trace};

use crate::arith::{mul_dec_div, Count};
use crate::bits::BitSource;
use crate::dictionary::{Dictionary, ProbabilityStats};
use crate::error::CoderError;
use crate::range::{Range, RangeCase, RangesCalc};
use crate::WordOrd;

/// The interval and the window of the stream carried from a word to the next.
#[derive(Clone, Copy, Debug)]
pub(crate) struct DecoderSession<C> {
    calc: RangesCalc<C>,
    range: Range<C>,

    /// The `W` bits of the stream aligned with the current interval.
    value: C,
}

/// # Arithmetic Decoder
/// Decodes the words encoded by an [`ArithmeticCoder`](crate::coder::encoder::ArithmeticCoder)
/// driving a [`Dictionary`] through the same sequence of updates.
///
/// The stream carries no end marker: every call to [`decode`](Self::decode) is bounded by the
/// number of words to decode, and the whole session by a budget of bits to read. Once the budget
/// or the source is exhausted, zero bits are read.
#[derive(Clone, Debug)]
pub struct ArithmeticDecoder<C, S> {
    source: S,

    /// The maximum number of bits to read from the source.
    bits_limit: usize,

    /// The number of bits read so far.
    bits_read: usize,

    /// `None` until the first word is decoded.
    session: Option<DecoderSession<C>>,
}

impl<C: Count, S: BitSource> ArithmeticDecoder<C, S> {
    pub fn new(source: S, bits_limit: usize) -> Self {
        Self {
            source,
            bits_limit,
            bits_read: 0,
            session: None,
        }
    }

    /// Creates a decoder that may read the whole source.
    pub fn unbounded(source: S) -> Self {
        Self::new(source, usize::MAX)
    }

    pub fn bits_read(&self) -> usize {
        self.bits_read
    }

    pub fn into_source(self) -> S {
        self.source
    }
}

/// Decoding functions
impl<C: Count, S: BitSource> ArithmeticDecoder<C, S> {
    /// Decodes the next `words_limit` words, updating `dict` after each of them.
    pub fn decode<D>(&mut self, dict: &mut D, words_limit: usize) -> Result<Vec<WordOrd>>
    where
        D: Dictionary<Count = C>,
    {
        let mut session = self.session_for(D::COUNT_NUM_BITS)?;
        let mut ords = Vec::with_capacity(words_limit.min(1 << 16));

        for _ in 0..words_limit {
            let cumulative = session.scaled_cumulative(dict.total_words_cnt())?;
            let ord = dict.word_ord(cumulative);
            let max_ord = dict.max_ord();
            if ord >= max_ord {
                bail!(CoderError::ValueOutOfRange);
            }

            let stats = dict.probability_stats(ord);
            trace!("Decoded word {} as {:?}", ord, stats);
            self.decode_stats(&mut session, stats)?;
            ords.push(ord);
        }

        self.session = Some(session);
        debug!("Decoded {} words reading {} bits", ords.len(), self.bits_read);
        Ok(ords)
    }

    /// Returns the session to continue with, reading the first `W` bits on the first call.
    pub(crate) fn session_for(&mut self, num_bits: u32) -> Result<DecoderSession<C>> {
        match self.session {
            None => {
                let calc = RangesCalc::new(num_bits);
                let mut value = C::zero();
                for _ in 0..num_bits {
                    value = value * C::from_u64(2) + self.take_bit();
                }
                Ok(DecoderSession {
                    calc,
                    range: calc.full_range(),
                    value,
                })
            }
            Some(session) if session.calc.num_bits == num_bits => Ok(session),
            Some(session) => bail!(CoderError::CountWidthMismatch {
                expected: session.calc.num_bits,
                found: num_bits,
            }),
        }
    }

    pub(crate) fn store_session(&mut self, session: DecoderSession<C>) {
        self.session = Some(session);
    }

    /// Narrows the interval to `stats` and consumes every settled bit.
    pub(crate) fn decode_stats(
        &mut self,
        session: &mut DecoderSession<C>,
        stats: ProbabilityStats<C>,
    ) -> Result<()> {
        let stats = stats.validated()?;
        session.range = session.calc.narrow(session.range, &stats);
        if session.value < session.range.low || session.value >= session.range.high {
            bail!(CoderError::ValueOutOfRange);
        }

        let two = C::from_u64(2);
        while let Some(case) = session.calc.case(&session.range) {
            let bit = self.take_bit();
            session.value = match case {
                RangeCase::Lower => session.value * two + bit,
                RangeCase::Upper => session.value * two - session.calc.total + bit,
                RangeCase::Middle => session.value * two - session.calc.half + bit,
            };
            session.range = session.calc.recalc(session.range, case);
        }
        Ok(())
    }

    #[inline(always)]
    fn take_bit(&mut self) -> C {
        if self.bits_read >= self.bits_limit {
            return C::zero();
        }
        self.bits_read += 1;
        if self.source.take_bit() {
            C::one()
        } else {
            C::zero()
        }
    }
}

impl<C: Count> DecoderSession<C> {
    /// Maps the current value to the cumulative count of a dictionary whose total is `total`.
    pub(crate) fn scaled_cumulative(&self, total: C) -> Result<C> {
        if total == C::zero() || total > self.calc.quarter {
            bail!(CoderError::InvalidTotal {
                total: total.to_string(),
                num_bits: self.calc.num_bits,
            });
        }
        if self.value < self.range.low || self.value >= self.range.high {
            bail!(CoderError::ValueOutOfRange);
        }

        let offset = self.value - self.range.low + C::one();
        let width = self.range.high - self.range.low;
        Ok(mul_dec_div(offset, total, width))
    }
}
