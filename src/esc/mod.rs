//! Escape-coded models and the engine driving them.
//!
//! Here a word never seen by a model is not given a share of a blended interval. The model emits
//! one or more escape events first, each coded as an interval of its own, and then the word at
//! the level that knows it. The escape word is `max_ord`.
use std::fmt::Debug;

use anyhow::Result;

use crate::arith::Count;
use crate::bits::{BitReader, BitWriter};
use crate::coder::{DecodeLimits, EncodeRet};
use crate::dictionary::ProbabilityStats;
use crate::WordOrd;

pub mod adaptive_a;
pub mod adaptive_d;
pub mod decoder;
pub mod encoder;
pub mod ppm;

pub use decoder::EscArithmeticDecoder;
pub use encoder::EscArithmeticCoder;

/// The intervals coding one word: every escape taken, then the word itself.
pub type StatsSeq<C> = Vec<ProbabilityStats<C>>;

/// A probability model coding new words through escape events.
///
/// The encoder calls [`probability_stats`](EscDictionary::probability_stats) once per word. The
/// decoder recovers the same cascade one interval at a time, threading a
/// [`DecodeState`](EscDictionary::DecodeState) through the calls; the model is updated only when
/// a real word is decoded.
pub trait EscDictionary {
    type Count: Count;

    /// The width `W` of the coding range used with this dictionary.
    const COUNT_NUM_BITS: u32;

    /// Where the decoder is inside an escape cascade. The default value is the start of a word.
    type DecodeState: Default + Clone + Debug;

    fn max_ord(&self) -> WordOrd;

    #[inline(always)]
    fn is_esc(&self, ord: WordOrd) -> bool {
        ord == self.max_ord()
    }

    /// Returns the intervals coding `ord` and then applies the model update.
    fn probability_stats(&mut self, ord: WordOrd) -> StatsSeq<Self::Count>;

    /// The normalising constant of the next interval to decode.
    fn decode_total_words_cnt(&self, state: &Self::DecodeState) -> Self::Count;

    /// Returns the word, or the escape, whose interval contains `cumulative`.
    fn decode_word_ord(&self, state: &Self::DecodeState, cumulative: Self::Count) -> WordOrd;

    /// Returns the interval of the decoded `ord` and advances `state`. After a real word the state
    /// is back at its default and the model is updated.
    fn decode_probability_stats(
        &mut self,
        state: &mut Self::DecodeState,
        ord: WordOrd,
    ) -> Result<ProbabilityStats<Self::Count>>;
}

/// Encodes `ords` into a fresh byte buffer. `words_count` counts every coded interval, escapes
/// included.
pub fn encode<D: EscDictionary>(ords: &[WordOrd], dict: &mut D) -> Result<EncodeRet<Vec<u8>>> {
    let mut coder = EscArithmeticCoder::<D::Count, BitWriter>::new();
    coder.encode(ords.iter().copied(), dict)?;
    Ok(coder.finalize().map_sink(BitWriter::into_bytes))
}

/// Decodes a stream produced by [`encode`]. `limits.words_limit` counts intervals, as the
/// `words_count` returned by the encoder does; only real words are returned.
pub fn decode<D: EscDictionary>(
    bytes: &[u8],
    dict: &mut D,
    limits: DecodeLimits,
) -> Result<Vec<WordOrd>> {
    let mut decoder =
        EscArithmeticDecoder::<D, _>::new(BitReader::new(bytes), limits.bits_limit);
    decoder.decode(dict, limits.words_limit)
}
