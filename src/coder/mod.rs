use anyhow::Result;

use crate::bits::{BitReader, BitWriter};
use crate::dictionary::Dictionary;
use crate::WordOrd;

pub mod decoder;
pub mod encoder;

pub use decoder::ArithmeticDecoder;
pub use encoder::ArithmeticCoder;

/// What is left once a coder has been finalized.
#[derive(Clone, Debug)]
pub struct EncodeRet<S> {
    /// The sink holding the whole stream.
    pub sink: S,

    /// How many intervals have been encoded.
    pub words_count: usize,

    /// How many bits the stream takes, the final ones included.
    pub bits_encoded: usize,
}

impl<S> EncodeRet<S> {
    pub fn map_sink<T>(self, f: impl FnOnce(S) -> T) -> EncodeRet<T> {
        EncodeRet {
            sink: f(self.sink),
            words_count: self.words_count,
            bits_encoded: self.bits_encoded,
        }
    }
}

/// Bounds for a decoding run. The stream has no end marker, so the number of words to decode
/// must be known. The bit budget lets a stream be followed by other data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodeLimits {
    pub words_limit: usize,
    pub bits_limit: usize,
}

impl DecodeLimits {
    pub fn new(words_limit: usize, bits_limit: usize) -> Self {
        Self {
            words_limit,
            bits_limit,
        }
    }

    /// Decodes `words_limit` words reading as many bits as needed.
    pub fn words(words_limit: usize) -> Self {
        Self::new(words_limit, usize::MAX)
    }
}

/// Encodes `ords` into a fresh byte buffer.
///
/// ```
/// use adaptive_range_coder::dictionary::adaptive_a::AdaptiveADictionary;
/// use adaptive_range_coder::{decode, encode, DecodeLimits};
///
/// let ords = [3, 1, 3, 3, 0];
/// let ret = encode(&ords, &mut AdaptiveADictionary::new(4)).unwrap();
/// let limits = DecodeLimits::new(ret.words_count, ret.bits_encoded);
/// let decoded = decode(&ret.sink, &mut AdaptiveADictionary::new(4), limits).unwrap();
/// assert_eq!(decoded, ords);
/// ```
pub fn encode<D: Dictionary>(ords: &[WordOrd], dict: &mut D) -> Result<EncodeRet<Vec<u8>>> {
    let mut coder = ArithmeticCoder::<D::Count, BitWriter>::new();
    coder.encode(ords.iter().copied(), dict)?;
    Ok(coder.finalize().map_sink(BitWriter::into_bytes))
}

/// Decodes the words of a stream produced by [`encode`] with a dictionary in the same state.
pub fn decode<D: Dictionary>(
    bytes: &[u8],
    dict: &mut D,
    limits: DecodeLimits,
) -> Result<Vec<WordOrd>> {
    let mut decoder = ArithmeticDecoder::<D::Count, _>::new(BitReader::new(bytes), limits.bits_limit);
    decoder.decode(dict, limits.words_limit)
}
