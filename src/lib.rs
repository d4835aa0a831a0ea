//! Adaptive range coding over pluggable probability models.
//!
//! The [`coder`] engine narrows an interval on a `2^W` domain for every word handed over by a
//! [`Dictionary`](dictionary::Dictionary), emitting bits as soon as they are settled. The
//! [`esc`] engine does the same for models that code new words through a cascade of escape
//! events.

pub mod arith;
pub mod bits;
pub mod coder;
pub mod dictionary;
pub mod error;
pub mod esc;
pub mod range;
pub mod utils;

/// The type representing a word, i.e. the position of a symbol inside the alphabet `[0, maxOrd)`.
pub type WordOrd = u64;

/// Range width used by every dictionary counting with `u64`.
///
/// Two bits of headroom are left so that doubling a value inside `[0, 2^W)` never overflows.
pub const COUNT_NUM_BITS: u32 = 62;

/// Range width used by the blended PPM dictionaries, which count with `U256`.
pub const PPM_COUNT_NUM_BITS: u32 = 240;

/// Every context level of a blended PPM model may multiply the totals by up to `2^40`, so a
/// model of context length `L` needs `40 * L` bits of range.
pub const PPM_LEVEL_BITS: u32 = 40;

/// Bits available to pack the context of a contextual dictionary into its key.
pub const CONTEXT_BITS_BUDGET: u32 = 56;

pub use coder::{decode, encode, DecodeLimits, EncodeRet};
pub use dictionary::{Dictionary, ProbabilityStats};
pub use error::CoderError;
pub use esc::EscDictionary;
