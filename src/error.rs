use thiserror::Error;

use crate::WordOrd;

/// Errors raised while building dictionaries or while running the coding engines.
///
/// Fallible public functions return [`anyhow::Result`]; the variant can be recovered with
/// `err.downcast_ref::<CoderError>()`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoderError {
    #[error("context of {ctx_length} cells of {cell_bits} bits exceeds the {max_bits}-bit budget")]
    ContextTooLong {
        ctx_length: usize,
        cell_bits: u32,
        max_bits: u32,
    },

    #[error("context length {ctx_length} is too big for {count_num_bits}-bit counts")]
    PpmContextTooLong {
        ctx_length: usize,
        count_num_bits: u32,
    },

    #[error("invalid dictionary parameters: {0}")]
    InvalidParameters(&'static str),

    #[error("word {ord} is out of the alphabet [0, {max_ord})")]
    WordOutOfRange { ord: WordOrd, max_ord: WordOrd },

    #[error("decoded value is outside of the current range: the stream is corrupted or the dictionaries diverged")]
    ValueOutOfRange,

    #[error("dictionary returned an invalid interval [{low}, {high}) of {total}")]
    InvalidStats {
        low: String,
        high: String,
        total: String,
    },

    #[error("total {total} is zero or exceeds the quarter of a {num_bits}-bit range")]
    InvalidTotal { total: String, num_bits: u32 },

    #[error("session uses {expected}-bit ranges but the dictionary counts with {found} bits")]
    CountWidthMismatch { expected: u32, found: u32 },
}
