/*
 * Utility functions and consts used by the tests.
 *
 */
#![allow(dead_code)]

use adaptive_range_coder::WordOrd;
use rand::prelude::{Distribution, SmallRng};
use rand::{Rng, SeedableRng};
use rand_distr::Zipf;

/// How many seeds every round trip is run with.
pub const SEEDS: u64 = 50;
/// Size of the list of words used to test.
pub const WORDS_LIST_LENGTH: usize = 250;
/// Alphabets are drawn from `[1, MAXIMUM_ALPHABET)`.
pub const MAXIMUM_ALPHABET: WordOrd = 256;

/// Picks the alphabet size of a test run.
pub fn get_max_ord(seed: u64) -> WordOrd {
    SmallRng::seed_from_u64(seed).gen_range(1..MAXIMUM_ALPHABET)
}

/// Creates a sequence of [`WORDS_LIST_LENGTH`] words uniformly sampled from `[0, max_ord)`.
pub fn get_uniform_words(seed: u64, max_ord: WordOrd) -> Vec<WordOrd> {
    let mut rng = SmallRng::seed_from_u64(seed ^ 0x5eed);
    (0..WORDS_LIST_LENGTH)
        .map(|_| rng.gen_range(0..max_ord))
        .collect()
}

/// Creates a sequence of [`WORDS_LIST_LENGTH`] words sampled from a Zipfian distribution over
/// `[0, max_ord)`, so that a few words dominate.
pub fn get_zipf_words(seed: u64, max_ord: WordOrd) -> Vec<WordOrd> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let distribution = Zipf::new(max_ord, 1.0).unwrap();

    (0..WORDS_LIST_LENGTH)
        .map(|_| distribution.sample(&mut rng) as WordOrd - 1)
        .collect()
}

/// Half of the seeds get skewed sequences, the other half uniform ones.
pub fn get_words(seed: u64, max_ord: WordOrd) -> Vec<WordOrd> {
    if seed % 2 == 0 {
        get_zipf_words(seed, max_ord)
    } else {
        get_uniform_words(seed, max_ord)
    }
}

/// Smallest number of bits able to represent every word of `[0, max_ord)`.
pub fn word_num_bits(max_ord: WordOrd) -> u32 {
    (WordOrd::BITS - (max_ord - 1).leading_zeros()).max(1)
}

/// Garbage appended after a stream, which a bit limited decoder must never read.
pub fn with_trailing_garbage(mut bytes: Vec<u8>) -> Vec<u8> {
    bytes.extend([0xA5; 16]);
    bytes
}
