use adaptive_range_coder::WordOrd;
use rand::prelude::{Distribution, SmallRng};
use rand::SeedableRng;
use rand_distr::Zipf;

pub mod decoder;
pub mod encoder;

/// Size of the list of words used to bench.
const WORDS_LIST_LENGTH: usize = 100_000;

/// Maximum value that the zipfian distribution can output.
const MAXIMUM_WORD: u64 = 256;

/// Context length of the PPM models.
const CTX_LENGTH: usize = 3;

/// Creates a sequence of [`WORDS_LIST_LENGTH`] words in `[0, MAXIMUM_WORD)`. Every word depends
/// on the previous one, so that the context models have something to learn.
pub fn get_words() -> Vec<WordOrd> {
    let mut rng = SmallRng::seed_from_u64(0);
    let distribution = Zipf::new(MAXIMUM_WORD, 1.0).unwrap();
    let mut words = Vec::with_capacity(WORDS_LIST_LENGTH);
    let mut previous = 0;

    for _ in 0..WORDS_LIST_LENGTH {
        let word = (previous + distribution.sample(&mut rng) as WordOrd - 1) % MAXIMUM_WORD;
        words.push(word);
        previous = word;
    }
    words
}
