use std::ops::Neg;

use itertools::Itertools;

use crate::WordOrd;

/// Order-0 empirical entropy, in bits per symbol, of the given frequencies.
pub fn entropy(freqs: impl IntoIterator<Item = usize>) -> f64 {
    let freqs = freqs.into_iter().filter(|&freq| freq > 0).collect_vec();
    let total = freqs.iter().sum::<usize>() as f64;

    let mut entropy = 0.0;
    for freq in freqs {
        let pr = freq as f64 / total;
        entropy += pr * f64::log2(pr);
    }
    entropy.neg()
}

/// Given the real distribution P and a model Q over the same alphabet, calculates
/// ```text
/// cross-entropy(P|Q) = - ∑ p(x) * log(q(x))
/// ```
///
/// # Panics
/// Panics if the two distributions have different lengths.
pub fn cross_entropy(distr: &[usize], other_distr: &[usize]) -> f64 {
    assert_eq!(distr.len(), other_distr.len(), "Distr must have same length!");
    let m = distr.iter().sum::<usize>() as f64;
    let other_m = other_distr.iter().sum::<usize>() as f64;

    let mut cross_entropy = 0.0;
    for (&freq, &other_freq) in distr.iter().zip(other_distr) {
        if freq == 0 {
            continue;
        }
        cross_entropy += freq as f64 / m * f64::log2(other_freq as f64 / other_m);
    }
    cross_entropy.neg()
}

/// Order-0 empirical entropy of a sequence of words.
pub fn words_entropy(ords: &[WordOrd]) -> f64 {
    entropy(ords.iter().counts().into_values())
}

/// The least number of bits an order-0 model needs for `ords`.
pub fn order0_bound_bits(ords: &[WordOrd]) -> f64 {
    words_entropy(ords) * ords.len() as f64
}
