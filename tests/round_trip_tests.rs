mod common;

use rstest::*;

use adaptive_range_coder::dictionary::adaptive::{AdaptiveConstructInfo, AdaptiveDictionary};
use adaptive_range_coder::dictionary::adaptive_a::AdaptiveADictionary;
use adaptive_range_coder::dictionary::adaptive_d::AdaptiveDDictionary;
use adaptive_range_coder::dictionary::contextual::*;
use adaptive_range_coder::dictionary::decreasing::{
    DecreasingCountDictionary, DecreasingOnUpdateDictionary,
};
use adaptive_range_coder::dictionary::ppm::PpmConstructInfo;
use adaptive_range_coder::dictionary::ppma::PpmADictionary;
use adaptive_range_coder::dictionary::ppmd::PpmDDictionary;
use adaptive_range_coder::dictionary::static_counts::StaticDictionary;
use adaptive_range_coder::dictionary::uniform::UniformDictionary;
use adaptive_range_coder::{decode, encode, DecodeLimits, Dictionary, WordOrd};
use itertools::Itertools;

use crate::common::*;

#[derive(Clone, Copy, Debug)]
enum Family {
    Uniform,
    AdaptiveA,
    AdaptiveD,
    Ratio,
    ContextualA,
    ContextualD,
    ContextualAImproved,
    ContextualDImproved,
    Ppma,
    Ppmd,
    Static,
    DecreasingOnUpdate,
}

fn round_trip<D: Dictionary>(ords: &[WordOrd], make_dict: impl Fn() -> D, bits_limited: bool) {
    let ret = encode(ords, &mut make_dict()).unwrap();
    assert_eq!(ret.words_count, ords.len());

    let (bytes, limits) = if bits_limited {
        (
            with_trailing_garbage(ret.sink),
            DecodeLimits::new(ret.words_count, ret.bits_encoded),
        )
    } else {
        (ret.sink, DecodeLimits::words(ret.words_count))
    };

    let decoded = decode(&bytes, &mut make_dict(), limits).unwrap();
    assert_eq!(decoded, ords);
}

fn run(family: Family, seed: u64, bits_limited: bool) {
    let max_ord = get_max_ord(seed);
    let ords = get_words(seed, max_ord);
    let word_bits = word_num_bits(max_ord);
    let ctx_info = ContextualConstructInfo::new(word_bits, 2, word_bits);
    let ppm_info = PpmConstructInfo::new(max_ord, 3);
    let counts = || ords.iter().copied().counts().into_iter().map(|(ord, cnt)| (ord, cnt as u64));

    match family {
        Family::Uniform => round_trip(&ords, || UniformDictionary::new(max_ord), bits_limited),
        Family::AdaptiveA => round_trip(&ords, || AdaptiveADictionary::new(max_ord), bits_limited),
        Family::AdaptiveD => round_trip(&ords, || AdaptiveDDictionary::new(max_ord), bits_limited),
        Family::Ratio => round_trip(
            &ords,
            || AdaptiveDictionary::new(AdaptiveConstructInfo { max_ord, ratio: 1 + seed % 7 }).unwrap(),
            bits_limited,
        ),
        Family::ContextualA => round_trip(
            &ords,
            || AdaptiveAContextualDictionary::new(ctx_info).unwrap(),
            bits_limited,
        ),
        Family::ContextualD => round_trip(
            &ords,
            || AdaptiveDContextualDictionary::new(ctx_info).unwrap(),
            bits_limited,
        ),
        Family::ContextualAImproved => round_trip(
            &ords,
            || AdaptiveAContextualDictionaryImproved::new(ctx_info).unwrap(),
            bits_limited,
        ),
        Family::ContextualDImproved => round_trip(
            &ords,
            || AdaptiveDContextualDictionaryImproved::new(ctx_info).unwrap(),
            bits_limited,
        ),
        Family::Ppma => round_trip(&ords, || PpmADictionary::new(ppm_info).unwrap(), bits_limited),
        Family::Ppmd => round_trip(&ords, || PpmDDictionary::new(ppm_info).unwrap(), bits_limited),
        Family::Static => round_trip(
            &ords,
            || StaticDictionary::new(max_ord, counts()),
            bits_limited,
        ),
        Family::DecreasingOnUpdate => round_trip(
            &ords,
            || DecreasingOnUpdateDictionary::new(max_ord, counts()),
            bits_limited,
        ),
    }
}

#[rstest]
#[case::uniform(Family::Uniform)]
#[case::adaptive_a(Family::AdaptiveA)]
#[case::adaptive_d(Family::AdaptiveD)]
#[case::ratio(Family::Ratio)]
#[case::contextual_a(Family::ContextualA)]
#[case::contextual_d(Family::ContextualD)]
#[case::contextual_a_improved(Family::ContextualAImproved)]
#[case::contextual_d_improved(Family::ContextualDImproved)]
#[case::ppma(Family::Ppma)]
#[case::ppmd(Family::Ppmd)]
#[case::static_counts(Family::Static)]
#[case::decreasing_on_update(Family::DecreasingOnUpdate)]
fn decoded_words_match_encoded_ones(#[case] family: Family, #[values(false, true)] bits_limited: bool) {
    for seed in 0..SEEDS {
        run(family, seed, bits_limited);
    }
}

#[test]
fn decreasing_values_round_trip() {
    let values = [200_u64, 150, 149, 20, 3, 1];
    let ret = encode(&values, &mut DecreasingCountDictionary::new(256)).unwrap();

    let decoded = decode(
        &ret.sink,
        &mut DecreasingCountDictionary::new(256),
        DecodeLimits::words(values.len()),
    )
    .unwrap();
    assert_eq!(decoded, values);
}

#[test]
fn single_word_alphabets_cost_nothing_but_the_tail() {
    let ords = vec![0; WORDS_LIST_LENGTH];
    let ret = encode(&ords, &mut AdaptiveDDictionary::new(1)).unwrap();
    assert_eq!(ret.bits_encoded, 2);

    let decoded = decode(&ret.sink, &mut AdaptiveDDictionary::new(1), DecodeLimits::words(ords.len()));
    assert_eq!(decoded.unwrap(), ords);
}

#[test]
fn context_models_beat_plain_ones_on_repetitive_input() {
    let ords = b"abracadabra ".repeat(40).into_iter().map(WordOrd::from).collect_vec();

    let plain = encode(&ords, &mut AdaptiveDDictionary::new(256)).unwrap();
    let ppmd = encode(&ords, &mut PpmDDictionary::new(PpmConstructInfo::new(256, 3)).unwrap()).unwrap();
    let contextual = encode(
        &ords,
        &mut AdaptiveDContextualDictionaryImproved::new(ContextualConstructInfo::new(8, 2, 8)).unwrap(),
    )
    .unwrap();

    assert!(ppmd.bits_encoded < plain.bits_encoded);
    assert!(contextual.bits_encoded < plain.bits_encoded);
}
