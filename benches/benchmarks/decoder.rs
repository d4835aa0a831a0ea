use criterion::{black_box, criterion_group, BenchmarkId, Criterion, Throughput};
use pprof::criterion::{Output, PProfProfiler};

use adaptive_range_coder::dictionary::adaptive_d::AdaptiveDDictionary;
use adaptive_range_coder::dictionary::ppm::PpmConstructInfo;
use adaptive_range_coder::dictionary::ppmd::PpmDDictionary;
use adaptive_range_coder::esc::{self, ppm::EscPpmDDictionary};
use adaptive_range_coder::{decode, encode, DecodeLimits};

use crate::benchmarks::{get_words, CTX_LENGTH, MAXIMUM_WORD};

fn decode_benchmark(c: &mut Criterion) {
    let words = get_words();
    let ppm_info = PpmConstructInfo::new(MAXIMUM_WORD, CTX_LENGTH);

    let adaptive = encode(&words, &mut AdaptiveDDictionary::new(MAXIMUM_WORD)).unwrap();
    let ppmd = encode(&words, &mut PpmDDictionary::new(ppm_info).unwrap()).unwrap();
    let esc_ppmd = esc::encode(&words, &mut EscPpmDDictionary::new(ppm_info).unwrap()).unwrap();

    let mut group = c.benchmark_group("decoder benchmark");
    group.measurement_time(std::time::Duration::from_secs(10));
    group.throughput(Throughput::Elements(words.len() as u64));
    group.sample_size(10);

    group.bench_function(BenchmarkId::new("decoding", "adaptive-d"), |b| {
        b.iter(|| {
            let limits = DecodeLimits::new(adaptive.words_count, adaptive.bits_encoded);
            let mut dict = AdaptiveDDictionary::new(MAXIMUM_WORD);
            decode(black_box(&adaptive.sink), &mut dict, limits).unwrap()
        })
    });
    group.bench_function(BenchmarkId::new("decoding", "ppmd"), |b| {
        b.iter(|| {
            let limits = DecodeLimits::new(ppmd.words_count, ppmd.bits_encoded);
            let mut dict = PpmDDictionary::new(ppm_info).unwrap();
            decode(black_box(&ppmd.sink), &mut dict, limits).unwrap()
        })
    });
    group.bench_function(BenchmarkId::new("decoding", "esc-ppmd"), |b| {
        b.iter(|| {
            let limits = DecodeLimits::new(esc_ppmd.words_count, esc_ppmd.bits_encoded);
            let mut dict = EscPpmDDictionary::new(ppm_info).unwrap();
            esc::decode(black_box(&esc_ppmd.sink), &mut dict, limits).unwrap()
        })
    });
    group.finish();
}

criterion_group! {
    name = decoder_benches;
    config = Criterion::default().with_profiler(PProfProfiler::new(100, Output::Flamegraph(None)));
    targets = decode_benchmark
}
