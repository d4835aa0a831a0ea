use criterion::{black_box, criterion_group, BenchmarkId, Criterion, Throughput};
use pprof::criterion::{Output, PProfProfiler};

use adaptive_range_coder::dictionary::adaptive_d::AdaptiveDDictionary;
use adaptive_range_coder::dictionary::ppm::PpmConstructInfo;
use adaptive_range_coder::dictionary::ppmd::PpmDDictionary;
use adaptive_range_coder::encode;
use adaptive_range_coder::esc::{self, ppm::EscPpmDDictionary};

use crate::benchmarks::{get_words, CTX_LENGTH, MAXIMUM_WORD};

fn encoding_benchmark(c: &mut Criterion) {
    let words = get_words();
    let ppm_info = PpmConstructInfo::new(MAXIMUM_WORD, CTX_LENGTH);

    let mut group = c.benchmark_group("coder benchmark");
    group.throughput(Throughput::Elements(words.len() as u64));
    // PPM models are slow to update, so reduce the sample size.
    group.sample_size(10);

    group.bench_function(BenchmarkId::new("encoding", "adaptive-d"), |b| {
        b.iter(|| encode(black_box(&words), &mut AdaptiveDDictionary::new(MAXIMUM_WORD)).unwrap())
    });
    group.bench_function(BenchmarkId::new("encoding", "ppmd"), |b| {
        b.iter(|| encode(black_box(&words), &mut PpmDDictionary::new(ppm_info).unwrap()).unwrap())
    });
    group.bench_function(BenchmarkId::new("encoding", "esc-ppmd"), |b| {
        b.iter(|| {
            esc::encode(black_box(&words), &mut EscPpmDDictionary::new(ppm_info).unwrap()).unwrap()
        })
    });
    group.finish();
}

criterion_group! {
    name = encoder_benches;
    config = Criterion::default().with_profiler(PProfProfiler::new(100, Output::Flamegraph(None)));
    targets = encoding_benchmark
}
