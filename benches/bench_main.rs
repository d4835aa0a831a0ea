use criterion::criterion_main;

mod benchmarks;

criterion_main! {
    benchmarks::encoder::encoder_benches,
    benchmarks::decoder::decoder_benches,
}
