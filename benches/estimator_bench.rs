//! Performance benchmarks for the GCC-PHAT pipeline

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;
use tdoa_dsp::dsp::fft::Radix2Fft;
use tdoa_dsp::{estimate_delays, EstimatorConfig, GccPhatEstimator};

fn synthetic_pair(len: usize, delay: usize) -> (Vec<f32>, Vec<f32>) {
    let mut rng = StdRng::seed_from_u64(42);
    let base: Vec<f32> = (0..len + delay).map(|_| rng.random_range(-1.0f32..1.0)).collect();
    (base[..len].to_vec(), base[delay..].to_vec())
}

fn bench_block_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("block_pass");
    for block_size in [1024usize, 4096, 16384] {
        let (left, right) = synthetic_pair(block_size, 17);
        let config = EstimatorConfig {
            block_size,
            ..Default::default()
        };
        let mut estimator = GccPhatEstimator::new(config).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(block_size), &block_size, |b, _| {
            b.iter(|| estimator.process_frame(black_box(&left), black_box(&right)).unwrap());
        });
    }
    group.finish();
}

fn bench_fft(c: &mut Criterion) {
    let n = 4096;
    let (signal, _) = synthetic_pair(n, 0);

    let fft = Radix2Fft::new(n).unwrap();
    c.bench_function("radix2_forward_4096", |b| {
        b.iter(|| {
            let mut re = signal.clone();
            let mut im = vec![0.0f32; n];
            fft.forward(black_box(&mut re), black_box(&mut im));
        });
    });

    let reference = FftPlanner::<f32>::new().plan_fft_forward(n);
    c.bench_function("rustfft_forward_4096", |b| {
        b.iter(|| {
            let mut buffer: Vec<Complex<f32>> = signal.iter().map(|&x| Complex::new(x, 0.0)).collect();
            reference.process(black_box(&mut buffer));
        });
    });
}

fn bench_estimate_delays_10s(c: &mut Criterion) {
    let (left, right) = synthetic_pair(48000 * 10, 9);
    let config = EstimatorConfig::default();

    c.bench_function("estimate_delays_10s", |b| {
        b.iter(|| {
            let _ = estimate_delays(black_box(&left), black_box(&right), black_box(config.clone()));
        });
    });
}

criterion_group!(benches, bench_block_pass, bench_fft, bench_estimate_delays_10s);
criterion_main!(benches);
