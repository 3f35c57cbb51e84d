//! Benchmarks for the resonant low-pass.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use synthe::dsp::filter::LowPassFilter;

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f32 = 16_384.0;

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size)
            .map(|i| if i % 37 < 18 { 20_000.0 } else { -20_000.0 })
            .collect();
        let mut buffer = vec![0.0f32; size];

        let mut filter = LowPassFilter::new(1_200.0, SAMPLE_RATE);
        group.bench_with_input(BenchmarkId::new("static", size), &size, |b, _| {
            b.iter(|| {
                for (out, &x) in buffer.iter_mut().zip(&input) {
                    *out = filter.next(black_box(x));
                }
                black_box(&buffer);
            })
        });

        // Coefficients recomputed each sample, the way modulated voices run it
        let mut filter = LowPassFilter::new(1_200.0, SAMPLE_RATE);
        group.bench_with_input(BenchmarkId::new("modulated", size), &size, |b, _| {
            b.iter(|| {
                for (i, (out, &x)) in buffer.iter_mut().zip(&input).enumerate() {
                    let cutoff = 800.0 + (i % 64) as f32 * 20.0;
                    filter.set_cutoff_and_resonance(cutoff, 0.7, SAMPLE_RATE);
                    *out = filter.next(black_box(x));
                }
                black_box(&buffer);
            })
        });
    }

    group.finish();
}
