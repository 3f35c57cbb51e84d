//! Benchmarks for the waveform morph.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use synthe::dsp::morph::{MorphPosition, Palette};

use crate::BLOCK_SIZES;

pub fn bench_morph(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/morph");
    let palette: Palette = [12_000, -8_000, 20_000, 32_767, -32_767];

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0i32; size];

        // Fixed position, the common case between pot moves
        let position = MorphPosition::new(2.5);
        group.bench_with_input(BenchmarkId::new("fixed", size), &size, |b, _| {
            b.iter(|| {
                for sample in buffer.iter_mut() {
                    *sample = position.mix(black_box(&palette));
                }
                black_box(&buffer);
            })
        });

        // Position recomputed every sample, as during a sweep
        group.bench_with_input(BenchmarkId::new("sweep", size), &size, |b, &size| {
            b.iter(|| {
                for (i, sample) in buffer.iter_mut().enumerate() {
                    let position = MorphPosition::new(4.0 * i as f32 / size as f32);
                    *sample = position.mix(black_box(&palette));
                }
                black_box(&buffer);
            })
        });
    }

    group.finish();
}
