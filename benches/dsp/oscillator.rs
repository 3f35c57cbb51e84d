//! Benchmarks for the phase-accumulator oscillators.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use synthe::dsp::oscillator::{pulse_sample, Oscillator, Phasor, Waveform};

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f32 = 16_384.0;

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0i32; size];

        for waveform in Waveform::ALL {
            let mut osc = Oscillator::new(waveform);
            osc.set_frequency(440.0, SAMPLE_RATE);
            group.bench_with_input(
                BenchmarkId::new(format!("{waveform:?}").to_lowercase(), size),
                &size,
                |b, _| {
                    b.iter(|| {
                        for sample in buffer.iter_mut() {
                            *sample = osc.next();
                        }
                        black_box(&buffer);
                    })
                },
            );
        }

        let mut phasor = Phasor::new();
        phasor.set_frequency(440.0, SAMPLE_RATE);
        group.bench_with_input(BenchmarkId::new("pulse", size), &size, |b, _| {
            b.iter(|| {
                for sample in buffer.iter_mut() {
                    *sample = pulse_sample(phasor.next(), black_box(0.3));
                }
                black_box(&buffer);
            })
        });
    }

    group.finish();
}
