//! Benchmarks for the attack/sustain/release envelope.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use synthe::dsp::envelope::Envelope;

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f32 = 16_384.0;

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0u8; size];

        let mut env = Envelope::asr(500.0, 0.8, 300.0);
        env.note_on();
        group.bench_with_input(BenchmarkId::new("attack", size), &size, |b, _| {
            b.iter(|| {
                for level in buffer.iter_mut() {
                    *level = env.next(black_box(SAMPLE_RATE));
                }
                black_box(&buffer);
            })
        });

        let mut env = Envelope::asr(1.0, 0.8, 300.0);
        env.note_on();
        // Advance past attack
        for _ in 0..200 {
            env.next_sample(SAMPLE_RATE);
        }
        group.bench_with_input(BenchmarkId::new("sustain", size), &size, |b, _| {
            b.iter(|| {
                for level in buffer.iter_mut() {
                    *level = env.next(black_box(SAMPLE_RATE));
                }
                black_box(&buffer);
            })
        });
    }

    group.finish();
}
