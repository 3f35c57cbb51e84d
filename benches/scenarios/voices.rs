//! Engine render benchmarks: silence, a single note and a full chord.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use synthe::{control::ManualClock, EngineConfig};

use crate::BLOCK_SIZES;

pub fn bench_voices(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voices");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0i16; size];

        for (name, chord) in [
            ("idle", &[][..]),
            ("single", &[69][..]),
            ("chord", &[60, 64, 67, 71][..]),
        ] {
            let (mut engine, mut controller) =
                synthe::engine(&EngineConfig::default(), ManualClock::new(0))
                    .expect("default config");
            controller.update_params(|p| p.wave_morph = 2.5);
            for &note in chord {
                controller.note_on(note);
            }
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    engine.render_block(black_box(&mut buffer));
                })
            });
        }
    }

    group.finish();
}
