//! Control-rate work: a playing sequence tick and a spectrum update.

use std::hint::black_box;

use criterion::Criterion;
use synthe::{
    control::ManualClock,
    synth::feed::FEED_LEN,
    visual::SpectrumAnalyzer,
    EngineConfig,
};

pub fn bench_control(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/control");

    let clock = ManualClock::new(0);
    let (_engine, mut controller) =
        synthe::engine(&EngineConfig::default(), clock.clone()).expect("default config");
    controller.begin_recording();
    for (i, note) in (60..72).enumerate() {
        clock.set(i as u32 * 40);
        controller.note_on(note);
        clock.set(i as u32 * 40 + 20);
        controller.note_off(note);
    }
    controller.end_recording();
    controller.start_playback();

    group.bench_function("sequencer_tick", |b| {
        b.iter(|| {
            clock.advance(8);
            controller.update_sequencer();
            black_box(controller.sequencer().playback_index());
        })
    });

    let mut analyzer = SpectrumAnalyzer::new(16_384.0);
    let samples: [i16; FEED_LEN] =
        std::array::from_fn(|i| ((i as f32 * 0.39).sin() * 20_000.0) as i16);
    group.bench_function("spectrum", |b| {
        b.iter(|| {
            analyzer.update(black_box(&samples));
            black_box(analyzer.peak_bin());
        })
    });

    group.finish();
}
