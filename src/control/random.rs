use std::ops::RangeInclusive;

use crate::synth::allocator::NoteSink;

/// Notes the random trigger picks from.
pub const RANDOM_NOTES: RangeInclusive<u8> = 48..=72;
/// How long a random note is held before it is released.
pub const RANDOM_HOLD_MS: u32 = 200;

/// One-shot random note, released automatically after a short hold.
#[derive(Debug)]
pub struct RandomTrigger {
    rng: fastrand::Rng,
    active: Option<u8>,
    started_ms: u32,
}

impl RandomTrigger {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
            active: None,
            started_ms: 0,
        }
    }

    /// Release the previous random note and play a fresh one with a click.
    pub fn trigger(&mut self, now_ms: u32, sink: &mut impl NoteSink) -> u8 {
        if let Some(previous) = self.active.take() {
            sink.note_off(previous);
        }
        let note = self.rng.u8(RANDOM_NOTES);
        sink.note_on(note);
        sink.click();
        self.active = Some(note);
        self.started_ms = now_ms;
        note
    }

    /// Release the random note once its hold time has passed.
    pub fn update(&mut self, now_ms: u32, sink: &mut impl NoteSink) {
        if let Some(note) = self.active {
            if now_ms.wrapping_sub(self.started_ms) > RANDOM_HOLD_MS {
                sink.note_off(note);
                self.active = None;
            }
        }
    }

    pub fn active_note(&self) -> Option<u8> {
        self.active
    }
}
