use crate::MIN_TIME_MS;

/*
Attack/Sustain/Release Envelope
===============================

Each voice shapes its amplitude with a linear envelope. There is no separate
decay knob: attack ramps straight to the sustain level, which is held until
the gate goes low.

Vocabulary
----------

  level       Current output in [0.0, 1.0]. Exposed to the voice as an
              8-bit gain (0..=255) so the voice can multiply and shift.

  stage       Idle, Attack, Sustain or Release.

  gate        note_on raises it (Attack), note_off lowers it (Release).


The Shape
---------

  Level
    S   ┐     ╱‾‾‾‾‾‾‾‾‾‾‾‾‾‾╲
        │    ╱                ╲
        │   ╱                  ╲
    0.0 └──╱────────────────────╲──→ Time
         Attack    Sustain     Release

Attack climbs at a rate that would reach 1.0 in `attack_ms`, and stops at
the sustain level. With a low sustain the attack is therefore shorter than
`attack_ms`, which matches how small hardware envelopes with a zero decay
stage behave.


The State Machine
-----------------

    Idle ──note_on──→ Attack ──level = S──→ Sustain
      ↑                  │                     │
      │               note_off              note_off
      │                  ↓                     ↓
      └────level = 0── Release ←───────────────┘

note_off releases from whatever level the envelope is at, so releasing
during the attack does not click. note_on always restarts from zero for a
clean retrigger.

Times are re-read every sample, so the control context can move the knobs
while notes sound. A release already in progress keeps the length it was
started with.
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeState {
    Idle,    // Gate low, level = 0
    Attack,  // Ramping up towards sustain
    Sustain, // Holding while gate is high
    Release, // Gate went low, ramping down to 0
}

#[derive(Debug, Clone, Copy)]
pub struct Envelope {
    attack_ms: f32,
    sustain_level: f32,
    release_ms: f32,

    stage: EnvelopeState,
    level: f32,

    // Release is snapshot at note_off so it always lands exactly on 0.
    release_start_level: f32,
    release_total_samples: u32,
    release_elapsed_samples: u32,
}

impl Envelope {
    pub fn new() -> Self {
        Self::asr(25.0, 0.8, 300.0)
    }

    pub fn asr(attack_ms: f32, sustain: f32, release_ms: f32) -> Self {
        let mut env = Self {
            attack_ms: MIN_TIME_MS,
            sustain_level: 1.0,
            release_ms: MIN_TIME_MS,
            stage: EnvelopeState::Idle,
            level: 0.0,
            release_start_level: 0.0,
            release_total_samples: 1,
            release_elapsed_samples: 0,
        };
        env.set_shape(attack_ms, sustain, release_ms);
        env
    }

    /// Update the envelope times and sustain level.
    pub fn set_shape(&mut self, attack_ms: f32, sustain: f32, release_ms: f32) {
        self.attack_ms = attack_ms.max(MIN_TIME_MS);
        self.sustain_level = sustain.clamp(0.0, 1.0);
        self.release_ms = release_ms.max(MIN_TIME_MS);
    }

    /// Gate high: restart the attack from zero.
    pub fn note_on(&mut self) {
        self.level = 0.0;
        self.stage = EnvelopeState::Attack;
        self.release_elapsed_samples = 0;
    }

    /// Gate low: start the release from the current level.
    pub fn note_off(&mut self, sample_rate: f32) {
        if self.stage == EnvelopeState::Idle {
            return;
        }

        self.release_start_level = self.level;
        self.release_total_samples = (self.release_ms * 0.001 * sample_rate).round().max(1.0) as u32;
        self.release_elapsed_samples = 0;
        self.stage = EnvelopeState::Release;
    }

    /// Advance one sample and return the level as an 8-bit gain.
    pub fn next(&mut self, sample_rate: f32) -> u8 {
        self.next_sample(sample_rate);
        self.level_u8()
    }

    pub fn next_sample(&mut self, sample_rate: f32) {
        match self.stage {
            EnvelopeState::Idle => {
                self.level = 0.0;
            }

            EnvelopeState::Attack => {
                let increment = 1.0 / (self.attack_ms * 0.001 * sample_rate);
                self.level += increment;

                if self.level >= self.sustain_level {
                    self.level = self.sustain_level;
                    self.stage = EnvelopeState::Sustain;
                }
            }

            EnvelopeState::Sustain => {
                self.level = self.sustain_level;
            }

            EnvelopeState::Release => {
                let progress =
                    self.release_elapsed_samples as f32 / self.release_total_samples as f32;
                self.level = (self.release_start_level * (1.0 - progress)).max(0.0);

                self.release_elapsed_samples = self.release_elapsed_samples.saturating_add(1);

                if self.release_elapsed_samples >= self.release_total_samples {
                    self.level = 0.0;
                    self.stage = EnvelopeState::Idle;
                }
            }
        }

        debug_assert!((0.0..=1.0).contains(&self.level));
    }

    /// Returns true while the envelope is producing output.
    pub fn is_active(&self) -> bool {
        self.stage != EnvelopeState::Idle
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn level_u8(&self) -> u8 {
        (self.level * 255.0).round() as u8
    }

    pub fn state(&self) -> EnvelopeState {
        self.stage
    }
}

impl Default for Envelope {
    fn default() -> Self {
        Self::new()
    }
}
