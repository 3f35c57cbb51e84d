//! Low Frequency Oscillator (LFO) used as a modulation source.

use std::f32::consts::TAU;

/*
Low Frequency Oscillators
=========================

An LFO is the same phase accumulator as an audio oscillator, run at
sub-audio rates and used to move parameters instead of being heard.

Vocabulary
----------

  audio-rate      ~20 Hz to ~20 kHz. Produces the sound itself.

  control-rate    ~0.01 Hz to ~20 Hz. Moves other parameters over time.

  bipolar         Output swings -1.0 to +1.0. Natural for vibrato or a
                  filter sweep around a centre value.

Free-running
------------

The LFOs here are free-running: they never reset on note-on, so every note
catches the sweep at a different point. They are shared by all voices and
advanced exactly once per audio frame, which keeps every voice on the same
modulation phase.

    0.5 - 2 Hz      slow filter movement
    2 - 7 Hz        vibrato sweet spot
    > 15 Hz         approaching audio-rate territory
*/

/// Sine LFO with bipolar output.
#[derive(Debug, Clone, Copy)]
pub struct Lfo {
    phase: f32,
    frequency_hz: f32,
}

impl Lfo {
    pub fn new(frequency_hz: f32) -> Self {
        Self {
            phase: 0.0,
            frequency_hz: frequency_hz.max(0.0),
        }
    }

    pub fn set_frequency(&mut self, frequency_hz: f32) {
        self.frequency_hz = if frequency_hz.is_finite() {
            frequency_hz.max(0.0)
        } else {
            0.0
        };
    }

    pub fn frequency(&self) -> f32 {
        self.frequency_hz
    }

    /// Emit the current value in [-1, 1], then advance one sample.
    #[inline]
    pub fn next(&mut self, sample_rate: f32) -> f32 {
        let value = (TAU * self.phase).sin();
        self.phase += self.frequency_hz / sample_rate;
        self.phase -= self.phase.floor();
        value
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }
}
