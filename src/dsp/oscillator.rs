use std::f32::consts::TAU;

/*
Audio Oscillators
=================

Every voice carries four free-running oscillators that all track the same
frequency. The morph stage (see `dsp/morph.rs`) picks two of them and
crossfades, so all four have to advance every frame even when only one is
audible; otherwise phases would drift apart and a morph sweep would click.

Phase Accumulators
------------------

Each oscillator keeps a normalized phase in [0, 1):

    phase += frequency / sample_rate
    if phase >= 1.0 { phase -= 1.0 }

and maps that phase to a waveform:

    sine      sin(2π · phase)
    triangle  1 - 4·|phase - 0.5|       (starts at -1, peaks at phase 0.5)
    saw       2·phase - 1               (ramps up, snaps down)
    square    +1 for phase < 0.5, -1 after

Band-limiting the Square
------------------------

A naive square jumps instantly between ±1, which aliases badly at the low
sample rates small hardware runs at. We soften both edges with PolyBLEP
(polynomial band-limited step): a two-sample polynomial residual subtracted
around each discontinuity. It is cheap, branch-light and good enough for a
lead synth.

Output Scale
------------

All oscillators emit signed 16-bit scale integers (±OSC_PEAK) so the rest of
the voice chain can do the envelope multiply and shift in integer math.

Pulse Phasor
------------

The pulse wave is not an `Oscillator`: its duty cycle is modulated by the
morph position, so it needs the raw phase. `Phasor` is a 32-bit wrapping
accumulator; comparing its phase against `width · u32::MAX` gives a pulse of
any width without a lookup table.
*/

/// Peak magnitude of every oscillator output.
pub const OSC_PEAK: i32 = i16::MAX as i32;

/// The four oscillator shapes each voice carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
    Saw,
    Square,
}

impl Waveform {
    /// All waveforms in voice storage order.
    pub const ALL: [Waveform; 4] = [
        Waveform::Sine,
        Waveform::Triangle,
        Waveform::Saw,
        Waveform::Square,
    ];

    /// Slot of this waveform inside a voice's oscillator array.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Phase-accumulating oscillator for one waveform.
#[derive(Debug, Clone, Copy)]
pub struct Oscillator {
    waveform: Waveform,
    phase: f32,
    increment: f32,
}

impl Oscillator {
    pub fn new(waveform: Waveform) -> Self {
        Self {
            waveform,
            phase: 0.0,
            increment: 0.0,
        }
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Set the per-sample phase step from a frequency in Hz.
    ///
    /// Negative or non-finite frequencies stop the oscillator rather than
    /// running it backwards.
    #[inline]
    pub fn set_frequency(&mut self, frequency_hz: f32, sample_rate: f32) {
        let inc = frequency_hz / sample_rate;
        self.increment = if inc.is_finite() { inc.clamp(0.0, 0.5) } else { 0.0 };
    }

    /// Emit the sample for the current phase, then advance.
    #[inline]
    pub fn next(&mut self) -> i32 {
        let value = match self.waveform {
            Waveform::Sine => (TAU * self.phase).sin(),
            Waveform::Triangle => 1.0 - 4.0 * (self.phase - 0.5).abs(),
            Waveform::Saw => 2.0 * self.phase - 1.0,
            Waveform::Square => {
                let naive = if self.phase < 0.5 { 1.0 } else { -1.0 };
                let mut falling = self.phase + 0.5;
                if falling >= 1.0 {
                    falling -= 1.0;
                }
                naive + poly_blep(self.phase, self.increment) - poly_blep(falling, self.increment)
            }
        };

        self.phase += self.increment;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }

        (value.clamp(-1.0, 1.0) * OSC_PEAK as f32) as i32
    }
}

/// Two-sample polynomial correction around a unit step at phase 0.
#[inline]
fn poly_blep(phase: f32, increment: f32) -> f32 {
    if increment <= 0.0 {
        return 0.0;
    }
    if phase < increment {
        let t = phase / increment;
        t + t - t * t - 1.0
    } else if phase > 1.0 - increment {
        let t = (phase - 1.0) / increment;
        t * t + t + t + 1.0
    } else {
        0.0
    }
}

/// 32-bit wrapping phase ramp used for the variable-width pulse.
#[derive(Debug, Clone, Copy, Default)]
pub struct Phasor {
    phase: u32,
    increment: u32,
}

impl Phasor {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn set_frequency(&mut self, frequency_hz: f32, sample_rate: f32) {
        let ratio = frequency_hz / sample_rate;
        self.increment = if ratio.is_finite() {
            (ratio.clamp(0.0, 0.5) * u32::MAX as f32) as u32
        } else {
            0
        };
    }

    /// Current phase, then advance by one sample.
    #[inline]
    pub fn next(&mut self) -> u32 {
        let current = self.phase;
        self.phase = self.phase.wrapping_add(self.increment);
        current
    }
}

/// Pulse sample for a phasor phase and a duty cycle in (0, 1).
#[inline]
pub fn pulse_sample(phase: u32, width: f32) -> i32 {
    let threshold = (width.clamp(0.0, 1.0) * u32::MAX as f32) as u32;
    if phase < threshold {
        OSC_PEAK
    } else {
        -OSC_PEAK
    }
}
