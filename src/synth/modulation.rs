use crate::dsp::lfo::Lfo;

/// Filter LFO rate as a fraction of the pitch LFO rate. Fixed so the two
/// sources stay phase-related.
pub const FILTER_LFO_RATIO: f32 = 0.75;

/// Modulation values for one audio frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Modulation {
    /// Pitch offset in semitones.
    pub pitch_semitones: f32,
    /// Cutoff offset in Hz.
    pub filter_hz: f32,
}

impl Modulation {
    /// `2^(semitones / 12)`, the factor applied to the filter cutoff.
    #[inline]
    pub fn pitch_factor(&self) -> f32 {
        (self.pitch_semitones / 12.0).exp2()
    }
}

/// The two LFOs every voice shares.
#[derive(Debug, Clone)]
pub struct ModulationBus {
    pitch: Lfo,
    filter: Lfo,
}

impl ModulationBus {
    pub fn new(rate_hz: f32) -> Self {
        let mut bus = Self {
            pitch: Lfo::new(0.0),
            filter: Lfo::new(0.0),
        };
        bus.set_rate(rate_hz);
        bus
    }

    pub fn set_rate(&mut self, rate_hz: f32) {
        self.pitch.set_frequency(rate_hz);
        self.filter.set_frequency(rate_hz * FILTER_LFO_RATIO);
    }

    pub fn pitch_rate(&self) -> f32 {
        self.pitch.frequency()
    }

    pub fn filter_rate(&self) -> f32 {
        self.filter.frequency()
    }

    /// Advance both LFOs by one frame and scale them by their depths.
    #[inline]
    pub fn tick(&mut self, sample_rate: f32, pitch_depth: f32, filter_depth: f32) -> Modulation {
        Modulation {
            pitch_semitones: self.pitch.next(sample_rate) * pitch_depth,
            filter_hz: self.filter.next(sample_rate) * filter_depth,
        }
    }
}
