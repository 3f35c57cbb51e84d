use crate::dsp::{
    envelope::Envelope,
    filter::LowPassFilter,
    morph::{MorphPosition, Palette, PaletteSlot, PALETTE_LEN},
    oscillator::{pulse_sample, Oscillator, Phasor, Waveform, OSC_PEAK},
};

/// Fraction of the remaining distance to the target covered each frame.
pub const GLIDE_COEFFICIENT: f32 = 0.02;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    Free,      // Silent, envelope idle
    Active,    // Bound to a held note
    Releasing, // Gate low, release tail still sounding
}

/// Values shared by every voice for one audio frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameContext {
    pub sample_rate: f32,
    pub morph: MorphPosition,
    /// Already modulated and clamped.
    pub cutoff_hz: f32,
    pub resonance: f32,
    pub master_gain: f32,
    pub attack_ms: f32,
    pub sustain: f32,
    pub release_ms: f32,
}

/// One slot of the oscillator → envelope → filter chain.
#[derive(Debug, Clone)]
pub struct Voice {
    note: u8,
    active: bool,
    current_freq: f32,
    target_freq: f32,
    oscillators: [Oscillator; 4],
    pulse: Phasor,
    envelope: Envelope,
    filter: LowPassFilter,
}

impl Voice {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            note: 0,
            active: false,
            current_freq: 440.0,
            target_freq: 440.0,
            oscillators: Waveform::ALL.map(Oscillator::new),
            pulse: Phasor::new(),
            envelope: Envelope::new(),
            filter: LowPassFilter::new(1_200.0, sample_rate),
        }
    }

    /// Bind a note and restart the envelope. The pitch glides from wherever
    /// this slot was last sounding.
    pub fn start(&mut self, note: u8, frequency: f32) {
        self.note = note;
        self.target_freq = frequency;
        self.active = true;
        self.envelope.note_on();
    }

    pub fn release(&mut self, sample_rate: f32) {
        self.active = false;
        self.envelope.note_off(sample_rate);
    }

    /// Render one frame. Returns 0 without touching state when silent.
    pub fn render(&mut self, frame: &FrameContext) -> i32 {
        if !self.is_sounding() {
            return 0;
        }

        self.current_freq += (self.target_freq - self.current_freq) * GLIDE_COEFFICIENT;

        for osc in &mut self.oscillators {
            osc.set_frequency(self.current_freq, frame.sample_rate);
        }
        self.pulse.set_frequency(self.current_freq, frame.sample_rate);

        let mut palette: Palette = [0; PALETTE_LEN];
        palette[PaletteSlot::Sine as usize] = self.oscillators[Waveform::Sine.index()].next();
        palette[PaletteSlot::Triangle as usize] =
            self.oscillators[Waveform::Triangle.index()].next();
        palette[PaletteSlot::Saw as usize] = self.oscillators[Waveform::Saw.index()].next();
        palette[PaletteSlot::Square as usize] = self.oscillators[Waveform::Square.index()].next();
        palette[PaletteSlot::Pulse as usize] =
            pulse_sample(self.pulse.next(), frame.morph.pulse_width());

        let base = frame.morph.mix(&palette);

        self.envelope
            .set_shape(frame.attack_ms, frame.sustain, frame.release_ms);
        let gain = self.envelope.next(frame.sample_rate) as i32;
        let amplitude = (base * gain) >> 8;

        self.filter
            .set_cutoff_and_resonance(frame.cutoff_hz, frame.resonance, frame.sample_rate);
        let filtered = self
            .filter
            .next(amplitude as f32)
            .clamp(-(OSC_PEAK as f32), OSC_PEAK as f32);

        (filtered * frame.master_gain) as i32
    }

    /// True while the envelope has not settled to idle.
    pub fn is_sounding(&self) -> bool {
        self.envelope.is_active()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn state(&self) -> VoiceState {
        match (self.active, self.is_sounding()) {
            (true, _) => VoiceState::Active,
            (false, true) => VoiceState::Releasing,
            (false, false) => VoiceState::Free,
        }
    }

    pub fn note(&self) -> u8 {
        self.note
    }

    pub fn current_frequency(&self) -> f32 {
        self.current_freq
    }

    /// Cutoff the filter was last tuned to.
    pub fn cutoff_hz(&self) -> f32 {
        self.filter.cutoff_hz()
    }

    pub fn target_frequency(&self) -> f32 {
        self.target_freq
    }

    pub fn envelope_level(&self) -> f32 {
        self.envelope.level()
    }
}
