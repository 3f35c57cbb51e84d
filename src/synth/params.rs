//! Patch parameters shared between the control and audio contexts.
//!
//! The control context is the only writer and the audio context the only
//! reader. Each field lives in its own `AtomicU32` holding the `f32` bit
//! pattern, so a frame may see a mix of old and new fields while the knobs
//! move. That costs at most one frame of stale modulation and never a lock.

use std::sync::{
    atomic::{AtomicU32, Ordering},
    Arc,
};

use serde::{Deserialize, Serialize};

use crate::{dsp::filter::MAX_RESONANCE, dsp::morph::MORPH_MAX, MIN_TIME_MS};

/// Fastest LFO rate the audio path accepts.
pub const MAX_LFO_RATE_HZ: f32 = 50.0;

/// Patch parameters in engineering units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthParams {
    /// Transpose in semitones, applied when a note starts.
    pub pitch_offset: f32,
    /// Morph position in [0, 4].
    pub wave_morph: f32,
    pub env_attack_ms: f32,
    /// Sustain level in [0, 1].
    pub env_sustain: f32,
    pub env_release_ms: f32,
    /// Pitch LFO rate. The filter LFO runs at 0.75x this.
    pub lfo_rate_hz: f32,
    /// Pitch LFO depth in semitones.
    pub lfo_depth_pitch: f32,
    /// Filter LFO depth in Hz.
    pub lfo_depth_filter: f32,
    pub filter_cutoff_hz: f32,
    pub filter_resonance: f32,
    pub master_gain: f32,
}

impl Default for SynthParams {
    fn default() -> Self {
        Self {
            pitch_offset: 0.0,
            wave_morph: 0.0,
            env_attack_ms: 25.0,
            env_sustain: 0.8,
            env_release_ms: 300.0,
            lfo_rate_hz: 4.0,
            lfo_depth_pitch: 0.3,
            lfo_depth_filter: 200.0,
            filter_cutoff_hz: 1200.0,
            filter_resonance: 0.7,
            master_gain: 0.7,
        }
    }
}

impl SynthParams {
    /// Copy with every field forced into its safe range.
    ///
    /// Values come from analog reads and config files, so the audio path
    /// runs this on every snapshot. Non-finite fields take their default.
    pub fn sanitized(&self) -> Self {
        let d = Self::default();
        let pick = |value: f32, fallback: f32| if value.is_finite() { value } else { fallback };

        Self {
            pitch_offset: pick(self.pitch_offset, d.pitch_offset).clamp(-48.0, 48.0),
            wave_morph: pick(self.wave_morph, d.wave_morph).clamp(0.0, MORPH_MAX),
            env_attack_ms: pick(self.env_attack_ms, d.env_attack_ms).max(MIN_TIME_MS),
            env_sustain: pick(self.env_sustain, d.env_sustain).clamp(0.0, 1.0),
            env_release_ms: pick(self.env_release_ms, d.env_release_ms).max(MIN_TIME_MS),
            lfo_rate_hz: pick(self.lfo_rate_hz, d.lfo_rate_hz).clamp(0.0, MAX_LFO_RATE_HZ),
            lfo_depth_pitch: pick(self.lfo_depth_pitch, d.lfo_depth_pitch).clamp(-12.0, 12.0),
            lfo_depth_filter: pick(self.lfo_depth_filter, d.lfo_depth_filter),
            filter_cutoff_hz: pick(self.filter_cutoff_hz, d.filter_cutoff_hz),
            filter_resonance: pick(self.filter_resonance, d.filter_resonance)
                .clamp(0.0, MAX_RESONANCE),
            master_gain: pick(self.master_gain, d.master_gain).clamp(0.0, 1.0),
        }
    }
}

#[derive(Debug)]
struct SharedParams {
    fields: [AtomicU32; FIELD_COUNT],
}

const FIELD_COUNT: usize = 11;

impl SharedParams {
    fn new(params: &SynthParams) -> Self {
        let shared = Self {
            fields: Default::default(),
        };
        shared.store(params);
        shared
    }

    fn store(&self, params: &SynthParams) {
        for (slot, value) in self.fields.iter().zip(to_array(params)) {
            slot.store(value.to_bits(), Ordering::Relaxed);
        }
    }

    fn load(&self) -> SynthParams {
        let mut values = [0.0f32; FIELD_COUNT];
        for (value, slot) in values.iter_mut().zip(&self.fields) {
            *value = f32::from_bits(slot.load(Ordering::Relaxed));
        }
        from_array(values)
    }
}

fn to_array(p: &SynthParams) -> [f32; FIELD_COUNT] {
    [
        p.pitch_offset,
        p.wave_morph,
        p.env_attack_ms,
        p.env_sustain,
        p.env_release_ms,
        p.lfo_rate_hz,
        p.lfo_depth_pitch,
        p.lfo_depth_filter,
        p.filter_cutoff_hz,
        p.filter_resonance,
        p.master_gain,
    ]
}

fn from_array(v: [f32; FIELD_COUNT]) -> SynthParams {
    SynthParams {
        pitch_offset: v[0],
        wave_morph: v[1],
        env_attack_ms: v[2],
        env_sustain: v[3],
        env_release_ms: v[4],
        lfo_rate_hz: v[5],
        lfo_depth_pitch: v[6],
        lfo_depth_filter: v[7],
        filter_cutoff_hz: v[8],
        filter_resonance: v[9],
        master_gain: v[10],
    }
}

/// Create the single writer/reader pair for a parameter block.
pub fn shared_params(initial: SynthParams) -> (ParamsWriter, ParamsReader) {
    let shared = Arc::new(SharedParams::new(&initial));
    (
        ParamsWriter {
            shared: Arc::clone(&shared),
            local: initial,
        },
        ParamsReader { shared },
    )
}

/// Control-side handle. Not `Clone`: there is exactly one writer.
#[derive(Debug)]
pub struct ParamsWriter {
    shared: Arc<SharedParams>,
    local: SynthParams,
}

impl ParamsWriter {
    /// The last values written by this context.
    pub fn get(&self) -> &SynthParams {
        &self.local
    }

    /// Edit the parameters and publish them.
    pub fn update(&mut self, edit: impl FnOnce(&mut SynthParams)) {
        edit(&mut self.local);
        self.shared.store(&self.local);
    }

    pub fn set(&mut self, params: SynthParams) {
        self.update(|p| *p = params);
    }
}

/// Audio-side handle. Not `Clone`: there is exactly one reader.
#[derive(Debug)]
pub struct ParamsReader {
    shared: Arc<SharedParams>,
}

impl ParamsReader {
    /// Load and sanitize the current parameter values.
    #[inline]
    pub fn snapshot(&self) -> SynthParams {
        self.shared.load().sanitized()
    }
}
