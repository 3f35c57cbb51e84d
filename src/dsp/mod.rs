//! Low-level DSP primitives used by the voice pipeline.
//!
//! These components are allocation-free and realtime-safe, so a fixed array
//! of voices can embed them directly. They stay focused on signal math; the
//! `synth` layer handles notes, modulation routing and mixing.

/// Attack/sustain/release envelope generator.
pub mod envelope;
/// Resonant state-variable low-pass.
pub mod filter;
/// Sine LFO used by the modulation bus.
pub mod lfo;
/// Five-shape waveform morph.
pub mod morph;
/// Phase-accumulator oscillators and the pulse phasor.
pub mod oscillator;

pub use envelope::EnvelopeState;
