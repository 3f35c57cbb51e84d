use std::f32::consts::PI;

/*
Per-voice Resonant Low-pass
===========================

Each voice owns one of these, so two held notes never share filter memory
and a bright note cannot smear into a dark one.

The topology is a trapezoidal state-variable filter (two integrators with
memories ic1eq/ic2eq). Only the low-pass tap is used. It stays stable under
per-sample cutoff changes, which matters because the cutoff is modulated by
two LFOs every frame.

    g = tan(π · cutoff / sample_rate)      integrator gain
    k = 2 - 2 · resonance                  damping

resonance 0 gives k = 2 (no peak), resonance → 1 drives k → 0 (self
oscillation). Callers clamp resonance below 1 and cutoff below Nyquist.
*/

/// Highest resonance accepted before the filter is allowed to ring forever.
pub const MAX_RESONANCE: f32 = 0.98;

#[derive(Debug, Clone, Copy)]
pub struct LowPassFilter {
    ic1eq: f32, // First integrator's memory
    ic2eq: f32, // Second integrator's memory

    cutoff_hz: f32,
    resonance: f32,
    g: f32,
    k: f32,
}

impl LowPassFilter {
    pub fn new(cutoff_hz: f32, sample_rate: f32) -> Self {
        let mut filter = Self {
            ic1eq: 0.0,
            ic2eq: 0.0,
            cutoff_hz,
            resonance: 0.0,
            g: 0.0,
            k: 2.0,
        };
        filter.set_cutoff_and_resonance(cutoff_hz, 0.0, sample_rate);
        filter
    }

    /// Recompute coefficients. Cutoff is kept below 0.49 · sample rate.
    pub fn set_cutoff_and_resonance(&mut self, cutoff_hz: f32, resonance: f32, sample_rate: f32) {
        let nyquist_guard = sample_rate * 0.49;
        self.cutoff_hz = cutoff_hz.clamp(1.0, nyquist_guard);
        self.resonance = resonance.clamp(0.0, MAX_RESONANCE);
        self.g = (PI * self.cutoff_hz / sample_rate).tan();
        self.k = 2.0 - 2.0 * self.resonance;
    }

    #[inline]
    pub fn next(&mut self, sample: f32) -> f32 {
        let h = 1.0 / (1.0 + self.g * (self.g + self.k));
        let v3 = sample - self.ic2eq;
        let v1 = h * (self.ic1eq + self.g * v3);
        let v2 = self.ic2eq + self.g * v1;

        self.ic1eq = 2.0 * v1 - self.ic1eq;
        self.ic2eq = 2.0 * v2 - self.ic2eq;

        v2
    }

    pub fn cutoff_hz(&self) -> f32 {
        self.cutoff_hz
    }

    pub fn resonance(&self) -> f32 {
        self.resonance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::oscillator::{Oscillator, Waveform};

    const SAMPLE_RATE: f32 = 16_384.0;

    fn peak_after_transient(buffer: &[f32]) -> f32 {
        let skip = buffer.len().min(64);
        buffer[skip..].iter().fold(0.0f32, |acc, &x| acc.max(x.abs()))
    }

    fn filtered_sine(filter: &mut LowPassFilter, freq: f32, samples: usize) -> Vec<f32> {
        let mut osc = Oscillator::new(Waveform::Sine);
        osc.set_frequency(freq, SAMPLE_RATE);
        (0..samples)
            .map(|_| filter.next(osc.next() as f32 / i16::MAX as f32))
            .collect()
    }

    #[test]
    fn passes_dc() {
        let mut filter = LowPassFilter::new(500.0, SAMPLE_RATE);
        let mut last = 0.0;
        for _ in 0..256 {
            last = filter.next(1.0);
        }
        assert!(last > 0.99, "got {last}");
    }

    #[test]
    fn attenuates_above_cutoff() {
        let mut filter = LowPassFilter::new(300.0, SAMPLE_RATE);
        let buffer = filtered_sine(&mut filter, 3_000.0, 512);
        let peak = peak_after_transient(&buffer);
        assert!(peak < 0.05, "expected high freq attenuation, got peak: {peak}");
    }

    #[test]
    fn resonance_boosts_cutoff_region() {
        let cutoff = 1_000.0;

        let mut flat = LowPassFilter::new(cutoff, SAMPLE_RATE);
        flat.set_cutoff_and_resonance(cutoff, 0.1, SAMPLE_RATE);
        let flat_peak = peak_after_transient(&filtered_sine(&mut flat, cutoff, 1024));

        let mut peaky = LowPassFilter::new(cutoff, SAMPLE_RATE);
        peaky.set_cutoff_and_resonance(cutoff, 0.9, SAMPLE_RATE);
        let peaky_peak = peak_after_transient(&filtered_sine(&mut peaky, cutoff, 1024));

        assert!(
            peaky_peak > flat_peak * 2.0,
            "resonance should boost signal: flat={flat_peak}, peaky={peaky_peak}"
        );
    }

    #[test]
    fn coefficients_are_clamped() {
        let mut filter = LowPassFilter::new(1_000.0, SAMPLE_RATE);
        filter.set_cutoff_and_resonance(50_000.0, 3.0, SAMPLE_RATE);
        assert!(filter.cutoff_hz() < SAMPLE_RATE * 0.5);
        assert_eq!(filter.resonance(), MAX_RESONANCE);
        for _ in 0..4_096 {
            assert!(filter.next(1.0).is_finite());
        }
    }
}
