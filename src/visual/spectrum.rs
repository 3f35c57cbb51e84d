//! Spectrum of the visualization feed.
//!
//! One FFT over the whole ring, Hamming windowed, linear bins from DC to
//! Nyquist. Buffers are sized at construction, so recomputing never
//! allocates.

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::sync::Arc;

use crate::{dsp::oscillator::OSC_PEAK, synth::feed::FEED_LEN};

/// Bins below Nyquist.
pub const SPECTRUM_BINS: usize = FEED_LEN / 2;

/// Floor reported for silent bins.
pub const SILENCE_DB: f32 = -120.0;

pub struct SpectrumAnalyzer {
    /// Hamming window coefficients
    window: [f32; FEED_LEN],
    fft: Arc<dyn Fft<f32>>,
    scratch: Vec<Complex<f32>>,
    fft_scratch: Vec<Complex<f32>>,
    magnitudes: [f32; SPECTRUM_BINS],
    levels_db: [f32; SPECTRUM_BINS],
    sample_rate: f32,
    /// Magnitude of a full-scale sine after windowing.
    full_scale: f32,
}

impl SpectrumAnalyzer {
    pub fn new(sample_rate: f32) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(FEED_LEN);

        let denom = (FEED_LEN - 1) as f32;
        let window: [f32; FEED_LEN] = std::array::from_fn(|i| {
            0.54 - 0.46 * (2.0 * std::f32::consts::PI * i as f32 / denom).cos()
        });
        let coherent_gain = window.iter().sum::<f32>() / FEED_LEN as f32;

        Self {
            window,
            fft_scratch: vec![Complex::new(0.0, 0.0); fft.get_inplace_scratch_len()],
            fft,
            scratch: vec![Complex::new(0.0, 0.0); FEED_LEN],
            magnitudes: [0.0; SPECTRUM_BINS],
            levels_db: [SILENCE_DB; SPECTRUM_BINS],
            sample_rate,
            full_scale: OSC_PEAK as f32 * coherent_gain * FEED_LEN as f32 / 2.0,
        }
    }

    /// Recompute magnitudes from a feed snapshot, oldest sample first.
    pub fn update(&mut self, samples: &[i16; FEED_LEN]) {
        for ((bin, &sample), &w) in self.scratch.iter_mut().zip(samples).zip(&self.window) {
            *bin = Complex::new(sample as f32 * w, 0.0);
        }

        self.fft
            .process_with_scratch(&mut self.scratch, &mut self.fft_scratch);

        for ((magnitude, level), bin) in self
            .magnitudes
            .iter_mut()
            .zip(self.levels_db.iter_mut())
            .zip(&self.scratch)
        {
            *magnitude = bin.norm();
            *level = if *magnitude > 0.0 {
                (20.0 * (*magnitude / self.full_scale).log10()).max(SILENCE_DB)
            } else {
                SILENCE_DB
            };
        }
    }

    /// Raw magnitudes, in sample units, per bin.
    pub fn magnitudes(&self) -> &[f32; SPECTRUM_BINS] {
        &self.magnitudes
    }

    /// Centre frequency of `bin` in Hz.
    pub fn bin_frequency(&self, bin: usize) -> f32 {
        bin as f32 * self.sample_rate / FEED_LEN as f32
    }

    /// Per-bin level in dB relative to a full-scale sine.
    pub fn levels_db(&self) -> &[f32; SPECTRUM_BINS] {
        &self.levels_db
    }

    pub fn level_db(&self, bin: usize) -> f32 {
        self.levels_db.get(bin).copied().unwrap_or(SILENCE_DB)
    }

    /// Loudest bin above DC, if anything is sounding.
    pub fn peak_bin(&self) -> Option<usize> {
        self.magnitudes
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(_, m)| **m > 0.0)
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
    }
}
