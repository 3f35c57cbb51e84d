use crate::{
    sequencing::SequencerState,
    synth::feed::FEED_LEN,
    visual::spectrum::SPECTRUM_BINS,
};

/// Control-side state worth showing on a status screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Status {
    /// Glide target of the last-pressed held note, if any key is down.
    pub frequency_hz: Option<f32>,
    pub wave_morph: f32,
    pub filter_cutoff_hz: f32,
    pub filter_resonance: f32,
    pub env_attack_ms: f32,
    pub env_sustain: f32,
    pub env_release_ms: f32,
    pub transport: SequencerState,
    pub sequence_length: usize,
    pub active_voices: usize,
}

/// Everything a display needs for one refresh.
#[derive(Debug, Clone, Copy)]
pub struct DisplayFrame<'a> {
    pub status: Status,
    /// Most recent output, oldest first.
    pub waveform: &'a [i16; FEED_LEN],
    /// Level per bin in dB relative to full scale, DC first.
    pub spectrum: &'a [f32; SPECTRUM_BINS],
}

/// Sink for status refreshes, called at most every 50 ms.
pub trait StatusDisplay {
    fn show(&mut self, frame: &DisplayFrame<'_>);
}

/// Display for headless runs.
impl StatusDisplay for () {
    fn show(&mut self, _frame: &DisplayFrame<'_>) {}
}

/// Map a sample to a row in a plot `height` rows tall, 0 at the top.
pub fn waveform_row(sample: i16, height: u16) -> u16 {
    if height < 3 {
        return height / 2;
    }
    let half = (height / 2) as f32;
    let row = half - (sample as f32 / 32_768.0) * (half - 1.0);
    (row as u16).clamp(1, height - 2)
}
