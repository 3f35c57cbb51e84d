use rtrb::Consumer;

use crate::{
    dsp::morph::MorphPosition,
    synth::{
        click::ClickOverlay,
        feed::FeedWriter,
        message::{CommandReceiver, VoiceCommand},
        modulation::ModulationBus,
        params::{ParamsReader, SynthParams},
        voice::{FrameContext, Voice, VoiceState},
    },
    POLY_VOICES,
};

/// Lowest cutoff the per-voice filters are driven to.
pub const CUTOFF_MIN_HZ: f32 = 40.0;
/// Highest cutoff the per-voice filters are driven to.
pub const CUTOFF_MAX_HZ: f32 = 5_000.0;
/// Output range after mixing; the click is clamped to it too.
pub const OUTPUT_LIMIT: i32 = i16::MAX as i32;

/// Audio-rate half of the synthesizer.
///
/// Owns every piece of state the per-sample path touches. `render_frame`
/// is allocation-free and never blocks: commands arrive through a wait-free
/// queue and parameters through atomics.
pub struct AudioEngine {
    sample_rate: f32,
    voices: [Voice; POLY_VOICES],
    modulation: ModulationBus,
    click: ClickOverlay,
    rx: Consumer<VoiceCommand>,
    params: ParamsReader,
    feed: FeedWriter,
    frame_counter: u64,
}

impl AudioEngine {
    pub(crate) fn new(
        sample_rate: f32,
        rx: Consumer<VoiceCommand>,
        params: ParamsReader,
        feed: FeedWriter,
    ) -> Self {
        let initial = params.snapshot();
        Self {
            sample_rate,
            voices: std::array::from_fn(|_| Voice::new(sample_rate)),
            modulation: ModulationBus::new(initial.lfo_rate_hz),
            click: ClickOverlay::new(sample_rate),
            rx,
            params,
            feed,
            frame_counter: 0,
        }
    }

    /// Produce the next output sample.
    pub fn render_frame(&mut self) -> i16 {
        self.drain_commands();

        let params = self.params.snapshot();
        let frame = self.frame_context(&params);

        let mut mix: i32 = 0;
        for voice in &mut self.voices {
            mix += voice.render(&frame);
        }
        let mut out = mix.clamp(-OUTPUT_LIMIT, OUTPUT_LIMIT);

        if self.click.is_active() {
            out = (out + self.click.next()).clamp(-OUTPUT_LIMIT, OUTPUT_LIMIT);
        }

        let sample = out as i16;
        self.feed.push(sample);
        self.frame_counter += 1;
        sample
    }

    /// Render consecutive frames into `out`.
    pub fn render_block(&mut self, out: &mut [i16]) {
        for sample in out.iter_mut() {
            *sample = self.render_frame();
        }
    }

    /// Arm the click overlay directly from the audio context.
    pub fn trigger_click(&mut self) {
        self.click.trigger();
    }

    fn drain_commands(&mut self) {
        while let Some(command) = CommandReceiver::pop(&mut self.rx) {
            match command {
                VoiceCommand::Start {
                    slot,
                    note,
                    frequency,
                } => {
                    if let Some(voice) = self.voices.get_mut(slot) {
                        voice.start(note, frequency);
                    }
                }
                VoiceCommand::Release { slot } => {
                    if let Some(voice) = self.voices.get_mut(slot) {
                        voice.release(self.sample_rate);
                    }
                }
                VoiceCommand::Click => self.click.trigger(),
            }
        }
    }

    fn frame_context(&mut self, params: &SynthParams) -> FrameContext {
        self.modulation.set_rate(params.lfo_rate_hz);
        let modulation = self.modulation.tick(
            self.sample_rate,
            params.lfo_depth_pitch,
            params.lfo_depth_filter,
        );

        let upper = CUTOFF_MAX_HZ.min(self.sample_rate * 0.45);
        let cutoff = ((params.filter_cutoff_hz + modulation.filter_hz) * modulation.pitch_factor())
            .clamp(CUTOFF_MIN_HZ, upper);

        FrameContext {
            sample_rate: self.sample_rate,
            morph: MorphPosition::new(params.wave_morph),
            cutoff_hz: cutoff,
            resonance: params.filter_resonance,
            master_gain: params.master_gain,
            attack_ms: params.env_attack_ms,
            sustain: params.env_sustain,
            release_ms: params.env_release_ms,
        }
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn voices(&self) -> &[Voice; POLY_VOICES] {
        &self.voices
    }

    /// Voices whose envelope is still producing output.
    pub fn sounding_voices(&self) -> usize {
        self.voices.iter().filter(|v| v.is_sounding()).count()
    }

    pub fn voice_state(&self, slot: usize) -> Option<VoiceState> {
        self.voices.get(slot).map(Voice::state)
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frame_counter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        control::{Controller, ManualClock},
        synth::feed::FEED_LEN,
        EngineConfig,
    };

    fn pair() -> (AudioEngine, Controller<ManualClock>) {
        crate::engine(&EngineConfig::default(), ManualClock::new(0)).unwrap()
    }

    fn render(engine: &mut AudioEngine, frames: usize) -> Vec<i16> {
        (0..frames).map(|_| engine.render_frame()).collect()
    }

    #[test]
    fn idle_engine_is_silent() {
        let (mut engine, _controller) = pair();
        assert!(render(&mut engine, 256).iter().all(|&s| s == 0));
        assert_eq!(engine.frames_rendered(), 256);
    }

    #[test]
    fn click_over_silence() {
        let (mut engine, mut controller) = pair();
        controller.trigger_click();

        let out = render(&mut engine, 50);
        assert_eq!(out[0], -6_000);
        assert_eq!(out[1], (6_000.0 * 39.0 / 40.0) as i16);
        assert!(out[2] < 0);
        assert!(out[40..].iter().all(|&s| s == 0));
    }

    #[test]
    fn voice_count_settles_after_release() {
        let (mut engine, mut controller) = pair();
        controller.note_on(60);
        controller.note_on(64);
        render(&mut engine, 512);
        assert_eq!(engine.sounding_voices(), 2);
        assert_eq!(engine.voice_state(0), Some(VoiceState::Active));

        controller.note_off(60);
        controller.note_off(64);
        render(&mut engine, 1);
        assert_eq!(engine.voice_state(0), Some(VoiceState::Releasing));

        let one_second = engine.sample_rate() as usize;
        render(&mut engine, one_second);
        assert_eq!(engine.sounding_voices(), 0);
        assert_eq!(engine.voice_state(1), Some(VoiceState::Free));
    }

    #[test]
    fn never_more_than_poly_voices() {
        let (mut engine, mut controller) = pair();
        for note in [48, 52, 55, 59, 62, 65] {
            controller.note_on(note);
            render(&mut engine, 64);
        }
        assert_eq!(engine.sounding_voices(), POLY_VOICES);
        assert_eq!(engine.voices()[0].note(), 65);
    }

    #[test]
    fn loud_chord_is_clamped() {
        let (mut engine, mut controller) = pair();
        controller.update_params(|p| {
            p.master_gain = 1.0;
            p.wave_morph = 4.0;
            p.filter_cutoff_hz = 5_000.0;
            p.env_attack_ms = 1.0;
            p.env_sustain = 1.0;
        });
        for note in [36, 36 + 12, 36 + 19, 36 + 24] {
            controller.note_on(note);
        }
        controller.trigger_click();

        let out = render(&mut engine, 4_096);
        assert!(out.iter().all(|&s| s >= -(OUTPUT_LIMIT as i16)));
        assert!(out.iter().any(|&s| s.unsigned_abs() > 10_000));
    }

    #[test]
    fn feed_mirrors_output() {
        let (mut engine, mut controller) = pair();
        controller.note_on(69);
        let out = render(&mut engine, FEED_LEN * 2 + 5);

        let mut snapshot = [0i16; FEED_LEN];
        controller.feed().snapshot(&mut snapshot);
        assert_eq!(&snapshot[..], &out[out.len() - FEED_LEN..]);
    }

    #[test]
    fn glide_reaches_target() {
        let (mut engine, mut controller) = pair();
        controller.note_on(81);
        render(&mut engine, 2_000);
        let voice = &engine.voices()[0];
        assert!((voice.current_frequency() - 880.0).abs() < 0.5);
    }

    /// Cutoff range the voices see over `frames` frames of a fixed patch.
    fn cutoff_span(engine: &mut AudioEngine, params: &SynthParams, frames: usize) -> (f32, f32) {
        (0..frames)
            .map(|_| engine.frame_context(params).cutoff_hz)
            .fold((f32::MAX, f32::MIN), |(lo, hi), c| (lo.min(c), hi.max(c)))
    }

    fn static_patch(cutoff: f32, pitch_depth: f32, filter_depth: f32) -> SynthParams {
        SynthParams {
            filter_cutoff_hz: cutoff,
            lfo_depth_pitch: pitch_depth,
            lfo_depth_filter: filter_depth,
            ..SynthParams::default()
        }
    }

    #[test]
    fn filter_lfo_swings_around_base_cutoff() {
        let (mut engine, _controller) = pair();
        // 3 Hz filter LFO: one period is under 6000 frames at 16384 Hz
        let (lo, hi) = cutoff_span(&mut engine, &static_patch(1_200.0, 0.0, 400.0), 6_000);
        assert!((lo - 800.0).abs() < 2.0, "lo = {lo}");
        assert!((hi - 1_600.0).abs() < 2.0, "hi = {hi}");
    }

    #[test]
    fn pitch_lfo_scales_cutoff_by_octaves() {
        let (mut engine, _controller) = pair();
        let (lo, hi) = cutoff_span(&mut engine, &static_patch(1_000.0, 12.0, 0.0), 6_000);
        assert!((lo - 500.0).abs() < 1.0, "lo = {lo}");
        assert!((hi - 2_000.0).abs() < 2.0, "hi = {hi}");
    }

    #[test]
    fn cutoff_stays_in_band() {
        let (mut engine, _controller) = pair();
        let (lo, hi) = cutoff_span(&mut engine, &static_patch(20_000.0, 12.0, 5_000.0), 6_000);
        assert_eq!((lo, hi), (CUTOFF_MAX_HZ, CUTOFF_MAX_HZ));

        let (lo, hi) = cutoff_span(&mut engine, &static_patch(-500.0, 12.0, 100.0), 6_000);
        assert_eq!((lo, hi), (CUTOFF_MIN_HZ, CUTOFF_MIN_HZ));

        // Low sample rates pull the ceiling under 0.45 x sample rate
        let config = EngineConfig::default().with_sample_rate(8_000.0);
        let (mut engine, _controller) = crate::engine(&config, ManualClock::new(0)).unwrap();
        let (_, hi) = cutoff_span(&mut engine, &static_patch(4_800.0, 0.0, 0.0), 16);
        assert!((hi - 3_600.0).abs() < 0.01, "hi = {hi}");
    }

    #[test]
    fn voices_follow_the_modulated_cutoff() {
        let (mut engine, mut controller) = pair();
        controller.update_params(|p| {
            p.filter_cutoff_hz = 20_000.0;
            p.lfo_depth_filter = 0.0;
        });
        controller.note_on(60);
        render(&mut engine, 64);
        assert_eq!(engine.voices()[0].cutoff_hz(), CUTOFF_MAX_HZ);
    }
}
