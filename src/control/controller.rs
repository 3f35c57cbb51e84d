use crate::{
    control::{clock::Clock, random::RandomTrigger, throttle::Throttle},
    io::{
        converter::{midi_to_note, NoteEvent},
        input::{apply_pots, ControlInputs, KeyMatrix, Switch, SwitchBank},
        keymap::key_note,
        midi::MidiParser,
    },
    sequencing::{Sequencer, SequencerState},
    synth::{
        allocator::{NoteSink, VoiceAllocator},
        feed::{FeedReader, FEED_LEN},
        params::{ParamsWriter, SynthParams},
    },
    visual::{
        display::{DisplayFrame, Status, StatusDisplay},
        spectrum::SpectrumAnalyzer,
    },
};

/// Minimum time between display refreshes.
pub const DISPLAY_INTERVAL_MS: u32 = 50;
/// Minimum time between spectrum recomputes.
pub const SPECTRUM_INTERVAL_MS: u32 = 100;

const MIDI_CHUNK: usize = 64;

/// Live note path: every note reaches the allocator and, while recording,
/// the sequencer's event list.
struct LiveNotes<'a> {
    allocator: &'a mut VoiceAllocator,
    sequencer: &'a mut Sequencer,
    now_ms: u32,
}

impl NoteSink for LiveNotes<'_> {
    fn note_on(&mut self, note: u8) {
        self.allocator.note_on(note);
        self.sequencer.capture(note, true, self.now_ms);
    }

    fn note_off(&mut self, note: u8) {
        self.allocator.note_off(note);
        self.sequencer.capture(note, false, self.now_ms);
    }

    fn click(&mut self) {
        self.allocator.click();
    }
}

/// Control-rate half of the synthesizer.
///
/// Owns note allocation, the sequencer, the random trigger and the patch.
/// Call [`Controller::update_control`] at the control rate; the individual
/// operations are public for hosts that drive the engine directly.
pub struct Controller<C: Clock> {
    clock: C,
    allocator: VoiceAllocator,
    sequencer: Sequencer,
    random: RandomTrigger,
    params: ParamsWriter,
    keys: KeyMatrix,
    switches: SwitchBank,
    midi: MidiParser,
    feed: FeedReader,
    waveform: [i16; FEED_LEN],
    spectrum: SpectrumAnalyzer,
    display_throttle: Throttle,
    spectrum_throttle: Throttle,
}

impl<C: Clock> Controller<C> {
    pub(crate) fn new(
        clock: C,
        allocator: VoiceAllocator,
        params: ParamsWriter,
        feed: FeedReader,
        sample_rate: f32,
        seed: u64,
    ) -> Self {
        let mut controller = Self {
            clock,
            allocator,
            sequencer: Sequencer::new(),
            random: RandomTrigger::new(seed),
            params,
            keys: KeyMatrix::new(),
            switches: SwitchBank::new(),
            midi: MidiParser::new(),
            feed,
            waveform: [0; FEED_LEN],
            spectrum: SpectrumAnalyzer::new(sample_rate),
            display_throttle: Throttle::new(DISPLAY_INTERVAL_MS),
            spectrum_throttle: Throttle::new(SPECTRUM_INTERVAL_MS),
        };
        controller.sync_pitch_offset();
        controller
    }

    fn live(&mut self) -> LiveNotes<'_> {
        LiveNotes {
            now_ms: self.clock.now_ms(),
            allocator: &mut self.allocator,
            sequencer: &mut self.sequencer,
        }
    }

    /// One control tick: pots, keys, switches, MIDI, sequencer, random
    /// trigger, then the throttled display and spectrum work.
    pub fn update_control(
        &mut self,
        inputs: &mut impl ControlInputs,
        display: &mut impl StatusDisplay,
    ) {
        if let Some(pots) = inputs.read_pots() {
            self.params.update(|p| apply_pots(p, &pots));
        }
        self.sync_pitch_offset();

        let edges = self.keys.update(inputs.scan_keys());
        for edge in edges {
            let Some(note) = key_note(edge.key) else {
                continue;
            };
            if edge.pressed {
                self.note_on(note);
            } else {
                self.note_off(note);
            }
        }

        let pressed = self.switches.update(inputs.read_switches());
        for switch in pressed.iter() {
            self.handle_switch(switch);
        }

        self.process_midi(inputs);
        self.update_sequencer();
        self.update_random_trigger();

        let now = self.clock.now_ms();
        if self.display_throttle.ready(now) {
            self.feed.snapshot(&mut self.waveform);
            display.show(&DisplayFrame {
                status: self.status(),
                waveform: &self.waveform,
                spectrum: self.spectrum.levels_db(),
            });
        }
        if self.spectrum_throttle.ready(now) {
            self.feed.snapshot(&mut self.waveform);
            self.spectrum.update(&self.waveform);
        }
    }

    fn handle_switch(&mut self, switch: Switch) {
        log::debug!("switch {switch:?}");
        match switch {
            Switch::Record => {
                if self.is_recording() {
                    self.end_recording();
                } else {
                    self.begin_recording();
                }
            }
            Switch::Play => {
                if self.is_playing() {
                    self.stop_playback();
                    self.reset_playback_markers();
                } else {
                    self.reset_playback_markers();
                    self.start_playback();
                }
            }
            Switch::Clear => {
                self.stop_playback();
                self.abort_recording();
                self.clear_sequence();
            }
            Switch::Hold => self.release_all_held_notes(),
            Switch::Sync => self.reset_playback_markers(),
            Switch::Random => self.trigger_random_note(),
        }
    }

    fn process_midi(&mut self, inputs: &mut impl ControlInputs) {
        let mut buf = [0u8; MIDI_CHUNK];
        loop {
            let count = inputs.read_midi(&mut buf).min(MIDI_CHUNK);
            for &byte in &buf[..count] {
                let event = self.midi.feed(byte).and_then(midi_to_note);
                match event {
                    Some(NoteEvent::On(note)) => self.note_on(note),
                    Some(NoteEvent::Off(note)) => self.note_off(note),
                    None => {}
                }
            }
            if count < MIDI_CHUNK {
                break;
            }
        }
    }

    fn sync_pitch_offset(&mut self) {
        let offset = self.params.get().sanitized().pitch_offset;
        self.allocator.set_pitch_offset(offset);
    }

    /// Start a note as if its key had been pressed.
    pub fn note_on(&mut self, note: u8) {
        self.live().note_on(note);
    }

    pub fn note_off(&mut self, note: u8) {
        self.live().note_off(note);
    }

    pub fn release_all_held_notes(&mut self) {
        self.allocator.release_all_held();
    }

    pub fn trigger_click(&mut self) {
        self.allocator.click();
    }

    pub fn trigger_random_note(&mut self) {
        let now_ms = self.clock.now_ms();
        let mut live = LiveNotes {
            allocator: &mut self.allocator,
            sequencer: &mut self.sequencer,
            now_ms,
        };
        let note = self.random.trigger(now_ms, &mut live);
        log::debug!("random note {note}");
    }

    pub fn update_random_trigger(&mut self) {
        let now_ms = self.clock.now_ms();
        let mut live = LiveNotes {
            allocator: &mut self.allocator,
            sequencer: &mut self.sequencer,
            now_ms,
        };
        self.random.update(now_ms, &mut live);
    }

    pub fn begin_recording(&mut self) {
        let now = self.clock.now_ms();
        self.sequencer.begin_recording(now, &mut self.allocator);
    }

    pub fn end_recording(&mut self) {
        self.sequencer.end_recording();
    }

    pub fn abort_recording(&mut self) {
        self.sequencer.abort_recording();
    }

    pub fn start_playback(&mut self) {
        let now = self.clock.now_ms();
        self.sequencer.start_playback(now);
    }

    pub fn stop_playback(&mut self) {
        self.sequencer.stop_playback();
    }

    pub fn clear_sequence(&mut self) {
        self.sequencer.clear_sequence(&mut self.allocator);
    }

    pub fn reset_playback_markers(&mut self) {
        let now = self.clock.now_ms();
        self.sequencer
            .reset_playback_markers(now, &mut self.allocator);
    }

    pub fn update_sequencer(&mut self) {
        let now = self.clock.now_ms();
        self.sequencer.update(now, &mut self.allocator);
    }

    pub fn is_recording(&self) -> bool {
        self.sequencer.is_recording()
    }

    pub fn is_playing(&self) -> bool {
        self.sequencer.is_playing()
    }

    pub fn sequencer_state(&self) -> SequencerState {
        self.sequencer.state()
    }

    pub fn sequence_length(&self) -> usize {
        self.sequencer.sequence_length()
    }

    pub fn sequence_duration(&self) -> u32 {
        self.sequencer.sequence_duration()
    }

    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    pub fn allocator(&self) -> &VoiceAllocator {
        &self.allocator
    }

    /// Current patch as last written.
    pub fn params(&self) -> SynthParams {
        *self.params.get()
    }

    /// Edit the patch. The audio side picks it up on its next frame.
    pub fn update_params(&mut self, f: impl FnOnce(&mut SynthParams)) {
        self.params.update(f);
        self.sync_pitch_offset();
    }

    pub fn feed(&self) -> &FeedReader {
        &self.feed
    }

    pub fn spectrum(&self) -> &SpectrumAnalyzer {
        &self.spectrum
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn status(&self) -> Status {
        let p = self.params.get();
        Status {
            frequency_hz: self.allocator.glide_target(),
            wave_morph: p.wave_morph,
            filter_cutoff_hz: p.filter_cutoff_hz,
            filter_resonance: p.filter_resonance,
            env_attack_ms: p.env_attack_ms,
            env_sustain: p.env_sustain,
            env_release_ms: p.env_release_ms,
            transport: self.sequencer.state(),
            sequence_length: self.sequencer.sequence_length(),
            active_voices: self.allocator.active_count(),
        }
    }
}
