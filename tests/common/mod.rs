#![allow(dead_code)]

use synthe::{
    control::{Controller, ManualClock},
    io::input::{ControlInputs, KeyBits, Switch, SwitchBits, POT_COUNT},
    io::keymap::note_key,
    visual::{DisplayFrame, Status, StatusDisplay},
    AudioEngine, EngineConfig,
};

/// Panel state a test sets before each control tick.
#[derive(Default)]
pub struct ScriptedInputs {
    pub pots: Option<[f32; POT_COUNT]>,
    pub keys: KeyBits,
    pub switches: SwitchBits,
    pub midi: Vec<u8>,
}

impl ControlInputs for ScriptedInputs {
    fn read_pots(&mut self) -> Option<[f32; POT_COUNT]> {
        self.pots
    }

    fn scan_keys(&mut self) -> KeyBits {
        self.keys
    }

    fn read_switches(&mut self) -> SwitchBits {
        self.switches
    }

    fn read_midi(&mut self, buf: &mut [u8]) -> usize {
        let count = self.midi.len().min(buf.len());
        buf[..count].copy_from_slice(&self.midi[..count]);
        self.midi.drain(..count);
        count
    }
}

#[derive(Default)]
pub struct RecordingDisplay {
    pub frames: Vec<Status>,
    pub last_spectrum_peak: f32,
}

impl StatusDisplay for RecordingDisplay {
    fn show(&mut self, frame: &DisplayFrame<'_>) {
        self.frames.push(frame.status);
        self.last_spectrum_peak = frame.spectrum.iter().copied().fold(f32::MIN, f32::max);
    }
}

pub struct Rig {
    pub engine: AudioEngine,
    pub controller: Controller<ManualClock>,
    pub clock: ManualClock,
    pub inputs: ScriptedInputs,
    pub display: RecordingDisplay,
}

impl Rig {
    pub fn new() -> Self {
        let clock = ManualClock::new(1_000);
        let (engine, controller) =
            synthe::engine(&EngineConfig::default(), clock.clone()).expect("default config");
        Self {
            engine,
            controller,
            clock,
            inputs: ScriptedInputs::default(),
            display: RecordingDisplay::default(),
        }
    }

    pub fn at(&mut self, ms: u32) -> &mut Self {
        self.clock.set(ms);
        self
    }

    /// One control tick followed by the audio it covers at 128 Hz.
    pub fn tick(&mut self) -> Vec<i16> {
        self.controller
            .update_control(&mut self.inputs, &mut self.display);
        let frames = (self.engine.sample_rate() / 128.0) as usize;
        (0..frames).map(|_| self.engine.render_frame()).collect()
    }

    pub fn key(&mut self, note: u8, pressed: bool) -> &mut Self {
        let key = note_key(note).expect("note on the keyboard");
        self.inputs.keys.set(key, pressed);
        self
    }

    /// Press then release a switch over two ticks at the current time.
    pub fn press(&mut self, switch: Switch) {
        self.inputs.switches = SwitchBits::default().with(switch);
        self.tick();
        self.inputs.switches = SwitchBits::default();
        self.tick();
    }
}
