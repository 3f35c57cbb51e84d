//! Computer keyboard standing in for the synth's panel.
//!
//! Two rows of letters play the key matrix, F1 to F6 are the transport
//! switches and the arrow keys turn six virtual pots. Most terminals only
//! report presses, so a key counts as held until its auto-repeat stops for
//! `KEY_HOLD`. Terminals that report releases end the note at once.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use rtrb::Consumer;
use std::time::{Duration, Instant};

use synthe::{
    io::{
        input::{ControlInputs, KeyBits, Switch, SwitchBits, POT_COUNT},
        keymap::KEY_COUNT,
    },
    synth::params::SynthParams,
};

const KEY_HOLD: Duration = Duration::from_millis(300);
const POT_STEP: f32 = 0.02;

/// Keys in key-matrix order: lower row naturals and sharps, then upper row.
const PIANO_KEYS: &str = "zsxdcvgbhnjmq2w3er5t6y7ui";

pub const POT_NAMES: [&str; POT_COUNT] = ["Morph", "Attack", "Sustain", "Release", "Cutoff", "Reso"];

pub enum Action {
    None,
    Quit,
}

pub struct TerminalInputs {
    pressed_at: [Option<Instant>; KEY_COUNT],
    switches: SwitchBits,
    pots: [f32; POT_COUNT],
    selected_pot: usize,
    pots_moved: bool,
    midi: Option<Consumer<u8>>,
}

impl TerminalInputs {
    pub fn new(initial: &SynthParams, midi: Option<Consumer<u8>>) -> Self {
        Self {
            pressed_at: [None; KEY_COUNT],
            switches: SwitchBits::default(),
            pots: pots_from_params(initial),
            selected_pot: 0,
            pots_moved: false,
            midi,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> Action {
        if key.code == KeyCode::Esc
            || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
        {
            return Action::Quit;
        }

        let released = key.kind == KeyEventKind::Release;
        match key.code {
            KeyCode::Char(c) => {
                if let Some(index) = piano_key(c) {
                    self.pressed_at[index] = (!released).then_some(now);
                }
            }
            KeyCode::F(n) if !released => {
                if let Some(&switch) = Switch::ALL.get((n as usize).wrapping_sub(1)) {
                    self.switches = self.switches.with(switch);
                }
            }
            KeyCode::Left if !released => {
                self.selected_pot = (self.selected_pot + POT_COUNT - 1) % POT_COUNT;
            }
            KeyCode::Right if !released => {
                self.selected_pot = (self.selected_pot + 1) % POT_COUNT;
            }
            KeyCode::Up if !released => self.nudge_pot(POT_STEP),
            KeyCode::Down if !released => self.nudge_pot(-POT_STEP),
            _ => {}
        }
        Action::None
    }

    fn nudge_pot(&mut self, delta: f32) {
        let pot = &mut self.pots[self.selected_pot];
        *pot = (*pot + delta).clamp(0.0, 1.0);
        self.pots_moved = true;
    }

    pub fn selected_pot(&self) -> usize {
        self.selected_pot
    }
}

impl ControlInputs for TerminalInputs {
    fn read_pots(&mut self) -> Option<[f32; POT_COUNT]> {
        // Untouched pots leave the configured patch alone.
        self.pots_moved.then_some(self.pots)
    }

    fn scan_keys(&mut self) -> KeyBits {
        let now = Instant::now();
        let mut keys = KeyBits::default();
        for (index, pressed_at) in self.pressed_at.iter_mut().enumerate() {
            match pressed_at {
                Some(at) if now.duration_since(*at) < KEY_HOLD => keys.set(index, true),
                _ => *pressed_at = None,
            }
        }
        keys
    }

    fn read_switches(&mut self) -> SwitchBits {
        // One press reads as down for one tick and up on the next.
        std::mem::take(&mut self.switches)
    }

    fn read_midi(&mut self, buf: &mut [u8]) -> usize {
        let Some(rx) = self.midi.as_mut() else {
            return 0;
        };
        let mut count = 0;
        while count < buf.len() {
            match rx.pop() {
                Ok(byte) => {
                    buf[count] = byte;
                    count += 1;
                }
                Err(_) => break,
            }
        }
        count
    }
}

fn piano_key(c: char) -> Option<usize> {
    PIANO_KEYS
        .chars()
        .position(|k| k == c.to_ascii_lowercase())
        .filter(|&index| index < KEY_COUNT)
}

/// Inverse of the pot mapping, so the virtual pots start where the patch is.
fn pots_from_params(p: &SynthParams) -> [f32; POT_COUNT] {
    [
        p.wave_morph / 4.0,
        (p.env_attack_ms - 5.0) / 500.0,
        p.env_sustain,
        (p.env_release_ms - 20.0) / 1000.0,
        (p.filter_cutoff_hz - 200.0) / 3200.0,
        (p.filter_resonance - 0.1) / 0.85,
    ]
    .map(|v| v.clamp(0.0, 1.0))
}
