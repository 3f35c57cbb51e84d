//! Physical control surface: pots, key matrix, transport switches, MIDI.
//!
//! Drivers implement [`ControlInputs`] and hand back raw levels. Edge
//! detection and parameter mapping live here so every front end behaves the
//! same.

use crate::{io::keymap::KEY_COUNT, synth::params::SynthParams};

pub const POT_COUNT: usize = 6;

/// Raw level of every key, bit `i` is key `i`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyBits(pub u32);

impl KeyBits {
    pub const fn mask() -> u32 {
        if KEY_COUNT >= 32 {
            u32::MAX
        } else {
            (1u32 << KEY_COUNT) - 1
        }
    }

    pub fn is_pressed(&self, key: usize) -> bool {
        key < KEY_COUNT && self.0 & (1 << key) != 0
    }

    pub fn set(&mut self, key: usize, pressed: bool) {
        if key >= KEY_COUNT {
            return;
        }
        if pressed {
            self.0 |= 1 << key;
        } else {
            self.0 &= !(1 << key);
        }
    }
}

/// Transport switches, in panel order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Switch {
    Record,
    Play,
    Clear,
    Hold,
    Sync,
    Random,
}

impl Switch {
    pub const ALL: [Switch; 6] = [
        Switch::Record,
        Switch::Play,
        Switch::Clear,
        Switch::Hold,
        Switch::Sync,
        Switch::Random,
    ];

    pub const fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Raw level of every switch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SwitchBits(pub u8);

impl SwitchBits {
    pub fn is_pressed(&self, switch: Switch) -> bool {
        self.0 & switch.bit() != 0
    }

    pub fn with(mut self, switch: Switch) -> Self {
        self.0 |= switch.bit();
        self
    }

    /// Switches set in `self`, in panel order.
    pub fn iter(self) -> impl Iterator<Item = Switch> {
        Switch::ALL.into_iter().filter(move |s| self.is_pressed(*s))
    }
}

/// Source of control-rate input, polled once per control tick.
pub trait ControlInputs {
    /// Normalized pot positions in [0, 1]. `None` leaves the patch alone,
    /// for front ends without pots.
    fn read_pots(&mut self) -> Option<[f32; POT_COUNT]>;

    fn scan_keys(&mut self) -> KeyBits;

    fn read_switches(&mut self) -> SwitchBits;

    /// Copy pending MIDI bytes into `buf`, returning how many were written.
    fn read_midi(&mut self, buf: &mut [u8]) -> usize;
}

/// A key changing level between two scans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEdge {
    pub key: usize,
    pub pressed: bool,
}

/// Remembers the previous scan and reports what changed.
#[derive(Debug, Default)]
pub struct KeyMatrix {
    last: KeyBits,
}

impl KeyMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Edges since the previous scan, lowest key first.
    pub fn update(&mut self, keys: KeyBits) -> KeyEdges {
        let now = keys.0 & KeyBits::mask();
        let changed = now ^ self.last.0;
        self.last = KeyBits(now);
        KeyEdges { changed, now }
    }

    pub fn state(&self) -> KeyBits {
        self.last
    }
}

pub struct KeyEdges {
    changed: u32,
    now: u32,
}

impl Iterator for KeyEdges {
    type Item = KeyEdge;

    fn next(&mut self) -> Option<KeyEdge> {
        if self.changed == 0 {
            return None;
        }
        let key = self.changed.trailing_zeros() as usize;
        self.changed &= self.changed - 1;
        Some(KeyEdge {
            key,
            pressed: self.now & (1 << key) != 0,
        })
    }
}

/// Press-edge detector for the transport switches.
#[derive(Debug, Default)]
pub struct SwitchBank {
    last: SwitchBits,
}

impl SwitchBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switches that went from released to pressed since the last call.
    pub fn update(&mut self, switches: SwitchBits) -> SwitchBits {
        let pressed = switches.0 & !self.last.0;
        self.last = switches;
        SwitchBits(pressed)
    }
}

/// Write pot positions into the patch.
///
/// Pot order: morph, attack, sustain, release, cutoff, resonance.
pub fn apply_pots(params: &mut SynthParams, pots: &[f32; POT_COUNT]) {
    let p = pots.map(|v| if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 });
    params.wave_morph = 4.0 * p[0];
    params.env_attack_ms = 5.0 + 500.0 * p[1];
    params.env_sustain = p[2];
    params.env_release_ms = 20.0 + 1000.0 * p[3];
    params.filter_cutoff_hz = 200.0 + 3200.0 * p[4];
    params.filter_resonance = 0.1 + 0.85 * p[5];
}
