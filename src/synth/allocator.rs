use crate::{
    io::converter::midi_note_to_freq,
    synth::message::{CommandSender, VoiceCommand},
    HELD_NOTE_CAPACITY, POLY_VOICES,
};

/// Anything that turns note events into sound.
///
/// Live keys, MIDI, the random trigger and sequencer playback all go
/// through this, so replayed notes behave exactly like played ones.
pub trait NoteSink {
    fn note_on(&mut self, note: u8);
    fn note_off(&mut self, note: u8);
    fn click(&mut self);
}

/// Control-side view of one voice slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SlotBinding {
    pub note: u8,
    pub active: bool,
}

/// Notes currently held, oldest first. The top is the most recent press.
///
/// `N` bounds the stack; the allocator keeps the default, the sequencer
/// sizes it to the event buffer so every note it starts can be released.
#[derive(Debug, Clone)]
pub struct HeldNotes<const N: usize = HELD_NOTE_CAPACITY> {
    notes: [u8; N],
    len: usize,
}

impl<const N: usize> HeldNotes<N> {
    pub fn new() -> Self {
        Self {
            notes: [0; N],
            len: 0,
        }
    }

    /// Push a note; ignored when the stack is full.
    pub fn push(&mut self, note: u8) {
        if self.len < N {
            self.notes[self.len] = note;
            self.len += 1;
        }
    }
    /// Remove the first occurrence of `note`, keeping order.
    pub fn pop(&mut self, note: u8) -> bool {
        match self.as_slice().iter().position(|&n| n == note) {
            Some(index) => {
                self.notes.copy_within(index + 1..self.len, index);
                self.len -= 1;
                true
            }
            None => false,
        }
    }

    /// Last-pressed note still held.
    pub fn current(&self) -> Option<u8> {
        self.as_slice().last().copied()
    }

    pub fn contains(&self, note: u8) -> bool {
        self.as_slice().contains(&note)
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.notes[..self.len]
    }
}

impl<const N: usize> Default for HeldNotes<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Maps notes to voice slots and tells the audio engine about it.
///
/// Policy: reuse the slot already playing this note, else the first free
/// slot, else steal slot 0. Freed slots are never handed back to notes
/// that are still held.
pub struct VoiceAllocator {
    slots: [SlotBinding; POLY_VOICES],
    held: HeldNotes,
    pitch_offset: f32,
    tx: CommandSender,
}

impl VoiceAllocator {
    pub fn new(tx: CommandSender) -> Self {
        Self {
            slots: [SlotBinding::default(); POLY_VOICES],
            held: HeldNotes::new(),
            pitch_offset: 0.0,
            tx,
        }
    }

    /// Transpose applied to notes started from now on.
    pub fn set_pitch_offset(&mut self, semitones: f32) {
        self.pitch_offset = semitones;
    }

    /// Frequency a note starts towards, including the transpose.
    pub fn note_frequency(&self, note: u8) -> f32 {
        midi_note_to_freq(note as f32 + self.pitch_offset)
    }

    fn select_slot(&self, note: u8) -> usize {
        self.slots
            .iter()
            .position(|s| s.active && s.note == note)
            .or_else(|| self.slots.iter().position(|s| !s.active))
            .unwrap_or(0)
    }

    /// Gate off every active slot and forget all held notes.
    pub fn release_all_held(&mut self) {
        for (slot, binding) in self.slots.iter_mut().enumerate() {
            if binding.active {
                binding.active = false;
                self.tx.send(VoiceCommand::Release { slot });
            }
        }
        self.held.clear();
    }

    fn release_slot_for(&mut self, note: u8) -> Option<usize> {
        let slot = self
            .slots
            .iter()
            .position(|s| s.active && s.note == note)?;
        self.slots[slot].active = false;
        self.tx.send(VoiceCommand::Release { slot });
        Some(slot)
    }

    pub fn slots(&self) -> &[SlotBinding; POLY_VOICES] {
        &self.slots
    }

    pub fn held(&self) -> &HeldNotes {
        &self.held
    }

    /// Slot currently bound to `note`, if any.
    pub fn slot_for(&self, note: u8) -> Option<usize> {
        self.slots.iter().position(|s| s.active && s.note == note)
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|s| s.active).count()
    }

    /// Frequency of the last-pressed held note, the monophonic glide target.
    pub fn glide_target(&self) -> Option<f32> {
        self.held.current().map(|note| self.note_frequency(note))
    }
}

impl NoteSink for VoiceAllocator {
    fn note_on(&mut self, note: u8) {
        if !self.held.contains(note) {
            self.held.push(note);
        }

        let slot = self.select_slot(note);
        self.slots[slot] = SlotBinding { note, active: true };
        let frequency = self.note_frequency(note);
        self.tx.send(VoiceCommand::Start {
            slot,
            note,
            frequency,
        });
    }

    fn note_off(&mut self, note: u8) {
        self.held.pop(note);
        self.release_slot_for(note);
    }

    fn click(&mut self) {
        self.tx.send(VoiceCommand::Click);
    }
}
