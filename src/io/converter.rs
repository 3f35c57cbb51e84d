use crate::io::midi::MidiEvent;

/// Note events the engine cares about, extracted from a MIDI message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteEvent {
    On(u8),
    Off(u8),
}

/// Map a channel message to a note event. Note-on with velocity 0 is a
/// note-off, as the MIDI spec allows.
pub fn midi_to_note(midi: MidiEvent) -> Option<NoteEvent> {
    match midi {
        MidiEvent::NoteOn { key, velocity, .. } if velocity > 0 => Some(NoteEvent::On(key)),
        MidiEvent::NoteOn { key, .. } | MidiEvent::NoteOff { key, .. } => {
            Some(NoteEvent::Off(key))
        }
        _ => None,
    }
}

/// Equal-tempered frequency of a (possibly fractional) MIDI note.
pub fn midi_note_to_freq(note: f32) -> f32 {
    440.0 * 2.0_f32.powf((note - 69.0) / 12.0)
}

/// Signed 16-bit sample to a float in [-1, 1) for audio APIs.
#[inline]
pub fn sample_to_f32(sample: i16) -> f32 {
    sample as f32 / 32_768.0
}
