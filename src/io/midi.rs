/// Channel voice messages, as decoded from the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiEvent {
    NoteOn { channel: u8, key: u8, velocity: u8 },
    NoteOff { channel: u8, key: u8, velocity: u8 },
    ControlChange { channel: u8, controller: u8, value: u8 },
    PitchBend { channel: u8, value: i16 },
    ProgramChange { channel: u8, program: u8 },
}

/// Incremental MIDI byte-stream decoder with running status.
///
/// Feed it bytes as they arrive from a serial port or a host MIDI API; it
/// yields a complete event whenever the last data byte of a message lands.
/// Status bytes of channel messages are remembered, so senders can omit
/// repeats. System common bytes cancel the running status; real-time bytes
/// (clock, start, stop...) may appear anywhere and are skipped.
#[derive(Debug, Clone, Default)]
pub struct MidiParser {
    running_status: Option<u8>,
    data1: Option<u8>,
}

impl MidiParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed(&mut self, byte: u8) -> Option<MidiEvent> {
        if byte >= 0xF8 {
            return None;
        }
        if byte >= 0xF0 {
            self.running_status = None;
            self.data1 = None;
            return None;
        }
        if byte & 0x80 != 0 {
            self.running_status = Some(byte);
            self.data1 = None;
            return None;
        }

        let status = self.running_status?;
        let channel = status & 0x0F;
        let kind = status & 0xF0;

        // Program change and channel pressure carry one data byte.
        if matches!(kind, 0xC0 | 0xD0) {
            return match kind {
                0xC0 => Some(MidiEvent::ProgramChange {
                    channel,
                    program: byte,
                }),
                _ => None,
            };
        }

        let Some(data1) = self.data1.take() else {
            self.data1 = Some(byte);
            return None;
        };
        let data2 = byte;

        match kind {
            0x90 => Some(MidiEvent::NoteOn {
                channel,
                key: data1,
                velocity: data2,
            }),
            0x80 => Some(MidiEvent::NoteOff {
                channel,
                key: data1,
                velocity: data2,
            }),
            0xB0 => Some(MidiEvent::ControlChange {
                channel,
                controller: data1,
                value: data2,
            }),
            0xE0 => Some(MidiEvent::PitchBend {
                channel,
                value: (((data2 as i16) << 7) | data1 as i16) - 8192,
            }),
            _ => None,
        }
    }
}
