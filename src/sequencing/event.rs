/// Most events one recording can hold. Later events are dropped.
pub const MAX_SEQ_EVENTS: usize = 256;

/// A recorded key transition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SequenceEvent {
    /// MIDI note number
    pub note: u8,
    pub is_note_on: bool,
    /// Milliseconds since recording started
    pub timestamp_ms: u32,
}

impl SequenceEvent {
    pub fn note_on(note: u8, timestamp_ms: u32) -> Self {
        Self {
            note,
            is_note_on: true,
            timestamp_ms,
        }
    }

    pub fn note_off(note: u8, timestamp_ms: u32) -> Self {
        Self {
            note,
            is_note_on: false,
            timestamp_ms,
        }
    }
}

/// Fixed-capacity event list, in recording order.
#[derive(Debug, Clone)]
pub struct EventBuffer {
    events: [SequenceEvent; MAX_SEQ_EVENTS],
    len: usize,
}

impl EventBuffer {
    pub fn new() -> Self {
        Self {
            events: [SequenceEvent::default(); MAX_SEQ_EVENTS],
            len: 0,
        }
    }

    /// Append an event. Returns false, and keeps nothing, when full.
    pub fn push(&mut self, event: SequenceEvent) -> bool {
        if self.is_full() {
            return false;
        }
        self.events[self.len] = event;
        self.len += 1;
        true
    }

    pub fn get(&self, index: usize) -> Option<&SequenceEvent> {
        self.as_slice().get(index)
    }

    pub fn last(&self) -> Option<&SequenceEvent> {
        self.as_slice().last()
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

    pub fn is_full(&self) -> bool {
        self.len == MAX_SEQ_EVENTS
    }

    pub fn as_slice(&self) -> &[SequenceEvent] {
        &self.events[..self.len]
    }
}

impl Default for EventBuffer {
    fn default() -> Self {
        Self::new()
    }
}
