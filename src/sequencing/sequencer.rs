//! Loop recorder and player.
//!
//! Records key transitions with millisecond timestamps and replays them in a
//! loop through the same note entry points live playing uses. Time is
//! passed in by the caller as a wrapping millisecond counter.

use crate::synth::allocator::{HeldNotes, NoteSink};

use super::event::{EventBuffer, SequenceEvent, MAX_SEQ_EVENTS};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SequencerState {
    #[default]
    Idle,
    Recording,
    Playing,
}

impl SequencerState {
    /// Short label for status displays.
    pub fn label(self) -> &'static str {
        match self {
            SequencerState::Idle => "STOP",
            SequencerState::Recording => "REC",
            SequencerState::Playing => "PLAY",
        }
    }
}

#[derive(Debug, Default)]
pub struct Sequencer {
    state: SequencerState,
    events: EventBuffer,
    duration_ms: u32,
    playback_index: usize,
    playback_start_ms: u32,
    record_start_ms: u32,
    /// Notes started by playback and not yet released by it.
    sounding: HeldNotes<MAX_SEQ_EVENTS>,
}

impl Sequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop playback, wipe the sequence and start recording at `now_ms`.
    pub fn begin_recording(&mut self, now_ms: u32, sink: &mut impl NoteSink) {
        self.state = SequencerState::Idle;
        self.clear_sequence(sink);
        self.state = SequencerState::Recording;
        self.record_start_ms = now_ms;
        log::debug!("sequencer: recording");
    }

    /// Leave recording and fix the loop length. No-op when not recording.
    pub fn end_recording(&mut self) {
        if self.state != SequencerState::Recording {
            return;
        }
        self.state = SequencerState::Idle;
        if !self.events.is_empty() {
            self.finalize();
        }
        log::debug!(
            "sequencer: recorded {} events over {} ms",
            self.events.len(),
            self.duration_ms
        );
    }

    /// Leave recording without fixing the loop length.
    pub fn abort_recording(&mut self) {
        if self.state == SequencerState::Recording {
            self.state = SequencerState::Idle;
            log::debug!("sequencer: recording aborted");
        }
    }

    /// Loop the sequence from the top. Does nothing when it is empty.
    pub fn start_playback(&mut self, now_ms: u32) {
        if self.events.is_empty() {
            return;
        }
        if self.state == SequencerState::Recording {
            self.end_recording();
        }
        self.state = SequencerState::Playing;
        self.playback_index = 0;
        self.playback_start_ms = now_ms;
        log::debug!("sequencer: playing {} events", self.events.len());
    }

    /// Stop playback. Notes it started keep sounding until released.
    pub fn stop_playback(&mut self) {
        if self.state == SequencerState::Playing {
            self.state = SequencerState::Idle;
            log::debug!("sequencer: stopped");
        }
        self.playback_index = 0;
    }

    /// Release playback notes and drop every event. The state is untouched.
    pub fn clear_sequence(&mut self, sink: &mut impl NoteSink) {
        self.release_sounding(sink);
        self.events.clear();
        self.duration_ms = 0;
        self.playback_index = 0;
    }

    /// Rewind to the top as of `now_ms`, releasing playback notes.
    pub fn reset_playback_markers(&mut self, now_ms: u32, sink: &mut impl NoteSink) {
        self.playback_index = 0;
        self.playback_start_ms = now_ms;
        self.release_sounding(sink);
    }

    /// Record a live note event if recording. Events past capacity are dropped.
    pub fn capture(&mut self, note: u8, is_note_on: bool, now_ms: u32) {
        if self.state != SequencerState::Recording {
            return;
        }
        let timestamp_ms = now_ms.wrapping_sub(self.record_start_ms);
        let event = if is_note_on {
            SequenceEvent::note_on(note, timestamp_ms)
        } else {
            SequenceEvent::note_off(note, timestamp_ms)
        };
        self.events.push(event);
    }

    /// Fire every event that is due and wrap around at the loop end.
    pub fn update(&mut self, now_ms: u32, sink: &mut impl NoteSink) {
        if self.state != SequencerState::Playing || self.events.is_empty() {
            return;
        }

        let elapsed = now_ms.wrapping_sub(self.playback_start_ms);
        while let Some(event) = self.events.get(self.playback_index).copied() {
            if elapsed < event.timestamp_ms {
                break;
            }
            if event.is_note_on {
                sink.note_on(event.note);
                self.sounding.push(event.note);
                sink.click();
            } else {
                sink.note_off(event.note);
                self.sounding.pop(event.note);
            }
            self.playback_index += 1;
        }

        if self.duration_ms > 0 && elapsed >= self.duration_ms {
            self.playback_start_ms = now_ms;
            self.playback_index = 0;
            self.release_sounding(sink);
        }
    }

    fn finalize(&mut self) {
        self.duration_ms = self
            .events
            .last()
            .map_or(0, |last| last.timestamp_ms.saturating_add(1));
    }

    fn release_sounding(&mut self, sink: &mut impl NoteSink) {
        while let Some(note) = self.sounding.current() {
            sink.note_off(note);
            self.sounding.pop(note);
        }
    }

    pub fn state(&self) -> SequencerState {
        self.state
    }

    pub fn is_recording(&self) -> bool {
        self.state == SequencerState::Recording
    }

    pub fn is_playing(&self) -> bool {
        self.state == SequencerState::Playing
    }

    /// Number of recorded events.
    pub fn sequence_length(&self) -> usize {
        self.events.len()
    }

    /// Loop length in ms, zero until a recording is finalized.
    pub fn sequence_duration(&self) -> u32 {
        self.duration_ms
    }

    pub fn events(&self) -> &[SequenceEvent] {
        self.events.as_slice()
    }

    pub fn playback_index(&self) -> usize {
        self.playback_index
    }

    /// Notes currently held by playback.
    pub fn sounding_notes(&self) -> &[u8] {
        self.sounding.as_slice()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequencing::event::MAX_SEQ_EVENTS;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Call {
        On(u8),
        Off(u8),
        Click,
    }

    #[derive(Default)]
    struct Recorder(Vec<Call>);

    impl NoteSink for Recorder {
        fn note_on(&mut self, note: u8) {
            self.0.push(Call::On(note));
        }
        fn note_off(&mut self, note: u8) {
            self.0.push(Call::Off(note));
        }
        fn click(&mut self) {
            self.0.push(Call::Click);
        }
    }

    fn recorded(events: &[(u8, bool, u32)]) -> Sequencer {
        let mut seq = Sequencer::new();
        let mut sink = Recorder::default();
        seq.begin_recording(1_000, &mut sink);
        for &(note, on, at) in events {
            seq.capture(note, on, 1_000 + at);
        }
        seq.end_recording();
        seq
    }

    #[test]
    fn round_trip_plays_and_loops() {
        let mut seq = recorded(&[(60, true, 0), (60, false, 500)]);
        assert_eq!(seq.sequence_length(), 2);
        assert_eq!(seq.sequence_duration(), 501);
        assert!(!seq.is_recording());

        let mut sink = Recorder::default();
        seq.start_playback(10_000);
        assert!(seq.is_playing());

        seq.update(10_000, &mut sink);
        assert_eq!(sink.0, vec![Call::On(60), Call::Click]);
        assert_eq!(seq.sounding_notes(), &[60]);

        sink.0.clear();
        seq.update(10_499, &mut sink);
        assert!(sink.0.is_empty());
        seq.update(10_500, &mut sink);
        assert_eq!(sink.0, vec![Call::Off(60)]);
        assert!(seq.sounding_notes().is_empty());

        sink.0.clear();
        seq.update(10_501, &mut sink);
        assert_eq!(seq.playback_index(), 0);
        seq.update(10_501, &mut sink);
        assert_eq!(sink.0, vec![Call::On(60), Call::Click]);
    }

    #[test]
    fn loop_end_releases_hanging_notes() {
        let mut seq = recorded(&[(64, true, 0), (67, true, 100)]);
        assert_eq!(seq.sequence_duration(), 101);

        let mut sink = Recorder::default();
        seq.start_playback(0);
        seq.update(100, &mut sink);
        assert_eq!(seq.sounding_notes(), &[64, 67]);

        sink.0.clear();
        seq.update(101, &mut sink);
        assert_eq!(sink.0, vec![Call::Off(67), Call::Off(64)]);
        assert!(seq.sounding_notes().is_empty());
    }

    #[test]
    fn loop_end_releases_every_overlapping_note() {
        let events: Vec<(u8, bool, u32)> = (40..90).map(|note| (note, true, 0)).collect();
        let mut seq = recorded(&events);

        let mut sink = Recorder::default();
        seq.start_playback(0);
        seq.update(0, &mut sink);
        assert_eq!(seq.sounding_notes().len(), 50);

        sink.0.clear();
        seq.update(1, &mut sink);
        assert!(seq.sounding_notes().is_empty());
        let released = sink.0.iter().filter(|c| matches!(c, Call::Off(_))).count();
        assert_eq!(released, 50);
    }

    #[test]
    fn stop_is_idempotent() {
        let mut seq = recorded(&[(60, true, 0)]);
        seq.start_playback(0);
        seq.stop_playback();
        seq.stop_playback();
        assert_eq!(seq.state(), SequencerState::Idle);
        assert_eq!(seq.playback_index(), 0);
        assert_eq!(seq.sequence_length(), 1);
    }

    #[test]
    fn stop_leaves_notes_sounding() {
        let mut seq = recorded(&[(60, true, 0), (60, false, 300)]);
        let mut sink = Recorder::default();
        seq.start_playback(0);
        seq.update(0, &mut sink);
        seq.stop_playback();
        assert_eq!(seq.sounding_notes(), &[60]);

        sink.0.clear();
        seq.update(400, &mut sink);
        assert!(sink.0.is_empty());
    }

    #[test]
    fn empty_sequence_does_not_play() {
        let mut seq = Sequencer::new();
        seq.start_playback(0);
        assert!(!seq.is_playing());

        let mut seq = recorded(&[]);
        assert_eq!(seq.sequence_duration(), 0);
        seq.start_playback(0);
        assert!(!seq.is_playing());
    }

    #[test]
    fn capture_only_while_recording() {
        let mut seq = Sequencer::new();
        seq.capture(60, true, 5);
        assert_eq!(seq.sequence_length(), 0);
    }

    #[test]
    fn clear_during_recording_keeps_recording() {
        let mut sink = Recorder::default();
        let mut seq = Sequencer::new();
        seq.begin_recording(0, &mut sink);
        seq.capture(60, true, 10);
        seq.capture(60, false, 20);

        seq.clear_sequence(&mut sink);
        assert!(seq.is_recording());
        assert_eq!(seq.sequence_length(), 0);

        seq.capture(62, true, 30);
        seq.end_recording();
        assert_eq!(seq.events(), &[SequenceEvent::note_on(62, 30)]);
        assert_eq!(seq.sequence_duration(), 31);
    }

    #[test]
    fn abort_keeps_events_without_duration() {
        let mut sink = Recorder::default();
        let mut seq = Sequencer::new();
        seq.begin_recording(0, &mut sink);
        seq.capture(60, true, 10);
        seq.abort_recording();
        assert!(!seq.is_recording());
        assert_eq!(seq.sequence_length(), 1);
        assert_eq!(seq.sequence_duration(), 0);
    }

    #[test]
    fn start_while_recording_finalizes_first() {
        let mut sink = Recorder::default();
        let mut seq = Sequencer::new();
        seq.begin_recording(0, &mut sink);
        seq.capture(60, true, 40);
        seq.start_playback(100);
        assert!(seq.is_playing());
        assert_eq!(seq.sequence_duration(), 41);
    }

    #[test]
    fn begin_recording_stops_playback_and_releases() {
        let mut seq = recorded(&[(60, true, 0)]);
        let mut sink = Recorder::default();
        seq.start_playback(0);
        seq.update(0, &mut sink);

        sink.0.clear();
        seq.begin_recording(50, &mut sink);
        assert!(seq.is_recording());
        assert_eq!(sink.0, vec![Call::Off(60)]);
        assert_eq!(seq.sequence_length(), 0);
    }

    #[test]
    fn reset_markers_rewinds_and_releases() {
        let mut seq = recorded(&[(60, true, 0), (62, true, 200), (60, false, 400)]);
        let mut sink = Recorder::default();
        seq.start_playback(0);
        seq.update(250, &mut sink);
        assert_eq!(seq.playback_index(), 2);

        sink.0.clear();
        seq.reset_playback_markers(300, &mut sink);
        assert_eq!(seq.playback_index(), 0);
        assert_eq!(sink.0, vec![Call::Off(62), Call::Off(60)]);

        sink.0.clear();
        seq.update(300, &mut sink);
        assert_eq!(sink.0, vec![Call::On(60), Call::Click]);
    }

    #[test]
    fn full_buffer_drops_silently() {
        let mut sink = Recorder::default();
        let mut seq = Sequencer::new();
        seq.begin_recording(0, &mut sink);
        for i in 0..(MAX_SEQ_EVENTS as u32 + 10) {
            seq.capture(60, i % 2 == 0, i);
        }
        seq.end_recording();
        assert_eq!(seq.sequence_length(), MAX_SEQ_EVENTS);
        assert_eq!(seq.sequence_duration(), MAX_SEQ_EVENTS as u32);
    }

    #[test]
    fn timestamps_survive_clock_wrap() {
        let mut sink = Recorder::default();
        let mut seq = Sequencer::new();
        seq.begin_recording(u32::MAX - 10, &mut sink);
        seq.capture(60, true, 20);
        seq.end_recording();
        assert_eq!(seq.events()[0].timestamp_ms, 31);
    }
}
