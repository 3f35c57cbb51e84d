pub mod event;
pub mod sequencer;

pub use event::{EventBuffer, SequenceEvent, MAX_SEQ_EVENTS};
pub use sequencer::{Sequencer, SequencerState};
