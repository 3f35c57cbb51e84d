// Purpose - control surface, MIDI decoding, format conversions

pub mod converter;
pub mod input;
pub mod keymap;
pub mod midi;
