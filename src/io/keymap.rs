//! Key-to-note tables for the supported keyboard front ends.
//!
//! The driver is picked at build time. `keyboard-mcp23017` is a 5x5 key
//! matrix behind an I2C expander; `keyboard-ttp229` is a 16-pad capacitive
//! sensor read over a two-wire serial line. With neither feature enabled the
//! matrix layout is used.

#[cfg(all(feature = "keyboard-mcp23017", feature = "keyboard-ttp229"))]
compile_error!("features `keyboard-mcp23017` and `keyboard-ttp229` are mutually exclusive");

use crate::io::input::KeyBits;

/// Note played by key 0. Further keys ascend chromatically.
pub const LOWEST_NOTE: u8 = 48;

#[cfg(not(feature = "keyboard-ttp229"))]
pub const KEY_ROWS: usize = 5;
#[cfg(not(feature = "keyboard-ttp229"))]
pub const KEY_COLS: usize = 5;
#[cfg(not(feature = "keyboard-ttp229"))]
pub const KEY_COUNT: usize = KEY_ROWS * KEY_COLS;

#[cfg(feature = "keyboard-ttp229")]
pub const KEY_COUNT: usize = 16;

/// Note for every key, indexed by key number.
pub const KEY_NOTES: [u8; KEY_COUNT] = key_notes();

const fn key_notes() -> [u8; KEY_COUNT] {
    let mut notes = [0u8; KEY_COUNT];
    let mut i = 0;
    while i < KEY_COUNT {
        notes[i] = LOWEST_NOTE + i as u8;
        i += 1;
    }
    notes
}

pub fn key_note(index: usize) -> Option<u8> {
    KEY_NOTES.get(index).copied()
}

/// Inverse of [`key_note`], used by hosts that map external notes back to keys.
pub fn note_key(note: u8) -> Option<usize> {
    let index = note.checked_sub(LOWEST_NOTE)? as usize;
    (index < KEY_COUNT).then_some(index)
}

/// Build key bits from a column-strobed matrix scan.
///
/// `is_closed(row, col)` reports whether the switch at that crossing
/// conducts while `col` is driven low. Key index is `row * KEY_COLS + col`.
#[cfg(not(feature = "keyboard-ttp229"))]
pub fn scan_matrix(mut is_closed: impl FnMut(usize, usize) -> bool) -> KeyBits {
    let mut keys = KeyBits::default();
    for col in 0..KEY_COLS {
        for row in 0..KEY_ROWS {
            if is_closed(row, col) {
                keys.set(row * KEY_COLS + col, true);
            }
        }
    }
    keys
}

/// Build key bits from a serial pad read, first bit clocked out is pad 0.
///
/// The sensor idles high and pulls a pad's bit low when touched unless
/// configured active-high.
#[cfg(feature = "keyboard-ttp229")]
pub fn decode_serial(raw: u16, active_low: bool) -> KeyBits {
    let touched = if active_low { !raw } else { raw };
    KeyBits(u32::from(touched) & KeyBits::mask())
}
