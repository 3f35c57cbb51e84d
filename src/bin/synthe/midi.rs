//! Host MIDI input.
//!
//! midir delivers whole messages on its own thread. They are flattened back
//! into a byte stream and pushed through a wait-free ring so the control
//! loop can run them through the same running-status parser hardware MIDI
//! would use.

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use midir::{MidiInput, MidiInputConnection};
use rtrb::{Consumer, RingBuffer};

const BYTE_QUEUE_LEN: usize = 1024;

/// Open connection plus the receiving end of its byte queue.
pub struct MidiLink {
    pub port_name: String,
    pub bytes: Consumer<u8>,
    /// Closes the port when dropped.
    pub connection: MidiInputConnection<()>,
}

pub fn port_names() -> EyreResult<Vec<String>> {
    let midi_in = MidiInput::new("synthe").wrap_err("failed to open MIDI input")?;
    Ok(midi_in
        .ports()
        .iter()
        .filter_map(|port| midi_in.port_name(port).ok())
        .collect())
}

/// Connect to the first input port whose name contains `filter`.
pub fn connect(filter: &str) -> EyreResult<MidiLink> {
    let midi_in = MidiInput::new("synthe").wrap_err("failed to open MIDI input")?;

    let needle = filter.to_lowercase();
    let (port, port_name) = midi_in
        .ports()
        .into_iter()
        .find_map(|port| {
            let name = midi_in.port_name(&port).ok()?;
            name.to_lowercase().contains(&needle).then_some((port, name))
        })
        .ok_or_else(|| eyre!("no MIDI input port matching {filter:?}"))?;

    let (mut tx, bytes) = RingBuffer::<u8>::new(BYTE_QUEUE_LEN);
    let connection = midi_in
        .connect(
            &port,
            "synthe-in",
            move |_stamp, message, _| {
                for &byte in message {
                    if tx.push(byte).is_err() {
                        break;
                    }
                }
            },
            (),
        )
        .map_err(|e| eyre!("failed to connect to {port_name}: {}", e.kind()))?;

    log::info!("MIDI input connected: {port_name}");
    Ok(MidiLink {
        port_name,
        bytes,
        connection,
    })
}
