//! Host runner: audio stream, control loop and terminal UI

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossterm::event::{self, Event};
use ratatui::DefaultTerminal;
use std::time::{Duration, Instant};

use synthe::{control::SystemClock, io::converter::sample_to_f32, AudioEngine};

use crate::{
    config::Settings,
    midi::{self, MidiLink},
    terminal_input::{Action, TerminalInputs},
    ui::Screen,
};

/// Open the audio device and run until the user quits.
pub fn run(settings: Settings) -> EyreResult<()> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no default output device available"))?;
    let config = device
        .default_output_config()
        .wrap_err("failed to fetch default output config")?;

    let sample_rate = config.sample_rate().0 as f32;
    let channels = config.channels() as usize;
    log::info!("audio: {} Hz, {} channels", sample_rate, channels);

    let engine_config = settings.engine_config(sample_rate);
    let (engine, mut controller) = synthe::engine(&engine_config, SystemClock::new())
        .wrap_err("failed to build synth engine")?;

    let (midi_bytes, midi_port, _midi_connection) = match settings.midi_port.as_deref() {
        Some(filter) => {
            let MidiLink {
                port_name,
                bytes,
                connection,
            } = midi::connect(filter)?;
            (Some(bytes), Some(port_name), Some(connection))
        }
        None => (None, None, None),
    };

    let stream = build_stream(&device, &config.into(), channels, engine)?;
    stream.play()?;

    let mut inputs = TerminalInputs::new(&settings.params, midi_bytes);
    let mut screen = Screen::new(sample_rate, midi_port);
    let period = settings.control_period();

    let mut terminal = ratatui::init();
    let result = control_loop(&mut terminal, &mut inputs, &mut screen, period, |inputs, screen| {
        controller.update_control(inputs, screen)
    });
    ratatui::restore();
    result
}

fn build_stream(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    channels: usize,
    mut engine: AudioEngine,
) -> EyreResult<cpal::Stream> {
    let stream = device.build_output_stream(
        config,
        move |data: &mut [f32], _| {
            // Mono engine, copied to every channel
            for frame in data.chunks_mut(channels) {
                let sample = sample_to_f32(engine.render_frame());
                frame.fill(sample);
            }
        },
        |err| log::error!("audio stream error: {}", err),
        None,
    )?;
    Ok(stream)
}

fn control_loop(
    terminal: &mut DefaultTerminal,
    inputs: &mut TerminalInputs,
    screen: &mut Screen,
    period: Duration,
    mut tick: impl FnMut(&mut TerminalInputs, &mut Screen),
) -> EyreResult<()> {
    let mut next_tick = Instant::now();
    loop {
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                if let Action::Quit = inputs.handle_key(key, Instant::now()) {
                    return Ok(());
                }
            }
        }

        tick(inputs, screen);

        if screen.take_dirty() {
            terminal.draw(|frame| screen.render(frame, inputs))?;
        }

        next_tick += period;
        let now = Instant::now();
        if next_tick > now {
            std::thread::sleep(next_tick - now);
        } else {
            // Fell behind; don't try to catch up in a burst.
            next_tick = now;
        }
    }
}
