pub mod config;
pub mod control; // Control-rate input, allocation and transport
pub mod dsp;
pub mod io;
pub mod sequencing; // Loop recorder
pub mod synth; // Voices, modulation and the audio-rate engine
pub mod visual;

pub use config::{ConfigError, EngineConfig};
pub use control::{Clock, Controller};
pub use synth::engine::AudioEngine;

/// Voice slots rendered per frame.
pub const POLY_VOICES: usize = 4;
/// Notes tracked as held at once.
pub const HELD_NOTE_CAPACITY: usize = 32;
pub const DEFAULT_SAMPLE_RATE: f32 = 16_384.0;
pub const DEFAULT_CONTROL_RATE_HZ: u32 = 128;
pub(crate) const MIN_TIME_MS: f32 = 1.0;

/// Build a connected audio engine and controller.
///
/// Move the [`AudioEngine`] into the audio callback and keep the
/// [`Controller`] on the control thread. They share nothing but lock-free
/// queues and atomics.
pub fn engine<C: Clock>(
    config: &EngineConfig,
    clock: C,
) -> Result<(AudioEngine, Controller<C>), ConfigError> {
    config.validate()?;

    let (tx, rx) = synth::message::command_queue(config.command_capacity);
    let (params_tx, params_rx) = synth::params::shared_params(config.params);
    let (feed_tx, feed_rx) = synth::feed::sample_feed();

    let audio = AudioEngine::new(config.sample_rate, rx, params_rx, feed_tx);
    let controller = Controller::new(
        clock,
        synth::allocator::VoiceAllocator::new(tx),
        params_tx,
        feed_rx,
        config.sample_rate,
        config.random_seed,
    );
    log::debug!(
        "engine ready: {} Hz, {} voices",
        config.sample_rate,
        POLY_VOICES
    );
    Ok((audio, controller))
}
