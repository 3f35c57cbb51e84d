//! Host settings, read from `synthe.toml`.

use color_eyre::eyre::{Result as EyreResult, WrapErr};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use synthe::{synth::params::SynthParams, EngineConfig, DEFAULT_CONTROL_RATE_HZ};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub control_rate_hz: u32,
    pub command_capacity: usize,
    /// Fixed seed for the random trigger; a fresh one per run when unset.
    pub random_seed: Option<u64>,
    /// Substring of the MIDI input port to open.
    pub midi_port: Option<String>,
    pub log_path: Option<PathBuf>,
    pub params: SynthParams,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            control_rate_hz: DEFAULT_CONTROL_RATE_HZ,
            command_capacity: EngineConfig::default().command_capacity,
            random_seed: None,
            midi_port: None,
            log_path: None,
            params: SynthParams::default(),
        }
    }
}

impl Settings {
    pub fn engine_config(&self, sample_rate: f32) -> EngineConfig {
        EngineConfig {
            sample_rate,
            command_capacity: self.command_capacity,
            random_seed: self.random_seed.unwrap_or_else(|| fastrand::u64(..)),
            params: self.params,
        }
    }

    /// Control tick length, never shorter than 1 ms.
    pub fn control_period(&self) -> std::time::Duration {
        let rate = self.control_rate_hz.clamp(1, 1_000);
        std::time::Duration::from_micros(1_000_000 / rate as u64)
    }
}

pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("synthe").join("synthe.toml"))
}

pub fn default_log_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("synthe")
        .join("synthe.log")
}

/// Load settings. An explicit path must exist; the default path is optional.
pub fn load(explicit: Option<&Path>) -> EyreResult<Settings> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match default_path() {
            Some(path) if path.exists() => path,
            _ => return Ok(Settings::default()),
        },
    };

    let contents = std::fs::read_to_string(&path)
        .wrap_err_with(|| format!("failed to read {}", path.display()))?;
    parse(&contents).wrap_err_with(|| format!("failed to parse {}", path.display()))
}

pub fn parse(contents: &str) -> EyreResult<Settings> {
    Ok(toml::from_str(contents)?)
}
