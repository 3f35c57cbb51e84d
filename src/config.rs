use serde::{Deserialize, Serialize};

use crate::{synth::params::SynthParams, DEFAULT_SAMPLE_RATE};

/// Lowest sample rate the engine accepts.
pub const MIN_SAMPLE_RATE: f32 = 4_000.0;
/// Highest sample rate the engine accepts.
pub const MAX_SAMPLE_RATE: f32 = 192_000.0;

/// Everything needed to build an engine/controller pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub sample_rate: f32,
    /// Slots in the voice command queue between the two contexts.
    pub command_capacity: usize,
    /// Seed for the random note trigger.
    pub random_seed: u64,
    pub params: SynthParams,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            command_capacity: 256,
            random_seed: 0x5EED,
            params: SynthParams::default(),
        }
    }
}

impl EngineConfig {
    pub fn with_sample_rate(mut self, sample_rate: f32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.sample_rate.is_finite()
            || !(MIN_SAMPLE_RATE..=MAX_SAMPLE_RATE).contains(&self.sample_rate)
        {
            return Err(ConfigError::SampleRate(self.sample_rate));
        }
        if self.command_capacity == 0 {
            return Err(ConfigError::CommandCapacity);
        }
        Ok(())
    }
}

/// Errors that can occur when building an engine
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Sample rate outside the supported range
    SampleRate(f32),
    /// Voice command queue with no room
    CommandCapacity,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::SampleRate(rate) => write!(
                f,
                "Sample rate {} Hz is outside {}..={} Hz",
                rate, MIN_SAMPLE_RATE, MAX_SAMPLE_RATE
            ),
            ConfigError::CommandCapacity => {
                write!(f, "Voice command queue capacity must be at least 1")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert_eq!(EngineConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_bad_sample_rates() {
        for rate in [0.0, -1.0, f32::NAN, f32::INFINITY, 1_000_000.0] {
            let config = EngineConfig::default().with_sample_rate(rate);
            assert!(matches!(config.validate(), Err(ConfigError::SampleRate(_))));
        }
    }

    #[test]
    fn rejects_empty_queue() {
        let config = EngineConfig {
            command_capacity: 0,
            ..EngineConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::CommandCapacity));
        assert!(config
            .validate()
            .unwrap_err()
            .to_string()
            .contains("capacity"));
    }
}
