//! Runtime configuration for the native core.
//!
//! Audio stream parameters can be adjusted via a JSON file on desktop builds
//! for quick iteration; Android builds use the compiled-in defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::audio::DEFAULT_EXCHANGE_DEPTH;

/// Complete native-side configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub audio: AudioConfig,
}

/// Audio session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Playback sample rate in Hz
    pub sample_rate: u32,
    /// Interleaved channel count of the playback stream
    pub channel_count: usize,
    /// Requested stream buffer size in device bursts; 2 trades a little
    /// latency for underrun resistance
    pub burst_multiplier: u32,
    /// Capacity of the clip handoff rings between control and audio threads
    pub exchange_depth: usize,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48000,
            channel_count: 1,
            burst_multiplier: 2,
            exchange_depth: DEFAULT_EXCHANGE_DEPTH,
        }
    }
}

impl Default for AppConfig {
    /// Default configuration values (fallback if config file not found)
    fn default() -> Self {
        Self {
            audio: AudioConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file, falling back to defaults if the
    /// file is missing or malformed.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                    config
                }
                Err(err) => {
                    log::warn!(
                        "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Load configuration on Android.
    ///
    /// Asset-based loading would have to go through the AssetManager; the
    /// compiled-in defaults are used instead.
    #[cfg(target_os = "android")]
    pub fn load() -> Self {
        Self::default()
    }

    /// Load configuration for non-Android platforms
    #[cfg(not(target_os = "android"))]
    pub fn load() -> Self {
        Self::load_from_file("assets/native_config.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.audio.sample_rate, 48000);
        assert_eq!(config.audio.channel_count, 1);
        assert_eq!(config.audio.burst_multiplier, 2);
        assert_eq!(config.audio.exchange_depth, DEFAULT_EXCHANGE_DEPTH);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = AppConfig::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.audio.sample_rate, config.audio.sample_rate);
        assert_eq!(parsed.audio.channel_count, config.audio.channel_count);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = AppConfig::load_from_file("/nonexistent/native_config.json");
        assert_eq!(config.audio.sample_rate, 48000);
    }
}
