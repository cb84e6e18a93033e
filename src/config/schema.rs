//! Configuration schema definitions

use crate::profile::{SoundKind, LIVE_BUFFER_SECS, LIVE_CROSSFADE_SECS};
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Main configuration for soundbed
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SoundbedConfig {
    /// Offline asset rendering
    #[serde(default)]
    pub render: RenderConfig,

    /// Asset trimming
    #[serde(default)]
    pub trim: TrimConfig,

    /// Live mixer
    #[serde(default)]
    pub live: LiveConfig,
}

impl SoundbedConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let render = &self.render;
        if render.sample_rate < 8000 || render.sample_rate > 192_000 {
            bail!("Sample rate must be between 8000 and 192000");
        }
        if !(render.duration_secs > 0.0) {
            bail!("Render duration must be positive");
        }
        if render.crossfade_secs < 0.0 || render.crossfade_secs * 2.0 > render.duration_secs {
            bail!("Render crossfade must be between 0 and half the duration");
        }

        if !(self.trim.target_secs > 0.0) {
            bail!("Trim target must be positive");
        }

        let live = &self.live;
        if !(live.buffer_secs > 0.0) {
            bail!("Live buffer length must be positive");
        }
        if live.crossfade_secs < 0.0 || live.crossfade_secs * 2.0 > live.buffer_secs {
            bail!("Live crossfade must be between 0 and half the buffer length");
        }
        if !(live.ramp_time_constant > 0.0) {
            bail!("Ramp time constant must be positive");
        }
        for (kind, volume) in &live.volumes {
            if *volume > 100 {
                bail!("Volume for '{}' must be between 0 and 100", kind);
            }
        }

        Ok(())
    }
}

/// Offline rendering settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Directory the assets are written to (default: assets/sounds)
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Sample rate in Hz (default: 44100)
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Loop length in seconds (default: 30)
    #[serde(default = "default_duration")]
    pub duration_secs: f64,

    /// Loop crossfade in seconds (default: 1)
    #[serde(default = "default_crossfade")]
    pub crossfade_secs: f64,

    /// Fixed RNG seed for reproducible renders (None = entropy)
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_output_dir() -> PathBuf { PathBuf::from("assets/sounds") }
fn default_sample_rate() -> u32 { 44_100 }
fn default_duration() -> f64 { 30.0 }
fn default_crossfade() -> f64 { 1.0 }

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            sample_rate: default_sample_rate(),
            duration_secs: default_duration(),
            crossfade_secs: default_crossfade(),
            seed: None,
        }
    }
}

/// Trim settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrimConfig {
    /// Target duration in seconds (default: 20)
    #[serde(default = "default_trim_target")]
    pub target_secs: f64,
}

fn default_trim_target() -> f64 { 20.0 }

impl Default for TrimConfig {
    fn default() -> Self {
        Self {
            target_secs: default_trim_target(),
        }
    }
}

/// Live mixer settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveConfig {
    /// Voice buffer length in seconds (default: 2)
    #[serde(default = "default_buffer_secs")]
    pub buffer_secs: f64,

    /// Loop crossfade of each voice buffer in seconds (default: 0.25)
    #[serde(default = "default_live_crossfade")]
    pub crossfade_secs: f64,

    /// Gain ramp time constant in seconds (default: 0.1)
    #[serde(default = "default_ramp")]
    pub ramp_time_constant: f64,

    /// Start muted
    #[serde(default)]
    pub muted: bool,

    /// Initial track volumes, 0-100
    #[serde(default)]
    pub volumes: BTreeMap<SoundKind, u8>,
}

fn default_buffer_secs() -> f64 { LIVE_BUFFER_SECS }
fn default_live_crossfade() -> f64 { LIVE_CROSSFADE_SECS }
fn default_ramp() -> f64 { 0.1 }

impl Default for LiveConfig {
    fn default() -> Self {
        Self {
            buffer_secs: default_buffer_secs(),
            crossfade_secs: default_live_crossfade(),
            ramp_time_constant: default_ramp(),
            muted: false,
            volumes: BTreeMap::new(),
        }
    }
}
