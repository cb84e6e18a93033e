//! Soundbed - procedural ambient sound beds
//!
//! Synthesizes rain, fire, cafe murmur, streams and other ambient beds from
//! filtered noise, renders them to seamless WAV loops, and mixes them live
//! with smooth per-track volume ramps.

pub mod assets;
pub mod codec;
pub mod config;
pub mod engine;
pub mod profile;
pub mod synth;

pub use config::SoundbedConfig;
pub use engine::Mixer;
pub use profile::{SoundKind, SoundProfile};
