//! Container formats
//!
//! Canonical 16-bit PCM WAV encoding and decoding, plus an MP3 frame walker
//! used for trimming without re-encoding.

pub mod mp3;
pub mod wav;

pub use mp3::{cut_point, FrameHeader};
pub use wav::{WavError, WavHeader};
