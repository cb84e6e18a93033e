//! Bouncing the live mix to disk
//!
//! Runs the mixer on a virtual clock and streams the output into a 32-bit
//! float WAV, block by block.

use super::context::{AudioContext, VirtualContext};
use super::mixer::Mixer;
use anyhow::{bail, Context, Result};
use hound::{SampleFormat, WavSpec, WavWriter};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::info;

/// Seconds rendered per block
const BLOCK_SECS: f64 = 0.1;

/// Float WAV writer that keeps count of what it wrote
pub struct Recorder {
    writer: WavWriter<BufWriter<File>>,
    sample_rate: u32,
    samples_written: u64,
}

impl Recorder {
    pub fn create(path: &Path, sample_rate: u32) -> Result<Self> {
        let spec = WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };

        let writer = WavWriter::create(path, spec)
            .with_context(|| format!("failed to create WAV file: {:?}", path))?;

        Ok(Self {
            writer,
            sample_rate,
            samples_written: 0,
        })
    }

    pub fn samples_written(&self) -> u64 {
        self.samples_written
    }

    pub fn duration_secs(&self) -> f64 {
        self.samples_written as f64 / self.sample_rate as f64
    }

    pub fn write_buffer(&mut self, buffer: &[f32]) -> Result<()> {
        for &sample in buffer {
            self.writer
                .write_sample(sample)
                .context("failed to write sample")?;
        }
        self.samples_written += buffer.len() as u64;
        Ok(())
    }

    /// Patch the header sizes and close the file
    pub fn finalize(self) -> Result<()> {
        self.writer.finalize().context("failed to finalize WAV file")
    }
}

/// Record `secs` seconds of the mix into `path`
///
/// The mixer must already be initialised. Returns the number of samples
/// written.
pub fn bounce(mixer: &mut Mixer<VirtualContext>, path: &Path, secs: f64) -> Result<u64> {
    if !mixer.is_ready() {
        bail!("mixer is not running");
    }
    if !(secs > 0.0) {
        bail!("bounce duration must be positive");
    }

    let sample_rate = mixer.context().sample_rate();
    let total = (sample_rate as f64 * secs).round() as u64;
    let block = (sample_rate as f64 * BLOCK_SECS).round().max(1.0) as u64;
    let mut recorder = Recorder::create(path, sample_rate)?;

    while recorder.samples_written() < total {
        let frames = block.min(total - recorder.samples_written());
        let out = mixer.context_mut().advance_frames(frames as usize);
        recorder.write_buffer(&out)?;
    }

    let written = recorder.samples_written();
    info!("bounced {:.1}s to {:?}", recorder.duration_secs(), path);
    recorder.finalize()?;
    Ok(written)
}
