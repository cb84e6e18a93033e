//! Offline assets
//!
//! Renders the offline sound set to WAV files and trims existing assets.

mod trim;

pub use trim::{trim_dir, trim_file, TrimOutcome};

use crate::codec::wav;
use crate::config::RenderConfig;
use crate::profile::SoundKind;
use crate::synth::noise_rng;
use anyhow::{Context, Result};
use rand::Rng;
use std::path::PathBuf;
use tracing::info;

/// A file written by [`render_all`]
#[derive(Debug, Clone)]
pub struct RenderedAsset {
    pub kind: SoundKind,
    pub path: PathBuf,
    pub samples: usize,
}

/// Render one sound with the offline settings
pub fn render_samples<R: Rng + ?Sized>(kind: SoundKind, config: &RenderConfig, rng: &mut R) -> Vec<f32> {
    kind.profile().render(
        config.sample_rate,
        config.duration_secs,
        config.crossfade_secs,
        rng,
    )
}

/// Render every offline sound into `config.output_dir`, overwriting
///
/// Sounds are rendered and written one at a time; the first I/O failure
/// stops the run.
pub fn render_all(config: &RenderConfig) -> Result<Vec<RenderedAsset>> {
    std::fs::create_dir_all(&config.output_dir)
        .with_context(|| format!("failed to create output directory {:?}", config.output_dir))?;

    let mut rng = noise_rng(config.seed);
    let mut rendered = Vec::with_capacity(SoundKind::OFFLINE.len());

    for kind in SoundKind::OFFLINE {
        let samples = render_samples(kind, config, &mut rng);
        let path = config.output_dir.join(kind.file_name());
        wav::write_file(&path, &samples, config.sample_rate)
            .with_context(|| format!("failed to write {:?}", path))?;

        info!(sound = %kind, samples = samples.len(), "wrote {:?}", path);
        rendered.push(RenderedAsset {
            kind,
            path,
            samples: samples.len(),
        });
    }

    Ok(rendered)
}
