//! Sound profiles
//!
//! A profile is a declarative recipe over the synth blocks. Rendering always
//! follows the same order: layers (generate, pre-gain, filter chain, layer
//! modulation, level) are summed, transients are added, the bed modulation
//! is applied, then the loop is stitched and the result normalized.

mod recipes;

use crate::synth::{
    apply_chain, generate, mix_into, normalize, sample_count, stitch_loop, Modulation, NoiseKind,
    TransientLayer,
};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Every sound the engine knows how to make
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundKind {
    Rain,
    Fire,
    Cafe,
    Stream,
    White,
    Thunder,
    Wind,
    Night,
}

impl SoundKind {
    pub const ALL: [SoundKind; 8] = [
        SoundKind::Rain,
        SoundKind::Fire,
        SoundKind::Cafe,
        SoundKind::Stream,
        SoundKind::White,
        SoundKind::Thunder,
        SoundKind::Wind,
        SoundKind::Night,
    ];

    /// Sounds rendered to static assets
    pub const OFFLINE: [SoundKind; 5] = [
        SoundKind::Rain,
        SoundKind::Fire,
        SoundKind::Cafe,
        SoundKind::Stream,
        SoundKind::White,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SoundKind::Rain => "rain",
            SoundKind::Fire => "fire",
            SoundKind::Cafe => "cafe",
            SoundKind::Stream => "stream",
            SoundKind::White => "white",
            SoundKind::Thunder => "thunder",
            SoundKind::Wind => "wind",
            SoundKind::Night => "night",
        }
    }

    /// Premium sounds are only synthesized live
    pub fn is_premium(self) -> bool {
        matches!(self, SoundKind::Thunder | SoundKind::Wind | SoundKind::Night)
    }

    /// Asset file name, e.g. `rain.wav`
    pub fn file_name(self) -> String {
        format!("{}.wav", self.name())
    }

    pub fn profile(self) -> SoundProfile {
        recipes::profile(self)
    }
}

impl fmt::Display for SoundKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SoundKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SoundKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown sound '{}'", s))
    }
}

/// One continuous noise layer of a bed
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub noise: NoiseKind,
    /// Applied straight after generation (brown noise needs a boost)
    pub pre_gain: f64,
    pub filters: Vec<crate::synth::FilterSpec>,
    pub modulation: Option<Modulation>,
    pub level: f64,
}

impl Layer {
    pub fn render<R: Rng + ?Sized>(&self, n: usize, sample_rate: u32, rng: &mut R) -> Vec<f32> {
        let mut raw = generate(self.noise, n, rng);
        for sample in raw.iter_mut() {
            *sample *= self.pre_gain as f32;
        }

        let mut shaped = apply_chain(&raw, &self.filters, sample_rate);
        if let Some(modulation) = &self.modulation {
            modulation.apply(&mut shaped, sample_rate);
        }
        for sample in shaped.iter_mut() {
            *sample *= self.level as f32;
        }
        shaped
    }
}

/// Live voice buffer length in seconds
pub const LIVE_BUFFER_SECS: f64 = 2.0;
/// Crossfade folded into each live buffer
pub const LIVE_CROSSFADE_SECS: f64 = 0.25;

/// A full recipe for one sound
#[derive(Debug, Clone, PartialEq)]
pub struct SoundProfile {
    pub kind: SoundKind,
    pub layers: Vec<Layer>,
    pub transients: Option<TransientLayer>,
    /// Applied to the composite bed
    pub modulation: Option<Modulation>,
    pub target_peak: f32,
}

impl SoundProfile {
    /// Render a loop of `duration` seconds
    ///
    /// `crossfade` seconds of extra material are synthesized and folded into
    /// the head, so the returned buffer is exactly `sample_rate * duration`
    /// samples and loops without a seam.
    ///
    /// # Panics
    /// Panics on a zero sample rate or negative durations.
    pub fn render<R: Rng + ?Sized>(
        &self,
        sample_rate: u32,
        duration: f64,
        crossfade: f64,
        rng: &mut R,
    ) -> Vec<f32> {
        let loop_len = sample_count(sample_rate, duration);
        let fade = sample_count(sample_rate, crossfade).min(loop_len);
        let total = loop_len + fade;

        let mut bed = vec![0.0f32; total];
        for layer in &self.layers {
            mix_into(&mut bed, &layer.render(total, sample_rate, rng), 1.0);
        }
        if let Some(transients) = &self.transients {
            mix_into(&mut bed, &transients.render(total, sample_rate, rng), 1.0);
        }
        if let Some(modulation) = &self.modulation {
            modulation.apply(&mut bed, sample_rate);
        }

        stitch_loop(&mut bed, fade);
        normalize(&mut bed, self.target_peak);
        bed
    }

    /// Render a short looping buffer for a live voice
    pub fn render_live<R: Rng + ?Sized>(&self, sample_rate: u32, rng: &mut R) -> Vec<f32> {
        self.render(sample_rate, LIVE_BUFFER_SECS, LIVE_CROSSFADE_SECS, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn peak(samples: &[f32]) -> f32 {
        samples.iter().fold(0.0f32, |a, &b| a.max(b.abs()))
    }

    #[test]
    fn test_rain_small_render() {
        let mut rng = StdRng::seed_from_u64(2024);
        let rain = SoundKind::Rain.profile().render(8000, 2.0, 0.25, &mut rng);

        assert_eq!(rain.len(), 16_000);
        assert!(rain.iter().all(|s| s.is_finite()));
        assert!((peak(&rain) - 0.8).abs() < 1e-4);
    }

    #[test]
    fn test_every_profile_renders() {
        for kind in SoundKind::ALL {
            let mut rng = StdRng::seed_from_u64(kind as u64);
            let profile = kind.profile();
            let samples = profile.render(8000, 1.0, 0.1, &mut rng);

            assert_eq!(samples.len(), 8000, "{kind}");
            assert!(samples.iter().all(|s| s.is_finite()), "{kind} has non-finite samples");
            assert!(
                (peak(&samples) - profile.target_peak).abs() < 1e-4,
                "{kind} peak {}",
                peak(&samples)
            );
        }
    }

    #[test]
    fn test_stitched_seam_is_an_ordinary_step() {
        let mut rng = StdRng::seed_from_u64(77);
        let rain = SoundKind::Rain.profile().render(8000, 2.0, 0.5, &mut rng);

        let seam = (rain[0] - rain[rain.len() - 1]).abs();
        let largest_step = rain
            .windows(2)
            .map(|w| (w[1] - w[0]).abs())
            .fold(0.0f32, f32::max);
        assert!(seam <= largest_step, "seam {seam} vs largest step {largest_step}");
    }

    #[test]
    fn test_live_buffer_length() {
        let mut rng = StdRng::seed_from_u64(3);
        let night = SoundKind::Night.profile().render_live(22_050, &mut rng);
        assert_eq!(night.len(), 44_100);
        assert!((peak(&night) - 0.7).abs() < 1e-4);
    }

    #[test]
    fn test_zero_duration_renders_nothing() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(SoundKind::Fire.profile().render(8000, 0.0, 1.0, &mut rng).is_empty());
    }

    #[test]
    fn test_offline_set() {
        assert_eq!(SoundKind::OFFLINE.len(), 5);
        assert!(SoundKind::OFFLINE.iter().all(|k| !k.is_premium()));
        assert_eq!(SoundKind::ALL.iter().filter(|k| k.is_premium()).count(), 3);
        assert_eq!(SoundKind::Stream.file_name(), "stream.wav");
    }

    #[test]
    fn test_parse_kind() {
        assert_eq!("rain".parse::<SoundKind>(), Ok(SoundKind::Rain));
        assert_eq!(" Night ".parse::<SoundKind>(), Ok(SoundKind::Night));
        assert!("drums".parse::<SoundKind>().is_err());
    }

    #[test]
    fn test_layer_level_and_pre_gain() {
        let layer = Layer {
            noise: NoiseKind::White,
            pre_gain: 0.5,
            filters: vec![],
            modulation: None,
            level: 0.5,
        };
        let reference = generate(NoiseKind::White, 64, &mut StdRng::seed_from_u64(4));
        let rendered = layer.render(64, 8000, &mut StdRng::seed_from_u64(4));
        for (r, x) in rendered.iter().zip(&reference) {
            assert!((r - x * 0.25).abs() < 1e-6);
        }
    }
}
