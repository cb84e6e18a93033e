//! Noise generators
//!
//! White, pink and brown noise sources. Every generator starts from zeroed
//! registers, so two renders never share state.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Leak coefficient used by brown noise unless a profile overrides it
pub const DEFAULT_BROWN_LEAK: f64 = 0.02;

/// Noise colour
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoiseKind {
    /// Flat spectrum
    White,
    /// -3 dB/octave (Paul Kellet's refined filter)
    Pink,
    /// -6 dB/octave leaky integrator with leak `k`
    Brown { leak: f64 },
}

impl NoiseKind {
    /// Brown noise with the default leak
    pub fn brown() -> Self {
        NoiseKind::Brown {
            leak: DEFAULT_BROWN_LEAK,
        }
    }
}

/// Uniform white noise in [-1, 1]
pub fn white_sample<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.gen_range(-1.0..=1.0)
}

/// Pink noise generator state
#[derive(Debug, Default, Clone)]
pub struct PinkNoise {
    b: [f64; 7],
}

impl PinkNoise {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one white sample and return the next pink sample
    pub fn next(&mut self, white: f64) -> f64 {
        let b = &mut self.b;
        b[0] = 0.99886 * b[0] + white * 0.0555179;
        b[1] = 0.99332 * b[1] + white * 0.0750759;
        b[2] = 0.96900 * b[2] + white * 0.1538520;
        b[3] = 0.86650 * b[3] + white * 0.3104856;
        b[4] = 0.55000 * b[4] + white * 0.5329522;
        b[5] = -0.7616 * b[5] - white * 0.0168980;
        let out = (b.iter().sum::<f64>() + white * 0.5362) * 0.11;
        b[6] = white * 0.115926;
        out
    }
}

/// Brown (red) noise generator state
#[derive(Debug, Clone)]
pub struct BrownNoise {
    leak: f64,
    last: f64,
}

impl BrownNoise {
    /// Create a generator with leak `k`
    ///
    /// # Panics
    /// Panics if `leak` is not positive.
    pub fn new(leak: f64) -> Self {
        assert!(leak > 0.0, "brown noise leak must be positive, got {leak}");
        Self { leak, last: 0.0 }
    }

    pub fn next(&mut self, white: f64) -> f64 {
        self.last = (self.last + self.leak * white) / (1.0 + self.leak);
        self.last
    }
}

/// Generate `n` samples of the given noise colour
pub fn generate<R: Rng + ?Sized>(kind: NoiseKind, n: usize, rng: &mut R) -> Vec<f32> {
    let mut out = Vec::with_capacity(n);
    match kind {
        NoiseKind::White => {
            out.extend((0..n).map(|_| white_sample(rng) as f32));
        }
        NoiseKind::Pink => {
            let mut pink = PinkNoise::new();
            out.extend((0..n).map(|_| pink.next(white_sample(rng)) as f32));
        }
        NoiseKind::Brown { leak } => {
            let mut brown = BrownNoise::new(leak);
            out.extend((0..n).map(|_| brown.next(white_sample(rng)) as f32));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Mean squared first difference over signal power. Near 2.0 for white
    /// noise, much lower for noise with a falling spectrum.
    fn high_frequency_ratio(samples: &[f32]) -> f64 {
        let power: f64 = samples.iter().map(|&s| (s as f64).powi(2)).sum();
        let diff: f64 = samples
            .windows(2)
            .map(|w| (w[1] as f64 - w[0] as f64).powi(2))
            .sum();
        diff / power
    }

    #[test]
    fn test_empty_request() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(generate(NoiseKind::White, 0, &mut rng).is_empty());
        assert!(generate(NoiseKind::Pink, 0, &mut rng).is_empty());
        assert!(generate(NoiseKind::brown(), 0, &mut rng).is_empty());
    }

    #[test]
    fn test_white_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let samples = generate(NoiseKind::White, 10_000, &mut rng);
        assert_eq!(samples.len(), 10_000);
        assert!(samples.iter().all(|s| (-1.0..=1.0).contains(s)));
        let mean: f32 = samples.iter().sum::<f32>() / samples.len() as f32;
        assert!(mean.abs() < 0.05, "mean drifted: {mean}");
    }

    #[test]
    fn test_pink_is_darker_than_white() {
        let mut rng = StdRng::seed_from_u64(42);
        let white = generate(NoiseKind::White, 44_100, &mut rng);
        let pink = generate(NoiseKind::Pink, 44_100, &mut rng);

        let white_ratio = high_frequency_ratio(&white);
        let pink_ratio = high_frequency_ratio(&pink);
        assert!(white_ratio > 1.5, "white ratio {white_ratio}");
        assert!(
            pink_ratio < white_ratio * 0.6,
            "pink {pink_ratio} vs white {white_ratio}"
        );
    }

    #[test]
    fn test_brown_is_darker_than_pink() {
        let mut rng = StdRng::seed_from_u64(42);
        let pink = generate(NoiseKind::Pink, 44_100, &mut rng);
        let brown = generate(NoiseKind::brown(), 44_100, &mut rng);
        assert!(high_frequency_ratio(&brown) < high_frequency_ratio(&pink));
    }

    #[test]
    fn test_pink_stays_bounded() {
        let mut rng = StdRng::seed_from_u64(3);
        let pink = generate(NoiseKind::Pink, 100_000, &mut rng);
        let peak = pink.iter().fold(0.0f32, |a, &b| a.max(b.abs()));
        assert!(peak < 1.5, "pink peak {peak}");
        assert!(pink.iter().all(|s| s.is_finite()));
    }

    #[test]
    fn test_generators_start_from_zero() {
        // Same seed twice gives the same output: no state survives a call.
        let a = generate(NoiseKind::Pink, 256, &mut StdRng::seed_from_u64(9));
        let b = generate(NoiseKind::Pink, 256, &mut StdRng::seed_from_u64(9));
        assert_eq!(a, b);

        let mut brown = BrownNoise::new(0.02);
        let first = brown.next(1.0);
        assert!((first - 0.02 / 1.02).abs() < 1e-12);
    }

    #[test]
    #[should_panic]
    fn test_brown_rejects_zero_leak() {
        BrownNoise::new(0.0);
    }
}
