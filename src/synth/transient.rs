//! Sparse decaying events
//!
//! Rain drops, fire crackle and cafe clinks: short exponentially decaying
//! bursts triggered at random sample positions and summed into a buffer.

use super::filter::{apply_chain, FilterSpec};
use super::noise::white_sample;
use rand::Rng;
use std::f64::consts::PI;

/// What an event sounds like
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Timbre {
    /// Uniform noise burst
    Noise,
    /// Sine burst with a frequency drawn from `[min_hz, max_hz]`
    Tone { min_hz: f64, max_hz: f64 },
}

/// Parameters for a transient layer
#[derive(Debug, Clone, PartialEq)]
pub struct TransientLayer {
    /// Mean number of events started per second
    pub rate: f64,
    /// Peak amplitude range
    pub amplitude: (f64, f64),
    /// Event length range in seconds
    pub decay: (f64, f64),
    /// Fraction of the event length used as the exponential time constant
    pub shape: f64,
    pub timbre: Timbre,
    /// Applied to the burst buffer before mixing
    pub filters: Vec<FilterSpec>,
    /// Gain at which the bursts join the bed
    pub level: f64,
}

impl TransientLayer {
    /// Chance that any single sample starts an event
    pub fn probability(&self, sample_rate: u32) -> f64 {
        self.rate / sample_rate as f64
    }

    /// Render `n` samples of raw (unfiltered, unscaled) events
    pub fn render_events<R: Rng + ?Sized>(&self, n: usize, sample_rate: u32, rng: &mut R) -> Vec<f32> {
        assert!(sample_rate > 0, "sample rate must be nonzero");
        let sr = sample_rate as f64;
        let probability = self.probability(sample_rate);
        let mut out = vec![0.0f32; n];

        for start in 0..n {
            if rng.gen::<f64>() >= probability {
                continue;
            }

            let amplitude = uniform(rng, self.amplitude);
            let duration = (uniform(rng, self.decay) * sr).max(1.0);
            let freq = match self.timbre {
                Timbre::Noise => 0.0,
                Timbre::Tone { min_hz, max_hz } => uniform(rng, (min_hz, max_hz)),
            };
            self.add_event(&mut out[start..], amplitude, duration, freq, sr, rng);
        }

        out
    }

    /// Sum one decaying event into the start of `out`
    fn add_event<R: Rng + ?Sized>(
        &self,
        out: &mut [f32],
        amplitude: f64,
        duration: f64,
        freq: f64,
        sr: f64,
        rng: &mut R,
    ) {
        let tau = duration * self.shape;
        for (j, slot) in out.iter_mut().take(duration as usize).enumerate() {
            let source = match self.timbre {
                Timbre::Noise => white_sample(rng),
                Timbre::Tone { .. } => (2.0 * PI * freq * j as f64 / sr).sin(),
            };
            *slot += (amplitude * (-(j as f64) / tau).exp() * source) as f32;
        }
    }

    /// Render, filter and scale the layer ready to be added to a bed
    pub fn render<R: Rng + ?Sized>(&self, n: usize, sample_rate: u32, rng: &mut R) -> Vec<f32> {
        let events = self.render_events(n, sample_rate, rng);
        let mut filtered = apply_chain(&events, &self.filters, sample_rate);
        for sample in filtered.iter_mut() {
            *sample *= self.level as f32;
        }
        filtered
    }
}

fn uniform<R: Rng + ?Sized>(rng: &mut R, (lo, hi): (f64, f64)) -> f64 {
    if hi > lo {
        rng.gen_range(lo..hi)
    } else {
        lo
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn clicks(rate: f64) -> TransientLayer {
        TransientLayer {
            rate,
            amplitude: (0.5, 1.0),
            decay: (0.005, 0.01),
            shape: 0.3,
            timbre: Timbre::Noise,
            filters: vec![],
            level: 1.0,
        }
    }

    /// Count runs of nonzero samples separated by silence
    fn count_bursts(samples: &[f32]) -> usize {
        let mut bursts = 0;
        let mut in_burst = false;
        for &s in samples {
            if s != 0.0 && !in_burst {
                bursts += 1;
            }
            in_burst = s != 0.0;
        }
        bursts
    }

    #[test]
    fn test_zero_rate_is_silent() {
        let mut rng = StdRng::seed_from_u64(1);
        let out = clicks(0.0).render(8000, 8000, &mut rng);
        assert_eq!(out.len(), 8000);
        assert!(out.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_event_density_tracks_rate() {
        let mut rng = StdRng::seed_from_u64(11);
        let sr = 44_100;
        // 10 s at 5 events/s, short enough that bursts rarely overlap
        let out = clicks(5.0).render_events(sr as usize * 10, sr, &mut rng);
        let bursts = count_bursts(&out);
        assert!((30..=75).contains(&bursts), "got {bursts} bursts");
    }

    #[test]
    fn test_density_independent_of_sample_rate() {
        let layer = clicks(20.0);
        assert!((layer.probability(8000) * 8000.0 - layer.probability(44_100) * 44_100.0).abs() < 1e-9);
    }

    #[test]
    fn test_tone_event_follows_exponential_envelope() {
        let layer = TransientLayer {
            timbre: Timbre::Tone {
                min_hz: 2000.0,
                max_hz: 2000.0,
            },
            ..clicks(1.0)
        };
        let mut rng = StdRng::seed_from_u64(5);
        let mut out = vec![0.0f32; 1000];
        // 2 kHz at 8 kHz puts the sine peaks on every 4th sample (j = 1, 5, 9, ...)
        layer.add_event(&mut out, 1.0, 800.0, 2000.0, 8000.0, &mut rng);

        assert_eq!(out[0], 0.0);
        let tau = 800.0 * layer.shape;
        for j in [1usize, 41, 201, 401] {
            let expected = (-(j as f64) / tau).exp();
            assert!((out[j] as f64 - expected).abs() < 1e-4, "j={j}: {} vs {expected}", out[j]);
        }
        // Event window ends after `duration` samples
        assert!(out[800..].iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_overlapping_events_add() {
        let layer = clicks(1.0);
        let mut rng = StdRng::seed_from_u64(5);
        let mut out = vec![0.0f32; 100];
        let tone = |out: &mut [f32], rng: &mut StdRng| {
            TransientLayer {
                timbre: Timbre::Tone {
                    min_hz: 1000.0,
                    max_hz: 1000.0,
                },
                ..layer.clone()
            }
            .add_event(out, 0.5, 50.0, 1000.0, 8000.0, rng)
        };
        tone(&mut out, &mut rng);
        let single = out[2];
        tone(&mut out, &mut rng);
        assert!((out[2] - 2.0 * single).abs() < 1e-6);
    }

    #[test]
    fn test_level_scales_output() {
        let mut a = clicks(50.0);
        a.level = 0.5;
        let b = clicks(50.0);

        let quiet = a.render(4000, 8000, &mut StdRng::seed_from_u64(8));
        let loud = b.render(4000, 8000, &mut StdRng::seed_from_u64(8));
        for (q, l) in quiet.iter().zip(&loud) {
            assert!((q * 2.0 - l).abs() < 1e-6);
        }
    }
}
