//! Biquad filter implementation
//!
//! Second-order IIR stages using the RBJ Audio EQ Cookbook formulas. A
//! filter pass owns its delay registers, so every call starts from silence
//! and never mutates its input.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Butterworth Q
pub const DEFAULT_Q: f64 = 0.707;

/// One filter stage of a profile chain
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FilterSpec {
    LowPass { freq: f64, q: f64 },
    /// Constant 0 dB peak gain band-pass
    BandPass { freq: f64, q: f64 },
    /// Shelf slope fixed at 1
    HighShelf { freq: f64, gain_db: f64 },
}

impl FilterSpec {
    /// Butterworth low-pass at `freq`
    pub fn lowpass(freq: f64) -> Self {
        FilterSpec::LowPass { freq, q: DEFAULT_Q }
    }

    pub fn bandpass(freq: f64, q: f64) -> Self {
        FilterSpec::BandPass { freq, q }
    }

    pub fn highshelf(freq: f64, gain_db: f64) -> Self {
        FilterSpec::HighShelf { freq, gain_db }
    }

    fn freq(&self) -> f64 {
        match *self {
            FilterSpec::LowPass { freq, .. }
            | FilterSpec::BandPass { freq, .. }
            | FilterSpec::HighShelf { freq, .. } => freq,
        }
    }
}

/// Biquad filter coefficients, normalized by a0
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coefficients {
    pub b0: f64,
    pub b1: f64,
    pub b2: f64,
    pub a1: f64,
    pub a2: f64,
}

impl Coefficients {
    /// Derive coefficients for `spec` at `sample_rate`
    ///
    /// The corner frequency is clamped to [10 Hz, 0.45 * sample_rate] so a
    /// recipe written for 44.1 kHz stays stable at low rates. Below about
    /// 23 Hz the ceiling wins and the floor drops with it.
    ///
    /// # Panics
    /// Panics on a zero sample rate or a non-positive Q.
    pub fn new(spec: FilterSpec, sample_rate: u32) -> Self {
        assert!(sample_rate > 0, "sample rate must be nonzero");
        let sr = sample_rate as f64;
        let ceiling = sr * 0.45;
        let freq = spec.freq().clamp(10f64.min(ceiling), ceiling);

        let omega = 2.0 * PI * freq / sr;
        let sin_omega = omega.sin();
        let cos_omega = omega.cos();

        let (b0, b1, b2, a0, a1, a2) = match spec {
            FilterSpec::LowPass { q, .. } => {
                assert!(q > 0.0, "Q must be positive, got {q}");
                let alpha = sin_omega / (2.0 * q);
                let b1 = 1.0 - cos_omega;
                let b0 = b1 / 2.0;
                (b0, b1, b0, 1.0 + alpha, -2.0 * cos_omega, 1.0 - alpha)
            }
            FilterSpec::BandPass { q, .. } => {
                assert!(q > 0.0, "Q must be positive, got {q}");
                let alpha = sin_omega / (2.0 * q);
                (alpha, 0.0, -alpha, 1.0 + alpha, -2.0 * cos_omega, 1.0 - alpha)
            }
            FilterSpec::HighShelf { gain_db, .. } => {
                let a = 10f64.powf(gain_db / 40.0);
                // S = 1: alpha = sin(w0)/2 * sqrt(2)
                let alpha = sin_omega / 2.0 * 2f64.sqrt();
                let two_sqrt_a_alpha = 2.0 * a.sqrt() * alpha;
                (
                    a * ((a + 1.0) + (a - 1.0) * cos_omega + two_sqrt_a_alpha),
                    -2.0 * a * ((a - 1.0) + (a + 1.0) * cos_omega),
                    a * ((a + 1.0) + (a - 1.0) * cos_omega - two_sqrt_a_alpha),
                    (a + 1.0) - (a - 1.0) * cos_omega + two_sqrt_a_alpha,
                    2.0 * ((a - 1.0) - (a + 1.0) * cos_omega),
                    (a + 1.0) - (a - 1.0) * cos_omega - two_sqrt_a_alpha,
                )
            }
        };

        Self {
            b0: b0 / a0,
            b1: b1 / a0,
            b2: b2 / a0,
            a1: a1 / a0,
            a2: a2 / a0,
        }
    }
}

/// A single biquad stage
#[derive(Debug, Clone, Copy)]
pub struct Biquad {
    coeffs: Coefficients,
}

impl Biquad {
    pub fn new(spec: FilterSpec, sample_rate: u32) -> Self {
        Self {
            coeffs: Coefficients::new(spec, sample_rate),
        }
    }

    pub fn coefficients(&self) -> Coefficients {
        self.coeffs
    }

    /// Filter `input` into a new buffer of the same length
    pub fn apply(&self, input: &[f32]) -> Vec<f32> {
        let Coefficients { b0, b1, b2, a1, a2 } = self.coeffs;
        let (mut x1, mut x2, mut y1, mut y2) = (0.0f64, 0.0f64, 0.0f64, 0.0f64);

        input
            .iter()
            .map(|&sample| {
                let x0 = sample as f64;
                let y0 = b0 * x0 + b1 * x1 + b2 * x2 - a1 * y1 - a2 * y2;
                x2 = x1;
                x1 = x0;
                y2 = y1;
                y1 = y0;
                y0 as f32
            })
            .collect()
    }
}

/// Run `input` through every stage of `chain` in order
pub fn apply_chain(input: &[f32], chain: &[FilterSpec], sample_rate: u32) -> Vec<f32> {
    let mut buffer = input.to_vec();
    for &spec in chain {
        buffer = Biquad::new(spec, sample_rate).apply(&buffer);
    }
    buffer
}
