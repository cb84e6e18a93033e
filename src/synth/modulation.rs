//! Slow amplitude modulation
//!
//! A DC bias plus a handful of slow sines, multiplied into a buffer to give
//! it waves of intensity.

use std::f64::consts::PI;

/// One sine term of a modulation curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SineTerm {
    /// Frequency in Hz
    pub freq: f64,
    pub amplitude: f64,
    /// Phase offset in radians
    pub phase: f64,
}

impl SineTerm {
    pub const fn new(freq: f64, amplitude: f64, phase: f64) -> Self {
        Self {
            freq,
            amplitude,
            phase,
        }
    }
}

/// `bias + sum(amplitude * sin(2 pi f t + phase))`
#[derive(Debug, Clone, PartialEq)]
pub struct Modulation {
    pub bias: f64,
    pub terms: Vec<SineTerm>,
}

impl Modulation {
    pub fn new(bias: f64, terms: Vec<SineTerm>) -> Self {
        Self { bias, terms }
    }

    /// Gain at time `t` seconds
    pub fn gain_at(&self, t: f64) -> f64 {
        self.bias
            + self
                .terms
                .iter()
                .map(|term| term.amplitude * (2.0 * PI * term.freq * t + term.phase).sin())
                .sum::<f64>()
    }

    /// Multiply every sample by the curve, `t = index / sample_rate`
    pub fn apply(&self, buffer: &mut [f32], sample_rate: u32) {
        assert!(sample_rate > 0, "sample rate must be nonzero");
        let sr = sample_rate as f64;
        for (i, sample) in buffer.iter_mut().enumerate() {
            *sample = (*sample as f64 * self.gain_at(i as f64 / sr)) as f32;
        }
    }
}
