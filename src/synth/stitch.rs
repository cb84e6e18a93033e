//! Loop stitching
//!
//! Buffers are rendered with `n` samples of overhang past the loop length.
//! The overhang is the natural continuation of the loop's last sample, so
//! equal-power fading it into the head makes the wrap seamless, then it is
//! cut off.

use std::f64::consts::FRAC_PI_2;

/// Number of samples in `seconds` at `sample_rate`
///
/// # Panics
/// Panics on a zero sample rate or a negative or non-finite duration.
pub fn sample_count(sample_rate: u32, seconds: f64) -> usize {
    assert!(sample_rate > 0, "sample rate must be nonzero");
    assert!(
        seconds.is_finite() && seconds >= 0.0,
        "duration must be a non-negative number of seconds, got {seconds}"
    );
    (sample_rate as f64 * seconds).round() as usize
}

/// Blend the trailing `crossfade` samples into the head and drop them
///
/// On return `buffer` is `crossfade` samples shorter. For head index `i`
/// with `t = i / crossfade`:
/// `head[i] = head[i] * sin(t pi/2) + overhang[i] * cos(t pi/2)`.
/// `crossfade` is clamped to half the buffer.
pub fn stitch_loop(buffer: &mut Vec<f32>, crossfade: usize) {
    let n = crossfade.min(buffer.len() / 2);
    if n == 0 {
        return;
    }

    let loop_len = buffer.len() - n;
    let (head, overhang) = buffer.split_at_mut(loop_len);
    for (i, (h, &o)) in head.iter_mut().zip(overhang.iter()).enumerate() {
        let t = i as f64 / n as f64;
        let fade_in = (t * FRAC_PI_2).sin();
        let fade_out = (t * FRAC_PI_2).cos();
        *h = (*h as f64 * fade_in + o as f64 * fade_out) as f32;
    }
    buffer.truncate(loop_len);
}

/// Peak-normalize to `target`
///
/// Silent buffers are left alone.
///
/// # Panics
/// Panics unless `0 < target <= 1`.
pub fn normalize(buffer: &mut [f32], target: f32) {
    assert!(
        target > 0.0 && target <= 1.0,
        "target peak must be in (0, 1], got {target}"
    );
    let peak = buffer.iter().fold(0.0f32, |a, &b| a.max(b.abs()));
    if peak > 0.0 {
        let scale = target / peak;
        for sample in buffer.iter_mut() {
            *sample *= scale;
        }
    }
}

/// Add `source * gain` into `dest`, sample by sample
pub fn mix_into(dest: &mut [f32], source: &[f32], gain: f32) {
    for (d, &s) in dest.iter_mut().zip(source) {
        *d += s * gain;
    }
}
