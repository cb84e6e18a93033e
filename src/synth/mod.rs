//! Synthesis building blocks
//!
//! Noise generators, biquad filters, transient events, amplitude modulation
//! and loop finishing. Shared by the offline renderer and the live mixer.

pub mod filter;
pub mod modulation;
pub mod noise;
pub mod stitch;
pub mod transient;

pub use filter::{apply_chain, Biquad, Coefficients, FilterSpec};
pub use modulation::{Modulation, SineTerm};
pub use noise::{generate, NoiseKind};
pub use stitch::{mix_into, normalize, sample_count, stitch_loop};
pub use transient::{Timbre, TransientLayer};

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Random source used for rendering
pub type NoiseRng = StdRng;

/// Seeded when `seed` is given, otherwise from OS entropy
pub fn noise_rng(seed: Option<u64>) -> NoiseRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
