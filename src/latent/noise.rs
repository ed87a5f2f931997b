//! Sampling of z latents.

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

/// Draw a `(batch, z_dim)` matrix of i.i.d. standard normal noise.
pub fn sample_noise<R: Rng + ?Sized>(rng: &mut R, batch: usize, z_dim: usize) -> Array2<f32> {
    Array2::from_shape_simple_fn((batch, z_dim), || rng.sample::<f32, _>(StandardNormal))
}

/// Deterministic rng for reproducible sampling.
#[must_use]
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}
