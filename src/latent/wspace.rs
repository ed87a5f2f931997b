//! Conversions between single-copy and replicated w latents.

use ndarray::{s, Array2, Array3, ArrayView2, ArrayView3};

/// Broadcast single-copy latents `(n, w_dim)` to `(n, num_ws, w_dim)`.
#[must_use]
pub fn replicate(w: ArrayView2<'_, f32>, num_ws: usize) -> Array3<f32> {
    let (n, w_dim) = w.dim();
    Array3::from_shape_fn((n, num_ws, w_dim), |(i, _, k)| w[[i, k]])
}

/// First style copy of replicated latents, `(n, num_ws, w_dim)` to `(n, w_dim)`.
#[must_use]
pub fn first_copy(w: ArrayView3<'_, f32>) -> Array2<f32> {
    w.slice(s![.., 0, ..]).to_owned()
}
