//! Contract for a pretrained mapping + synthesis network.

use ndarray::{Array3, Array4, ArrayView2, ArrayView3};

use crate::error::Result;
use crate::latent::LatentAnchor;

/// A style-based generator split into its mapping and synthesis stages.
pub trait GenerativeNetwork {
    /// Width of the z noise vectors.
    fn z_dim(&self) -> usize;

    /// Width of each w latent copy.
    fn w_dim(&self) -> usize;

    /// Number of style-injection points the synthesis stage expects.
    fn num_ws(&self) -> usize;

    /// Side length of the square output image.
    fn resolution(&self) -> usize;

    /// Average latent(s) used as truncation anchor.
    fn anchor(&self) -> &LatentAnchor;

    /// Raw mapping `(batch, z_dim)` to `(batch, num_ws, w_dim)`, without truncation.
    ///
    /// `class_one_hot` is `(batch, num_classes)` for conditional networks and `None`
    /// otherwise.
    fn map(
        &self,
        z: ArrayView2<'_, f32>,
        class_one_hot: Option<ArrayView2<'_, f32>>,
    ) -> Result<Array3<f32>>;

    /// Deterministic synthesis `(batch, num_ws, w_dim)` to `(batch, 3, res, res)`.
    fn synthesize(&self, w: ArrayView3<'_, f32>) -> Result<Array4<f32>>;
}
