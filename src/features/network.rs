//! Contract for a pretrained discriminative feature network.

use image::RgbImage;
use ndarray::{Array3, Array4, ArrayView4};

use super::depth::FeatureDepth;
use super::preprocess::Preprocess;
use crate::error::Result;

/// A network that can be run forward up to one of five depths.
///
/// Any implementation with the same contract can be substituted, including stubs
/// returning fixed-shape tensors in tests.
pub trait FeatureNetwork {
    /// Convert an image to the network's `(3, H, W)` input.
    fn preprocess(&self, image: &RgbImage) -> Result<Array3<f32>> {
        Ok(Preprocess::imagenet().apply(image))
    }

    /// Activations `(batch, channels, height, width)` after layers `[0, depth.cut())`.
    fn forward_to(&self, input: ArrayView4<'_, f32>, depth: FeatureDepth) -> Result<Array4<f32>>;
}
