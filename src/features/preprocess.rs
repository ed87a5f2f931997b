//! Image preprocessing for the feature network.

use image::imageops::{self, FilterType};
use image::RgbImage;
use ndarray::{Array3, Array4};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Resize-shortest-side, scale to [0, 1], per-channel normalize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preprocess {
    /// Target length of the shorter image side
    pub shortest_side: u32,
    /// Per-channel mean subtracted after scaling
    pub mean: [f32; 3],
    /// Per-channel std divided after mean subtraction
    pub std: [f32; 3],
}

impl Default for Preprocess {
    fn default() -> Self {
        Self::imagenet()
    }
}

impl Preprocess {
    pub const IMAGENET_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
    pub const IMAGENET_STD: [f32; 3] = [0.229, 0.224, 0.225];

    /// ImageNet statistics with a 224 pixel shortest side.
    #[must_use]
    pub fn imagenet() -> Self {
        Self::with_shortest_side(224)
    }

    /// ImageNet statistics with a custom shortest side.
    #[must_use]
    pub fn with_shortest_side(shortest_side: u32) -> Self {
        Self {
            shortest_side,
            mean: Self::IMAGENET_MEAN,
            std: Self::IMAGENET_STD,
        }
    }

    /// Output `(width, height)` for an input size; the long side keeps the aspect
    /// ratio, truncated to an integer.
    #[must_use]
    pub fn target_dims(&self, width: u32, height: u32) -> (u32, u32) {
        let side = self.shortest_side;
        if width <= height {
            let long = (u64::from(side) * u64::from(height) / u64::from(width.max(1))) as u32;
            (side, long)
        } else {
            let long = (u64::from(side) * u64::from(width) / u64::from(height.max(1))) as u32;
            (long, side)
        }
    }

    /// Convert an image to a normalized `(3, H, W)` tensor.
    #[must_use]
    pub fn apply(&self, image: &RgbImage) -> Array3<f32> {
        let (w, h) = self.target_dims(image.width(), image.height());
        let resized;
        let source = if (w, h) == image.dimensions() {
            image
        } else {
            resized = imageops::resize(image, w, h, FilterType::Triangle);
            &resized
        };

        Array3::from_shape_fn((3, h as usize, w as usize), |(c, y, x)| {
            let value = f32::from(source.get_pixel(x as u32, y as u32)[c]) / 255.0;
            (value - self.mean[c]) / self.std[c]
        })
    }
}

/// Stack preprocessed `(3, H, W)` tensors into a `(batch, 3, H, W)` batch.
pub fn stack_images(tensors: &[Array3<f32>]) -> Result<Array4<f32>> {
    let Some(first) = tensors.first() else {
        return Err(Error::InvalidArgument("cannot stack an empty image batch".into()));
    };
    let (c, h, w) = first.dim();
    let mut batch = Array4::zeros((tensors.len(), c, h, w));
    for (i, tensor) in tensors.iter().enumerate() {
        if tensor.dim() != (c, h, w) {
            return Err(Error::shape(
                format!("preprocessed image {i}"),
                &[c, h, w],
                tensor.shape(),
            ));
        }
        batch.index_axis_mut(ndarray::Axis(0), i).assign(tensor);
    }
    Ok(batch)
}
