//! Seeded average-pooling reference feature network.

use image::RgbImage;
use ndarray::{Array2, Array3, Array4, ArrayView4};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

use super::depth::FeatureDepth;
use super::network::FeatureNetwork;
use super::preprocess::Preprocess;
use crate::error::{Error, Result};

/// Shape of the reference pyramid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PyramidConfig {
    /// Output channels at pool1..pool5
    pub widths: [usize; 5],
    /// Shortest image side after preprocessing
    pub input_size: u32,
    /// Seed for the channel mixing weights
    pub seed: u64,
}

impl Default for PyramidConfig {
    fn default() -> Self {
        Self {
            widths: [64, 128, 256, 512, 512],
            input_size: 224,
            seed: 7,
        }
    }
}

/// Stand-in for a VGG-style network: at depth `k` the input is average-pooled by
/// `2^(k+1)` and mixed into `widths[k]` channels followed by ReLU.
///
/// Reproduces the resolution/channel trade-off of the real network (shallow: high
/// resolution, few channels) without pretrained weights.
#[derive(Debug, Clone)]
pub struct PoolingPyramid {
    config: PyramidConfig,
    preprocess: Preprocess,
    /// One `(width, 3)` mixing matrix per depth
    mixing: Vec<Array2<f32>>,
}

impl PoolingPyramid {
    /// Build the pyramid from a seed.
    pub fn new(config: PyramidConfig) -> Result<Self> {
        if config.widths.contains(&0) || config.input_size == 0 {
            return Err(Error::InvalidArgument(format!(
                "pyramid widths and input size must be positive: {config:?}"
            )));
        }
        let mut rng = StdRng::seed_from_u64(config.seed);
        let mixing = config
            .widths
            .iter()
            .map(|&width| {
                Array2::from_shape_simple_fn((width, 3), || {
                    rng.sample::<f32, _>(StandardNormal)
                })
            })
            .collect();
        Ok(Self {
            preprocess: Preprocess::with_shortest_side(config.input_size),
            config,
            mixing,
        })
    }

    /// Pyramid configuration.
    #[must_use]
    pub fn config(&self) -> &PyramidConfig {
        &self.config
    }

    /// Pooling factor at a depth.
    #[must_use]
    pub fn stride(depth: FeatureDepth) -> usize {
        1 << (depth.index() + 1)
    }
}

impl FeatureNetwork for PoolingPyramid {
    fn preprocess(&self, image: &RgbImage) -> Result<Array3<f32>> {
        Ok(self.preprocess.apply(image))
    }

    fn forward_to(&self, input: ArrayView4<'_, f32>, depth: FeatureDepth) -> Result<Array4<f32>> {
        let (b, c, h, w) = input.dim();
        if c != 3 {
            return Err(Error::shape("pyramid input channels", &[b, 3, h, w], input.shape()));
        }
        let stride = Self::stride(depth);
        let (ph, pw) = (h / stride, w / stride);
        if ph == 0 || pw == 0 {
            return Err(Error::InvalidArgument(format!(
                "input {h}x{w} too small for {depth} (stride {stride})"
            )));
        }

        let mixing = &self.mixing[depth.index()];
        let width = mixing.nrows();
        let area = (stride * stride) as f32;

        let mut out = Array4::zeros((b, width, ph, pw));
        for n in 0..b {
            for y in 0..ph {
                for x in 0..pw {
                    let mut pooled = [0.0f32; 3];
                    for (ch, slot) in pooled.iter_mut().enumerate() {
                        let mut acc = 0.0;
                        for dy in 0..stride {
                            for dx in 0..stride {
                                acc += input[[n, ch, y * stride + dy, x * stride + dx]];
                            }
                        }
                        *slot = acc / area;
                    }
                    for k in 0..width {
                        let v = mixing[[k, 0]] * pooled[0]
                            + mixing[[k, 1]] * pooled[1]
                            + mixing[[k, 2]] * pooled[2];
                        out[[n, k, y, x]] = v.max(0.0);
                    }
                }
            }
        }
        Ok(out)
    }
}
