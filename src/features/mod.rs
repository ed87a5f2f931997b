//! Feature extraction from a pretrained discriminative network
//!
//! ```text
//! RgbImage ─► preprocess ─► forward_to(depth) ─► [blur + stride 2] ─► quantize ─► QuantizedFeatures
//!                                                  (pool1, pool2 only)
//! ```
//!
//! Extraction runs over fixed-size chunks so that no depth ever holds the full
//! dataset in floating point.

mod blur;
mod depth;
mod extractor;
mod network;
mod preprocess;
mod pyramid;
mod source;

#[cfg(test)]
mod tests;

pub use blur::{blur_downsample, convolve_same, gaussian_kernel, BlurConfig};
pub use depth::FeatureDepth;
pub use extractor::{ExtractionConfig, FeatureExtractor};
pub use network::FeatureNetwork;
pub use preprocess::{stack_images, Preprocess};
pub use pyramid::{PoolingPyramid, PyramidConfig};
pub use source::ImageSource;
