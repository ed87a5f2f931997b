//! 8-bit affine quantization of feature activations
//!
//! Feature maps at shallow depths are large, so they are stored as `u8` with the
//! `(min, max)` pair needed to map them back to floats:
//!
//! ```text
//! q = round((v - min) / (max - min) * 255)
//! v ≈ q * ((max - min) / 255) + min
//! ```
//!
//! The scale is computed globally over a batch (not per channel) and travels with
//! the data in [`QuantizedFeatures`]; dequantization always uses that stored scale.

mod features;
mod observer;
mod scale;


pub use features::{dequantize, quantize, quantize_with, QuantizedFeatures};
pub use observer::MinMaxObserver;
pub use scale::FeatureScale;
