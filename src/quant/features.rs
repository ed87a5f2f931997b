//! Quantized feature matrices.

use ndarray::{s, Array, Array2, ArrayView, ArrayView2, Dimension, Ix4};
use std::ops::Range;

use super::scale::FeatureScale;
use crate::error::{Error, Result};

/// Quantize with a global range computed from `values` itself.
///
/// Returns the codes and the scale needed to invert them. An empty input gets a
/// degenerate `(0, 0)` scale.
pub fn quantize<D: Dimension>(values: &ArrayView<'_, f32, D>) -> (Array<u8, D>, FeatureScale) {
    let (min, max) = values.iter().fold(
        (f32::INFINITY, f32::NEG_INFINITY),
        |(lo, hi), &v| (lo.min(v), hi.max(v)),
    );
    let scale = if min <= max {
        FeatureScale::new(min, max)
    } else {
        FeatureScale::new(0.0, 0.0)
    };
    (quantize_with(values, scale), scale)
}

/// Quantize with an externally supplied scale.
pub fn quantize_with<D: Dimension>(
    values: &ArrayView<'_, f32, D>,
    scale: FeatureScale,
) -> Array<u8, D> {
    values.mapv(|v| scale.quantize_value(v))
}

/// Map codes back to floats with the scale captured at quantization time.
pub fn dequantize<D: Dimension>(codes: &ArrayView<'_, u8, D>, scale: FeatureScale) -> Array<f32, D> {
    codes.mapv(|q| scale.dequantize_value(q) as f32)
}

/// One feature layer for a set of examples: `u8` codes paired with their scale.
///
/// Rows are examples; each row is a flattened `(channels, height, width)` map.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantizedFeatures {
    codes: Array2<u8>,
    example_shape: [usize; 3],
    scale: FeatureScale,
}

impl QuantizedFeatures {
    /// Pair codes `(n_examples, c*h*w)` with their per-example shape and scale.
    pub fn new(codes: Array2<u8>, example_shape: [usize; 3], scale: FeatureScale) -> Result<Self> {
        let dims: usize = example_shape.iter().product();
        if codes.ncols() != dims {
            return Err(Error::shape(
                "quantized feature rows",
                &[codes.nrows(), dims],
                codes.shape(),
            ));
        }
        Ok(Self {
            codes,
            example_shape,
            scale,
        })
    }

    /// Quantize a float batch `(n, c, h, w)` with its own global range.
    pub fn from_float(features: &ArrayView<'_, f32, Ix4>) -> Result<Self> {
        let (n, c, h, w) = features.dim();
        let (codes, scale) = quantize(features);
        let codes = Array2::from_shape_vec((n, c * h * w), codes.iter().copied().collect())
            .map_err(|e| Error::Numerical(format!("feature flatten failed: {e}")))?;
        Self::new(codes, [c, h, w], scale)
    }

    /// Number of examples.
    #[must_use]
    pub fn n_examples(&self) -> usize {
        self.codes.nrows()
    }

    /// Flattened feature dimension per example.
    #[must_use]
    pub fn n_dims(&self) -> usize {
        self.codes.ncols()
    }

    /// `(channels, height, width)` of one example.
    #[must_use]
    pub fn example_shape(&self) -> [usize; 3] {
        self.example_shape
    }

    /// Scale captured at extraction time.
    #[must_use]
    pub fn scale(&self) -> FeatureScale {
        self.scale
    }

    /// Raw codes.
    #[must_use]
    pub fn codes(&self) -> ArrayView2<'_, u8> {
        self.codes.view()
    }

    /// Consume into codes and scale.
    #[must_use]
    pub fn into_parts(self) -> (Array2<u8>, [usize; 3], FeatureScale) {
        (self.codes, self.example_shape, self.scale)
    }

    /// Dequantize a block of examples.
    #[must_use]
    pub fn dequantize_rows(&self, rows: Range<usize>) -> Array2<f64> {
        let scale = self.scale;
        self.codes
            .slice(s![rows, ..])
            .mapv(|q| scale.dequantize_value(q))
    }

    /// Dequantize a block of feature dimensions for every example.
    #[must_use]
    pub fn dequantize_columns(&self, cols: Range<usize>) -> Array2<f64> {
        let scale = self.scale;
        self.codes
            .slice(s![.., cols])
            .mapv(|q| scale.dequantize_value(q))
    }

    /// Keep only the given examples, in order.
    #[must_use]
    pub fn select(&self, rows: &[usize]) -> Self {
        Self {
            codes: self.codes.select(ndarray::Axis(0), rows),
            example_shape: self.example_shape,
            scale: self.scale,
        }
    }
}
