//! Affine scale for 8-bit feature quantization.

use serde::{Deserialize, Serialize};

/// Number of quantization steps between `min` and `max`.
pub(crate) const LEVELS: f64 = 255.0;

/// Observed value range of one feature layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureScale {
    /// Smallest observed activation
    pub min: f32,
    /// Largest observed activation
    pub max: f32,
}

impl FeatureScale {
    /// Create a scale from an observed range.
    #[must_use]
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Range of a slice, `None` when empty.
    #[must_use]
    pub fn from_values(values: &[f32]) -> Option<Self> {
        let (min, max) = values.iter().fold(
            (f32::INFINITY, f32::NEG_INFINITY),
            |(lo, hi), &v| (lo.min(v), hi.max(v)),
        );
        (min <= max).then_some(Self { min, max })
    }

    /// `max == min`: every value quantizes to zero.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        !(self.max > self.min)
    }

    /// Width of one quantization step.
    #[must_use]
    pub fn step(&self) -> f32 {
        ((f64::from(self.max) - f64::from(self.min)) / LEVELS) as f32
    }

    /// Quantize one value. Values outside the range saturate.
    #[inline]
    #[must_use]
    pub fn quantize_value(&self, value: f32) -> u8 {
        if self.is_degenerate() {
            return 0;
        }
        let min = f64::from(self.min);
        let range = f64::from(self.max) - min;
        ((f64::from(value) - min) / range * LEVELS)
            .round()
            .clamp(0.0, LEVELS) as u8
    }

    /// Invert [`Self::quantize_value`] up to one step.
    #[inline]
    #[must_use]
    pub fn dequantize_value(&self, q: u8) -> f64 {
        let min = f64::from(self.min);
        f64::from(q) * ((f64::from(self.max) - min) / LEVELS) + min
    }
}
