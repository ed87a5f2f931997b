//! Configuration for the reference generator.

use serde::{Deserialize, Serialize};

/// Dimensions of a style-based generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Dimension of the z noise space
    pub z_dim: usize,
    /// Dimension of each w latent copy
    pub w_dim: usize,
    /// Number of style-injection points (w copies)
    pub num_ws: usize,
    /// Output image side length in pixels
    pub resolution: usize,
    /// Number of classes for a conditional generator
    pub num_classes: Option<usize>,
    /// Seed for weight initialization
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            z_dim: 64,
            w_dim: 512,
            num_ws: 37,
            resolution: 64,
            num_classes: None,
            seed: 42,
        }
    }
}

impl GeneratorConfig {
    /// Number of raw values per synthesized image.
    #[must_use]
    pub fn pixels_per_image(&self) -> usize {
        3 * self.resolution * self.resolution
    }
}
