//! Decoding of w latents, and images, from neural responses.

use std::path::Path;

use image::RgbImage;
use ndarray::{Array2, ArrayView2};

use super::ols::LinearRegression;
use crate::data::{load_linear_map, save_linear_map};
use crate::error::{Error, Result, ResultExt};
use crate::generative::{GenerativeNetwork, ImageSynthesizer};
use crate::latent::replicate;

/// Linear map from response channels to single-copy w latents.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodingModel {
    pub regression: LinearRegression,
    /// Style copies the synthesizer expects
    pub num_ws: usize,
}

impl DecodingModel {
    /// Fit `responses (n, channels)` to single-copy latents `(n, w_dim)`.
    pub fn fit(responses: ArrayView2<'_, f32>, latents: ArrayView2<'_, f32>, num_ws: usize) -> Result<Self> {
        if num_ws == 0 {
            return Err(Error::InvalidArgument("num_ws must be > 0".into()));
        }
        let regression = LinearRegression::fit(
            responses.mapv(f64::from).view(),
            latents.mapv(f64::from).view(),
        )
        .at_step(|| "decoder fit")?;
        tracing::info!(
            channels = regression.n_inputs(),
            w_dim = regression.n_outputs(),
            "fitted decoding model"
        );
        Ok(Self { regression, num_ws })
    }

    pub fn w_dim(&self) -> usize {
        self.regression.n_outputs()
    }

    /// Predicted single-copy latents `(n, w_dim)`.
    pub fn predict(&self, responses: ArrayView2<'_, f32>) -> Result<Array2<f32>> {
        let pred = self.regression.predict(responses.mapv(f64::from).view())?;
        Ok(pred.mapv(|v| v as f32))
    }

    /// Predict latents, replicate them to `num_ws` copies and synthesize.
    ///
    /// No truncation is applied to decoded latents.
    pub fn reconstruct<G: GenerativeNetwork + ?Sized>(
        &self,
        responses: ArrayView2<'_, f32>,
        synthesizer: &ImageSynthesizer<'_, G>,
        batch_size: usize,
    ) -> Result<Vec<RgbImage>> {
        let w = replicate(self.predict(responses)?.view(), self.num_ws);
        synthesizer.synthesize_chunked(w.view(), batch_size)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        save_linear_map(path, &self.regression.to_linear_map()?.with_meta("num_ws", self.num_ws))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let map = load_linear_map(path)?;
        Ok(Self {
            num_ws: map.meta_parse("num_ws")?,
            regression: LinearRegression::from_linear_map(&map),
        })
    }
}
