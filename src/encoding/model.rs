//! Per-depth collection of ridge models.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use ndarray::{Array2, ArrayView2};

use super::ridge::{RidgeCv, RidgeModel};
use crate::data::{load_linear_map, save_linear_map};
use crate::error::{Error, Result, ResultExt};
use crate::features::FeatureDepth;
use crate::quant::QuantizedFeatures;

/// One ridge model per feature depth, all sharing the same response channels.
#[derive(Debug, Clone, Default)]
pub struct EncodingModel {
    layers: BTreeMap<FeatureDepth, RidgeModel>,
    chunk_rows: usize,
}

impl EncodingModel {
    /// Fit a ridge model for each `(depth, features)` pair against the same responses.
    pub fn fit(
        features: &[(FeatureDepth, QuantizedFeatures)],
        responses: ArrayView2<'_, f64>,
        ridge: &RidgeCv,
    ) -> Result<Self> {
        if features.is_empty() {
            return Err(Error::InvalidArgument("no feature layers to fit".into()));
        }
        let mut layers = BTreeMap::new();
        for (depth, layer) in features {
            tracing::info!(layer = %depth, dims = layer.n_dims(), "fitting encoding layer");
            let model = ridge.fit(layer, responses).at_step(|| format!("layer {depth}"))?;
            layers.insert(*depth, model);
        }
        Ok(Self {
            layers,
            chunk_rows: ridge.chunk_rows,
        })
    }

    /// Assemble from already fitted layers.
    #[must_use]
    pub fn from_layers(layers: BTreeMap<FeatureDepth, RidgeModel>, chunk_rows: usize) -> Self {
        Self { layers, chunk_rows }
    }

    /// Fitted depths in ascending order.
    pub fn depths(&self) -> impl Iterator<Item = FeatureDepth> + '_ {
        self.layers.keys().copied()
    }

    pub fn layer(&self, depth: FeatureDepth) -> Option<&RidgeModel> {
        self.layers.get(&depth)
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Predict responses from every supplied feature layer.
    ///
    /// Each layer is dequantized with its own stored scale, independent of the
    /// scale the training features carried.
    pub fn predict(
        &self,
        features: &[(FeatureDepth, QuantizedFeatures)],
    ) -> Result<Vec<(FeatureDepth, Array2<f64>)>> {
        features
            .iter()
            .map(|(depth, layer)| {
                let model = self.layers.get(depth).ok_or_else(|| {
                    Error::InvalidArgument(format!("no encoding model fitted for layer {depth}"))
                })?;
                let pred = model
                    .predict(layer, self.chunk_rows.max(1))
                    .at_step(|| format!("layer {depth}"))?;
                Ok((*depth, pred))
            })
            .collect()
    }

    fn layer_path(dir: &Path, depth: FeatureDepth) -> PathBuf {
        dir.join(format!("encoder_{depth}.safetensors"))
    }

    /// Write one `encoder_<layer>.safetensors` file per fitted depth.
    pub fn save(&self, dir: &Path) -> Result<()> {
        for (depth, model) in &self.layers {
            save_linear_map(&Self::layer_path(dir, *depth), &model.to_linear_map()?)
                .at_step(|| format!("layer {depth}"))?;
        }
        Ok(())
    }

    /// Load the listed depths written by [`EncodingModel::save`].
    pub fn load(dir: &Path, depths: &[FeatureDepth], chunk_rows: usize) -> Result<Self> {
        let layers = depths
            .iter()
            .map(|&depth| {
                let map = load_linear_map(&Self::layer_path(dir, depth))?;
                Ok((depth, RidgeModel::from_linear_map(&map).at_step(|| format!("layer {depth}"))?))
            })
            .collect::<Result<BTreeMap<_, _>>>()?;
        Ok(Self::from_layers(layers, chunk_rows))
    }
}
