//! Layer-addressable store of quantized features.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::tensors::{self, OwnedTensor};
use crate::error::{Error, Result};
use crate::features::FeatureDepth;
use crate::quant::{FeatureScale, QuantizedFeatures};

const FEATURES: &str = "features";

/// One safetensors file per `(split, layer)` under a root directory.
///
/// Each file holds the u8 codes shaped `(n, c, h, w)` and the scale in its
/// metadata, so codes are always dequantized with the range they were written with.
#[derive(Debug, Clone)]
pub struct FeatureStore {
    root: PathBuf,
}

impl FeatureStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, split: &str, depth: FeatureDepth) -> PathBuf {
        self.root.join(format!("{split}_{depth}.safetensors"))
    }

    pub fn contains(&self, split: &str, depth: FeatureDepth) -> bool {
        self.path(split, depth).is_file()
    }

    pub fn save(&self, split: &str, depth: FeatureDepth, features: &QuantizedFeatures) -> Result<PathBuf> {
        let path = self.path(split, depth);
        let [c, h, w] = features.example_shape();
        let shape = [features.n_examples(), c, h, w];
        let codes = features.codes().as_standard_layout().into_owned();
        let scale = features.scale();

        let metadata = HashMap::from([
            ("min".to_string(), scale.min.to_string()),
            ("max".to_string(), scale.max.to_string()),
            ("layer".to_string(), depth.to_string()),
        ]);
        tensors::write_tensors(
            &path,
            &[OwnedTensor::u8(FEATURES, &shape, codes.as_slice().unwrap_or_default())],
            Some(metadata),
        )?;
        tracing::debug!(split, layer = %depth, path = %path.display(), "saved features");
        Ok(path)
    }

    pub fn load(&self, split: &str, depth: FeatureDepth) -> Result<QuantizedFeatures> {
        let path = self.path(split, depth);
        let bytes = tensors::read_artifact(&path)?;
        let meta = tensors::metadata(&bytes, &path)?;
        let field = |key: &str| -> Result<&String> {
            meta.get(key).ok_or_else(|| {
                Error::Serialization(format!("{}: missing '{key}' metadata", path.display()))
            })
        };
        let parse_bound = |key: &str| -> Result<f32> {
            field(key)?.parse().map_err(|e| {
                Error::Serialization(format!("{}: bad '{key}' metadata: {e}", path.display()))
            })
        };
        let stored_layer: FeatureDepth = field("layer")?.parse()?;
        if stored_layer != depth {
            return Err(Error::Serialization(format!(
                "{} holds layer {stored_layer}, expected {depth}",
                path.display()
            )));
        }
        let scale = FeatureScale::new(parse_bound("min")?, parse_bound("max")?);

        let st = tensors::parse(&bytes, &path)?;
        let codes = tensors::u8_array(&st, FEATURES)?;
        let &[n, c, h, w] = codes.shape() else {
            return Err(Error::Serialization(format!(
                "{}: features must be (n, c, h, w), got {:?}",
                path.display(),
                codes.shape()
            )));
        };
        let flat = codes
            .into_shape_with_order((n, c * h * w))
            .map_err(|e| Error::Serialization(format!("{}: {e}", path.display())))?;
        QuantizedFeatures::new(flat, [c, h, w], scale)
    }

    /// Load several layers of one split, keeping the requested order.
    pub fn load_layers(
        &self,
        split: &str,
        depths: &[FeatureDepth],
    ) -> Result<Vec<(FeatureDepth, QuantizedFeatures)>> {
        depths
            .iter()
            .map(|&depth| Ok((depth, self.load(split, depth)?)))
            .collect()
    }
}
