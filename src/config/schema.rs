//! YAML schema for the encoding/decoding pipeline

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::data::{default_regions, ChannelMask, Region};
use crate::encoding::RidgeCv;
use crate::features::{ExtractionConfig, FeatureDepth, PyramidConfig};
use crate::generative::GeneratorConfig;

/// Complete pipeline specification
///
/// Every section has defaults, so an empty document is a valid spec.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSpec {
    /// Reference generator dimensions
    pub generator: GeneratorConfig,

    /// Feature network and depths to extract
    pub features: FeaturesSpec,

    /// Chunking and blur for feature extraction
    pub extraction: ExtractionConfig,

    /// Ridge search for the encoding models
    pub encoding: RidgeCv,

    /// Image generation settings
    pub generation: GenerationSpec,

    /// Artifact locations
    pub data: DataSpec,

    /// Channel ranges per cortical area, after masking
    pub regions: Vec<Region>,
}

/// Feature network configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeaturesSpec {
    /// Depths to extract and encode from
    pub layers: Vec<FeatureDepth>,

    /// Reference pooling pyramid
    pub pyramid: PyramidConfig,
}

impl Default for FeaturesSpec {
    fn default() -> Self {
        Self {
            layers: FeatureDepth::ALL.to_vec(),
            pyramid: PyramidConfig::default(),
        }
    }
}

/// Sampling settings for `generate`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSpec {
    /// Training stimuli to synthesize
    pub n_train: usize,

    /// Held-out stimuli to synthesize
    pub n_test: usize,

    /// Truncation strength in [0, 1]; 1 disables truncation
    pub psi: f32,

    /// Class index or name for conditional generators; random per image if absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,

    /// Noise seed
    pub seed: u64,

    /// Images synthesized per batch
    pub batch_size: usize,
}

impl Default for GenerationSpec {
    fn default() -> Self {
        Self {
            n_train: 16,
            n_test: 4,
            psi: 1.0,
            class: None,
            seed: 0,
            batch_size: 8,
        }
    }
}

/// Artifact paths, relative paths resolved against `root`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSpec {
    /// Base directory
    pub root: PathBuf,

    /// Class index table (dict literal)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<PathBuf>,

    /// W-latent archive with `train`/`test`, written by `generate`
    pub latents: PathBuf,

    /// Response archive with `train_MUA`/`test_MUA`
    pub responses: PathBuf,

    /// Stimulus images per split, written by `generate`
    pub train_images: PathBuf,
    pub test_images: PathBuf,

    /// Output of `decode`
    pub reconstructions: PathBuf,

    /// Quantized feature store
    pub features: PathBuf,

    /// Fitted models
    pub models: PathBuf,

    /// Defective channel block removed from every response partition
    pub mask: ChannelMask,
}

impl Default for DataSpec {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            labels: None,
            latents: PathBuf::from("latents.safetensors"),
            responses: PathBuf::from("responses.safetensors"),
            train_images: PathBuf::from("images/train"),
            test_images: PathBuf::from("images/test"),
            reconstructions: PathBuf::from("reconstructions"),
            features: PathBuf::from("features"),
            models: PathBuf::from("models"),
            mask: ChannelMask::default(),
        }
    }
}

impl DataSpec {
    /// Resolve a configured path against `root`.
    #[must_use]
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Image directory of a split (`train` or `test`).
    #[must_use]
    pub fn images(&self, split: &str) -> PathBuf {
        match split {
            "train" => self.resolve(&self.train_images),
            "test" => self.resolve(&self.test_images),
            other => self.resolve(Path::new("images")).join(other),
        }
    }
}

impl PipelineSpec {
    /// Regions to report, falling back to V1/V4/IT.
    #[must_use]
    pub fn regions(&self) -> Vec<Region> {
        if self.regions.is_empty() {
            default_regions()
        } else {
            self.regions.clone()
        }
    }
}
