//! Latent and neural-response archives.

use std::ops::Range;
use std::path::Path;

use ndarray::{concatenate, s, Array2, ArrayD, ArrayView2, Axis, Ix2};
use serde::{Deserialize, Serialize};

use super::tensors::{self, OwnedTensor};
use crate::error::{Error, Result};

/// Channels to drop from every response partition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelMask {
    pub excluded: Range<usize>,
}

impl Default for ChannelMask {
    fn default() -> Self {
        Self { excluded: 320..384 }
    }
}

impl ChannelMask {
    pub fn new(excluded: Range<usize>) -> Self {
        Self { excluded }
    }

    /// Copy of `responses` without the excluded columns.
    pub fn apply(&self, responses: ArrayView2<'_, f32>) -> Result<Array2<f32>> {
        let Range { start, end } = self.excluded;
        if start > end || end > responses.ncols() {
            return Err(Error::InvalidArgument(format!(
                "excluded channels {start}..{end} do not fit {} channels",
                responses.ncols()
            )));
        }
        concatenate(
            Axis(1),
            &[responses.slice(s![.., ..start]), responses.slice(s![.., end..])],
        )
        .map_err(|e| Error::Numerical(format!("channel mask: {e}")))
    }

    /// Number of channels left after masking `total`.
    #[must_use]
    pub fn kept(&self, total: usize) -> usize {
        total.saturating_sub(self.excluded.len())
    }
}

fn as_matrix(array: ArrayD<f32>, name: &str) -> Result<Array2<f32>> {
    let shape = array.shape().to_vec();
    array
        .into_dimensionality::<Ix2>()
        .map_err(|_| Error::Serialization(format!("tensor '{name}' must be 2-D, got shape {shape:?}")))
}

/// Single-copy w latents `(n, w_dim)` for the train and test partitions.
#[derive(Debug, Clone, PartialEq)]
pub struct LatentArchive {
    pub train: Array2<f32>,
    pub test: Array2<f32>,
}

impl LatentArchive {
    /// Load `train`/`test`. Replicated `(n, num_ws, w_dim)` tensors are reduced to
    /// their first copy.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = tensors::read_artifact(path)?;
        let st = tensors::parse(&bytes, path)?;
        let load = |name: &str| -> Result<Array2<f32>> {
            let array = tensors::f32_array(&st, name)?;
            if array.ndim() == 3 {
                as_matrix(array.index_axis(Axis(1), 0).to_owned(), name)
            } else {
                as_matrix(array, name)
            }
        };
        let archive = Self {
            train: load("train")?,
            test: load("test")?,
        };
        if archive.train.ncols() != archive.test.ncols() {
            return Err(Error::shape(
                "latent test partition",
                &[archive.test.nrows(), archive.train.ncols()],
                archive.test.shape(),
            ));
        }
        tracing::debug!(train = ?archive.train.dim(), test = ?archive.test.dim(), "loaded latent archive");
        Ok(archive)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let train = self.train.as_standard_layout();
        let test = self.test.as_standard_layout();
        tensors::write_tensors(
            path,
            &[
                OwnedTensor::f32("train", train.shape(), train.as_slice().unwrap_or_default()),
                OwnedTensor::f32("test", test.shape(), test.as_slice().unwrap_or_default()),
            ],
            None,
        )
    }

    pub fn w_dim(&self) -> usize {
        self.train.ncols()
    }
}

/// Multi-unit activity `(n, channels)` for the train and test partitions.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseArchive {
    pub train: Array2<f32>,
    pub test: Array2<f32>,
}

impl ResponseArchive {
    /// Load `train_MUA`/`test_MUA` and drop the masked channels from both.
    pub fn load(path: &Path, mask: &ChannelMask) -> Result<Self> {
        let bytes = tensors::read_artifact(path)?;
        let st = tensors::parse(&bytes, path)?;
        let raw_train = as_matrix(tensors::f32_array(&st, "train_MUA")?, "train_MUA")?;
        let raw_test = as_matrix(tensors::f32_array(&st, "test_MUA")?, "test_MUA")?;
        if raw_train.ncols() != raw_test.ncols() {
            return Err(Error::shape(
                "response test partition",
                &[raw_test.nrows(), raw_train.ncols()],
                raw_test.shape(),
            ));
        }
        let archive = Self {
            train: mask.apply(raw_train.view())?,
            test: mask.apply(raw_test.view())?,
        };
        tracing::debug!(
            channels = archive.n_channels(),
            excluded = ?mask.excluded,
            "loaded response archive"
        );
        Ok(archive)
    }

    /// Save unmasked responses under the archive's partition names.
    pub fn save_raw(path: &Path, train: ArrayView2<'_, f32>, test: ArrayView2<'_, f32>) -> Result<()> {
        let train = train.as_standard_layout();
        let test = test.as_standard_layout();
        tensors::write_tensors(
            path,
            &[
                OwnedTensor::f32("train_MUA", train.shape(), train.as_slice().unwrap_or_default()),
                OwnedTensor::f32("test_MUA", test.shape(), test.as_slice().unwrap_or_default()),
            ],
            None,
        )
    }

    pub fn n_channels(&self) -> usize {
        self.train.ncols()
    }
}
