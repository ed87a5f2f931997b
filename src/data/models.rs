//! Safetensors persistence for fitted linear maps.

use std::collections::HashMap;
use std::path::Path;

use ndarray::{Array1, Array2, Ix1, Ix2};

use super::tensors::{self, OwnedTensor};
use crate::error::{Error, Result};

/// `y = x · coef + intercept` with free-form string metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearMap {
    /// `(inputs, outputs)`
    pub coef: Array2<f64>,
    /// `(outputs,)`
    pub intercept: Array1<f64>,
    pub metadata: HashMap<String, String>,
}

impl LinearMap {
    pub fn new(coef: Array2<f64>, intercept: Array1<f64>) -> Result<Self> {
        if intercept.len() != coef.ncols() {
            return Err(Error::shape("linear map intercept", &[coef.ncols()], &[intercept.len()]));
        }
        Ok(Self {
            coef,
            intercept,
            metadata: HashMap::new(),
        })
    }

    #[must_use]
    pub fn with_meta(mut self, key: &str, value: impl ToString) -> Self {
        self.metadata.insert(key.to_string(), value.to_string());
        self
    }

    pub fn meta(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }

    /// Parse a metadata entry, failing if it is absent or malformed.
    pub fn meta_parse<T>(&self, key: &str) -> Result<T>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        let raw = self
            .meta(key)
            .ok_or_else(|| Error::Serialization(format!("linear map is missing '{key}' metadata")))?;
        raw.parse()
            .map_err(|e| Error::Serialization(format!("linear map metadata '{key}': {e}")))
    }
}

pub fn save_linear_map(path: &Path, map: &LinearMap) -> Result<()> {
    let coef = map.coef.as_standard_layout();
    let intercept = map.intercept.as_standard_layout();
    tensors::write_tensors(
        path,
        &[
            OwnedTensor::f64("coef", coef.shape(), coef.as_slice().unwrap_or_default()),
            OwnedTensor::f64("intercept", intercept.shape(), intercept.as_slice().unwrap_or_default()),
        ],
        Some(map.metadata.clone()),
    )?;
    tracing::debug!(path = %path.display(), shape = ?map.coef.dim(), "saved linear map");
    Ok(())
}

pub fn load_linear_map(path: &Path) -> Result<LinearMap> {
    let bytes = tensors::read_artifact(path)?;
    let metadata = tensors::metadata(&bytes, path)?;
    let st = tensors::parse(&bytes, path)?;
    let coef = tensors::f64_array(&st, "coef")?
        .into_dimensionality::<Ix2>()
        .map_err(|e| Error::Serialization(format!("{}: coef: {e}", path.display())))?;
    let intercept = tensors::f64_array(&st, "intercept")?
        .into_dimensionality::<Ix1>()
        .map_err(|e| Error::Serialization(format!("{}: intercept: {e}", path.display())))?;
    let mut map = LinearMap::new(coef, intercept)?;
    map.metadata = metadata;
    Ok(map)
}
