//! Safetensors reading and writing shared by the artifact stores.

use std::collections::HashMap;
use std::path::Path;

use ndarray::{ArrayD, IxDyn};
use safetensors::tensor::{Dtype, TensorView};
use safetensors::SafeTensors;

use crate::error::{Error, Result};

/// One named tensor ready for serialization.
pub(crate) struct OwnedTensor {
    pub name: String,
    pub dtype: Dtype,
    pub shape: Vec<usize>,
    pub bytes: Vec<u8>,
}

impl OwnedTensor {
    pub fn f32(name: &str, shape: &[usize], data: &[f32]) -> Self {
        Self {
            name: name.to_string(),
            dtype: Dtype::F32,
            shape: shape.to_vec(),
            bytes: bytemuck::cast_slice(data).to_vec(),
        }
    }

    pub fn f64(name: &str, shape: &[usize], data: &[f64]) -> Self {
        Self {
            name: name.to_string(),
            dtype: Dtype::F64,
            shape: shape.to_vec(),
            bytes: bytemuck::cast_slice(data).to_vec(),
        }
    }

    pub fn u8(name: &str, shape: &[usize], data: &[u8]) -> Self {
        Self {
            name: name.to_string(),
            dtype: Dtype::U8,
            shape: shape.to_vec(),
            bytes: data.to_vec(),
        }
    }
}

/// Read a whole artifact, mapping an absent file to `MissingArtifact`.
pub(crate) fn read_artifact(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => Error::MissingArtifact {
            path: path.to_path_buf(),
        },
        _ => Error::Io(e),
    })
}

pub(crate) fn write_tensors(
    path: &Path,
    tensors: &[OwnedTensor],
    metadata: Option<HashMap<String, String>>,
) -> Result<()> {
    let views = tensors
        .iter()
        .map(|t| {
            TensorView::new(t.dtype, t.shape.clone(), &t.bytes)
                .map(|view| (t.name.as_str(), view))
                .map_err(|e| Error::Serialization(format!("tensor {}: {e}", t.name)))
        })
        .collect::<Result<Vec<_>>>()?;
    let bytes = safetensors::serialize(views, metadata)
        .map_err(|e| Error::Serialization(format!("{}: {e}", path.display())))?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, bytes)?;
    Ok(())
}

pub(crate) fn parse<'a>(bytes: &'a [u8], path: &Path) -> Result<SafeTensors<'a>> {
    SafeTensors::deserialize(bytes)
        .map_err(|e| Error::Serialization(format!("{}: {e}", path.display())))
}

/// The free-form string metadata of a safetensors file.
pub(crate) fn metadata(bytes: &[u8], path: &Path) -> Result<HashMap<String, String>> {
    let (_, meta) = SafeTensors::read_metadata(bytes)
        .map_err(|e| Error::Serialization(format!("{}: {e}", path.display())))?;
    Ok(meta.metadata().clone().unwrap_or_default())
}

fn view<'data>(
    tensors: &SafeTensors<'data>,
    name: &str,
    dtype: Dtype,
) -> Result<TensorView<'data>> {
    let view = tensors
        .tensor(name)
        .map_err(|e| Error::Serialization(format!("tensor '{name}': {e}")))?;
    if view.dtype() != dtype {
        return Err(Error::Serialization(format!(
            "tensor '{name}' has dtype {:?}, expected {dtype:?}",
            view.dtype()
        )));
    }
    Ok(view)
}

pub(crate) fn f32_array(tensors: &SafeTensors<'_>, name: &str) -> Result<ArrayD<f32>> {
    let view = view(tensors, name, Dtype::F32)?;
    let data: Vec<f32> = bytemuck::pod_collect_to_vec(view.data());
    ArrayD::from_shape_vec(IxDyn(view.shape()), data)
        .map_err(|e| Error::Serialization(format!("tensor '{name}': {e}")))
}

pub(crate) fn f64_array(tensors: &SafeTensors<'_>, name: &str) -> Result<ArrayD<f64>> {
    let view = view(tensors, name, Dtype::F64)?;
    let data: Vec<f64> = bytemuck::pod_collect_to_vec(view.data());
    ArrayD::from_shape_vec(IxDyn(view.shape()), data)
        .map_err(|e| Error::Serialization(format!("tensor '{name}': {e}")))
}

pub(crate) fn u8_array(tensors: &SafeTensors<'_>, name: &str) -> Result<ArrayD<u8>> {
    let view = view(tensors, name, Dtype::U8)?;
    ArrayD::from_shape_vec(IxDyn(view.shape()), view.data().to_vec())
        .map_err(|e| Error::Serialization(format!("tensor '{name}': {e}")))
}
