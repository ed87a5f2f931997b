//! Pipeline specification validation

use super::error::ValidationError;
use crate::config::schema::PipelineSpec;

/// Validate a pipeline specification
///
/// Checks numeric ranges and structural consistency only. Artifact paths are
/// checked by the command that reads them, since `generate` and `extract` create
/// some of them.
pub fn validate_spec(spec: &PipelineSpec) -> Result<(), ValidationError> {
    let g = &spec.generator;
    if g.z_dim == 0 || g.w_dim == 0 || g.num_ws == 0 || g.resolution == 0 {
        return Err(ValidationError::InvalidGenerator(format!(
            "z_dim {}, w_dim {}, num_ws {}, resolution {} must all be > 0",
            g.z_dim, g.w_dim, g.num_ws, g.resolution
        )));
    }
    if g.num_classes == Some(0) {
        return Err(ValidationError::InvalidGenerator(
            "num_classes must be > 0 when set".into(),
        ));
    }

    // Generation
    let psi = spec.generation.psi;
    if !(0.0..=1.0).contains(&psi) {
        return Err(ValidationError::InvalidPsi(psi));
    }
    if spec.generation.batch_size == 0 {
        return Err(ValidationError::InvalidBatchSize("generation"));
    }

    // Extraction
    let ex = &spec.extraction;
    if ex.batch_size == 0 {
        return Err(ValidationError::InvalidBatchSize("extraction"));
    }
    if ex.n_batches == 0 {
        return Err(ValidationError::InvalidBatchCount);
    }
    if ex.blur.kernel_size == 0 || ex.blur.kernel_size % 2 == 0 || !(ex.blur.sigma > 0.0) {
        return Err(ValidationError::InvalidBlur {
            size: ex.blur.kernel_size,
            sigma: ex.blur.sigma,
        });
    }

    // Features
    let layers = &spec.features.layers;
    if layers.is_empty() {
        return Err(ValidationError::EmptyLayers);
    }
    for (i, layer) in layers.iter().enumerate() {
        if layers[..i].contains(layer) {
            return Err(ValidationError::DuplicateLayer(layer.to_string()));
        }
    }
    let pyramid = &spec.features.pyramid;
    if pyramid.widths.contains(&0) {
        return Err(ValidationError::InvalidPyramid("channel widths must be > 0".into()));
    }
    if pyramid.input_size < 32 {
        return Err(ValidationError::InvalidPyramid(format!(
            "input size {} is smaller than the deepest stride 32",
            pyramid.input_size
        )));
    }

    // Encoding
    let ridge = &spec.encoding;
    if ridge.alphas.is_empty() {
        return Err(ValidationError::EmptyAlphas);
    }
    if let Some(&bad) = ridge.alphas.iter().find(|a| !(a.is_finite() && **a > 0.0)) {
        return Err(ValidationError::InvalidAlpha(bad));
    }
    if ridge.folds < 2 {
        return Err(ValidationError::InvalidFolds(ridge.folds));
    }
    if ridge.chunk_dims == 0 {
        return Err(ValidationError::InvalidChunk("feature"));
    }
    if ridge.chunk_rows == 0 {
        return Err(ValidationError::InvalidChunk("row"));
    }

    // Data
    let mask = &spec.data.mask.excluded;
    if mask.start > mask.end {
        return Err(ValidationError::InvalidMask {
            start: mask.start,
            end: mask.end,
        });
    }

    // Regions
    let regions = spec.regions();
    for region in &regions {
        if region.is_empty() {
            return Err(ValidationError::InvalidRegion {
                name: region.name.clone(),
                start: region.start,
                end: region.end,
            });
        }
    }
    for (i, a) in regions.iter().enumerate() {
        for b in &regions[i + 1..] {
            if a.start < b.end && b.start < a.end {
                return Err(ValidationError::OverlappingRegions {
                    first: a.name.clone(),
                    second: b.name.clone(),
                });
            }
        }
    }

    Ok(())
}
