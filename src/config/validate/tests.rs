//! Unit tests for configuration validation

use super::error::ValidationError;
use super::validator::validate_spec;
use crate::config::schema::*;
use crate::data::Region;
use crate::features::FeatureDepth;

#[test]
fn test_default_spec_is_valid() {
    assert!(validate_spec(&PipelineSpec::default()).is_ok());
}

#[test]
fn test_invalid_generator() {
    let mut spec = PipelineSpec::default();
    spec.generator.num_ws = 0;
    assert!(matches!(validate_spec(&spec), Err(ValidationError::InvalidGenerator(_))));

    let mut spec = PipelineSpec::default();
    spec.generator.num_classes = Some(0);
    assert!(matches!(validate_spec(&spec), Err(ValidationError::InvalidGenerator(_))));
}

#[test]
fn test_invalid_psi() {
    let mut spec = PipelineSpec::default();
    spec.generation.psi = 1.2;
    let err = validate_spec(&spec).unwrap_err();
    assert!(matches!(err, ValidationError::InvalidPsi(p) if p == 1.2));
    assert!(err.to_string().contains("[0.0, 1.0]"));
}

#[test]
fn test_invalid_extraction() {
    let mut spec = PipelineSpec::default();
    spec.extraction.batch_size = 0;
    assert!(matches!(
        validate_spec(&spec),
        Err(ValidationError::InvalidBatchSize("extraction"))
    ));

    let mut spec = PipelineSpec::default();
    spec.extraction.n_batches = 0;
    assert!(matches!(validate_spec(&spec), Err(ValidationError::InvalidBatchCount)));

    let mut spec = PipelineSpec::default();
    spec.extraction.blur.kernel_size = 4;
    assert!(matches!(validate_spec(&spec), Err(ValidationError::InvalidBlur { size: 4, .. })));

    let mut spec = PipelineSpec::default();
    spec.extraction.blur.sigma = 0.0;
    assert!(matches!(validate_spec(&spec), Err(ValidationError::InvalidBlur { .. })));
}

#[test]
fn test_invalid_layers() {
    let mut spec = PipelineSpec::default();
    spec.features.layers.clear();
    assert!(matches!(validate_spec(&spec), Err(ValidationError::EmptyLayers)));

    spec.features.layers = vec![FeatureDepth::Pool2, FeatureDepth::Pool2];
    let err = validate_spec(&spec).unwrap_err();
    assert_eq!(err.to_string(), "Feature layer listed twice: pool2");

    let mut spec = PipelineSpec::default();
    spec.features.pyramid.input_size = 16;
    assert!(matches!(validate_spec(&spec), Err(ValidationError::InvalidPyramid(_))));
}

#[test]
fn test_invalid_ridge() {
    let mut spec = PipelineSpec::default();
    spec.encoding.alphas.clear();
    assert!(matches!(validate_spec(&spec), Err(ValidationError::EmptyAlphas)));

    spec.encoding.alphas = vec![1.0, f64::INFINITY];
    assert!(matches!(validate_spec(&spec), Err(ValidationError::InvalidAlpha(_))));

    let mut spec = PipelineSpec::default();
    spec.encoding.folds = 1;
    assert!(matches!(validate_spec(&spec), Err(ValidationError::InvalidFolds(1))));

    let mut spec = PipelineSpec::default();
    spec.encoding.chunk_dims = 0;
    assert!(matches!(validate_spec(&spec), Err(ValidationError::InvalidChunk("feature"))));
}

#[test]
fn test_invalid_regions() {
    let mut spec = PipelineSpec::default();
    spec.regions = vec![Region::new("V1", 0, 10), Region::new("V4", 5, 20)];
    assert!(matches!(
        validate_spec(&spec),
        Err(ValidationError::OverlappingRegions { .. })
    ));

    spec.regions = vec![Region::new("IT", 7, 7)];
    assert!(matches!(validate_spec(&spec), Err(ValidationError::InvalidRegion { .. })));
}

#[test]
fn test_empty_regions_fall_back_to_defaults() {
    let spec = PipelineSpec::default();
    assert!(spec.regions.is_empty());
    let regions = spec.regions();
    assert_eq!(regions.len(), 3);
    assert_eq!(regions[2].name, "IT");
}
