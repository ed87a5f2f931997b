//! Tests for generative networks and image synthesis

use super::*;
use crate::latent::{sample_noise, seeded_rng, ClassSelection, LatentAnchor, LatentMapper};
use crate::Error;
use ndarray::{Array3, Array4, ArrayView2, ArrayView3, Axis};

/// Network stub whose synthesis returns a fixed value and whose output shape can
/// be broken on purpose.
struct ConstantNetwork {
    anchor: LatentAnchor,
    value: f32,
    raw_res: usize,
}

impl ConstantNetwork {
    fn new(value: f32) -> Self {
        Self {
            anchor: LatentAnchor::Global(ndarray::Array1::zeros(3)),
            value,
            raw_res: 2,
        }
    }
}

impl GenerativeNetwork for ConstantNetwork {
    fn z_dim(&self) -> usize {
        2
    }
    fn w_dim(&self) -> usize {
        3
    }
    fn num_ws(&self) -> usize {
        2
    }
    fn resolution(&self) -> usize {
        2
    }
    fn anchor(&self) -> &LatentAnchor {
        &self.anchor
    }
    fn map(&self, z: ArrayView2<'_, f32>, _class: Option<ArrayView2<'_, f32>>) -> crate::Result<Array3<f32>> {
        Ok(Array3::zeros((z.nrows(), 2, 3)))
    }
    fn synthesize(&self, w: ArrayView3<'_, f32>) -> crate::Result<Array4<f32>> {
        Ok(Array4::from_elem((w.shape()[0], 3, self.raw_res, self.raw_res), self.value))
    }
}

// ========================================================================
// PIXEL CONVERSION
// ========================================================================

#[test]
fn test_to_pixel_scaling_and_clamp() {
    assert_eq!(to_pixel(0.0), 128);
    assert_eq!(to_pixel(1.0), 255);
    assert_eq!(to_pixel(-1.0), 0);
    assert_eq!(to_pixel(0.5), 191);
    assert_eq!(to_pixel(-0.5), 64);
    assert_eq!(to_pixel(7.0), 255);
    assert_eq!(to_pixel(-7.0), 0);
}

#[test]
fn test_constant_synthesis_fills_image() {
    let net = ConstantNetwork::new(0.5);
    let images = ImageSynthesizer::new(&net)
        .synthesize(Array3::zeros((3, 2, 3)).view())
        .unwrap();
    assert_eq!(images.len(), 3);
    assert!(images.iter().all(|img| img.dimensions() == (2, 2)));
    assert!(images[2].pixels().all(|p| p.0 == [191, 191, 191]));
}

// ========================================================================
// SHAPE CONTRACTS
// ========================================================================

#[test]
fn test_synthesis_rejects_wrong_latent_shape() {
    let net = ConstantNetwork::new(0.0);
    let synth = ImageSynthesizer::new(&net);
    for shape in [(1, 3, 3), (1, 2, 4), (1, 1, 3)] {
        assert!(matches!(
            synth.synthesize(Array3::zeros(shape).view()),
            Err(Error::ShapeMismatch { .. })
        ));
    }
}

#[test]
fn test_synthesis_rejects_wrong_raw_output() {
    let mut net = ConstantNetwork::new(0.0);
    net.raw_res = 3;
    let err = ImageSynthesizer::new(&net)
        .synthesize(Array3::zeros((1, 2, 3)).view())
        .unwrap_err();
    assert!(err.to_string().contains("synthesis output"));
}

#[test]
fn test_chunked_synthesis_matches_whole_batch() {
    let net = LinearGenerator::new(GeneratorConfig {
        z_dim: 4,
        w_dim: 6,
        num_ws: 3,
        resolution: 5,
        num_classes: None,
        seed: 1,
    })
    .unwrap();
    let z = sample_noise(&mut seeded_rng(2), 7, 4);
    let w = net.map(z.view(), None).unwrap();
    let synth = ImageSynthesizer::new(&net);

    let whole = synth.synthesize(w.view()).unwrap();
    let chunked = synth.synthesize_chunked(w.view(), 3).unwrap();
    assert_eq!(whole, chunked);
    assert!(matches!(
        synth.synthesize_chunked(w.view(), 0),
        Err(Error::InvalidArgument(_))
    ));
}

#[test]
fn test_chunked_failure_names_batch() {
    let mut net = ConstantNetwork::new(0.0);
    net.raw_res = 1;
    let err = ImageSynthesizer::new(&net)
        .synthesize_chunked(Array3::zeros((5, 2, 3)).view(), 2)
        .unwrap_err();
    assert!(err.to_string().starts_with("synthesis batch 0 (examples 0..2)"));
    assert!(matches!(err.root(), Error::ShapeMismatch { .. }));
}

// ========================================================================
// REFERENCE GENERATOR
// ========================================================================

#[test]
fn test_scenario_a_default_dimensions() {
    let net = LinearGenerator::new(GeneratorConfig::default()).unwrap();
    let z = sample_noise(&mut seeded_rng(0), 8, 64);
    let w = LatentMapper::new(&net).map(z.view(), None, 1.0, &mut seeded_rng(0)).unwrap();
    assert_eq!(w.dim(), (8, 37, 512));

    let images = ImageSynthesizer::new(&net).synthesize(w.view()).unwrap();
    assert_eq!(images.len(), 8);
    for img in &images {
        assert_eq!(img.dimensions(), (64, 64));
        assert_eq!(img.as_raw().len(), 64 * 64 * 3);
    }
    // raw synthesis is not degenerate
    let distinct: std::collections::BTreeSet<u8> = images[0].as_raw().iter().copied().collect();
    assert!(distinct.len() > 10);
}

#[test]
fn test_generator_is_seeded() {
    let config = GeneratorConfig {
        z_dim: 3,
        w_dim: 4,
        num_ws: 2,
        resolution: 3,
        num_classes: Some(2),
        seed: 5,
    };
    let a = LinearGenerator::new(config.clone()).unwrap();
    let b = LinearGenerator::new(config.clone()).unwrap();
    let c = LinearGenerator::new(GeneratorConfig { seed: 6, ..config }).unwrap();
    assert_eq!(a.anchor(), b.anchor());
    assert_ne!(a.anchor(), c.anchor());
    assert_eq!(a.anchor().num_classes(), Some(2));
}

#[test]
fn test_generator_replicates_mapping_and_needs_labels() {
    let net = LinearGenerator::new(GeneratorConfig {
        z_dim: 3,
        w_dim: 4,
        num_ws: 5,
        resolution: 2,
        num_classes: Some(3),
        seed: 9,
    })
    .unwrap();
    let z = sample_noise(&mut seeded_rng(4), 2, 3);
    assert!(matches!(net.map(z.view(), None), Err(Error::InvalidArgument(_))));

    let w = LatentMapper::new(&net)
        .map(z.view(), Some(ClassSelection::Fixed(1)), 1.0, &mut seeded_rng(0))
        .unwrap();
    let first = w.index_axis(Axis(1), 0);
    for copy in w.axis_iter(Axis(1)) {
        assert_eq!(copy, first);
    }
}

#[test]
fn test_generator_rejects_empty_dimensions() {
    let zero_w = GeneratorConfig {
        w_dim: 0,
        ..GeneratorConfig::default()
    };
    assert!(LinearGenerator::new(zero_w).is_err());
    let zero_classes = GeneratorConfig {
        num_classes: Some(0),
        ..GeneratorConfig::default()
    };
    assert!(LinearGenerator::new(zero_classes).is_err());
}

#[test]
fn test_config_yaml_defaults() {
    let config: GeneratorConfig = serde_yaml::from_str("num_classes: 1000\nseed: 3\n").unwrap();
    assert_eq!(config.num_classes, Some(1000));
    assert_eq!(config.num_ws, 37);
    assert_eq!(config.pixels_per_image(), 3 * 64 * 64);
}
