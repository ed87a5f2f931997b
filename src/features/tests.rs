//! Tests for feature extraction

use super::*;
use crate::quant::QuantizedFeatures;
use crate::Error;
use approx::assert_abs_diff_eq;
use image::{Rgb, RgbImage};
use ndarray::{array, Array2, Array3, Array4, ArrayView4};

fn gradient_image(w: u32, h: u32, seed: u32) -> RgbImage {
    RgbImage::from_fn(w, h, |x, y| {
        Rgb([
            ((x * 17 + seed * 31) % 256) as u8,
            ((y * 23 + seed * 7) % 256) as u8,
            ((x * y + seed) % 256) as u8,
        ])
    })
}

fn small_pyramid() -> PoolingPyramid {
    PoolingPyramid::new(PyramidConfig {
        widths: [4, 6, 8, 8, 10],
        input_size: 64,
        seed: 3,
    })
    .unwrap()
}

/// Network stub returning fixed-shape zero tensors.
struct ZeroNetwork;

impl FeatureNetwork for ZeroNetwork {
    fn preprocess(&self, _image: &RgbImage) -> crate::Result<Array3<f32>> {
        Ok(Array3::zeros((3, 8, 8)))
    }

    fn forward_to(
        &self,
        input: ArrayView4<'_, f32>,
        _depth: FeatureDepth,
    ) -> crate::Result<Array4<f32>> {
        Ok(Array4::zeros((input.shape()[0], 2, 4, 4)))
    }
}

// ========================================================================
// DEPTHS
// ========================================================================

#[test]
fn test_depth_cut_points_and_downsampling() {
    let cuts: Vec<usize> = FeatureDepth::ALL.iter().map(|d| d.cut()).collect();
    assert_eq!(cuts, vec![5, 10, 17, 24, 31]);
    assert!(FeatureDepth::Pool1.is_downsampled());
    assert!(FeatureDepth::Pool2.is_downsampled());
    assert!(!FeatureDepth::Pool3.is_downsampled());
    assert_eq!(FeatureDepth::from_index(4), Some(FeatureDepth::Pool5));
    assert_eq!(FeatureDepth::from_index(5), None);
}

#[test]
fn test_depth_parse_round_trips_name() {
    for depth in FeatureDepth::ALL {
        assert_eq!(depth.name().parse::<FeatureDepth>().unwrap(), depth);
    }
    assert!("POOL3".parse::<FeatureDepth>().is_ok());
    assert!("conv1".parse::<FeatureDepth>().is_err());
}

// ========================================================================
// PREPROCESSING
// ========================================================================

#[test]
fn test_target_dims_keep_aspect_ratio() {
    let pre = Preprocess::imagenet();
    assert_eq!(pre.target_dims(512, 512), (224, 224));
    assert_eq!(pre.target_dims(400, 300), (298, 224));
    assert_eq!(pre.target_dims(300, 600), (224, 448));
}

#[test]
fn test_preprocess_normalizes_channels() {
    let image = RgbImage::from_pixel(4, 4, Rgb([255, 0, 128]));
    let pre = Preprocess::with_shortest_side(4);
    let tensor = pre.apply(&image);

    assert_eq!(tensor.dim(), (3, 4, 4));
    assert_abs_diff_eq!(tensor[[0, 0, 0]], (1.0 - 0.485) / 0.229, epsilon = 1e-5);
    assert_abs_diff_eq!(tensor[[1, 2, 3]], (0.0 - 0.456) / 0.224, epsilon = 1e-5);
    assert_abs_diff_eq!(tensor[[2, 1, 1]], (128.0 / 255.0 - 0.406) / 0.225, epsilon = 1e-5);
}

#[test]
fn test_stack_rejects_mixed_sizes() {
    let a = Array3::<f32>::zeros((3, 4, 4));
    let b = Array3::<f32>::zeros((3, 4, 5));
    let err = stack_images(&[a, b]).unwrap_err();
    assert!(matches!(err, Error::ShapeMismatch { .. }));
}

// ========================================================================
// BLUR
// ========================================================================

#[test]
fn test_gaussian_kernel_is_peak_normalized() {
    let kernel = gaussian_kernel(5, 1.0);
    assert_eq!(kernel.dim(), (5, 5));
    assert_abs_diff_eq!(kernel[[2, 2]], 1.0, epsilon = 1e-7);
    assert_abs_diff_eq!(kernel[[2, 3]], (-0.5f32).exp(), epsilon = 1e-7);
    assert_abs_diff_eq!(kernel[[0, 0]], (-4.0f32).exp(), epsilon = 1e-7);
    // Not unit-sum
    assert!(kernel.sum() > 6.0);
    assert_eq!(kernel, kernel.t());
}

#[test]
fn test_convolve_same_with_delta_is_identity() {
    let input = Array2::from_shape_fn((5, 7), |(i, j)| (i * 7 + j) as f32);
    let delta = array![[0.0f32, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 0.0]];
    assert_eq!(convolve_same(input.view(), delta.view()), input);
}

#[test]
fn test_convolve_same_zero_pads_borders() {
    let input = Array2::from_elem((3, 3), 1.0f32);
    let ones = Array2::from_elem((3, 3), 1.0f32);
    let out = convolve_same(input.view(), ones.view());
    assert_abs_diff_eq!(out[[1, 1]], 9.0);
    assert_abs_diff_eq!(out[[0, 0]], 4.0);
    assert_abs_diff_eq!(out[[0, 1]], 6.0);
}

#[test]
fn test_blur_downsample_halves_and_keeps_even_indices() {
    let maps = Array4::from_shape_fn((2, 3, 7, 6), |(b, c, y, x)| (b + c + y * x) as f32);
    let delta = array![[1.0f32]];
    let out = blur_downsample(maps.view(), delta.view());

    assert_eq!(out.dim(), (2, 3, 4, 3));
    assert_abs_diff_eq!(out[[1, 2, 3, 2]], maps[[1, 2, 6, 4]]);
    assert_abs_diff_eq!(out[[0, 0, 0, 0]], maps[[0, 0, 0, 0]]);
}

// ========================================================================
// EXTRACTION
// ========================================================================

#[test]
fn test_chunks_cover_dataset() {
    let config = ExtractionConfig {
        batch_size: 4,
        n_batches: 3,
        ..Default::default()
    };
    assert_eq!(config.chunks(10).unwrap(), vec![0..4, 4..8, 8..10]);
    assert_eq!(config.chunks(4).unwrap(), vec![0..4]);
    assert!(matches!(config.chunks(13), Err(Error::InvalidArgument(_))));
}

#[test]
fn test_chunks_stop_at_dataset_end() {
    let config = ExtractionConfig {
        batch_size: 4,
        n_batches: 1000,
        ..Default::default()
    };
    assert_eq!(config.chunks(6).unwrap(), vec![0..4, 4..6]);
}

#[test]
fn test_chunks_huge_batch_size_does_not_overflow() {
    let config = ExtractionConfig {
        batch_size: usize::MAX / 2,
        n_batches: 3,
        ..Default::default()
    };
    assert_eq!(config.chunks(10).unwrap(), vec![0..10]);
}

#[test]
fn test_pyramid_shapes_trade_resolution_for_channels() {
    let net = small_pyramid();
    let input = Array4::<f32>::ones((2, 3, 64, 64));
    let shapes: Vec<Vec<usize>> = FeatureDepth::ALL
        .iter()
        .map(|&d| net.forward_to(input.view(), d).unwrap().shape().to_vec())
        .collect();
    assert_eq!(shapes[0], vec![2, 4, 32, 32]);
    assert_eq!(shapes[2], vec![2, 8, 8, 8]);
    assert_eq!(shapes[4], vec![2, 10, 2, 2]);
}

#[test]
fn test_extract_downsamples_shallow_depths() {
    let net = small_pyramid();
    let images: Vec<RgbImage> = (0..3).map(|s| gradient_image(64, 64, s)).collect();
    let extractor = FeatureExtractor::new(&net, ExtractionConfig {
        batch_size: 2,
        n_batches: 2,
        ..Default::default()
    })
    .unwrap();

    let pool1 = extractor.extract(&images, FeatureDepth::Pool1).unwrap();
    assert_eq!(pool1.example_shape(), [4, 16, 16]);
    assert_eq!(pool1.n_examples(), 3);

    let pool3 = extractor.extract(&images, FeatureDepth::Pool3).unwrap();
    assert_eq!(pool3.example_shape(), [8, 8, 8]);
}

#[test]
fn test_chunked_extraction_uses_one_global_scale() {
    let net = small_pyramid();
    let images: Vec<RgbImage> = (0..5).map(|s| gradient_image(64, 64, s * 11)).collect();

    let chunked = FeatureExtractor::new(&net, ExtractionConfig {
        batch_size: 2,
        n_batches: 3,
        ..Default::default()
    })
    .unwrap();
    let whole = FeatureExtractor::new(&net, ExtractionConfig {
        batch_size: 5,
        n_batches: 1,
        ..Default::default()
    })
    .unwrap();

    let a = chunked.extract(&images, FeatureDepth::Pool2).unwrap();
    let floats = whole.extract_float(&images, FeatureDepth::Pool2).unwrap();
    let b = QuantizedFeatures::from_float(&floats.view()).unwrap();

    assert_eq!(a.scale(), b.scale());
    assert_eq!(a.codes(), b.codes());
}

#[test]
fn test_constant_network_output_quantizes_to_zero() {
    let images: Vec<RgbImage> = (0..3).map(|s| gradient_image(8, 8, s)).collect();
    let extractor = FeatureExtractor::new(&ZeroNetwork, ExtractionConfig {
        batch_size: 3,
        n_batches: 1,
        ..Default::default()
    })
    .unwrap();

    let features = extractor.extract(&images, FeatureDepth::Pool4).unwrap();
    assert!(features.scale().is_degenerate());
    assert!(features.codes().iter().all(|&q| q == 0));
    assert_eq!(features.example_shape(), [2, 4, 4]);
}

#[test]
fn test_extract_reports_insufficient_chunk_plan() {
    let images: Vec<RgbImage> = (0..5).map(|s| gradient_image(8, 8, s)).collect();
    let extractor = FeatureExtractor::new(&ZeroNetwork, ExtractionConfig {
        batch_size: 2,
        n_batches: 2,
        ..Default::default()
    })
    .unwrap();
    let err = extractor.extract(&images, FeatureDepth::Pool3).unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
}

#[test]
fn test_extract_all_returns_requested_depths() {
    let net = small_pyramid();
    let images: Vec<RgbImage> = (0..2).map(|s| gradient_image(64, 64, s)).collect();
    let extractor = FeatureExtractor::new(&net, ExtractionConfig {
        batch_size: 2,
        n_batches: 1,
        ..Default::default()
    })
    .unwrap();
    let layers = extractor
        .extract_all(&images, &[FeatureDepth::Pool4, FeatureDepth::Pool5])
        .unwrap();
    assert_eq!(layers.len(), 2);
    assert_eq!(layers[0].0, FeatureDepth::Pool4);
    assert_eq!(layers[1].1.example_shape(), [10, 2, 2]);
}
