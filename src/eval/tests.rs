//! Tests for evaluation metrics

use super::*;
use crate::Error;
use approx::assert_abs_diff_eq;
use image::{Rgb, RgbImage};
use ndarray::{array, Array1, Array2, Array3, Axis};
use proptest::prelude::*;

// ========================================================================
// PROPERTY TESTS - Correlation identities
// ========================================================================

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(100))]

    /// r(x, x) = 1 and r(x, -x) = -1 for non-constant x
    #[test]
    fn prop_self_and_negation(values in prop::collection::vec(-100.0f64..100.0, 3..60)) {
        let x = Array1::from(values);
        let spread = x.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b))
            - x.iter().fold(f64::INFINITY, |a, &b| a.min(b));
        prop_assume!(spread > 1e-3);

        let same = pearsonr(&x, &x, Axis(0)).unwrap();
        let neg = pearsonr(&x, &x.mapv(|v| -v), Axis(0)).unwrap();
        prop_assert!((same.r[()] - 1.0).abs() < 1e-9);
        prop_assert!((neg.r[()] + 1.0).abs() < 1e-9);
        prop_assert!(same.p[()] < 1e-6);
    }

    /// Coefficients stay in [-1, 1] and p-values in [0, 1]
    #[test]
    fn prop_bounds(
        x in prop::collection::vec(-10.0f64..10.0, 12),
        y in prop::collection::vec(-10.0f64..10.0, 12),
    ) {
        let x = Array2::from_shape_vec((4, 3), x).unwrap();
        let y = Array2::from_shape_vec((4, 3), y).unwrap();
        let result = pearsonr(&x, &y, Axis(0)).unwrap();
        for (&r, &p) in result.r.iter().zip(result.p.iter()) {
            prop_assert!((-1.0..=1.0).contains(&r));
            prop_assert!((0.0..=1.0).contains(&p));
        }
    }
}

// ========================================================================
// UNIT TESTS
// ========================================================================

#[test]
fn test_known_correlation_and_p_value() {
    let x = array![1.0, 2.0, 3.0, 4.0, 5.0];
    let y = array![2.0, 4.0, 5.0, 4.0, 5.0];
    let result = pearsonr(&x, &y, Axis(0)).unwrap();

    assert_abs_diff_eq!(result.r[()], 0.7745966692414834, epsilon = 1e-12);
    assert_abs_diff_eq!(result.p[()], 0.12402706265755459, epsilon = 1e-8);
    assert_eq!(result.n, 5);
}

#[test]
fn test_constant_input_gives_zero_not_nan() {
    let x = array![3.0, 3.0, 3.0, 3.0];
    let y = array![1.0, 2.0, 3.0, 4.0];
    let result = pearsonr(&x, &y, Axis(0)).unwrap();
    assert_eq!(result.r[()], 0.0);
    assert_abs_diff_eq!(result.p[()], 1.0, epsilon = 1e-12);
}

#[test]
fn test_per_channel_reduces_over_examples() {
    // Channel 0 perfectly correlated, channel 1 anti-correlated
    let truth = array![[1.0, 4.0], [2.0, 3.0], [3.0, 2.0], [4.0, 1.0]];
    let pred = array![[10.0, 1.0], [20.0, 2.0], [30.0, 3.0], [40.0, 4.0]];
    let result = pearsonr(&pred, &truth, Axis(0)).unwrap();

    assert_eq!(result.r.len(), 2);
    assert_abs_diff_eq!(result.r[0], 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(result.r[1], -1.0, epsilon = 1e-12);
    assert!(result.p[0] < 1e-10);
}

#[test]
fn test_three_dimensional_input() {
    let x = Array3::from_shape_fn((2, 5, 3), |(i, j, k)| (i + 1) as f64 * j as f64 + k as f64);
    let result = pearsonr(&x, &x, Axis(1)).unwrap();
    assert_eq!(result.r.dim(), (2, 3));
    assert!(result.r.iter().all(|&r| (r - 1.0).abs() < 1e-12));
}

#[test]
fn test_shape_and_sample_errors() {
    let a = Array2::<f64>::zeros((4, 2));
    let b = Array2::<f64>::zeros((4, 3));
    assert!(matches!(
        pearsonr(&a, &b, Axis(0)),
        Err(Error::ShapeMismatch { .. })
    ));

    let short = array![1.0, 2.0];
    assert!(matches!(
        pearsonr(&short, &short, Axis(0)),
        Err(Error::InvalidArgument(_))
    ));
    assert!(matches!(
        pearsonr(&a, &a, Axis(2)),
        Err(Error::InvalidArgument(_))
    ));
}

#[test]
fn test_standardize_zero_mean_unit_variance() {
    let x = array![[1.0, 5.0], [2.0, 5.0], [3.0, 5.0]].into_dyn();
    let z = standardize(x.view(), Axis(0)).unwrap();
    let col0: Vec<f64> = z.index_axis(Axis(1), 0).iter().copied().collect();
    assert_abs_diff_eq!(col0.iter().sum::<f64>(), 0.0, epsilon = 1e-12);
    assert_abs_diff_eq!(
        col0.iter().map(|v| v * v).sum::<f64>() / 3.0,
        1.0,
        epsilon = 1e-12
    );
    assert!(z.index_axis(Axis(1), 1).iter().all(|&v| v == 0.0));
}

#[test]
fn test_pixel_correlation_identical_images() {
    let images: Vec<RgbImage> = (0..3u8)
        .map(|s| RgbImage::from_fn(6, 6, |x, y| Rgb([x as u8 * 40 + s, y as u8 * 30, 7])))
        .collect();
    let result = pixel_correlation(&images, &images).unwrap();
    assert_eq!(result.r.len(), 3);
    assert!(result.r.iter().all(|&r| (r - 1.0).abs() < 1e-12));
    assert_eq!(result.n, 6 * 6 * 3);
}

#[test]
fn test_pixel_correlation_rejects_mismatched_sizes() {
    let a = vec![RgbImage::new(4, 4)];
    let b = vec![RgbImage::new(4, 5)];
    assert!(pixel_correlation(&a, &b).is_err());
    assert!(pixel_correlation(&a, &[]).is_err());
}

#[test]
fn test_summary_statistics() {
    let summary = Summary::of([1.0, 2.0, 3.0, f64::NAN]).unwrap();
    assert_eq!(summary.count, 3);
    assert_abs_diff_eq!(summary.mean, 2.0);
    assert_abs_diff_eq!(summary.std, (2.0f64 / 3.0).sqrt(), epsilon = 1e-12);
    assert_eq!((summary.min, summary.max), (1.0, 3.0));
    assert!(Summary::of(Vec::new()).is_none());
}
