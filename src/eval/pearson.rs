//! Pearson correlation along an axis.

use image::RgbImage;
use ndarray::{Array, Array2, ArrayBase, ArrayD, ArrayViewD, Axis, Data, Dimension, Ix1, RemoveAxis};
use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::error::{Error, Result};

/// Correlation coefficients and two-sided p-values, one per reduced slice.
#[derive(Debug, Clone, PartialEq)]
pub struct Pearson<D: Dimension> {
    /// Coefficients in [-1, 1]
    pub r: Array<f64, D>,
    /// Two-sided p-values
    pub p: Array<f64, D>,
    /// Sample size along the reduction axis
    pub n: usize,
}

/// Z-score along `axis` with population std. Non-finite results (constant
/// slices) become 0.
pub fn standardize(a: ArrayViewD<'_, f64>, axis: Axis) -> Result<ArrayD<f64>> {
    let mean = a
        .mean_axis(axis)
        .ok_or_else(|| Error::InvalidArgument("cannot standardize an empty axis".into()))?
        .insert_axis(axis);
    let std = a.std_axis(axis, 0.0).insert_axis(axis);
    let z = (&a - &mean) / &std;
    Ok(z.mapv_into(|v| if v.is_finite() { v } else { 0.0 }))
}

/// Two-sided p-value for a coefficient `r` with `df = n - 2`.
#[must_use]
pub fn two_sided_p(r: f64, dist: &StudentsT) -> f64 {
    if r.abs() >= 1.0 {
        return 0.0;
    }
    let df = dist.freedom();
    let t = r * (df / (1.0 - r * r)).sqrt();
    (2.0 * dist.sf(t.abs())).clamp(0.0, 1.0)
}

/// Pearson correlation of `x` and `y` along `axis`.
///
/// Both inputs are standardized along the axis and `r` is the mean product of the
/// z-scores. A zero-variance slice yields `r = 0` rather than NaN.
pub fn pearsonr<S1, S2, D>(
    x: &ArrayBase<S1, D>,
    y: &ArrayBase<S2, D>,
    axis: Axis,
) -> Result<Pearson<D::Smaller>>
where
    S1: Data<Elem = f64>,
    S2: Data<Elem = f64>,
    D: Dimension + RemoveAxis,
{
    if x.shape() != y.shape() {
        return Err(Error::shape("pearson inputs", x.shape(), y.shape()));
    }
    if axis.index() >= x.ndim() {
        return Err(Error::InvalidArgument(format!(
            "axis {} out of range for {}-d input",
            axis.index(),
            x.ndim()
        )));
    }
    let n = x.len_of(axis);
    if n < 3 {
        return Err(Error::InvalidArgument(format!(
            "pearson correlation needs at least 3 samples, got {n}"
        )));
    }

    let zx = standardize(x.view().into_dyn(), axis)?;
    let zy = standardize(y.view().into_dyn(), axis)?;
    let r = (&zx * &zy)
        .mean_axis(axis)
        .ok_or_else(|| Error::Numerical("empty reduction axis".into()))?
        .mapv_into(|v| v.clamp(-1.0, 1.0));

    let dist = StudentsT::new(0.0, 1.0, (n - 2) as f64)
        .map_err(|e| Error::Numerical(format!("student t distribution: {e}")))?;
    let p = r.mapv(|v| two_sided_p(v, &dist));

    let into_dim = |a: ArrayD<f64>| {
        a.into_dimensionality::<D::Smaller>()
            .map_err(|e| Error::Numerical(format!("correlation reshape failed: {e}")))
    };
    Ok(Pearson {
        r: into_dim(r)?,
        p: into_dim(p)?,
        n,
    })
}

/// Per-image correlation between paired images over all pixel values.
pub fn pixel_correlation(predicted: &[RgbImage], actual: &[RgbImage]) -> Result<Pearson<Ix1>> {
    if predicted.len() != actual.len() {
        return Err(Error::shape(
            "image pairs",
            &[actual.len()],
            &[predicted.len()],
        ));
    }
    let to_matrix = |images: &[RgbImage]| -> Result<Array2<f64>> {
        let Some(first) = images.first() else {
            return Err(Error::InvalidArgument("no images to correlate".into()));
        };
        let pixels = first.as_raw().len();
        let mut out = Array2::zeros((images.len(), pixels));
        for (i, (mut row, img)) in out.outer_iter_mut().zip(images).enumerate() {
            if img.as_raw().len() != pixels {
                return Err(Error::shape(
                    format!("image {i}"),
                    &[first.height() as usize, first.width() as usize, 3],
                    &[img.height() as usize, img.width() as usize, 3],
                ));
            }
            row.iter_mut()
                .zip(img.as_raw())
                .for_each(|(dst, &v)| *dst = f64::from(v));
        }
        Ok(out)
    };
    let a = to_matrix(predicted)?;
    let b = to_matrix(actual)?;
    if a.dim() != b.dim() {
        return Err(Error::shape("image pixels", b.shape(), a.shape()));
    }
    pearsonr(&a, &b, Axis(1))
}
