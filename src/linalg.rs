//! Bridges between `ndarray` storage and `nalgebra` decompositions.

use nalgebra::{DMatrix, SymmetricEigen};
use ndarray::{Array1, Array2, ArrayView2};

use crate::error::{Error, Result};

pub(crate) fn to_dmatrix(a: ArrayView2<'_, f64>) -> DMatrix<f64> {
    DMatrix::from_fn(a.nrows(), a.ncols(), |i, j| a[[i, j]])
}

pub(crate) fn from_dmatrix(m: &DMatrix<f64>) -> Array2<f64> {
    Array2::from_shape_fn((m.nrows(), m.ncols()), |(i, j)| m[(i, j)])
}

/// Eigendecomposition of a symmetric matrix as `(eigenvalues, eigenvectors)`.
///
/// Eigenvectors are the columns of the returned matrix.
pub(crate) fn symmetric_eigen(a: ArrayView2<'_, f64>) -> Result<(Array1<f64>, Array2<f64>)> {
    if a.nrows() != a.ncols() {
        return Err(Error::shape("symmetric eigendecomposition", &[a.nrows(), a.nrows()], a.shape()));
    }
    if a.iter().any(|v| !v.is_finite()) {
        return Err(Error::Numerical("kernel matrix contains non-finite values".into()));
    }
    let eigen = SymmetricEigen::new(to_dmatrix(a));
    let values = Array1::from_iter(eigen.eigenvalues.iter().copied());
    Ok((values, from_dmatrix(&eigen.eigenvectors)))
}

/// Minimum-norm least-squares solution of `a · x = b` via SVD.
pub(crate) fn lstsq(a: ArrayView2<'_, f64>, b: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
    if a.nrows() != b.nrows() {
        return Err(Error::shape("least squares rows", &[a.nrows()], &[b.nrows()]));
    }
    if a.iter().chain(b.iter()).any(|v| !v.is_finite()) {
        return Err(Error::Numerical("least squares input contains non-finite values".into()));
    }
    let svd = to_dmatrix(a).svd(true, true);
    let max_sv = svd.singular_values.iter().copied().fold(0.0, f64::max);
    let eps = f64::EPSILON * a.nrows().max(a.ncols()) as f64 * max_sv;
    let x = svd
        .solve(&to_dmatrix(b), eps)
        .map_err(|e| Error::Numerical(format!("least squares solve failed: {e}")))?;
    Ok(from_dmatrix(&x))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_eigen_reconstructs_matrix() {
        let a = array![[4.0, 1.0, 0.5], [1.0, 3.0, 0.2], [0.5, 0.2, 2.0]];
        let (values, vectors) = symmetric_eigen(a.view()).unwrap();
        let rebuilt = vectors.dot(&Array2::from_diag(&values)).dot(&vectors.t());
        for (x, y) in rebuilt.iter().zip(a.iter()) {
            assert_abs_diff_eq!(x, y, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_lstsq_exact_system() {
        let a = array![[1.0, 0.0], [0.0, 2.0], [1.0, 1.0]];
        let x_true = array![[3.0], [-1.0]];
        let b = a.dot(&x_true);
        let x = lstsq(a.view(), b.view()).unwrap();
        assert_abs_diff_eq!(x[[0, 0]], 3.0, epsilon = 1e-10);
        assert_abs_diff_eq!(x[[1, 0]], -1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_lstsq_rejects_nan() {
        let a = array![[f64::NAN, 1.0], [0.0, 1.0]];
        let b = array![[1.0], [1.0]];
        assert!(matches!(lstsq(a.view(), b.view()), Err(Error::Numerical(_))));
    }
}
