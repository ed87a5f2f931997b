//! Ordinary least squares with intercept.

use ndarray::{Array1, Array2, ArrayView2, Axis};

use crate::data::LinearMap;
use crate::error::{Error, Result};
use crate::linalg::lstsq;

/// Unregularized multi-output linear regression `y = x · coef + intercept`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearRegression {
    /// `(inputs, outputs)`
    pub coef: Array2<f64>,
    pub intercept: Array1<f64>,
}

impl LinearRegression {
    /// Fit on centered data with a minimum-norm SVD solve, then recover the intercept.
    pub fn fit(x: ArrayView2<'_, f64>, y: ArrayView2<'_, f64>) -> Result<Self> {
        if x.nrows() != y.nrows() {
            return Err(Error::shape("regression targets", &[x.nrows(), y.ncols()], y.shape()));
        }
        let x_mean = x
            .mean_axis(Axis(0))
            .ok_or_else(|| Error::InvalidArgument("cannot fit a regression on zero examples".into()))?;
        let y_mean = y
            .mean_axis(Axis(0))
            .ok_or_else(|| Error::InvalidArgument("cannot fit a regression on zero examples".into()))?;
        let x_centered = &x - &x_mean;
        let y_centered = &y - &y_mean;

        let coef = lstsq(x_centered.view(), y_centered.view())?;
        let intercept = &y_mean - &x_mean.dot(&coef);
        tracing::debug!(inputs = coef.nrows(), outputs = coef.ncols(), "fitted least squares");
        Ok(Self { coef, intercept })
    }

    pub fn n_inputs(&self) -> usize {
        self.coef.nrows()
    }

    pub fn n_outputs(&self) -> usize {
        self.coef.ncols()
    }

    pub fn predict(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        if x.ncols() != self.n_inputs() {
            return Err(Error::shape("regression inputs", &[x.nrows(), self.n_inputs()], x.shape()));
        }
        Ok(x.dot(&self.coef) + &self.intercept)
    }

    pub fn to_linear_map(&self) -> Result<LinearMap> {
        Ok(LinearMap::new(self.coef.clone(), self.intercept.clone())?.with_meta("kind", "ols"))
    }

    pub fn from_linear_map(map: &LinearMap) -> Self {
        Self {
            coef: map.coef.clone(),
            intercept: map.intercept.clone(),
        }
    }
}
