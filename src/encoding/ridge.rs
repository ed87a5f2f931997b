//! Kernel-form ridge regression with cross-validated penalty.

use ndarray::{s, Array1, Array2, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

use super::gram::Gram;
use super::kfold::KFold;
use crate::data::LinearMap;
use crate::error::{Error, Result};
use crate::linalg::symmetric_eigen;
use crate::quant::QuantizedFeatures;

/// Candidate penalties from 10^-1 to 10^7, denser at the strong end.
///
/// Feature dimensionality dwarfs the example count, so useful penalties are
/// usually large.
#[must_use]
pub fn default_alphas() -> Vec<f64> {
    let mut alphas: Vec<f64> = (-1..=2).map(|e| 10f64.powi(e)).collect();
    alphas.extend((6..=14).map(|half| 10f64.powf(f64::from(half) / 2.0)));
    alphas
}

/// Ridge search configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RidgeCv {
    /// Candidate L2 penalties
    pub alphas: Vec<f64>,
    /// Number of cross-validation folds
    pub folds: usize,
    /// Seed for the fold shuffle
    pub seed: u64,
    /// Feature columns dequantized at once
    pub chunk_dims: usize,
    /// Examples predicted at once
    pub chunk_rows: usize,
}

impl Default for RidgeCv {
    fn default() -> Self {
        Self {
            alphas: default_alphas(),
            folds: 5,
            seed: 42,
            chunk_dims: 4096,
            chunk_rows: 256,
        }
    }
}

/// A fitted ridge map from one feature layer to all response channels.
#[derive(Debug, Clone, PartialEq)]
pub struct RidgeModel {
    /// Weights `(n_dims, n_channels)`
    pub coef: Array2<f32>,
    /// Per-channel intercept
    pub intercept: Array1<f64>,
    /// Selected penalty
    pub alpha: f64,
    /// Mean out-of-fold squared error per candidate alpha (empty without CV)
    pub cv_errors: Vec<f64>,
    /// Per-example `(channels, height, width)` the model was fit on
    pub example_shape: [usize; 3],
}

/// Kernel restricted to `rows × train`, centered with the training-set means.
fn center_kernel(kernel: ArrayView2<'_, f64>, rows: &[usize], train: &[usize]) -> Array2<f64> {
    let nt = train.len() as f64;
    let mean_over_train = |i: usize| train.iter().map(|&t| kernel[[i, t]]).sum::<f64>() / nt;
    let row_means: Vec<f64> = rows.iter().map(|&i| mean_over_train(i)).collect();
    let train_means: Vec<f64> = train.iter().map(|&t| mean_over_train(t)).collect();
    let grand = train_means.iter().sum::<f64>() / nt;
    Array2::from_shape_fn((rows.len(), train.len()), |(a, b)| {
        kernel[[rows[a], train[b]]] - row_means[a] - train_means[b] + grand
    })
}

/// Eigen-solved dual system `(K̃ + αI) C = Ỹ` reusable across penalties.
struct DualSystem {
    eigenvalues: Array1<f64>,
    eigenvectors: Array2<f64>,
    /// `Uᵀ Ỹ`
    projected: Array2<f64>,
    y_mean: Array1<f64>,
}

impl DualSystem {
    fn new(kernel: ArrayView2<'_, f64>, train: &[usize], y: ArrayView2<'_, f64>) -> Result<Self> {
        let k_train = center_kernel(kernel, train, train);
        let y_train = y.select(Axis(0), train);
        let y_mean = y_train
            .mean_axis(Axis(0))
            .ok_or_else(|| Error::InvalidArgument("empty training fold".into()))?;
        let y_centered = &y_train - &y_mean;
        let (eigenvalues, eigenvectors) = symmetric_eigen(k_train.view())?;
        let projected = eigenvectors.t().dot(&y_centered);
        Ok(Self {
            eigenvalues,
            eigenvectors,
            projected,
            y_mean,
        })
    }

    /// `diag(1 / (λ + α)) Uᵀ Ỹ`
    fn shrunk(&self, alpha: f64) -> Array2<f64> {
        let mut out = self.projected.clone();
        for (mut row, &lambda) in out.axis_iter_mut(Axis(0)).zip(self.eigenvalues.iter()) {
            row /= (lambda + alpha).max(f64::MIN_POSITIVE);
        }
        out
    }

    /// Dual coefficients `C`.
    fn coefficients(&self, alpha: f64) -> Array2<f64> {
        self.eigenvectors.dot(&self.shrunk(alpha))
    }
}

impl RidgeCv {
    fn validate(&self, n: usize) -> Result<()> {
        if self.alphas.is_empty() {
            return Err(Error::InvalidArgument("ridge needs at least one alpha".into()));
        }
        if let Some(bad) = self.alphas.iter().find(|a| !(a.is_finite() && **a > 0.0)) {
            return Err(Error::InvalidArgument(format!(
                "ridge alphas must be positive and finite, got {bad}"
            )));
        }
        if self.folds < 2 || self.folds > n {
            return Err(Error::InvalidArgument(format!(
                "cross-validation needs 2 <= folds <= examples, got {} folds for {n} examples",
                self.folds
            )));
        }
        Ok(())
    }

    /// Mean out-of-fold squared error for every candidate alpha.
    pub fn cross_validate(&self, gram: &Gram, responses: ArrayView2<'_, f64>) -> Result<Vec<f64>> {
        let n = gram.n_examples();
        self.validate(n)?;
        let mut errors = vec![0.0; self.alphas.len()];
        let folds = KFold::new(self.folds).with_seed(self.seed).split(n);
        for (fold_idx, fold) in folds.iter().enumerate() {
            let system = DualSystem::new(gram.kernel.view(), &fold.train, responses)?;
            let cross = center_kernel(gram.kernel.view(), &fold.test, &fold.train)
                .dot(&system.eigenvectors);
            let y_test = responses.select(Axis(0), &fold.test);
            for (err, &alpha) in errors.iter_mut().zip(&self.alphas) {
                let pred = cross.dot(&system.shrunk(alpha)) + &system.y_mean;
                *err += (&pred - &y_test).mapv(|d| d * d).sum();
            }
            tracing::debug!(fold = fold_idx, test = fold.test.len(), "ridge fold evaluated");
        }
        let total = (n * responses.ncols()).max(1) as f64;
        Ok(errors.into_iter().map(|e| e / total).collect())
    }

    /// Fit with the penalty that minimizes out-of-fold error (first on ties).
    pub fn fit(&self, features: &QuantizedFeatures, responses: ArrayView2<'_, f64>) -> Result<RidgeModel> {
        check_rows(features, responses)?;
        self.validate(features.n_examples())?;
        let gram = Gram::compute(features, self.chunk_dims)?;
        let cv_errors = self.cross_validate(&gram, responses)?;

        let best = cv_errors
            .iter()
            .enumerate()
            .fold(0, |best, (i, &e)| if e < cv_errors[best] { i } else { best });
        let alpha = self.alphas[best];
        tracing::info!(alpha, cv_mse = cv_errors[best], "selected ridge penalty");

        let mut model = self.fit_alpha_with_gram(features, &gram, responses, alpha)?;
        model.cv_errors = cv_errors;
        Ok(model)
    }

    /// Fit with a fixed penalty.
    pub fn fit_alpha(
        &self,
        features: &QuantizedFeatures,
        responses: ArrayView2<'_, f64>,
        alpha: f64,
    ) -> Result<RidgeModel> {
        check_rows(features, responses)?;
        if !(alpha.is_finite() && alpha > 0.0) {
            return Err(Error::InvalidArgument(format!("ridge alpha must be positive, got {alpha}")));
        }
        let gram = Gram::compute(features, self.chunk_dims)?;
        self.fit_alpha_with_gram(features, &gram, responses, alpha)
    }

    fn fit_alpha_with_gram(
        &self,
        features: &QuantizedFeatures,
        gram: &Gram,
        responses: ArrayView2<'_, f64>,
        alpha: f64,
    ) -> Result<RidgeModel> {
        let n = features.n_examples();
        let p = features.n_dims();
        let all: Vec<usize> = (0..n).collect();
        let system = DualSystem::new(gram.kernel.view(), &all, responses)?;
        let dual = system.coefficients(alpha);
        let dual_sums = dual.sum_axis(Axis(0));

        // W = (X - 1μᵀ)ᵀ C, one column block at a time
        let mut coef = Array2::<f32>::zeros((p, responses.ncols()));
        let mut offset = Array1::<f64>::zeros(responses.ncols());
        for start in (0..p).step_by(self.chunk_dims.max(1)) {
            let end = (start + self.chunk_dims.max(1)).min(p);
            let means = gram.column_means.slice(s![start..end]);
            let mut block = features.dequantize_columns(start..end).t().dot(&dual);
            for (mut row, &mu) in block.axis_iter_mut(Axis(0)).zip(means.iter()) {
                row.scaled_add(-mu, &dual_sums);
            }
            offset += &means.dot(&block);
            coef.slice_mut(s![start..end, ..]).assign(&block.mapv(|v| v as f32));
        }

        Ok(RidgeModel {
            coef,
            intercept: &system.y_mean - &offset,
            alpha,
            cv_errors: Vec::new(),
            example_shape: features.example_shape(),
        })
    }
}

fn check_rows(features: &QuantizedFeatures, responses: ArrayView2<'_, f64>) -> Result<()> {
    if features.n_examples() != responses.nrows() {
        return Err(Error::shape(
            "ridge examples",
            &[features.n_examples(), responses.ncols()],
            responses.shape(),
        ));
    }
    Ok(())
}

impl RidgeModel {
    /// Number of response channels.
    #[must_use]
    pub fn n_channels(&self) -> usize {
        self.coef.ncols()
    }

    /// Predict responses for features dequantized with their own stored scale.
    pub fn predict(&self, features: &QuantizedFeatures, chunk_rows: usize) -> Result<Array2<f64>> {
        if features.n_dims() != self.coef.nrows() {
            return Err(Error::shape(
                "ridge prediction features",
                &[features.n_examples(), self.coef.nrows()],
                &[features.n_examples(), features.n_dims()],
            ));
        }
        let n = features.n_examples();
        let coef = self.coef.mapv(f64::from);
        let mut out = Array2::<f64>::zeros((n, self.n_channels()));
        for start in (0..n).step_by(chunk_rows.max(1)) {
            let end = (start + chunk_rows.max(1)).min(n);
            let block = features.dequantize_rows(start..end).dot(&coef) + &self.intercept;
            out.slice_mut(s![start..end, ..]).assign(&block);
        }
        Ok(out)
    }
}

impl RidgeModel {
    /// Persistable form carrying the penalty and input shape as metadata.
    pub fn to_linear_map(&self) -> Result<LinearMap> {
        let [c, h, w] = self.example_shape;
        Ok(LinearMap::new(self.coef.mapv(f64::from), self.intercept.clone())?
            .with_meta("kind", "ridge")
            .with_meta("alpha", self.alpha)
            .with_meta("example_shape", format!("{c},{h},{w}")))
    }

    pub fn from_linear_map(map: &LinearMap) -> Result<Self> {
        let shape: Vec<usize> = map
            .meta("example_shape")
            .unwrap_or_default()
            .split(',')
            .map(|d| d.trim().parse())
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| Error::Serialization(format!("ridge example_shape: {e}")))?;
        let example_shape: [usize; 3] = shape
            .try_into()
            .map_err(|s| Error::Serialization(format!("ridge example_shape must have 3 dims, got {s:?}")))?;
        if example_shape.iter().product::<usize>() != map.coef.nrows() {
            return Err(Error::shape(
                "ridge coefficients",
                &[example_shape.iter().product(), map.intercept.len()],
                map.coef.shape(),
            ));
        }
        Ok(Self {
            coef: map.coef.mapv(|v| v as f32),
            intercept: map.intercept.clone(),
            alpha: map.meta_parse("alpha")?,
            cv_errors: Vec::new(),
            example_shape,
        })
    }
}
