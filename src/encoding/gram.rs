//! Chunked Gram matrix accumulation over quantized features.

use ndarray::{s, Array1, Array2, Axis};

use crate::error::{Error, Result};
use crate::quant::QuantizedFeatures;

/// `X Xᵀ` and the column means of the dequantized feature matrix `X`.
#[derive(Debug, Clone)]
pub struct Gram {
    /// Uncentered kernel `(n, n)`
    pub kernel: Array2<f64>,
    /// Per-dimension mean over examples `(p,)`
    pub column_means: Array1<f64>,
}

impl Gram {
    /// Accumulate over blocks of `chunk_dims` feature columns so that at most
    /// `n × chunk_dims` floats are live at once.
    pub fn compute(features: &QuantizedFeatures, chunk_dims: usize) -> Result<Self> {
        if chunk_dims == 0 {
            return Err(Error::InvalidArgument("gram chunk size must be > 0".into()));
        }
        let n = features.n_examples();
        let p = features.n_dims();
        if n == 0 {
            return Err(Error::InvalidArgument("no examples to build a kernel from".into()));
        }

        let mut kernel = Array2::<f64>::zeros((n, n));
        let mut column_means = Array1::<f64>::zeros(p);
        for start in (0..p).step_by(chunk_dims) {
            let end = (start + chunk_dims).min(p);
            let block = features.dequantize_columns(start..end);
            kernel += &block.dot(&block.t());
            if let Some(means) = block.mean_axis(Axis(0)) {
                column_means.slice_mut(s![start..end]).assign(&means);
            }
        }
        Ok(Self {
            kernel,
            column_means,
        })
    }

    /// Number of examples.
    #[must_use]
    pub fn n_examples(&self) -> usize {
        self.kernel.nrows()
    }
}
