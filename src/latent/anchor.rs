//! Average-latent anchors used by the truncation trick.

use ndarray::{Array1, Array2, ArrayView1};

use crate::error::{Error, Result};

/// Reference latent toward which truncation interpolates.
///
/// Unconditional and class-conditional models carry different anchors, so the
/// variant decides which inputs the mapper requires.
#[derive(Debug, Clone, PartialEq)]
pub enum LatentAnchor {
    /// Single global average latent `(w_dim,)`.
    Global(Array1<f32>),
    /// One average latent per class `(num_classes, w_dim)`.
    PerClass(Array2<f32>),
}

impl LatentAnchor {
    /// Width of the anchor vectors.
    #[must_use]
    pub fn w_dim(&self) -> usize {
        match self {
            Self::Global(avg) => avg.len(),
            Self::PerClass(avgs) => avgs.ncols(),
        }
    }

    /// Number of classes, or `None` for an unconditional model.
    #[must_use]
    pub fn num_classes(&self) -> Option<usize> {
        match self {
            Self::Global(_) => None,
            Self::PerClass(avgs) => Some(avgs.nrows()),
        }
    }

    /// Whether the model behind this anchor is class-conditional.
    #[must_use]
    pub fn is_conditional(&self) -> bool {
        matches!(self, Self::PerClass(_))
    }

    /// Anchor vector for a class. Global anchors ignore the class.
    pub fn for_class(&self, class: usize) -> Result<ArrayView1<'_, f32>> {
        match self {
            Self::Global(avg) => Ok(avg.view()),
            Self::PerClass(avgs) => {
                if class >= avgs.nrows() {
                    return Err(Error::InvalidArgument(format!(
                        "class index {class} out of range for {} classes",
                        avgs.nrows()
                    )));
                }
                Ok(avgs.row(class))
            }
        }
    }
}
