//! Mapping of z latents to truncated w latents.

use ndarray::{Array2, Array3, ArrayView1, ArrayView2, Axis};
use rand::Rng;

use super::anchor::LatentAnchor;
use crate::error::{Error, Result};
use crate::generative::GenerativeNetwork;

/// How class labels are chosen for a class-conditional mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassSelection {
    /// Same class for every example in the batch.
    Fixed(usize),
    /// Independent uniform draw per example.
    Random,
}

/// Maps z noise to w latents through a generative network's mapping stage.
pub struct LatentMapper<'a, G: GenerativeNetwork + ?Sized> {
    network: &'a G,
}

impl<'a, G: GenerativeNetwork + ?Sized> LatentMapper<'a, G> {
    /// Wrap a network.
    pub fn new(network: &'a G) -> Self {
        Self { network }
    }

    /// Map `z` `(batch, z_dim)` to `(batch, num_ws, w_dim)` latents.
    ///
    /// `psi = 1.0` returns the raw mapping; `psi = 0.0` collapses every example onto
    /// its anchor. For a conditional network `class = None` samples a class per
    /// example. The rng is only consumed on that random path.
    pub fn map<R: Rng + ?Sized>(
        &self,
        z: ArrayView2<'_, f32>,
        class: Option<ClassSelection>,
        psi: f32,
        rng: &mut R,
    ) -> Result<Array3<f32>> {
        if !(0.0..=1.0).contains(&psi) {
            return Err(Error::InvalidArgument(format!(
                "truncation psi must lie in [0, 1], got {psi}"
            )));
        }
        let z_dim = self.network.z_dim();
        if z.ncols() != z_dim {
            return Err(Error::shape(
                "latent mapping input",
                &[z.nrows(), z_dim],
                z.shape(),
            ));
        }

        let batch = z.nrows();
        let anchor = self.network.anchor();
        let (mut w, classes) = match anchor {
            LatentAnchor::Global(_) => {
                if let Some(selection) = class {
                    tracing::warn!(
                        ?selection,
                        "generator is unconditional, ignoring class selection"
                    );
                }
                (self.network.map(z, None)?, vec![0; batch])
            }
            LatentAnchor::PerClass(avgs) => {
                let classes = resolve_classes(class, batch, avgs.nrows(), rng)?;
                let labels = one_hot(&classes, avgs.nrows());
                (self.network.map(z, Some(labels.view()))?, classes)
            }
        };

        let expected = [batch, self.network.num_ws(), self.network.w_dim()];
        if w.shape() != expected {
            return Err(Error::shape("mapping network output", &expected, w.shape()));
        }

        if psi != 1.0 {
            let anchors = classes
                .iter()
                .map(|&c| anchor.for_class(c))
                .collect::<Result<Vec<_>>>()?;
            truncate(&mut w, &anchors, psi);
        }
        tracing::debug!(batch, psi, conditional = anchor.is_conditional(), "mapped latents");
        Ok(w)
    }
}

fn resolve_classes<R: Rng + ?Sized>(
    class: Option<ClassSelection>,
    batch: usize,
    num_classes: usize,
    rng: &mut R,
) -> Result<Vec<usize>> {
    match class {
        Some(ClassSelection::Fixed(c)) if c >= num_classes => Err(Error::InvalidArgument(
            format!("class index {c} out of range for {num_classes} classes"),
        )),
        Some(ClassSelection::Fixed(c)) => Ok(vec![c; batch]),
        Some(ClassSelection::Random) | None => {
            if num_classes == 0 {
                return Err(Error::InvalidArgument(
                    "conditional generator reports zero classes".into(),
                ));
            }
            Ok((0..batch).map(|_| rng.random_range(0..num_classes)).collect())
        }
    }
}

/// One-hot encode class indices into `(n, num_classes)`.
#[must_use]
pub fn one_hot(classes: &[usize], num_classes: usize) -> Array2<f32> {
    let mut out = Array2::zeros((classes.len(), num_classes));
    for (row, &c) in classes.iter().enumerate() {
        if c < num_classes {
            out[[row, c]] = 1.0;
        }
    }
    out
}

/// Interpolate each example toward its anchor: `anchor + (w - anchor) * psi`.
///
/// `anchors` holds one vector per example and is broadcast over the style axis.
pub fn truncate(w: &mut Array3<f32>, anchors: &[ArrayView1<'_, f32>], psi: f32) {
    for (mut example, anchor) in w.axis_iter_mut(Axis(0)).zip(anchors) {
        for mut copy in example.axis_iter_mut(Axis(0)) {
            copy.zip_mut_with(anchor, |v, &a| *v = a + (*v - a) * psi);
        }
    }
}
