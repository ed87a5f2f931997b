//! Seeded linear reference generator.

use ndarray::{Array1, Array2, Array3, Array4, ArrayView2, ArrayView3, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

use super::config::GeneratorConfig;
use super::network::GenerativeNetwork;
use crate::error::{Error, Result};
use crate::latent::LatentAnchor;

/// Linear stand-in for a pretrained style-based generator.
///
/// Mapping: `w = A z + b (+ E onehot)` copied to every style slot.
/// Synthesis: `tanh(S · mean_ws(w))` reshaped to `(3, res, res)`.
///
/// The expected mapping output over `z ~ N(0, I)` is `b` (plus the class column of
/// `E`), so those are exactly the average latents exposed as anchors.
#[derive(Debug, Clone)]
pub struct LinearGenerator {
    config: GeneratorConfig,
    /// Mapping weights (w_dim, z_dim)
    mapping: Array2<f32>,
    /// Class embedding (w_dim, num_classes)
    class_embedding: Option<Array2<f32>>,
    /// Mapping bias (w_dim,)
    bias: Array1<f32>,
    /// Synthesis weights (3 * res * res, w_dim)
    synthesis: Array2<f32>,
    anchor: LatentAnchor,
}

impl LinearGenerator {
    /// Build a generator with weights drawn from `config.seed`.
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        if config.z_dim == 0 || config.w_dim == 0 || config.num_ws == 0 || config.resolution == 0
        {
            return Err(Error::InvalidArgument(format!(
                "generator dimensions must be positive: {config:?}"
            )));
        }
        if config.num_classes == Some(0) {
            return Err(Error::InvalidArgument(
                "conditional generator needs at least one class".into(),
            ));
        }

        let mut rng = StdRng::seed_from_u64(config.seed);

        // Xavier initialization for the mapping
        let mapping_std = (2.0 / (config.z_dim + config.w_dim) as f32).sqrt();
        let mapping = gaussian((config.w_dim, config.z_dim), mapping_std, &mut rng);
        let bias = gaussian((config.w_dim, 1), 0.1, &mut rng).column(0).to_owned();
        let class_embedding = config
            .num_classes
            .map(|n| gaussian((config.w_dim, n), 0.5, &mut rng));

        // Unit-variance pre-activations for |w| ~ sqrt(w_dim)
        let synthesis_std = 1.0 / (config.w_dim as f32).sqrt();
        let synthesis = gaussian((config.pixels_per_image(), config.w_dim), synthesis_std, &mut rng);

        let anchor = match &class_embedding {
            None => LatentAnchor::Global(bias.clone()),
            Some(embedding) => {
                let mut avgs = embedding.t().to_owned();
                for mut row in avgs.axis_iter_mut(Axis(0)) {
                    row += &bias;
                }
                LatentAnchor::PerClass(avgs)
            }
        };

        Ok(Self {
            config,
            mapping,
            class_embedding,
            bias,
            synthesis,
            anchor,
        })
    }

    /// Generator configuration.
    #[must_use]
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }
}

fn gaussian<R: Rng>(shape: (usize, usize), std: f32, rng: &mut R) -> Array2<f32> {
    Array2::from_shape_simple_fn(shape, || rng.sample::<f32, _>(StandardNormal) * std)
}

impl GenerativeNetwork for LinearGenerator {
    fn z_dim(&self) -> usize {
        self.config.z_dim
    }

    fn w_dim(&self) -> usize {
        self.config.w_dim
    }

    fn num_ws(&self) -> usize {
        self.config.num_ws
    }

    fn resolution(&self) -> usize {
        self.config.resolution
    }

    fn anchor(&self) -> &LatentAnchor {
        &self.anchor
    }

    fn map(
        &self,
        z: ArrayView2<'_, f32>,
        class_one_hot: Option<ArrayView2<'_, f32>>,
    ) -> Result<Array3<f32>> {
        let batch = z.nrows();
        if z.ncols() != self.config.z_dim {
            return Err(Error::shape("mapping input", &[batch, self.config.z_dim], z.shape()));
        }

        let mut w = z.dot(&self.mapping.t());
        w += &self.bias;

        match (&self.class_embedding, class_one_hot) {
            (Some(embedding), Some(labels)) => {
                let expected = [batch, embedding.ncols()];
                if labels.shape() != expected {
                    return Err(Error::shape("class one-hot", &expected, labels.shape()));
                }
                w += &labels.dot(&embedding.t());
            }
            (Some(_), None) => {
                return Err(Error::InvalidArgument(
                    "conditional generator requires class labels".into(),
                ));
            }
            (None, _) => {}
        }

        Ok(crate::latent::replicate(w.view(), self.config.num_ws))
    }

    fn synthesize(&self, w: ArrayView3<'_, f32>) -> Result<Array4<f32>> {
        let expected = [w.shape()[0], self.config.num_ws, self.config.w_dim];
        if w.shape() != expected {
            return Err(Error::shape("synthesis input", &expected, w.shape()));
        }
        let batch = expected[0];
        let res = self.config.resolution;

        let styles = w
            .mean_axis(Axis(1))
            .ok_or_else(|| Error::Numerical("empty style axis".into()))?;
        let raw = styles.dot(&self.synthesis.t()).mapv(f32::tanh);
        raw.into_shape_with_order((batch, 3, res, res))
            .map_err(|e| Error::Numerical(format!("synthesis reshape failed: {e}")))
    }
}
