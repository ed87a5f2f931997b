//! Attribution of response channels to the best-predicting feature depth.

use std::fmt;

use ndarray::{Array1, Array2, ArrayView2, Axis};

use crate::data::Region;
use crate::error::{Error, Result, ResultExt};
use crate::eval::pearsonr;
use crate::features::FeatureDepth;

/// Best feature depth per response channel.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerAssignment {
    /// Depths in the order they were supplied
    pub depths: Vec<FeatureDepth>,
    /// Index into `depths` of the winning layer, per channel
    pub best: Vec<usize>,
    /// Pearson r of each layer's prediction with the truth, `(layers, channels)`
    pub correlations: Array2<f64>,
}

impl LayerAssignment {
    pub fn n_channels(&self) -> usize {
        self.best.len()
    }

    /// Winning depth for one channel.
    pub fn depth_of(&self, channel: usize) -> Option<FeatureDepth> {
        self.best.get(channel).map(|&i| self.depths[i])
    }

    /// Correlation of the winning layer, per channel.
    #[must_use]
    pub fn best_correlations(&self) -> Array1<f64> {
        Array1::from_iter(
            self.best
                .iter()
                .enumerate()
                .map(|(ch, &layer)| self.correlations[[layer, ch]]),
        )
    }
}

/// Correlate every layer's predictions with `truth` column-wise and keep the argmax.
///
/// Equal correlations resolve to the earlier (shallower) layer.
pub fn assign_layers(
    predictions: &[(FeatureDepth, Array2<f64>)],
    truth: ArrayView2<'_, f64>,
) -> Result<LayerAssignment> {
    if predictions.is_empty() {
        return Err(Error::InvalidArgument("no layer predictions to attribute".into()));
    }
    let n_channels = truth.ncols();
    let mut correlations = Array2::<f64>::zeros((predictions.len(), n_channels));
    for (mut row, (depth, pred)) in correlations.axis_iter_mut(Axis(0)).zip(predictions) {
        let result = pearsonr(&pred.view(), &truth, Axis(0)).at_step(|| format!("layer {depth}"))?;
        row.assign(&result.r);
    }

    let best = (0..n_channels)
        .map(|ch| {
            let column = correlations.column(ch);
            column
                .iter()
                .enumerate()
                .fold(0, |best, (i, &r)| if r > column[best] { i } else { best })
        })
        .collect();

    Ok(LayerAssignment {
        depths: predictions.iter().map(|(d, _)| *d).collect(),
        best,
        correlations,
    })
}

/// Share of a region's channels assigned to each layer.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionDistribution {
    pub region: String,
    /// Channels per layer index
    pub counts: Vec<usize>,
    /// `counts / region size`, sums to 1
    pub fractions: Vec<f64>,
}

impl fmt::Display for RegionDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<4}", self.region)?;
        for frac in &self.fractions {
            write!(f, " {frac:>6.3}")?;
        }
        Ok(())
    }
}

/// Tally layer assignments within each contiguous region.
pub fn region_distribution(
    assignment: &LayerAssignment,
    regions: &[Region],
    n_layers: usize,
) -> Result<Vec<RegionDistribution>> {
    regions
        .iter()
        .map(|region| {
            if region.is_empty() || region.end > assignment.n_channels() {
                return Err(Error::InvalidArgument(format!(
                    "region {} ({}..{}) does not fit {} channels",
                    region.name,
                    region.start,
                    region.end,
                    assignment.n_channels()
                )));
            }
            let mut counts = vec![0usize; n_layers];
            for &layer in &assignment.best[region.range()] {
                let slot = counts.get_mut(layer).ok_or_else(|| {
                    Error::InvalidArgument(format!(
                        "layer index {layer} exceeds {n_layers} layers"
                    ))
                })?;
                *slot += 1;
            }
            let size = region.len() as f64;
            Ok(RegionDistribution {
                region: region.name.clone(),
                fractions: counts.iter().map(|&c| c as f64 / size).collect(),
                counts,
            })
        })
        .collect()
}
