//! Running min/max observer for multi-batch scale calibration.

use super::scale::FeatureScale;

/// Accumulates the global range of values seen over several batches.
#[derive(Clone, Debug, Default)]
pub struct MinMaxObserver {
    running_min: Option<f32>,
    running_max: Option<f32>,
    num_batches: usize,
}

impl MinMaxObserver {
    /// Empty observer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one batch of any memory layout into the running range. Empty batches
    /// are ignored.
    pub fn observe_iter<'a, I>(&mut self, values: I)
    where
        I: IntoIterator<Item = &'a f32>,
    {
        let mut seen = false;
        let (min, max) = values.into_iter().fold(
            (f32::INFINITY, f32::NEG_INFINITY),
            |(lo, hi), &v| {
                seen = true;
                (lo.min(v), hi.max(v))
            },
        );
        if !seen {
            return;
        }
        self.running_min = Some(self.running_min.map_or(min, |m| m.min(min)));
        self.running_max = Some(self.running_max.map_or(max, |m| m.max(max)));
        self.num_batches += 1;
    }

    /// Number of non-empty batches observed.
    #[must_use]
    pub fn num_batches(&self) -> usize {
        self.num_batches
    }

    /// Global range, `None` if nothing was observed.
    #[must_use]
    pub fn finish(&self) -> Option<FeatureScale> {
        Some(FeatureScale::new(self.running_min?, self.running_max?))
    }
}
