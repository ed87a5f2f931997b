//! K-Fold cross-validation splitter

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Train/test indices of one fold.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fold {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// K-Fold cross-validation splitter
#[derive(Clone, Debug)]
pub struct KFold {
    n_splits: usize,
    shuffle: bool,
    seed: u64,
}

impl KFold {
    /// Create a new KFold splitter
    pub fn new(n_splits: usize) -> Self {
        Self {
            n_splits,
            shuffle: true,
            seed: 42,
        }
    }

    /// Set random seed for shuffling
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Disable shuffling
    pub fn without_shuffle(mut self) -> Self {
        self.shuffle = false;
        self
    }

    /// Number of folds
    pub fn n_splits(&self) -> usize {
        self.n_splits
    }

    /// Generate train/test indices for each fold.
    ///
    /// The first `n_samples % n_splits` folds get one extra test sample. Test sets
    /// are disjoint and cover every sample once.
    pub fn split(&self, n_samples: usize) -> Vec<Fold> {
        let mut indices: Vec<usize> = (0..n_samples).collect();
        if self.shuffle {
            indices.shuffle(&mut StdRng::seed_from_u64(self.seed));
        }

        let n_splits = self.n_splits.max(1);
        let fold_size = n_samples / n_splits;
        let remainder = n_samples % n_splits;

        let mut folds = Vec::with_capacity(n_splits);
        let mut start = 0;
        for i in 0..n_splits {
            let end = start + fold_size + usize::from(i < remainder);
            let test = indices[start..end].to_vec();
            let train = indices[..start]
                .iter()
                .chain(&indices[end..])
                .copied()
                .collect();
            folds.push(Fold { train, test });
            start = end;
        }
        folds
    }
}
