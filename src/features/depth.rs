//! The five post-pooling cut points of the feature network.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Depth at which activations are read, after each pooling stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureDepth {
    Pool1,
    Pool2,
    Pool3,
    Pool4,
    Pool5,
}

impl FeatureDepth {
    /// All depths, shallow to deep.
    pub const ALL: [FeatureDepth; 5] = [
        FeatureDepth::Pool1,
        FeatureDepth::Pool2,
        FeatureDepth::Pool3,
        FeatureDepth::Pool4,
        FeatureDepth::Pool5,
    ];

    /// Position in [`Self::ALL`].
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Depth at a position in [`Self::ALL`].
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Number of network layers run before reading activations, `[0, cut)`.
    #[must_use]
    pub fn cut(self) -> usize {
        match self {
            Self::Pool1 => 5,
            Self::Pool2 => 10,
            Self::Pool3 => 17,
            Self::Pool4 => 24,
            Self::Pool5 => 31,
        }
    }

    /// Shallow depths are blurred and decimated before storage.
    #[must_use]
    pub fn is_downsampled(self) -> bool {
        matches!(self, Self::Pool1 | Self::Pool2)
    }

    /// Stable lowercase name, used as the feature store key.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Pool1 => "pool1",
            Self::Pool2 => "pool2",
            Self::Pool3 => "pool3",
            Self::Pool4 => "pool4",
            Self::Pool5 => "pool5",
        }
    }
}

impl fmt::Display for FeatureDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FeatureDepth {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                Error::InvalidArgument(format!(
                    "unknown feature depth '{s}' (expected pool1..pool5)"
                ))
            })
    }
}
