//! Anatomical channel regions.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// A contiguous block of response channels recorded from one cortical area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub name: String,
    pub start: usize,
    pub end: usize,
}

impl Region {
    pub fn new(name: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            name: name.into(),
            start,
            end,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// V1, V4 and IT boundaries after the defective block has been removed.
#[must_use]
pub fn default_regions() -> Vec<Region> {
    vec![
        Region::new("V1", 0, 448),
        Region::new("V4", 448, 704),
        Region::new("IT", 704, 960),
    ]
}
