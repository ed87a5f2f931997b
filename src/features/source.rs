//! Indexed image datasets for chunked extraction.

use image::RgbImage;

use crate::error::{Error, Result};

/// Random-access collection of images.
pub trait ImageSource {
    /// Number of images.
    fn len(&self) -> usize;

    /// Whether the source is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Load one image.
    fn load(&self, index: usize) -> Result<RgbImage>;
}

impl ImageSource for [RgbImage] {
    fn len(&self) -> usize {
        <[RgbImage]>::len(self)
    }

    fn load(&self, index: usize) -> Result<RgbImage> {
        self.get(index).cloned().ok_or_else(|| {
            Error::InvalidArgument(format!(
                "image index {index} out of range for {} images",
                <[RgbImage]>::len(self)
            ))
        })
    }
}

impl ImageSource for Vec<RgbImage> {
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn load(&self, index: usize) -> Result<RgbImage> {
        self.as_slice().load(index)
    }
}
