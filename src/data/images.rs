//! Lossless per-example image files.

use std::path::{Path, PathBuf};

use image::RgbImage;

use crate::error::{Error, Result};
use crate::features::ImageSource;

/// Directory of `{index:06}.png` files numbered from zero without gaps.
#[derive(Debug, Clone)]
pub struct ImageDirectory {
    root: PathBuf,
    len: usize,
}

impl ImageDirectory {
    /// Create the directory (if needed) for writing; `len` counts images already present.
    pub fn create(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Self::open(root)
    }

    /// Open an existing directory and count its contiguous images.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(Error::MissingArtifact { path: root });
        }
        let len = (0..).take_while(|&i| image_path(&root, i).is_file()).count();
        Ok(Self { root, len })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, index: usize) -> PathBuf {
        image_path(&self.root, index)
    }

    pub fn save(&mut self, index: usize, image: &RgbImage) -> Result<PathBuf> {
        let path = self.path(index);
        image.save(&path)?;
        while image_path(&self.root, self.len).is_file() {
            self.len += 1;
        }
        Ok(path)
    }

    /// Remove every image at index `len` or above.
    ///
    /// Files past a gap are removed too, so a later [`Self::save`] cannot make them
    /// contiguous again.
    pub fn truncate(&mut self, len: usize) -> Result<()> {
        for entry in std::fs::read_dir(&self.root)? {
            let path = entry?.path();
            let index = path
                .file_name()
                .and_then(|name| name.to_str())
                .and_then(|name| name.strip_suffix(".png"))
                .filter(|stem| stem.len() == 6)
                .and_then(|stem| stem.parse::<usize>().ok());
            if index.is_some_and(|i| i >= len) {
                std::fs::remove_file(&path)?;
            }
        }
        self.len = self.len.min(len);
        tracing::debug!(len, root = %self.root.display(), "truncated image directory");
        Ok(())
    }

    /// Write `images` at consecutive indices starting at `start`.
    pub fn save_all(&mut self, start: usize, images: &[RgbImage]) -> Result<()> {
        for (offset, image) in images.iter().enumerate() {
            self.save(start + offset, image)?;
        }
        tracing::debug!(start, count = images.len(), root = %self.root.display(), "saved images");
        Ok(())
    }
}

fn image_path(root: &Path, index: usize) -> PathBuf {
    root.join(format!("{index:06}.png"))
}

impl ImageSource for ImageDirectory {
    fn len(&self) -> usize {
        self.len
    }

    fn load(&self, index: usize) -> Result<RgbImage> {
        let path = self.path(index);
        if !path.is_file() {
            return Err(Error::MissingArtifact { path });
        }
        Ok(image::open(&path)?.to_rgb8())
    }
}
