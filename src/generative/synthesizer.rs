//! Conversion of w latents into 8-bit RGB images.

use image::{Rgb, RgbImage};
use ndarray::{s, Array4, ArrayView3};

use super::network::GenerativeNetwork;
use crate::error::{Error, Result, ResultExt};

/// Map a raw synthesis value in roughly [-1, 1] to an 8-bit pixel.
///
/// `v * 127.5 + 128`, clamped to [0, 255] and truncated toward zero.
#[inline]
#[must_use]
pub fn to_pixel(value: f32) -> u8 {
    (value * 127.5 + 128.0).clamp(0.0, 255.0) as u8
}

/// Runs the synthesis stage and converts its output to images.
pub struct ImageSynthesizer<'a, G: GenerativeNetwork + ?Sized> {
    network: &'a G,
}

impl<'a, G: GenerativeNetwork + ?Sized> ImageSynthesizer<'a, G> {
    /// Wrap a network.
    pub fn new(network: &'a G) -> Self {
        Self { network }
    }

    /// Synthesize one image per example of `w` `(batch, num_ws, w_dim)`.
    ///
    /// A latent with the wrong style count or width is rejected, never broadcast.
    pub fn synthesize(&self, w: ArrayView3<'_, f32>) -> Result<Vec<RgbImage>> {
        let (batch, num_ws, w_dim) = w.dim();
        let expected = [batch, self.network.num_ws(), self.network.w_dim()];
        if [batch, num_ws, w_dim] != expected {
            return Err(Error::shape("image synthesis latent", &expected, w.shape()));
        }

        let raw = self.network.synthesize(w)?;
        let res = self.network.resolution();
        let expected_raw = [batch, 3, res, res];
        if raw.shape() != expected_raw {
            return Err(Error::shape("synthesis output", &expected_raw, raw.shape()));
        }
        Ok(to_images(&raw))
    }

    /// Synthesize in sequential chunks of `batch_size` examples.
    pub fn synthesize_chunked(
        &self,
        w: ArrayView3<'_, f32>,
        batch_size: usize,
    ) -> Result<Vec<RgbImage>> {
        if batch_size == 0 {
            return Err(Error::InvalidArgument("synthesis batch size must be > 0".into()));
        }
        let total = w.shape()[0];
        let mut images = Vec::with_capacity(total);
        for (chunk, start) in (0..total).step_by(batch_size).enumerate() {
            let end = (start + batch_size).min(total);
            let part = self
                .synthesize(w.slice(s![start..end, .., ..]))
                .at_step(|| format!("synthesis batch {chunk} (examples {start}..{end})"))?;
            tracing::debug!(chunk, start, end, "synthesized batch");
            images.extend(part);
        }
        Ok(images)
    }
}

fn to_images(raw: &Array4<f32>) -> Vec<RgbImage> {
    let res = raw.shape()[2] as u32;
    raw.outer_iter()
        .map(|chw| {
            RgbImage::from_fn(res, res, |x, y| {
                let (x, y) = (x as usize, y as usize);
                Rgb([
                    to_pixel(chw[[0, y, x]]),
                    to_pixel(chw[[1, y, x]]),
                    to_pixel(chw[[2, y, x]]),
                ])
            })
        })
        .collect()
}
