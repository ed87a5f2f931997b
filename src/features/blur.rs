//! Gaussian blur and stride-2 decimation for shallow feature maps.

use ndarray::{s, Array2, Array4, ArrayView2, ArrayView4, Axis};
use serde::{Deserialize, Serialize};

/// Kernel used before decimating shallow feature maps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlurConfig {
    /// Kernel side length
    pub kernel_size: usize,
    /// Isotropic standard deviation
    pub sigma: f32,
}

impl Default for BlurConfig {
    fn default() -> Self {
        Self {
            kernel_size: 5,
            sigma: 1.0,
        }
    }
}

impl BlurConfig {
    /// Build the kernel described by this config.
    #[must_use]
    pub fn kernel(&self) -> Array2<f32> {
        gaussian_kernel(self.kernel_size, self.sigma)
    }
}

/// Isotropic 2-D Gaussian `exp(-(x² + y²) / 2σ²)`.
///
/// Normalized by its peak (the centre is exactly 1), not by its sum. Offsets run
/// from `-(size - 1) / 2` so even sizes put the extra tap on the positive side.
#[must_use]
pub fn gaussian_kernel(size: usize, sigma: f32) -> Array2<f32> {
    let half = ((size.max(1) - 1) / 2) as f32;
    let denom = 2.0 * sigma * sigma;
    Array2::from_shape_fn((size, size), |(i, j)| {
        let y = i as f32 - half;
        let x = j as f32 - half;
        (-(x * x + y * y) / denom).exp()
    })
}

/// Zero-padded 2-D convolution returning an output the size of `input`.
///
/// The output is the centred slice of the full convolution, starting at
/// `(k - 1) / 2` on each axis.
#[must_use]
pub fn convolve_same(input: ArrayView2<'_, f32>, kernel: ArrayView2<'_, f32>) -> Array2<f32> {
    let (h, w) = input.dim();
    let (kh, kw) = kernel.dim();
    let (oy, ox) = (((kh.max(1) - 1) / 2) as isize, ((kw.max(1) - 1) / 2) as isize);

    Array2::from_shape_fn((h, w), |(i, j)| {
        let mut acc = 0.0f32;
        for m in 0..kh {
            let y = i as isize + oy - m as isize;
            if y < 0 || y >= h as isize {
                continue;
            }
            for n in 0..kw {
                let x = j as isize + ox - n as isize;
                if x < 0 || x >= w as isize {
                    continue;
                }
                acc += input[[y as usize, x as usize]] * kernel[[m, n]];
            }
        }
        acc
    })
}

/// Blur every `(batch, channel)` map, then keep every second row and column
/// starting at index 0.
#[must_use]
pub fn blur_downsample(maps: ArrayView4<'_, f32>, kernel: ArrayView2<'_, f32>) -> Array4<f32> {
    let (b, c, h, w) = maps.dim();
    let mut out = Array4::zeros((b, c, h.div_ceil(2), w.div_ceil(2)));
    for (src, mut dst) in maps.axis_iter(Axis(0)).zip(out.axis_iter_mut(Axis(0))) {
        for (channel, mut target) in src.axis_iter(Axis(0)).zip(dst.axis_iter_mut(Axis(0))) {
            let blurred = convolve_same(channel, kernel);
            target.assign(&blurred.slice(s![..;2, ..;2]));
        }
    }
    out
}
