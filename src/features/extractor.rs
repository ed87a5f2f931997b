//! Chunked feature extraction with global-range quantization.

use image::RgbImage;
use ndarray::{s, Array2, Array4};
use serde::{Deserialize, Serialize};
use std::ops::Range;

use super::blur::{blur_downsample, BlurConfig};
use super::depth::FeatureDepth;
use super::network::FeatureNetwork;
use super::preprocess::stack_images;
use super::source::ImageSource;
use crate::error::{Error, Result, ResultExt};
use crate::quant::{MinMaxObserver, QuantizedFeatures};

/// Explicit chunking plan for extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Images per forward pass
    pub batch_size: usize,
    /// Number of chunks; `batch_size * n_batches` must cover the dataset
    pub n_batches: usize,
    /// Blur applied before decimating pool1/pool2
    pub blur: BlurConfig,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            batch_size: 50,
            n_batches: 80,
            blur: BlurConfig::default(),
        }
    }
}

impl ExtractionConfig {
    /// Chunk ranges for a dataset of `len` images.
    pub fn chunks(&self, len: usize) -> Result<Vec<Range<usize>>> {
        if self.batch_size == 0 || self.n_batches == 0 {
            return Err(Error::InvalidArgument(format!(
                "batch_size ({}) and n_batches ({}) must be positive",
                self.batch_size, self.n_batches
            )));
        }
        let capacity = self.batch_size.saturating_mul(self.n_batches);
        if capacity < len {
            return Err(Error::InvalidArgument(format!(
                "{} batches of {} cover {capacity} images, dataset has {len}",
                self.n_batches, self.batch_size
            )));
        }
        let used = len.div_ceil(self.batch_size).min(self.n_batches);
        Ok((0..used)
            .map(|i| {
                let start = i.saturating_mul(self.batch_size).min(len);
                start..start.saturating_add(self.batch_size).min(len)
            })
            .collect())
    }
}

/// Runs a [`FeatureNetwork`] over an image dataset chunk by chunk.
pub struct FeatureExtractor<'a, N: FeatureNetwork + ?Sized> {
    network: &'a N,
    config: ExtractionConfig,
    kernel: Array2<f32>,
}

impl<'a, N: FeatureNetwork + ?Sized> FeatureExtractor<'a, N> {
    /// Create an extractor; the blur kernel is built once here.
    pub fn new(network: &'a N, config: ExtractionConfig) -> Result<Self> {
        if config.blur.kernel_size == 0 || !(config.blur.sigma > 0.0) {
            return Err(Error::InvalidArgument(format!(
                "blur kernel needs positive size and sigma: {:?}",
                config.blur
            )));
        }
        let kernel = config.blur.kernel();
        Ok(Self {
            network,
            config,
            kernel,
        })
    }

    /// Chunking plan in use.
    #[must_use]
    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Float activations for one batch of images, downsampled for shallow depths.
    pub fn extract_float(&self, images: &[RgbImage], depth: FeatureDepth) -> Result<Array4<f32>> {
        let tensors = images
            .iter()
            .map(|img| self.network.preprocess(img))
            .collect::<Result<Vec<_>>>()?;
        let input = stack_images(&tensors)?;
        let maps = self.network.forward_to(input.view(), depth)?;
        if maps.shape()[0] != images.len() {
            return Err(Error::shape(
                format!("{depth} activations"),
                &[images.len()],
                &maps.shape()[..1],
            ));
        }
        if depth.is_downsampled() {
            Ok(blur_downsample(maps.view(), self.kernel.view()))
        } else {
            Ok(maps)
        }
    }

    /// Extract and quantize one depth for the whole dataset.
    ///
    /// The first pass finds the global `(min, max)` over every chunk; the second
    /// quantizes each chunk with that range.
    pub fn extract<S: ImageSource + ?Sized>(
        &self,
        source: &S,
        depth: FeatureDepth,
    ) -> Result<QuantizedFeatures> {
        let total = source.len();
        if total == 0 {
            return Err(Error::InvalidArgument("image source is empty".into()));
        }
        let chunks = self.config.chunks(total)?;

        let mut observer = MinMaxObserver::new();
        let mut example_shape = None;
        for (batch, range) in chunks.iter().enumerate() {
            let maps = self
                .extract_chunk(source, range.clone(), depth)
                .at_step(|| format!("layer {depth}, batch {batch} (range pass)"))?;
            let (_, c, h, w) = maps.dim();
            match example_shape {
                None => example_shape = Some([c, h, w]),
                Some(shape) if shape != [c, h, w] => {
                    return Err(Error::shape(format!("{depth} batch {batch}"), &shape, &maps.shape()[1..]));
                }
                Some(_) => {}
            }
            observer.observe_iter(maps.iter());
            tracing::debug!(layer = %depth, batch, "observed activation range");
        }

        let scale = observer
            .finish()
            .ok_or_else(|| Error::Numerical(format!("layer {depth} produced no activations")))?;
        let example_shape = example_shape.unwrap_or([0, 0, 0]);
        let dims: usize = example_shape.iter().product();

        let mut codes = Array2::<u8>::zeros((total, dims));
        for (batch, range) in chunks.iter().enumerate() {
            let maps = self
                .extract_chunk(source, range.clone(), depth)
                .at_step(|| format!("layer {depth}, batch {batch} (quantize pass)"))?;
            let mut block = codes.slice_mut(s![range.clone(), ..]);
            for (dst, &v) in block.iter_mut().zip(maps.iter()) {
                *dst = scale.quantize_value(v);
            }
        }

        tracing::info!(
            layer = %depth,
            examples = total,
            dims,
            min = scale.min,
            max = scale.max,
            "extracted features"
        );
        QuantizedFeatures::new(codes, example_shape, scale)
    }

    /// Extract several depths, one full pass per depth.
    pub fn extract_all<S: ImageSource + ?Sized>(
        &self,
        source: &S,
        depths: &[FeatureDepth],
    ) -> Result<Vec<(FeatureDepth, QuantizedFeatures)>> {
        depths
            .iter()
            .map(|&depth| Ok((depth, self.extract(source, depth)?)))
            .collect()
    }

    fn extract_chunk<S: ImageSource + ?Sized>(
        &self,
        source: &S,
        range: Range<usize>,
        depth: FeatureDepth,
    ) -> Result<Array4<f32>> {
        let images = range
            .map(|i| source.load(i).at_step(|| format!("image {i}")))
            .collect::<Result<Vec<_>>>()?;
        self.extract_float(&images, depth)
    }
}
