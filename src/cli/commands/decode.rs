//! Decode command implementation

use super::load_with;
use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{apply_decode_overrides, DecodeArgs, PipelineSpec};
use crate::data::{ImageDirectory, LatentArchive, ResponseArchive};
use crate::decoding::DecodingModel;
use crate::error::{Result, ResultExt};
use crate::eval::{pixel_correlation, Summary};
use crate::generative::{GenerativeNetwork, ImageSynthesizer, LinearGenerator};
use crate::latent::replicate;

pub fn run_decode(args: DecodeArgs, level: LogLevel) -> std::result::Result<(), String> {
    let spec = load_with(&args.config, |spec| apply_decode_overrides(spec, &args))?;
    decode(&spec, !args.no_images, level)
        .map(|_| ())
        .map_err(|e| format!("Decoding failed: {e}"))
}

/// Fit the response-to-latent decoder, reconstruct the test stimuli and score them.
///
/// Returns the per-image pixel correlation summary.
pub(crate) fn decode(spec: &PipelineSpec, save_images: bool, level: LogLevel) -> Result<Option<Summary>> {
    let latents = LatentArchive::load(&spec.data.resolve(&spec.data.latents))?;
    let responses = ResponseArchive::load(&spec.data.resolve(&spec.data.responses), &spec.data.mask)?;
    let generator = LinearGenerator::new(spec.generator.clone())?;
    let synthesizer = ImageSynthesizer::new(&generator);
    let batch_size = spec.generation.batch_size;

    let model = DecodingModel::fit(responses.train.view(), latents.train.view(), generator.num_ws())?;
    log(
        level,
        LogLevel::Normal,
        &format!(
            "Decoder: {} channels → {} latent dims ({} styles)",
            responses.n_channels(),
            model.w_dim(),
            model.num_ws
        ),
    );

    let reconstructed = model
        .reconstruct(responses.test.view(), &synthesizer, batch_size)
        .at_step(|| "reconstruction")?;
    let truth = synthesizer
        .synthesize_chunked(replicate(latents.test.view(), generator.num_ws()).view(), batch_size)
        .at_step(|| "ground truth")?;

    let scores = pixel_correlation(&reconstructed, &truth)?;
    let summary = Summary::of(scores.r.iter().copied());
    match &summary {
        Some(summary) => log(level, LogLevel::Normal, &format!("  pixel r {summary}")),
        None => log(level, LogLevel::Normal, "  pixel r: no finite correlations"),
    }

    if save_images {
        let mut dir = ImageDirectory::create(spec.data.resolve(&spec.data.reconstructions))?;
        dir.save_all(0, &reconstructed)?;
        log(level, LogLevel::Normal, &format!("✓ reconstructions → {}", dir.root().display()));
    }
    let path = spec.data.resolve(&spec.data.models).join("decoder.safetensors");
    model.save(&path)?;
    log(level, LogLevel::Normal, &format!("✓ decoder → {}", path.display()));
    Ok(summary)
}
