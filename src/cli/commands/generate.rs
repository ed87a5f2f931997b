//! Generate command implementation

use ndarray::{concatenate, Array2, Axis};

use super::load_with;
use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{apply_generate_overrides, GenerateArgs, PipelineSpec};
use crate::data::{ClassTable, ImageDirectory, LatentArchive};
use crate::error::{Error, Result, ResultExt};
use crate::generative::{GenerativeNetwork, ImageSynthesizer, LinearGenerator};
use crate::latent::{first_copy, sample_noise, seeded_rng, ClassSelection, LatentMapper};

pub fn run_generate(args: GenerateArgs, level: LogLevel) -> std::result::Result<(), String> {
    let spec = load_with(&args.config, |spec| apply_generate_overrides(spec, &args))?;
    generate(&spec, level)
        .map(|_| ())
        .map_err(|e| format!("Generation failed: {e}"))
}

/// Resolve the configured class (index or label name).
fn class_selection(spec: &PipelineSpec) -> Result<Option<ClassSelection>> {
    let Some(key) = spec.generation.class.as_deref() else {
        return Ok(None);
    };
    let index = match &spec.data.labels {
        Some(path) => ClassTable::load(&spec.data.resolve(path))?.resolve(key)?,
        None => key.trim().parse().map_err(|_| {
            Error::InvalidArgument(format!(
                "class '{key}' is not an index and no label table is configured"
            ))
        })?,
    };
    Ok(Some(ClassSelection::Fixed(index)))
}

/// Synthesize the train and test stimulus sets and the latent archive behind them.
pub(crate) fn generate(spec: &PipelineSpec, level: LogLevel) -> Result<LatentArchive> {
    let generator = LinearGenerator::new(spec.generator.clone())?;
    let class = class_selection(spec)?;
    let mut rng = seeded_rng(spec.generation.seed);
    let mapper = LatentMapper::new(&generator);
    let synthesizer = ImageSynthesizer::new(&generator);
    let gen = &spec.generation;

    let mut split_latents = Vec::with_capacity(2);
    for (split, count) in [("train", gen.n_train), ("test", gen.n_test)] {
        let mut images = ImageDirectory::create(spec.data.images(split))?;
        images.truncate(count)?;
        let mut parts: Vec<Array2<f32>> = Vec::new();
        for (batch, start) in (0..count).step_by(gen.batch_size.max(1)).enumerate() {
            let end = (start + gen.batch_size.max(1)).min(count);
            let step = || format!("{split} batch {batch} (images {start}..{end})");
            let z = sample_noise(&mut rng, end - start, generator.z_dim());
            let w = mapper.map(z.view(), class, gen.psi, &mut rng).at_step(step)?;
            let rendered = synthesizer.synthesize(w.view()).at_step(step)?;
            images.save_all(start, &rendered).at_step(step)?;
            parts.push(first_copy(w.view()));
            log(level, LogLevel::Verbose, &format!("  {split}: images {start}..{end}"));
        }
        let views: Vec<_> = parts.iter().map(Array2::view).collect();
        let latents = if views.is_empty() {
            Array2::zeros((0, generator.w_dim()))
        } else {
            concatenate(Axis(0), &views).map_err(|e| Error::Numerical(format!("latent stack: {e}")))?
        };
        log(
            level,
            LogLevel::Normal,
            &format!("✓ {count} {split} images → {}", images.root().display()),
        );
        split_latents.push(latents);
    }

    let test = split_latents.pop().unwrap_or_else(|| Array2::zeros((0, generator.w_dim())));
    let train = split_latents.pop().unwrap_or_else(|| Array2::zeros((0, generator.w_dim())));
    let archive = LatentArchive { train, test };
    let path = spec.data.resolve(&spec.data.latents);
    archive.save(&path)?;
    log(level, LogLevel::Normal, &format!("✓ latents → {}", path.display()));
    Ok(archive)
}
