//! Extract command implementation

use super::load_with;
use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{apply_extract_overrides, ExtractArgs, PipelineSpec};
use crate::data::{FeatureStore, ImageDirectory};
use crate::error::{Result, ResultExt};
use crate::features::{FeatureExtractor, ImageSource, PoolingPyramid};

pub fn run_extract(args: ExtractArgs, level: LogLevel) -> std::result::Result<(), String> {
    let spec = load_with(&args.config, |spec| apply_extract_overrides(spec, &args))?;
    extract(&spec, &args.splits, level).map_err(|e| format!("Extraction failed: {e}"))
}

pub(crate) fn extract(spec: &PipelineSpec, splits: &[String], level: LogLevel) -> Result<()> {
    let network = PoolingPyramid::new(spec.features.pyramid.clone())?;
    let extractor = FeatureExtractor::new(&network, spec.extraction.clone())?;
    let store = FeatureStore::new(spec.data.resolve(&spec.data.features));

    for split in splits {
        let images = ImageDirectory::open(spec.data.images(split))?;
        log(
            level,
            LogLevel::Normal,
            &format!("Extracting {split}: {} images from {}", images.len(), images.root().display()),
        );
        let layers = extractor
            .extract_all(&images, &spec.features.layers)
            .at_step(|| format!("split {split}"))?;
        for (depth, features) in &layers {
            let path = store.save(split, *depth, features)?;
            log(
                level,
                LogLevel::Verbose,
                &format!(
                    "  {depth}: {} × {:?} in [{:.4}, {:.4}]",
                    features.n_examples(),
                    features.example_shape(),
                    features.scale().min,
                    features.scale().max
                ),
            );
            log(level, LogLevel::Normal, &format!("✓ {split} {depth} → {}", path.display()));
        }
    }
    Ok(())
}
