//! Encode command implementation

use super::load_with;
use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{apply_encode_overrides, EncodeArgs, PipelineSpec};
use crate::data::{FeatureStore, ResponseArchive};
use crate::encoding::{assign_layers, region_distribution, EncodingModel, LayerAssignment};
use crate::error::Result;
use crate::eval::Summary;

pub fn run_encode(args: EncodeArgs, level: LogLevel) -> std::result::Result<(), String> {
    let spec = load_with(&args.config, |spec| apply_encode_overrides(spec, &args))?;
    encode(&spec, !args.no_save, level)
        .map(|_| ())
        .map_err(|e| format!("Encoding failed: {e}"))
}

/// Fit one encoder per layer, score it on the test split and attribute channels.
pub(crate) fn encode(spec: &PipelineSpec, save: bool, level: LogLevel) -> Result<LayerAssignment> {
    let layers = &spec.features.layers;
    let store = FeatureStore::new(spec.data.resolve(&spec.data.features));
    let responses = ResponseArchive::load(&spec.data.resolve(&spec.data.responses), &spec.data.mask)?;
    log(
        level,
        LogLevel::Normal,
        &format!(
            "Encoding {} channels from {} layers ({} train / {} test examples)",
            responses.n_channels(),
            layers.len(),
            responses.train.nrows(),
            responses.test.nrows()
        ),
    );

    let train = store.load_layers("train", layers)?;
    let model = EncodingModel::fit(&train, responses.train.mapv(f64::from).view(), &spec.encoding)?;
    drop(train);
    for depth in model.depths() {
        if let Some(layer) = model.layer(depth) {
            log(level, LogLevel::Verbose, &format!("  {depth}: alpha = {:e}", layer.alpha));
        }
    }

    let test = store.load_layers("test", layers)?;
    let predictions = model.predict(&test)?;
    let assignment = assign_layers(&predictions, responses.test.mapv(f64::from).view())?;

    for (index, depth) in assignment.depths.iter().enumerate() {
        let scores = Summary::of(assignment.correlations.row(index).iter().copied());
        let line = match scores {
            Some(summary) => format!("  {depth}: r {summary}"),
            None => format!("  {depth}: no finite correlations"),
        };
        log(level, LogLevel::Normal, &line);
    }
    if let Some(best) = Summary::of(assignment.best_correlations().iter().copied()) {
        log(level, LogLevel::Normal, &format!("  best layer: r {best}"));
    }

    for distribution in region_distribution(&assignment, &spec.regions(), layers.len())? {
        log(level, LogLevel::Normal, &distribution.to_string());
    }

    if save {
        let dir = spec.data.resolve(&spec.data.models);
        model.save(&dir)?;
        log(level, LogLevel::Normal, &format!("✓ encoders → {}", dir.display()));
    }
    Ok(assignment)
}
