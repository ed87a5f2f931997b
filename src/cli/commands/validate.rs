//! Validate command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{load_spec, PipelineSpec, ValidateArgs};

/// Format generator and sampling settings as a string
pub fn format_generator_info(spec: &PipelineSpec) -> String {
    let g = &spec.generator;
    let mut lines = vec![
        format!("  Generator: z={} w={} × {} styles, {}px", g.z_dim, g.w_dim, g.num_ws, g.resolution),
        match g.num_classes {
            Some(n) => format!("  Conditional: {n} classes"),
            None => "  Conditional: no".to_string(),
        },
        format!(
            "  Stimuli: {} train / {} test (psi={}, seed={})",
            spec.generation.n_train, spec.generation.n_test, spec.generation.psi, spec.generation.seed
        ),
    ];
    if let Some(class) = &spec.generation.class {
        lines.push(format!("  Class: {class}"));
    }
    lines.join("\n")
}

/// Format feature extraction settings as a string
pub fn format_features_info(spec: &PipelineSpec) -> String {
    let layers: Vec<String> = spec.features.layers.iter().map(ToString::to_string).collect();
    let ex = &spec.extraction;
    [
        format!("  Layers: {}", layers.join(", ")),
        format!("  Chunks: {} × {} images", ex.n_batches, ex.batch_size),
        format!("  Blur: {}×{} (sigma={})", ex.blur.kernel_size, ex.blur.kernel_size, ex.blur.sigma),
    ]
    .join("\n")
}

/// Format ridge regression settings as a string
pub fn format_encoding_info(spec: &PipelineSpec) -> String {
    let enc = &spec.encoding;
    let (lo, hi) = enc
        .alphas
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &a| (lo.min(a), hi.max(a)));
    [
        format!("  Ridge alphas: {} in [{lo:e}, {hi:e}]", enc.alphas.len()),
        format!("  Folds: {} (seed={})", enc.folds, enc.seed),
    ]
    .join("\n")
}

/// Format data paths and channel layout as a string
pub fn format_data_info(spec: &PipelineSpec) -> String {
    let data = &spec.data;
    let mut lines = vec![
        format!("  Root: {}", data.root.display()),
        format!("  Responses: {}", data.resolve(&data.responses).display()),
        format!("  Latents: {}", data.resolve(&data.latents).display()),
        format!(
            "  Excluded channels: {}..{}",
            data.mask.excluded.start, data.mask.excluded.end
        ),
    ];
    for region in spec.regions() {
        lines.push(format!("  Region {}: {}..{}", region.name, region.start, region.end));
    }
    lines.join("\n")
}

/// Print detailed configuration summary
pub fn print_detailed_summary(spec: &PipelineSpec) {
    println!();
    println!("Configuration Summary:");
    println!("{}", format_generator_info(spec));
    println!();
    println!("{}", format_features_info(spec));
    println!();
    println!("{}", format_encoding_info(spec));
    println!();
    println!("{}", format_data_info(spec));
}

pub fn run_validate(args: ValidateArgs, level: LogLevel) -> Result<(), String> {
    log(
        level,
        LogLevel::Normal,
        &format!("Validating config: {}", args.config.display()),
    );

    // load_spec validates after parsing
    let spec = load_spec(&args.config).map_err(|e| format!("Validation failed: {e}"))?;

    log(level, LogLevel::Normal, "Configuration is valid");

    if args.detailed {
        print_detailed_summary(&spec);
    }

    Ok(())
}
