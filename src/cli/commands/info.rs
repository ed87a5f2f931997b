//! Info command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{load_spec, InfoArgs, OutputFormat};

pub fn run_info(args: InfoArgs, level: LogLevel) -> Result<(), String> {
    let spec = load_spec(&args.config).map_err(|e| format!("Config error: {e}"))?;

    match args.format {
        OutputFormat::Text => {
            log(level, LogLevel::Normal, "Configuration Info:");
            println!();
            println!(
                "Generator: {} styles × {} dims, {}px",
                spec.generator.num_ws, spec.generator.w_dim, spec.generator.resolution
            );
            println!(
                "Stimuli: {} train / {} test",
                spec.generation.n_train, spec.generation.n_test
            );
            println!("Layers: {}", spec.features.layers.len());
            println!("Ridge alphas: {}", spec.encoding.alphas.len());
            println!("Data root: {}", spec.data.root.display());

            if spec.generator.num_classes.is_some() {
                println!("Conditional generator: enabled");
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&spec)
                .map_err(|e| format!("JSON serialization error: {e}"))?;
            println!("{json}");
        }
        OutputFormat::Yaml => {
            let yaml = serde_yaml::to_string(&spec)
                .map_err(|e| format!("YAML serialization error: {e}"))?;
            println!("{yaml}");
        }
    }

    Ok(())
}
