//! cortexgan CLI
//!
//! Pipeline entry point: stimulus generation, feature extraction, encoding and
//! decoding, all driven by one YAML config.
//!
//! # Usage
//!
//! ```bash
//! # Generate train/test stimuli and their latents
//! cortexgan generate pipeline.yaml -n 4000 --n-test 100 --psi 0.7
//!
//! # Extract quantized features for both splits
//! cortexgan extract pipeline.yaml --layers pool1,pool3
//!
//! # Fit per-layer encoders and attribute channels to layers
//! cortexgan encode pipeline.yaml
//!
//! # Decode test responses back to images
//! cortexgan decode pipeline.yaml -b 16
//!
//! # Validate or show config
//! cortexgan validate pipeline.yaml --detailed
//! cortexgan info pipeline.yaml --format json
//! ```

use clap::Parser;
use cortexgan::cli::{run_command, Cli};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
