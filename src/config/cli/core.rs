//! Core CLI types - Cli, Command, and per-command argument structs

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::types::OutputFormat;
use crate::config::schema::PipelineSpec;
use crate::features::FeatureDepth;

/// cortexgan: encoding and decoding of visual cortex activity through GAN latents
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "cortexgan")]
#[command(version)]
#[command(
    about = "Generate stimuli, extract CNN features, fit encoding/decoding models of cortical responses"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Sample latents and synthesize stimulus images
    Generate(GenerateArgs),

    /// Extract quantized features for every image split
    Extract(ExtractArgs),

    /// Fit per-layer ridge encoders and attribute channels to layers
    Encode(EncodeArgs),

    /// Fit the response-to-latent decoder and reconstruct test images
    Decode(DecodeArgs),

    /// Validate a configuration file
    Validate(ValidateArgs),

    /// Display the resolved configuration
    Info(InfoArgs),
}

/// Arguments for the generate command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct GenerateArgs {
    /// Path to YAML configuration file
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Override number of training images
    #[arg(short = 'n', long)]
    pub n_train: Option<usize>,

    /// Override number of test images
    #[arg(long)]
    pub n_test: Option<usize>,

    /// Override truncation psi
    #[arg(long)]
    pub psi: Option<f32>,

    /// Class index or name (conditional generators only)
    #[arg(long)]
    pub class: Option<String>,

    /// Override noise seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Override the data root directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the extract command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct ExtractArgs {
    /// Path to YAML configuration file
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Splits to extract
    #[arg(long, value_delimiter = ',', default_value = "train,test")]
    pub splits: Vec<String>,

    /// Override feature layers (comma separated, e.g. pool1,pool3)
    #[arg(long, value_delimiter = ',')]
    pub layers: Option<Vec<FeatureDepth>>,

    /// Override images per extraction batch
    #[arg(short, long)]
    pub batch_size: Option<usize>,

    /// Override number of extraction batches
    #[arg(long)]
    pub n_batches: Option<usize>,
}

/// Arguments for the encode command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct EncodeArgs {
    /// Path to YAML configuration file
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Override feature layers
    #[arg(long, value_delimiter = ',')]
    pub layers: Option<Vec<FeatureDepth>>,

    /// Override cross-validation folds
    #[arg(long)]
    pub folds: Option<usize>,

    /// Do not write fitted models
    #[arg(long)]
    pub no_save: bool,
}

/// Arguments for the decode command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct DecodeArgs {
    /// Path to YAML configuration file
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Override synthesis batch size
    #[arg(short, long)]
    pub batch_size: Option<usize>,

    /// Skip writing reconstructed images
    #[arg(long)]
    pub no_images: bool,
}

/// Arguments for the validate command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct ValidateArgs {
    /// Path to YAML configuration file
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Show detailed validation report
    #[arg(short, long)]
    pub detailed: bool,
}

/// Arguments for the info command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct InfoArgs {
    /// Path to YAML configuration file
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Output format (text, json, yaml)
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Parse CLI arguments from a string slice (for testing)
pub fn parse_args<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args)
}

/// Apply generate overrides to a PipelineSpec
pub fn apply_generate_overrides(spec: &mut PipelineSpec, args: &GenerateArgs) {
    if let Some(n_train) = args.n_train {
        spec.generation.n_train = n_train;
    }
    if let Some(n_test) = args.n_test {
        spec.generation.n_test = n_test;
    }
    if let Some(psi) = args.psi {
        spec.generation.psi = psi;
    }
    if let Some(class) = &args.class {
        spec.generation.class = Some(class.clone());
    }
    if let Some(seed) = args.seed {
        spec.generation.seed = seed;
    }
    if let Some(output) = &args.output {
        spec.data.root = output.clone();
    }
}

/// Apply extract overrides to a PipelineSpec
pub fn apply_extract_overrides(spec: &mut PipelineSpec, args: &ExtractArgs) {
    if let Some(layers) = &args.layers {
        spec.features.layers = layers.clone();
    }
    if let Some(batch_size) = args.batch_size {
        spec.extraction.batch_size = batch_size;
    }
    if let Some(n_batches) = args.n_batches {
        spec.extraction.n_batches = n_batches;
    }
}

/// Apply encode overrides to a PipelineSpec
pub fn apply_encode_overrides(spec: &mut PipelineSpec, args: &EncodeArgs) {
    if let Some(layers) = &args.layers {
        spec.features.layers = layers.clone();
    }
    if let Some(folds) = args.folds {
        spec.encoding.folds = folds;
    }
}

/// Apply decode overrides to a PipelineSpec
pub fn apply_decode_overrides(spec: &mut PipelineSpec, args: &DecodeArgs) {
    if let Some(batch_size) = args.batch_size {
        spec.generation.batch_size = batch_size;
    }
}
