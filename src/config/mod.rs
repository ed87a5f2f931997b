//! Declarative pipeline configuration
//!
//! A YAML [`PipelineSpec`] describes the reference networks, extraction chunking,
//! ridge search, generation settings, artifact paths and region boundaries. CLI
//! flags override selected fields after loading.

mod cli;
mod loader;
mod schema;
mod validate;

pub use cli::{
    apply_decode_overrides, apply_encode_overrides, apply_extract_overrides,
    apply_generate_overrides, parse_args, Cli, Command, DecodeArgs, EncodeArgs, ExtractArgs,
    GenerateArgs, InfoArgs, OutputFormat, ValidateArgs,
};
pub use loader::{load_spec, parse_spec};
pub use schema::{DataSpec, FeaturesSpec, GenerationSpec, PipelineSpec};
pub use validate::{validate_spec, ValidationError};
