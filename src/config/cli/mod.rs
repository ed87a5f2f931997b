//! CLI argument parsing
//!
//! ```bash
//! cortexgan generate pipeline.yaml -n 100 --psi 0.7
//! cortexgan extract pipeline.yaml --layers pool1,pool3
//! cortexgan encode pipeline.yaml --folds 5
//! cortexgan decode pipeline.yaml
//! cortexgan validate pipeline.yaml
//! cortexgan info pipeline.yaml --format yaml
//! ```

mod core;
mod types;

pub use self::core::{
    apply_decode_overrides, apply_encode_overrides, apply_extract_overrides,
    apply_generate_overrides, parse_args, Cli, Command, DecodeArgs, EncodeArgs, ExtractArgs,
    GenerateArgs, InfoArgs, ValidateArgs,
};
pub use types::OutputFormat;
