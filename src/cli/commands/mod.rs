//! CLI command implementations

mod decode;
mod encode;
mod extract;
mod generate;
mod info;
mod validate;


use crate::cli::logging::init_tracing;
use crate::cli::LogLevel;
use crate::config::{load_spec, Cli, Command, PipelineSpec};

/// Execute a CLI command based on the parsed arguments
pub fn run_command(cli: Cli) -> Result<(), String> {
    // Configure output based on verbose/quiet flags
    let log_level = if cli.quiet {
        LogLevel::Quiet
    } else if cli.verbose {
        LogLevel::Verbose
    } else {
        LogLevel::Normal
    };
    init_tracing(log_level);

    match cli.command {
        Command::Generate(args) => generate::run_generate(args, log_level),
        Command::Extract(args) => extract::run_extract(args, log_level),
        Command::Encode(args) => encode::run_encode(args, log_level),
        Command::Decode(args) => decode::run_decode(args, log_level),
        Command::Validate(args) => validate::run_validate(args, log_level),
        Command::Info(args) => info::run_info(args, log_level),
    }
}

/// Load a spec, apply overrides and re-validate the result.
fn load_with<F>(config: &std::path::Path, apply: F) -> Result<PipelineSpec, String>
where
    F: FnOnce(&mut PipelineSpec),
{
    let mut spec = load_spec(config).map_err(|e| format!("Config error: {e}"))?;
    apply(&mut spec);
    crate::config::validate_spec(&spec).map_err(|e| format!("Invalid config: {e}"))?;
    Ok(spec)
}
