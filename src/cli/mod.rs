//! CLI module for cortexgan
//!
//! Command handlers and output helpers for the `cortexgan` binary.

mod commands;
mod logging;

pub use commands::run_command;
pub use logging::{init_tracing, LogLevel};

// Re-export Cli from config for convenience
pub use crate::config::Cli;
