//! Reading pipeline specifications from YAML

use std::fs;
use std::path::Path;

use super::schema::PipelineSpec;
use super::validate::validate_spec;
use crate::error::{Error, Result};

/// Load, parse and validate a pipeline specification.
///
/// A relative `data.root` is taken relative to the config file's directory.
pub fn load_spec<P: AsRef<Path>>(config_path: P) -> Result<PipelineSpec> {
    let path = config_path.as_ref();
    let yaml = fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => Error::MissingArtifact {
            path: path.to_path_buf(),
        },
        _ => Error::Config(format!("Failed to read config file {}: {e}", path.display())),
    })?;

    let mut spec = parse_spec(&yaml)?;
    if spec.data.root.is_relative() {
        if let Some(dir) = path.parent() {
            spec.data.root = dir.join(&spec.data.root);
        }
    }
    tracing::debug!(config = %path.display(), root = %spec.data.root.display(), "loaded pipeline spec");
    Ok(spec)
}

/// Parse and validate a YAML document.
pub fn parse_spec(yaml: &str) -> Result<PipelineSpec> {
    let spec: PipelineSpec = serde_yaml::from_str(yaml)
        .map_err(|e| Error::Config(format!("Failed to parse YAML config: {e}")))?;
    validate_spec(&spec).map_err(|e| Error::Config(format!("Invalid config: {e}")))?;
    Ok(spec)
}
