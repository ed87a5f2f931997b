//! Error types for cortexgan.
//!
//! Every error names the offending tensor, file, layer or batch so that a failed
//! step can be located without re-running it.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the encoding/decoding pipeline.
///
/// Two degenerate numeric cases are deliberately absent: a constant feature batch
/// quantizes to zeros and a zero-variance correlation input standardizes to zeros.
/// Neither is an error.
#[derive(Error, Debug)]
pub enum Error {
    /// Tensor rank or dimension violates a component's contract.
    #[error("Shape mismatch in {context}: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        context: String,
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// Expected dataset, feature or model file is absent.
    #[error("Missing artifact: {path}\n  → Check the data paths in the pipeline config")]
    MissingArtifact { path: PathBuf },

    /// Argument outside its valid domain (truncation psi, class index, chunk plan).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Pipeline configuration could not be read or is inconsistent.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Artifact could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Linear algebra failed (non-finite system, solver did not converge).
    #[error("Numerical error: {0}")]
    Numerical(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Wraps a failure with the pipeline step (layer, batch, index) it occurred in.
    #[error("{step}: {source}")]
    Step {
        step: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Build a shape mismatch error.
    pub fn shape(context: impl Into<String>, expected: &[usize], actual: &[usize]) -> Self {
        Self::ShapeMismatch {
            context: context.into(),
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        }
    }

    /// Attach step context (e.g. `"layer pool2, batch 3"`).
    pub fn at(self, step: impl Into<String>) -> Self {
        Self::Step {
            step: step.into(),
            source: Box::new(self),
        }
    }

    /// Innermost error, skipping any step context.
    pub fn root(&self) -> &Error {
        match self {
            Self::Step { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Extension for attaching step context to a `Result`.
pub trait ResultExt<T> {
    /// Attach step context lazily.
    fn at_step<F, S>(self, step: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> ResultExt<T> for Result<T> {
    fn at_step<F, S>(self, step: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| e.at(step()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_mismatch_message_lists_shapes() {
        let err = Error::shape("synthesize", &[8, 37, 512], &[8, 36, 512]);
        let msg = err.to_string();
        assert!(msg.contains("synthesize"));
        assert!(msg.contains("[8, 37, 512]"));
        assert!(msg.contains("[8, 36, 512]"));
    }

    #[test]
    fn test_step_context_is_nested() {
        let err: Result<()> = Err(Error::InvalidArgument("psi".into()));
        let err = err
            .at_step(|| "batch 2")
            .at_step(|| "layer pool1")
            .unwrap_err();
        assert_eq!(err.to_string(), "layer pool1: batch 2: Invalid argument: psi");
        assert!(matches!(err.root(), Error::InvalidArgument(_)));
    }

    #[test]
    fn test_missing_artifact_names_path() {
        let err = Error::MissingArtifact {
            path: PathBuf::from("/data/mua.safetensors"),
        };
        assert!(err.to_string().contains("mua.safetensors"));
    }
}
