//! Validation error types
//!
//! One variant per rule a pipeline spec can break.

/// Validation error type
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid generator dimensions: {0}")]
    InvalidGenerator(String),

    #[error("Invalid truncation psi: {0} (must be in [0.0, 1.0])")]
    InvalidPsi(f32),

    #[error("Invalid {0} batch size: 0 (must be > 0)")]
    InvalidBatchSize(&'static str),

    #[error("Invalid chunk count: 0 (must be > 0)")]
    InvalidBatchCount,

    #[error("Invalid blur kernel: size {size}, sigma {sigma} (size must be odd and > 0, sigma > 0.0)")]
    InvalidBlur { size: usize, sigma: f32 },

    #[error("No feature layers selected")]
    EmptyLayers,

    #[error("Feature layer listed twice: {0}")]
    DuplicateLayer(String),

    #[error("Invalid pyramid: {0}")]
    InvalidPyramid(String),

    #[error("No ridge alphas given")]
    EmptyAlphas,

    #[error("Invalid ridge alpha: {0} (must be finite and > 0.0)")]
    InvalidAlpha(f64),

    #[error("Invalid fold count: {0} (must be >= 2)")]
    InvalidFolds(usize),

    #[error("Invalid {0} chunk size: 0 (must be > 0)")]
    InvalidChunk(&'static str),

    #[error("Invalid region {name}: {start}..{end} (must be non-empty)")]
    InvalidRegion { name: String, start: usize, end: usize },

    #[error("Regions {first} and {second} overlap")]
    OverlappingRegions { first: String, second: String },

    #[error("Invalid channel mask: {start}..{end}")]
    InvalidMask { start: usize, end: usize },
}
