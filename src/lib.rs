//! # cortexgan
//!
//! Encoding and decoding of visual cortex recordings through the latent space of a
//! style-based generative network.
//!
//! ```text
//!            generate                     extract                  encode
//! z ─► w (truncated) ─► images ─► features (pool1..pool5, u8) ─► ridge per layer ─► layer attribution
//!      │                                                                              per region
//!      └──────────────────────── decode: responses ─► w ─► reconstructed images ─► pixel r
//! ```
//!
//! ## Modules
//!
//! - [`latent`]: z sampling, w mapping with truncation, w replication
//! - [`generative`]: generator contract and image synthesis
//! - [`features`]: chunked feature extraction at five depths
//! - [`quant`]: global-range 8-bit feature quantization
//! - [`encoding`]: cross-validated kernel ridge and best-layer attribution
//! - [`decoding`]: least-squares response-to-latent decoder
//! - [`eval`]: Pearson correlation with significance
//! - [`data`]: artifact storage (safetensors, PNG, label tables)
//! - [`config`]: YAML pipeline config and CLI arguments
//! - [`cli`]: command handlers

pub mod cli;
pub mod config;
pub mod data;
pub mod decoding;
pub mod encoding;
pub mod error;
pub mod eval;
pub mod features;
pub mod generative;
pub mod latent;
mod linalg;
pub mod quant;

pub use error::{Error, Result};
