//! Generative network interface and image synthesis
//!
//! The mapping and synthesis networks are pretrained artifacts. The pipeline only
//! depends on the [`GenerativeNetwork`] contract:
//!
//! ```text
//! z ─► map(z, one_hot?) ─► raw w (batch, num_ws, w_dim)
//! w ─► synthesize(w)    ─► raw pixels (batch, 3, res, res) in ~[-1, 1]
//! ```
//!
//! [`ImageSynthesizer`] turns raw synthesis output into 8-bit RGB images.
//! [`LinearGenerator`] is a seeded reference network for running the pipeline
//! without external weights.

mod config;
mod linear;
mod network;
mod synthesizer;

#[cfg(test)]
mod tests;

pub use config::GeneratorConfig;
pub use linear::LinearGenerator;
pub use network::GenerativeNetwork;
pub use synthesizer::{to_pixel, ImageSynthesizer};
