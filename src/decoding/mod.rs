//! Decoding models: neural responses to latents to images
//!
//! An unregularized least-squares map predicts the single-copy w latent of each
//! stimulus from its response vector. Predicted latents are replicated to the
//! synthesizer's style count and rendered without truncation.

mod model;
mod ols;


pub use model::DecodingModel;
pub use ols::LinearRegression;
