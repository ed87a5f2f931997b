//! Evaluation metrics
//!
//! Pearson correlation with a two-sided Student's t significance test, applied
//! per response channel (reduction over examples) or per image (reduction over
//! pixels).

mod pearson;
mod summary;

#[cfg(test)]
mod tests;

pub use pearson::{pearsonr, pixel_correlation, standardize, two_sided_p, Pearson};
pub use summary::Summary;
