//! Encoding models: image features to neural responses
//!
//! One ridge regression per feature depth maps dequantized features to the full
//! response matrix. The penalty is picked per depth by K-fold cross-validation.
//! Each response channel is then attributed to the depth whose predictions
//! correlate best with it, and attributions are tallied per cortical region.
//!
//! Features usually outnumber examples by orders of magnitude, so the ridge
//! system is solved in kernel form from an `n × n` Gram matrix accumulated over
//! feature chunks.

mod attribution;
mod gram;
mod kfold;
mod model;
mod ridge;


pub use attribution::{assign_layers, region_distribution, LayerAssignment, RegionDistribution};
pub use gram::Gram;
pub use kfold::{Fold, KFold};
pub use model::EncodingModel;
pub use ridge::{default_alphas, RidgeCv, RidgeModel};
