//! On-disk artifacts
//!
//! Class tables, latent and response archives, quantized feature stores, image
//! directories and fitted linear maps. Arrays are exchanged as safetensors files;
//! images as lossless PNG. An absent input file is reported as
//! [`Error::MissingArtifact`](crate::Error::MissingArtifact).

mod archive;
mod feature_store;
mod images;
mod labels;
mod models;
mod regions;
mod tensors;


pub use archive::{ChannelMask, LatentArchive, ResponseArchive};
pub use feature_store::FeatureStore;
pub use images::ImageDirectory;
pub use labels::ClassTable;
pub use models::{load_linear_map, save_linear_map, LinearMap};
pub use regions::{default_regions, Region};
