//! Latent space: z sampling, w mapping with truncation, and w replication.
//!
//! ```text
//! z ~ N(0, I)  (batch, z_dim)
//!      │
//!      ▼  mapping network (+ one-hot class if conditional)
//! raw w        (batch, num_ws, w_dim)
//!      │
//!      ▼  w = anchor + (raw - anchor) * psi
//! w            (batch, num_ws, w_dim)
//! ```
//!
//! The anchor is the network's average latent: a single global vector for
//! unconditional models, one vector per class for conditional models.

mod anchor;
mod mapper;
mod noise;
mod wspace;


pub use anchor::LatentAnchor;
pub use mapper::{one_hot, truncate, ClassSelection, LatentMapper};
pub use noise::{sample_noise, seeded_rng};
pub use wspace::{first_copy, replicate};
