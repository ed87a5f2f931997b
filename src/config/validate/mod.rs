//! Configuration validation
//!
//! Validates pipeline specifications before any artifact is touched.

mod error;
mod validator;

#[cfg(test)]
mod proptests;
#[cfg(test)]
mod tests;

pub use error::ValidationError;
pub use validator::validate_spec;
