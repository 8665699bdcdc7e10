//! Configuration validation
//!
//! Validates settings for correctness before any network is built.

mod error;
mod validator;

#[cfg(test)]
mod proptests;
#[cfg(test)]
mod tests;

pub use error::ValidationError;
pub use validator::{validate_gan, validate_progressive, validate_progressive_train, validate_spec, validate_train};
