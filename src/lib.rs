//! Contienda: adversarial training of generator/discriminator pairs
//!
//! - [`train::GanTrainer`] trains fixed-shape networks under a min-max,
//!   Wasserstein or least-squares objective
//! - [`train::ProgressiveTrainer`] grows convolutional networks from `4x4`
//!   up to the dataset resolution, carrying trained weights across growth
//!   events
//!
//! Networks are built by pluggable builders ([`model::ModelBuilder`],
//! [`model::GrowingModelBuilder`]) over the small `ndarray` backend in
//! [`nn`]. Runs can be described as YAML specs and driven from the CLI.

pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod metrics;
pub mod model;
pub mod nn;
pub mod objective;
pub mod optim;
pub mod train;

pub use error::{Error, Result};
