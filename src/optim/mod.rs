//! Optimizers for the adversarial players

mod adam;
mod config;
mod optimizer;
mod sgd;

pub use adam::Adam;
pub use config::{OptimizerConfig, OptimizerKind};
pub use optimizer::Optimizer;
pub use sgd::Sgd;
