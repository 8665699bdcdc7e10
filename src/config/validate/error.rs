//! Validation error types

use crate::error::Error;

/// A setting outside its allowed range
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid batch size: {0} (must be > 0)")]
    InvalidBatchSize(usize),

    #[error("Invalid checkpoint interval: {0} (must be > 0)")]
    InvalidCheckpointInterval(usize),

    #[error("Invalid growth interval: {0} (must be > 0)")]
    InvalidGrowRate(usize),

    #[error("Invalid validation split: {0} (must be finite)")]
    InvalidValidationSplit(f32),

    #[error("Invalid latent dimension: {0} (must be > 0)")]
    InvalidLatentDim(usize),

    #[error("Invalid n_critic: {0} (must be > 0)")]
    InvalidCritic(usize),

    #[error("Invalid input shape: {0:?} (needs at least one non-zero axis)")]
    InvalidInputShape(Vec<usize>),

    #[error("Invalid image shape: {0:?} (must be square, a power of two, at least 4, with channels)")]
    InvalidImageShape([usize; 3]),

    #[error("Invalid channel width: {0} (must be > 0)")]
    InvalidChannels(usize),

    #[error("Invalid metric sample count: {0} (must be > 0)")]
    InvalidMetricSamples(usize),

    #[error("Invalid objective: {0} (must be one of: minmax, wasserstein, least_squares)")]
    InvalidObjective(String),

    #[error("Invalid mode: {0} (must be one of: vanilla, stable)")]
    InvalidMode(String),

    #[error("Invalid optimizer: {0}")]
    InvalidOptimizer(String),

    #[error("Invalid data source: {0}")]
    InvalidData(String),
}

impl From<ValidationError> for Error {
    fn from(err: ValidationError) -> Self {
        Error::Config(err.to_string())
    }
}
