//! Error types for adversarial training

use thiserror::Error;

/// Crate-wide error type
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid configuration: unknown objective or mode, bad hyper-parameters,
    /// builder output that does not match the configured shapes
    #[error("Configuration error: {0}")]
    Config(String),

    /// Empty or malformed dataset
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// Weight injection with mismatched shapes
    #[error("Shape mismatch: {0}")]
    Shape(String),

    /// Failure inside the numeric backend
    #[error("Computation error: {0}")]
    Computation(String),

    #[error("Array shape error: {0}")]
    Array(#[from] ndarray::ShapeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type for training operations
pub type Result<T> = std::result::Result<T, Error>;
