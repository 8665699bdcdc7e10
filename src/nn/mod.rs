//! Reference numeric backend
//!
//! A minimal set of layers with hand-written backward passes over `ndarray`
//! arrays. Image tensors are NHWC (`[batch, height, width, channels]`).
//!
//! Each layer caches what its backward pass needs during `forward`, so a
//! `backward` call always refers to the most recent `forward` on that layer.
//! Gradients accumulate into [`Parameter`]s until `zero_grad`.

mod activation;
mod conv;
mod dense;
pub mod init;
mod network;
mod parameter;
mod resample;

pub use activation::{LeakyRelu, Tanh};
pub use conv::Conv2d;
pub use dense::Dense;
pub use network::Network;
pub use parameter::{Parameter, Weights};
pub use resample::{block_mean, AvgPool2d, Flatten, Reshape, Upsample2d};

use crate::error::{Error, Result};
use ndarray::{ArrayD, ArrayView, Dimension};

/// A differentiable layer
pub trait Layer {
    /// Layer name, unique within a network when the layer has parameters
    fn name(&self) -> &str;

    /// Forward pass; caches whatever `backward` needs
    fn forward(&mut self, input: &ArrayD<f32>) -> Result<ArrayD<f32>>;

    /// Backward pass: accumulates parameter gradients and returns the
    /// gradient with respect to the last input
    fn backward(&mut self, grad_output: &ArrayD<f32>) -> Result<ArrayD<f32>>;

    fn params(&self) -> Vec<&Parameter> {
        Vec::new()
    }

    fn params_mut(&mut self) -> Vec<&mut Parameter> {
        Vec::new()
    }
}

/// View `input` with a fixed rank, or fail with the layer's name in the message
pub(crate) fn with_rank<'a, D: Dimension>(
    layer: &str,
    input: &'a ArrayD<f32>,
) -> Result<ArrayView<'a, f32, D>> {
    input.view().into_dimensionality::<D>().map_err(|_| {
        Error::Computation(format!(
            "{layer}: expected rank-{} input, got shape {:?}",
            D::NDIM.unwrap_or(0),
            input.shape()
        ))
    })
}

/// Error for a backward call without a cached forward pass
pub(crate) fn missing_forward(layer: &str) -> Error {
    Error::Computation(format!("{layer}: backward called before forward"))
}
