//! Generator/discriminator construction
//!
//! The trainers only see networks through [`ModelPair`] and the two builder
//! traits. [`ModelBuilder`] makes fixed-shape pairs for the base trainer;
//! [`GrowingModelBuilder`] makes pairs at a given growth stage, seeding
//! transplantable layers from a [`TransplantTable`].

mod dense;
mod growing;
mod persist;
mod transplant;

pub use dense::DenseGanBuilder;
pub use growing::{ConvGrowingBuilder, BASE_RESOLUTION};
pub use persist::{LayerEntry, NetworkArtifact, DISCRIMINATOR_FILE, GENERATOR_FILE};
pub use transplant::TransplantTable;

use crate::config::{GanConfig, ProgressiveConfig};
use crate::error::{Error, Result};
use crate::nn::Network;
use ndarray::{Array1, Array2, ArrayD};

/// The two adversarial players
#[derive(Debug, Default)]
pub struct ModelPair {
    pub generator: Network,
    pub discriminator: Network,
}

impl ModelPair {
    pub fn new(generator: Network, discriminator: Network) -> Self {
        Self { generator, discriminator }
    }

    /// Map a `[batch, latent_dim]` latent batch to samples
    pub fn generate(&mut self, latent: &Array2<f32>) -> Result<ArrayD<f32>> {
        self.generator.forward(&latent.clone().into_dyn())
    }

    /// Discriminator logits, one per sample
    pub fn score(&mut self, samples: &ArrayD<f32>) -> Result<Array1<f32>> {
        let logits = self.discriminator.forward(samples)?;
        flatten_logits(&logits)
    }
}

/// `[batch, 1]` discriminator output to a `[batch]` vector
pub(crate) fn flatten_logits(logits: &ArrayD<f32>) -> Result<Array1<f32>> {
    match logits.shape() {
        [_, 1] => Ok(logits.iter().copied().collect()),
        shape => Err(Error::Computation(format!(
            "discriminator must output [batch, 1], got {shape:?}"
        ))),
    }
}

/// `[batch]` logit gradient back to the discriminator's `[batch, 1]` output shape
pub(crate) fn logit_grad(grad: Array1<f32>) -> Result<ArrayD<f32>> {
    let n = grad.len();
    Ok(grad.into_shape_with_order((n, 1))?.into_dyn())
}

/// Builds the fixed-shape networks of the base trainer
///
/// Initial weights must depend only on `config` and `seed`.
pub trait ModelBuilder {
    /// `[batch, latent_dim]` to `[batch, ..input_shape]`
    fn build_generator(&self, config: &GanConfig, seed: u64) -> Result<Network>;

    /// `[batch, ..input_shape]` to `[batch, 1]` logits
    fn build_discriminator(&self, config: &GanConfig, seed: u64) -> Result<Network>;
}

/// Builds the networks of the progressive trainer at a growth stage
///
/// A stage-`s` generator outputs `2^(s+2)` square images; the discriminator
/// consumes them. Layers named by `*_head` and `*_body` are the
/// transplantable ones: their weights are captured before a growth event and
/// injected into the rebuilt networks, every other layer keeps its default
/// initialisation.
pub trait GrowingModelBuilder {
    fn build_generator(
        &self,
        config: &ProgressiveConfig,
        stages: usize,
        table: &TransplantTable,
        seed: u64,
    ) -> Result<Network>;

    fn build_discriminator(
        &self,
        config: &ProgressiveConfig,
        stages: usize,
        table: &TransplantTable,
        seed: u64,
    ) -> Result<Network>;

    fn generator_head(&self) -> String;

    /// Name of the generator's `index`-th growth block
    fn generator_body(&self, index: usize) -> String;

    fn discriminator_head(&self) -> String;

    fn discriminator_body(&self, index: usize) -> String;
}
