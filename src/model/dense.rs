//! Multilayer-perceptron generator and discriminator

use super::ModelBuilder;
use crate::config::GanConfig;
use crate::error::{Error, Result};
use crate::nn::{Dense, Flatten, LeakyRelu, Network, Reshape, Tanh};

/// Fully connected networks sized from [`GanConfig`]
///
/// Generator: `latent -> hidden.. -> prod(input_shape)`, tanh, reshaped to
/// the sample shape. Discriminator: flatten, `hidden.. -> 1` logit.
#[derive(Debug, Clone, Copy, Default)]
pub struct DenseGanBuilder;

fn sample_size(config: &GanConfig) -> Result<usize> {
    let size: usize = config.input_shape.iter().product();
    if config.input_shape.is_empty() || size == 0 {
        return Err(Error::Config(format!("input shape {:?} has no elements", config.input_shape)));
    }
    Ok(size)
}

impl ModelBuilder for DenseGanBuilder {
    fn build_generator(&self, config: &GanConfig, seed: u64) -> Result<Network> {
        let out = sample_size(config)?;
        let slope = config.generator.leaky_slope;
        let mut net = Network::new();
        let mut width = config.latent_dim;
        for (i, &hidden) in config.generator.hidden_dims.iter().enumerate() {
            net.push(Dense::new(format!("g_dense_{i}"), width, hidden, seed));
            net.push(LeakyRelu::new(format!("g_act_{i}"), slope));
            width = hidden;
        }
        net.push(Dense::new("g_out", width, out, seed));
        net.push(Tanh::new("g_tanh"));
        net.push(Reshape::new("g_reshape", &config.input_shape));
        Ok(net)
    }

    fn build_discriminator(&self, config: &GanConfig, seed: u64) -> Result<Network> {
        let mut width = sample_size(config)?;
        let slope = config.discriminator.leaky_slope;
        let mut net = Network::new().with(Flatten::new("d_flatten"));
        for (i, &hidden) in config.discriminator.hidden_dims.iter().enumerate() {
            net.push(Dense::new(format!("d_dense_{i}"), width, hidden, seed));
            net.push(LeakyRelu::new(format!("d_act_{i}"), slope));
            width = hidden;
        }
        net.push(Dense::new("d_out", width, 1, seed));
        Ok(net)
    }
}
