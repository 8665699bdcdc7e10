//! Convolutional networks that grow by doubling resolution

use super::{GrowingModelBuilder, TransplantTable};
use crate::config::ProgressiveConfig;
use crate::error::Result;
use crate::nn::{AvgPool2d, Conv2d, Dense, Flatten, LeakyRelu, Network, Reshape, Upsample2d};

const SLOPE: f32 = 0.2;

/// Base resolution of a stage-0 network
pub const BASE_RESOLUTION: usize = 4;

/// Generator: dense head to a `4x4xC` map, one `upsample -> conv3x3` block
/// per stage, `1x1` projection to image channels.
///
/// Discriminator: `1x1` projection from image channels, one
/// `conv3x3 -> avgpool` block per stage (newest block at the input side),
/// dense head on the `4x4xC` map, single logit.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConvGrowingBuilder;

impl GrowingModelBuilder for ConvGrowingBuilder {
    fn build_generator(
        &self,
        config: &ProgressiveConfig,
        stages: usize,
        table: &TransplantTable,
        seed: u64,
    ) -> Result<Network> {
        let c = config.channels;
        let base = BASE_RESOLUTION * BASE_RESOLUTION * c;
        let mut net = Network::new()
            .with(Dense::new(self.generator_head(), config.latent_dim, base, seed))
            .with(Reshape::new("g_reshape", &[BASE_RESOLUTION, BASE_RESOLUTION, c]))
            .with(LeakyRelu::new("g_head_act", SLOPE));
        for i in 0..stages {
            net.push(Upsample2d::new(format!("g_up_{i}")));
            net.push(Conv2d::new(self.generator_body(i), c, c, 3, seed)?);
            net.push(LeakyRelu::new(format!("g_act_{i}"), SLOPE));
        }
        net.push(Conv2d::new("g_to_image", c, config.image_shape[2], 1, seed)?);

        table.inject(&mut net, &self.generator_head(), |i| self.generator_body(i))?;
        Ok(net)
    }

    fn build_discriminator(
        &self,
        config: &ProgressiveConfig,
        stages: usize,
        table: &TransplantTable,
        seed: u64,
    ) -> Result<Network> {
        let c = config.channels;
        let base = BASE_RESOLUTION * BASE_RESOLUTION * c;
        let mut net = Network::new()
            .with(Conv2d::new("d_from_image", config.image_shape[2], c, 1, seed)?)
            .with(LeakyRelu::new("d_from_image_act", SLOPE));
        for i in (0..stages).rev() {
            net.push(Conv2d::new(self.discriminator_body(i), c, c, 3, seed)?);
            net.push(LeakyRelu::new(format!("d_act_{i}"), SLOPE));
            net.push(AvgPool2d::new(format!("d_pool_{i}")));
        }
        net.push(Flatten::new("d_flatten"));
        net.push(Dense::new(self.discriminator_head(), base, config.latent_dim, seed));
        net.push(LeakyRelu::new("d_head_act", SLOPE));
        net.push(Dense::new("d_out", config.latent_dim, 1, seed));

        table.inject(&mut net, &self.discriminator_head(), |i| self.discriminator_body(i))?;
        Ok(net)
    }

    fn generator_head(&self) -> String {
        "g_head".to_string()
    }

    fn generator_body(&self, index: usize) -> String {
        format!("g_block_{index}")
    }

    fn discriminator_head(&self) -> String {
        "d_head".to_string()
    }

    fn discriminator_body(&self, index: usize) -> String {
        format!("d_block_{index}")
    }
}
