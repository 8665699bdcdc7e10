//! Objective bound to a generator and a discriminator optimizer

use super::{AdversarialLoss, ObjectiveKind};
use crate::error::{Error, Result};
use crate::model::{flatten_logits, logit_grad, ModelPair};
use crate::nn::Network;
use crate::optim::{Optimizer, OptimizerConfig};
use ndarray::{concatenate, s, Array1, Array2, ArrayD, ArrayView1, Axis};
use tracing::debug;

/// A formulation plus one optimizer per player
///
/// Built once per network structure: optimizer state is positional, so a
/// rebuilt [`ModelPair`] needs a fresh objective.
pub struct AdversarialObjective {
    loss: Box<dyn AdversarialLoss>,
    generator_optimizer: Box<dyn Optimizer>,
    discriminator_optimizer: Box<dyn Optimizer>,
}

impl std::fmt::Debug for AdversarialObjective {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdversarialObjective")
            .field("loss", &self.loss)
            .field("generator_lr", &self.generator_optimizer.lr())
            .field("discriminator_lr", &self.discriminator_optimizer.lr())
            .finish()
    }
}

impl AdversarialObjective {
    pub fn new(loss: Box<dyn AdversarialLoss>, optimizer: &OptimizerConfig) -> Self {
        Self {
            loss,
            generator_optimizer: optimizer.build(),
            discriminator_optimizer: optimizer.build(),
        }
    }

    pub fn build(kind: ObjectiveKind, optimizer: &OptimizerConfig) -> Self {
        Self::new(kind.loss(), optimizer)
    }

    pub fn name(&self) -> &'static str {
        self.loss.name()
    }

    fn step_discriminator(&mut self, discriminator: &mut Network) {
        let mut params = discriminator.params_mut();
        self.discriminator_optimizer.step(&mut params);
        self.loss.constrain_discriminator(&mut params);
    }

    fn step_generator(&mut self, generator: &mut Network) {
        self.generator_optimizer.step(&mut generator.params_mut());
    }

    /// Scores real and generated samples in one pass; returns both logit
    /// vectors, split at `real.len_of(Axis(0))`
    fn score_both(
        discriminator: &mut Network,
        real: &ArrayD<f32>,
        fake: &ArrayD<f32>,
    ) -> Result<(Array1<f32>, Array1<f32>)> {
        let n_real = real.len_of(Axis(0));
        let batch = concatenate(Axis(0), &[real.view(), fake.view()])?;
        let logits = flatten_logits(&discriminator.forward(&batch)?)?;
        Ok((logits.slice(s![..n_real]).to_owned(), logits.slice(s![n_real..]).to_owned()))
    }

    /// One discriminator update; generator parameters are untouched
    pub fn train_discriminator(
        &mut self,
        models: &mut ModelPair,
        real: &ArrayD<f32>,
        latent: &Array2<f32>,
    ) -> Result<f32> {
        let fake = models.generate(latent)?;
        models.discriminator.zero_grad();
        let (real_logits, fake_logits) = Self::score_both(&mut models.discriminator, real, &fake)?;
        let loss = self.loss.discriminator_loss(real_logits.view(), fake_logits.view());

        let grad = concatenate(Axis(0), &[loss.grad_real.view(), loss.grad_fake.view()])?;
        models.discriminator.backward(&logit_grad(grad)?)?;
        self.step_discriminator(&mut models.discriminator);
        models.discriminator.zero_grad();

        debug!(objective = self.name(), d_loss = loss.value, "discriminator step");
        Ok(loss.value)
    }

    /// One generator update through the discriminator, whose parameters
    /// receive no update and end with zeroed gradients
    pub fn train_generator(&mut self, models: &mut ModelPair, latent: &Array2<f32>) -> Result<f32> {
        models.generator.zero_grad();
        let fake = models.generate(latent)?;
        let logits = models.score(&fake)?;
        let loss = self.loss.generator_loss(logits.view());
        self.backprop_generator(models, loss.grad)?;

        debug!(objective = self.name(), g_loss = loss.value, "generator step");
        Ok(loss.value)
    }

    fn backprop_generator(&mut self, models: &mut ModelPair, grad: Array1<f32>) -> Result<()> {
        let grad_fake = models.discriminator.backward(&logit_grad(grad)?)?;
        models.discriminator.zero_grad();
        models.generator.backward(&grad_fake)?;
        self.step_generator(&mut models.generator);
        models.generator.zero_grad();
        Ok(())
    }

    /// Discriminator loss readout, no update
    pub fn discriminator_loss(
        &mut self,
        models: &mut ModelPair,
        real: &ArrayD<f32>,
        latent: &Array2<f32>,
    ) -> Result<f32> {
        let fake = models.generate(latent)?;
        let (real_logits, fake_logits) = Self::score_both(&mut models.discriminator, real, &fake)?;
        Ok(self.loss.discriminator_loss(real_logits.view(), fake_logits.view()).value)
    }

    /// Generator loss readout, no update
    pub fn generator_loss(&mut self, models: &mut ModelPair, latent: &Array2<f32>) -> Result<f32> {
        let fake = models.generate(latent)?;
        let logits = models.score(&fake)?;
        Ok(self.loss.generator_loss(logits.view()).value)
    }

    /// One discriminator update against explicit per-sample targets
    pub fn train_discriminator_labeled(
        &mut self,
        discriminator: &mut Network,
        samples: &ArrayD<f32>,
        targets: ArrayView1<'_, f32>,
    ) -> Result<f32> {
        if samples.len_of(Axis(0)) != targets.len() {
            return Err(Error::Computation(format!(
                "{} targets for {} samples",
                targets.len(),
                samples.len_of(Axis(0))
            )));
        }
        discriminator.zero_grad();
        let logits = flatten_logits(&discriminator.forward(samples)?)?;
        let loss = self.loss.labeled_loss(logits.view(), targets);
        discriminator.backward(&logit_grad(loss.grad)?)?;
        self.step_discriminator(discriminator);
        discriminator.zero_grad();
        Ok(loss.value)
    }

    /// One generator update pushing the discriminator's verdict on its
    /// samples toward `target`
    pub fn train_generator_labeled(
        &mut self,
        models: &mut ModelPair,
        latent: &Array2<f32>,
        target: f32,
    ) -> Result<f32> {
        models.generator.zero_grad();
        let fake = models.generate(latent)?;
        let logits = models.score(&fake)?;
        let targets = Array1::from_elem(logits.len(), target);
        let loss = self.loss.labeled_loss(logits.view(), targets.view());
        self.backprop_generator(models, loss.grad)?;
        Ok(loss.value)
    }
}
