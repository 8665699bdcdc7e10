//! Base GAN trainer

use super::callback::{CheckpointCallback, CheckpointContext};
use super::history::{SeriesStats, TrainingHistory};
use super::state::{StepBatches, TrainerPhase, TrainerState};
use crate::config::validate::{validate_gan, validate_train};
use crate::config::{GanConfig, TrainConfig};
use crate::data::{sample_batch, sample_latent, DatasetSplit};
use crate::error::{Error, Result};
use crate::metrics::{evaluate, NearestNeighborDistance, SampleMetric};
use crate::model::{ModelBuilder, ModelPair};
use crate::objective::{AdversarialObjective, ObjectiveKind};
use ndarray::{Array2, ArrayD};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

/// Samples drawn from the train split for each checkpoint's metric
pub const METRIC_SAMPLES: usize = 128;

/// History series of the discriminator loss
pub const D_LOSS: &str = "D loss";
/// History series of the generator loss
pub const G_LOSS: &str = "G loss";

pub(crate) fn not_built() -> Error {
    Error::Config("models are not built".to_string())
}

/// Trains a generator/discriminator pair made by a [`ModelBuilder`]
///
/// Each epoch runs `n_critic` discriminator updates on fresh random batches,
/// then one generator update. Every `checkpoint_interval` epochs the
/// generator is scored against the train split and the history grows by one
/// row.
///
/// # Example
///
/// ```no_run
/// use contienda::config::{GanConfig, TrainConfig};
/// use contienda::model::DenseGanBuilder;
/// use contienda::train::GanTrainer;
/// use ndarray::ArrayD;
///
/// let config = GanConfig { input_shape: vec![8, 8, 3], latent_dim: 4, ..GanConfig::default() };
/// let mut trainer = GanTrainer::new(config, DenseGanBuilder);
/// let dataset = ArrayD::<f32>::zeros(vec![100, 8, 8, 3]);
/// let history = trainer.train(&dataset, &TrainConfig::default(), None).unwrap();
/// println!("{} checkpoints", history.hist_size());
/// ```
pub struct GanTrainer<B: ModelBuilder> {
    config: GanConfig,
    builder: B,
    metric: Box<dyn SampleMetric>,
    models: Option<ModelPair>,
    objective: Option<AdversarialObjective>,
    phase: TrainerPhase,
    seed: u64,
    rng: StdRng,
}

impl<B: ModelBuilder> GanTrainer<B> {
    pub fn new(config: GanConfig, builder: B) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        Self {
            config,
            builder,
            metric: Box::new(NearestNeighborDistance),
            models: None,
            objective: None,
            phase: TrainerPhase::Unbuilt,
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Replace the default nearest-neighbour metric
    #[must_use]
    pub fn with_metric(mut self, metric: impl SampleMetric + 'static) -> Self {
        self.metric = Box::new(metric);
        self
    }

    pub fn config(&self) -> &GanConfig {
        &self.config
    }

    pub fn phase(&self) -> TrainerPhase {
        self.phase
    }

    pub fn models(&self) -> Option<&ModelPair> {
        self.models.as_ref()
    }

    pub fn models_mut(&mut self) -> Option<&mut ModelPair> {
        self.models.as_mut()
    }

    /// Build both networks and bind the objective
    ///
    /// Fails with a configuration error on an unknown objective or when the
    /// builder's networks do not match the configured shapes.
    pub fn build(&mut self) -> Result<()> {
        validate_gan(&self.config)?;
        let kind: ObjectiveKind = self.config.objective.parse()?;

        let generator = self.builder.build_generator(&self.config, self.seed)?;
        let discriminator = self.builder.build_discriminator(&self.config, self.seed)?;
        let mut models = ModelPair::new(generator, discriminator);
        self.check_shapes(&mut models)?;

        info!(
            objective = %kind,
            generator_params = models.generator.num_parameters(),
            discriminator_params = models.discriminator.num_parameters(),
            "models built"
        );
        self.objective = Some(AdversarialObjective::build(kind, &self.config.optimizer));
        self.models = Some(models);
        self.phase = TrainerPhase::Built;
        Ok(())
    }

    /// Run one latent vector through both networks and check the shapes
    fn check_shapes(&self, models: &mut ModelPair) -> Result<()> {
        let sample = models.generate(&Array2::zeros((1, self.config.latent_dim)))?;
        if sample.shape()[1..] != self.config.input_shape[..] {
            return Err(Error::Config(format!(
                "generator produces samples of shape {:?}, expected {:?}",
                &sample.shape()[1..],
                self.config.input_shape
            )));
        }
        let scores = models
            .score(&sample)
            .map_err(|e| Error::Config(format!("discriminator rejects generated samples: {e}")))?;
        if scores.len() != 1 {
            return Err(Error::Config(format!("discriminator produces {} scores per sample", scores.len())));
        }
        Ok(())
    }

    /// Generate samples from a `[batch, latent_dim]` latent batch
    pub fn predict(&mut self, latent: &Array2<f32>) -> Result<ArrayD<f32>> {
        self.models.as_mut().ok_or_else(not_built)?.generate(latent)
    }

    /// Train for `config.epochs` epochs and return the checkpoint history
    ///
    /// Builds the networks first unless [`build`](Self::build) was called
    /// since the last run. With `save_best_model` the generator ends with the
    /// weights of the best checkpoint. The callback runs after every
    /// checkpoint and once more after the last epoch.
    pub fn train(
        &mut self,
        dataset: &ArrayD<f32>,
        config: &TrainConfig,
        mut callback: Option<&mut dyn CheckpointCallback>,
    ) -> Result<TrainingHistory> {
        validate_train(config)?;
        let split = DatasetSplit::partition(dataset, config.validation_split)?;
        if split.train.shape()[1..] != self.config.input_shape[..] {
            return Err(Error::Dataset(format!(
                "samples have shape {:?}, model expects {:?}",
                &split.train.shape()[1..],
                self.config.input_shape
            )));
        }
        if self.phase != TrainerPhase::Built {
            self.build()?;
        }
        self.phase = TrainerPhase::Training;
        info!(
            epochs = config.epochs,
            train = split.train_len(),
            validation = split.validation_len(),
            "training started"
        );

        let mut state = TrainerState::new(TrainingHistory::new(config.epochs, config.checkpoint_interval));
        for epoch in 0..config.epochs {
            state.epoch = epoch;
            let batches = self.train_step(&split.train, config.batch_size)?;
            self.read_losses(&mut state, &batches)?;

            if epoch % config.checkpoint_interval == 0 {
                self.checkpoint(&mut state, &split, config)?;
                if let Some(cb) = callback.as_deref_mut() {
                    cb.on_checkpoint(&checkpoint_context(&state, config.epochs, false));
                }
            }
        }

        self.finish(&mut state, config)?;
        if let Some(cb) = callback.as_deref_mut() {
            state.epoch = config.epochs;
            cb.on_checkpoint(&checkpoint_context(&state, config.epochs, true));
        }
        self.objective = None;
        self.phase = TrainerPhase::Done;
        Ok(state.history)
    }

    /// `n_critic` discriminator updates then one generator update
    fn train_step(&mut self, train: &ArrayD<f32>, batch_size: usize) -> Result<StepBatches> {
        let models = self.models.as_mut().ok_or_else(not_built)?;
        let objective = self.objective.as_mut().ok_or_else(not_built)?;

        let mut last_real = None;
        for _ in 0..self.config.n_critic {
            let real = sample_batch(&mut self.rng, train, batch_size)?;
            let latent = sample_latent(&mut self.rng, batch_size, self.config.latent_dim);
            objective.train_discriminator(models, &real, &latent)?;
            last_real = Some(real);
        }
        let real = last_real.ok_or_else(|| Error::Config("n_critic must be at least 1".to_string()))?;

        let latent = sample_latent(&mut self.rng, batch_size, self.config.latent_dim);
        objective.train_generator(models, &latent)?;
        Ok(StepBatches { real, latent })
    }

    fn read_losses(&mut self, state: &mut TrainerState, batches: &StepBatches) -> Result<()> {
        let models = self.models.as_mut().ok_or_else(not_built)?;
        let objective = self.objective.as_mut().ok_or_else(not_built)?;
        state.d_loss = objective.discriminator_loss(models, &batches.real, &batches.latent)?;
        state.g_loss = objective.generator_loss(models, &batches.latent)?;
        debug!(epoch = state.epoch, d_loss = state.d_loss, g_loss = state.g_loss, "epoch done");
        Ok(())
    }

    fn checkpoint(&mut self, state: &mut TrainerState, split: &DatasetSplit, config: &TrainConfig) -> Result<()> {
        if !config.collect_history {
            if config.verbose {
                info!(epoch = state.epoch, d_loss = state.d_loss, g_loss = state.g_loss, "checkpoint");
            }
            return Ok(());
        }

        let models = self.models.as_mut().ok_or_else(not_built)?;
        let scores = evaluate(
            &mut self.rng,
            &mut models.generator,
            self.metric.as_ref(),
            &split.train,
            METRIC_SAMPLES,
            self.config.latent_dim,
        )?;
        let metric = SeriesStats::of(scores.view());
        state.history.record(&[
            (self.metric.name(), metric),
            (D_LOSS, SeriesStats::scalar(state.d_loss)),
            (G_LOSS, SeriesStats::scalar(state.g_loss)),
        ])?;
        if config.verbose {
            info!(
                epoch = state.epoch,
                d_loss = state.d_loss,
                g_loss = state.g_loss,
                metric = metric.mean,
                "checkpoint"
            );
        }

        state.metric = Some(metric.mean);
        if state.improves(metric.mean) {
            state.keep_best(state.epoch, metric.mean, models.generator.weights());
        }
        Ok(())
    }

    fn finish(&mut self, state: &mut TrainerState, config: &TrainConfig) -> Result<()> {
        if !config.save_best_model {
            return Ok(());
        }
        let models = self.models.as_mut().ok_or_else(not_built)?;
        match &state.best {
            Some(best) => {
                models.generator.set_weights(&best.weights)?;
                info!(epoch = best.epoch, metric = best.metric, "restored best generator");
            }
            None => warn!("no checkpoint recorded a metric, keeping the last generator"),
        }
        Ok(())
    }
}

pub(crate) fn checkpoint_context(state: &TrainerState, epochs: usize, is_final: bool) -> CheckpointContext {
    CheckpointContext {
        epoch: state.epoch,
        epochs,
        hist_size: state.history.hist_size(),
        d_loss: state.d_loss,
        g_loss: state.g_loss,
        metric: state.metric,
        best_metric: state.history.best_metric(),
        stage: 0,
        is_final,
    }
}
