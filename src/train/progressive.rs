//! Progressive-growing GAN trainer

use super::base::{checkpoint_context, not_built, D_LOSS, G_LOSS};
use super::callback::{CheckpointCallback, CheckpointContext};
use super::history::{SeriesStats, TrainingHistory};
use super::state::{TrainerPhase, TrainerState};
use crate::config::validate::{validate_progressive, validate_progressive_train};
use crate::config::{ProgressiveConfig, ProgressiveTrainConfig};
use crate::data::{block_reduce, image_side, sample_batch, sample_latent, DatasetSplit, SampleStats};
use crate::error::{Error, Result};
use crate::metrics::{evaluate, NearestNeighborDistance, SampleMetric};
use crate::model::{
    ConvGrowingBuilder, GrowingModelBuilder, ModelPair, NetworkArtifact, TransplantTable, BASE_RESOLUTION, DISCRIMINATOR_FILE,
    GENERATOR_FILE,
};
use crate::objective::{sigmoid, AdversarialObjective, ObjectiveKind};
use ndarray::{Array1, Array2, ArrayD};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info, warn};

pub const FAKE_SCORE: &str = "fake_score";
pub const REAL_SCORE: &str = "real_score";
pub const VALIDATION_SCORE: &str = "validation_score";
pub const CONTROL_SCORE: &str = "control_score";

/// A metric slightly worse than the best still replaces it
const BEST_METRIC_SLACK: f32 = 0.98;

/// How the discriminator is trained each epoch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainingMode {
    /// Real batch against 1, generated batch against 0
    Vanilla,
    /// Adds a noise batch drawn from the dataset statistics against 0 and
    /// labels generated samples `1 - |1 - score|^0.5`
    Stable,
}

impl FromStr for TrainingMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "vanilla" => Ok(Self::Vanilla),
            "stable" => Ok(Self::Stable),
            other => Err(Error::Config(format!("Mode '{other}' is unknown"))),
        }
    }
}

impl fmt::Display for TrainingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Vanilla => "vanilla",
            Self::Stable => "stable",
        })
    }
}

/// Soft target for generated samples in stable mode
pub fn soft_target(score: f32) -> f32 {
    1.0 - (1.0 - score).abs().sqrt()
}

/// Growth stage, resolution and the weights carried into the next rebuild
#[derive(Debug, Clone, PartialEq)]
pub struct GrowthState {
    pub stages: usize,
    /// Always `4 * 2^stages`
    pub resolution: usize,
    pub generator_table: TransplantTable,
    pub discriminator_table: TransplantTable,
}

impl Default for GrowthState {
    fn default() -> Self {
        Self::at_stage(0)
    }
}

impl GrowthState {
    /// State of a network built directly at `stages`, with nothing to transplant
    pub fn at_stage(stages: usize) -> Self {
        Self {
            stages,
            resolution: BASE_RESOLUTION << stages,
            generator_table: TransplantTable::default(),
            discriminator_table: TransplantTable::default(),
        }
    }
}

/// Dataset reduced to the current resolution
struct StageData {
    split: DatasetSplit,
    stats: SampleStats,
}

impl StageData {
    fn prepare(dataset: &ArrayD<f32>, resolution: usize, validation_split: f32) -> Result<Self> {
        let reduced = block_reduce(dataset, resolution)?;
        let stats = SampleStats::of(&reduced)?;
        let split = DatasetSplit::partition(&reduced, validation_split)?;
        Ok(Self { split, stats })
    }
}

/// Trains convolutional networks that start at `4x4` and double their
/// resolution every `epochs_grow_rate` epochs until they reach the target
/// image size
///
/// Growth rebuilds both networks one block deeper; the heads and every
/// existing block keep their trained weights, the new block starts from the
/// builder's default initialisation.
pub struct ProgressiveTrainer<B: GrowingModelBuilder = ConvGrowingBuilder> {
    config: ProgressiveConfig,
    builder: B,
    metric: Box<dyn SampleMetric>,
    models: Option<ModelPair>,
    objective: Option<AdversarialObjective>,
    growth: GrowthState,
    phase: TrainerPhase,
    seed: u64,
    rng: StdRng,
}

impl<B: GrowingModelBuilder> ProgressiveTrainer<B> {
    pub fn new(config: ProgressiveConfig, builder: B) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        Self {
            config,
            builder,
            metric: Box::new(NearestNeighborDistance),
            models: None,
            objective: None,
            growth: GrowthState::default(),
            phase: TrainerPhase::Unbuilt,
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    #[must_use]
    pub fn with_metric(mut self, metric: impl SampleMetric + 'static) -> Self {
        self.metric = Box::new(metric);
        self
    }

    pub fn config(&self) -> &ProgressiveConfig {
        &self.config
    }

    pub fn phase(&self) -> TrainerPhase {
        self.phase
    }

    pub fn growth(&self) -> &GrowthState {
        &self.growth
    }

    pub fn models(&self) -> Option<&ModelPair> {
        self.models.as_ref()
    }

    fn target_resolution(&self) -> usize {
        self.config.image_shape[0]
    }

    fn bind_objective(&self) -> AdversarialObjective {
        AdversarialObjective::build(ObjectiveKind::MinMax, &self.config.optimizer)
    }

    fn assemble(&self, growth: &GrowthState) -> Result<ModelPair> {
        let generator =
            self.builder.build_generator(&self.config, growth.stages, &growth.generator_table, self.seed)?;
        let discriminator =
            self.builder.build_discriminator(&self.config, growth.stages, &growth.discriminator_table, self.seed)?;
        Ok(ModelPair::new(generator, discriminator))
    }

    /// Build the networks, reloading them from `model_dir` when both
    /// artifacts are present there
    pub fn build(&mut self) -> Result<()> {
        validate_progressive(&self.config)?;
        let loaded = match &self.config.model_dir {
            Some(dir) => self.load(dir)?,
            None => None,
        };
        let (growth, models) = match loaded {
            Some(loaded) => loaded,
            None => {
                let growth = GrowthState::default();
                let models = self.assemble(&growth)?;
                (growth, models)
            }
        };
        info!(
            stage = growth.stages,
            resolution = growth.resolution,
            generator_params = models.generator.num_parameters(),
            discriminator_params = models.discriminator.num_parameters(),
            "models built"
        );
        self.objective = Some(self.bind_objective());
        self.models = Some(models);
        self.growth = growth;
        self.phase = TrainerPhase::Built;
        Ok(())
    }

    fn load(&self, dir: &Path) -> Result<Option<(GrowthState, ModelPair)>> {
        let generator_path = dir.join(GENERATOR_FILE);
        let discriminator_path = dir.join(DISCRIMINATOR_FILE);
        if !(generator_path.is_file() && discriminator_path.is_file()) {
            return Ok(None);
        }
        let generator = NetworkArtifact::load(&generator_path)?;
        let discriminator = NetworkArtifact::load(&discriminator_path)?;
        if generator.stage != discriminator.stage {
            return Err(Error::Config(format!(
                "saved generator is at stage {}, discriminator at stage {}",
                generator.stage, discriminator.stage
            )));
        }
        let growth = GrowthState::at_stage(generator.stage);
        if growth.resolution > self.target_resolution() {
            return Err(Error::Config(format!(
                "saved networks work at {0}x{0}, beyond the target {1}x{1}",
                growth.resolution,
                self.target_resolution()
            )));
        }
        let mut models = self.assemble(&growth)?;
        generator.apply(&mut models.generator)?;
        discriminator.apply(&mut models.discriminator)?;
        info!(dir = %dir.display(), stage = growth.stages, "models loaded");
        Ok(Some((growth, models)))
    }

    /// Write `generator.json` and `discriminator.json` into `dir`
    pub fn save(&self, dir: &Path) -> Result<()> {
        let models = self.models.as_ref().ok_or_else(not_built)?;
        NetworkArtifact::capture(&models.generator, self.growth.stages).save(&dir.join(GENERATOR_FILE))?;
        NetworkArtifact::capture(&models.discriminator, self.growth.stages).save(&dir.join(DISCRIMINATOR_FILE))?;
        info!(dir = %dir.display(), stage = self.growth.stages, "models saved");
        Ok(())
    }

    /// Grow both networks by one block unless the target resolution is
    /// reached; returns whether a growth event happened
    ///
    /// Optimizer state starts over, since the parameter layout changed.
    pub fn grow(&mut self) -> Result<bool> {
        if self.growth.resolution >= self.target_resolution() {
            return Ok(false);
        }
        let models = self.models.as_ref().ok_or_else(not_built)?;
        let stages = self.growth.stages;

        let mut generator_table = TransplantTable::capture(
            &models.generator,
            &self.builder.generator_head(),
            |i| self.builder.generator_body(i),
            stages,
        );
        let mut discriminator_table = TransplantTable::capture(
            &models.discriminator,
            &self.builder.discriminator_head(),
            |i| self.builder.discriminator_body(i),
            stages,
        );
        generator_table.push_empty();
        discriminator_table.push_empty();

        let next = GrowthState {
            stages: stages + 1,
            resolution: self.growth.resolution * 2,
            generator_table,
            discriminator_table,
        };
        let models = self.assemble(&next)?;
        self.models = Some(models);
        self.objective = Some(self.bind_objective());
        info!(stage = next.stages, resolution = next.resolution, "networks grown");
        self.growth = next;
        Ok(true)
    }

    /// Generate images at the current resolution
    pub fn predict(&mut self, latent: &Array2<f32>) -> Result<ArrayD<f32>> {
        self.models.as_mut().ok_or_else(not_built)?.generate(latent)
    }

    /// Train for `config.train.epochs` epochs and return the checkpoint history
    ///
    /// `dataset` holds NHWC images at the target resolution; each stage
    /// trains on its block-mean reduction. The mode string is checked before
    /// anything else, so an unknown mode fails without touching the networks.
    pub fn train(
        &mut self,
        dataset: &ArrayD<f32>,
        config: &ProgressiveTrainConfig,
        mut callback: Option<&mut dyn CheckpointCallback>,
    ) -> Result<TrainingHistory> {
        let mode: TrainingMode = config.mode.parse()?;
        validate_progressive_train(config)?;
        image_side(dataset)?;
        if dataset.shape()[1..] != self.config.image_shape[..] {
            return Err(Error::Dataset(format!(
                "images have shape {:?}, model expects {:?}",
                &dataset.shape()[1..],
                self.config.image_shape
            )));
        }
        if self.models.is_none() {
            self.build()?;
        } else if self.objective.is_none() {
            self.objective = Some(self.bind_objective());
        }
        self.phase = TrainerPhase::Training;

        let train = &config.train;
        let mut data = StageData::prepare(dataset, self.growth.resolution, train.validation_split)?;
        let history = TrainingHistory::new(train.epochs, train.checkpoint_interval).with_series(&[
            FAKE_SCORE,
            REAL_SCORE,
            VALIDATION_SCORE,
            CONTROL_SCORE,
            self.metric.name(),
        ]);
        let mut state = TrainerState::new(history);
        info!(epochs = train.epochs, %mode, resolution = self.growth.resolution, "training started");

        for epoch in 0..train.epochs {
            state.epoch = epoch;

            if epoch % config.epochs_grow_rate == config.epochs_grow_rate - 1 && self.grow()? {
                // snapshots of the smaller generator no longer fit
                state.reset_best();
                data = StageData::prepare(dataset, self.growth.resolution, train.validation_split)?;
            }

            let batches = self.train_step(mode, &data, train.batch_size)?;
            state.d_loss = batches.d_loss;
            state.g_loss = batches.g_loss;
            debug!(epoch, d_loss = state.d_loss, g_loss = state.g_loss, "epoch done");

            if epoch % train.checkpoint_interval == 0 {
                self.checkpoint(&mut state, &data, &batches, config)?;
                if let Some(cb) = callback.as_deref_mut() {
                    cb.on_checkpoint(&self.context(&state, train.epochs, false));
                }
            }
        }

        if train.save_best_model {
            let models = self.models.as_mut().ok_or_else(not_built)?;
            match &state.best {
                Some(best) => {
                    models.generator.set_weights(&best.weights)?;
                    info!(epoch = best.epoch, metric = best.metric, "restored best generator");
                }
                None => warn!("no best generator at the current stage, keeping the last one"),
            }
        }
        if let Some(cb) = callback.as_deref_mut() {
            state.epoch = train.epochs;
            cb.on_checkpoint(&self.context(&state, train.epochs, true));
        }
        self.objective = None;
        self.phase = TrainerPhase::Done;
        Ok(state.history)
    }

    fn context(&self, state: &TrainerState, epochs: usize, is_final: bool) -> CheckpointContext {
        CheckpointContext { stage: self.growth.stages, ..checkpoint_context(state, epochs, is_final) }
    }

    fn train_step(&mut self, mode: TrainingMode, data: &StageData, batch_size: usize) -> Result<EpochBatches> {
        let models = self.models.as_mut().ok_or_else(not_built)?;
        let objective = self.objective.as_mut().ok_or_else(not_built)?;
        let latent_dim = self.config.latent_dim;

        let real = sample_batch(&mut self.rng, &data.split.train, batch_size)?;
        let latent = sample_latent(&mut self.rng, batch_size, latent_dim);
        let fake = models.generate(&latent)?;
        let ones = Array1::ones(batch_size);
        let zeros = Array1::zeros(batch_size);

        let d_loss = match mode {
            TrainingMode::Vanilla => {
                let real_loss = objective.train_discriminator_labeled(&mut models.discriminator, &real, ones.view())?;
                let fake_loss = objective.train_discriminator_labeled(&mut models.discriminator, &fake, zeros.view())?;
                (real_loss + fake_loss) / 2.0
            }
            TrainingMode::Stable => {
                let noise = data.stats.sample_noise(&mut self.rng, batch_size);
                let crit = models.score(&fake)?.mapv(|logit| soft_target(sigmoid(logit)));
                let real_loss = objective.train_discriminator_labeled(&mut models.discriminator, &real, ones.view())?;
                let fake_loss = objective.train_discriminator_labeled(&mut models.discriminator, &fake, crit.view())?;
                let noise_loss =
                    objective.train_discriminator_labeled(&mut models.discriminator, &noise, zeros.view())?;
                (real_loss + fake_loss + noise_loss) / 3.0
            }
        };
        let g_loss = objective.train_generator_labeled(models, &latent, 1.0)?;
        Ok(EpochBatches { real, fake, d_loss, g_loss })
    }

    fn checkpoint(
        &mut self,
        state: &mut TrainerState,
        data: &StageData,
        batches: &EpochBatches,
        config: &ProgressiveTrainConfig,
    ) -> Result<()> {
        let train = &config.train;
        if !train.collect_history {
            if train.verbose {
                info!(epoch = state.epoch, d_loss = state.d_loss, g_loss = state.g_loss, "checkpoint");
            }
            return Ok(());
        }
        let models = self.models.as_mut().ok_or_else(not_built)?;
        let batch_size = train.batch_size;
        let probability = |models: &mut ModelPair, samples: &ArrayD<f32>| -> Result<Array1<f32>> {
            Ok(models.score(samples)?.mapv(sigmoid))
        };

        let fake_scores = probability(models, &batches.fake)?;
        let real_scores = probability(models, &batches.real)?;
        let validation_scores = match &data.split.validation {
            Some(validation) => {
                let batch = sample_batch(&mut self.rng, validation, batch_size)?;
                probability(models, &batch)?
            }
            None => Array1::zeros(batch_size),
        };
        let noise = data.stats.sample_noise(&mut self.rng, batch_size);
        let control_scores = probability(models, &noise)?;
        let scores = evaluate(
            &mut self.rng,
            &mut models.generator,
            self.metric.as_ref(),
            &data.split.train,
            self.config.metric_samples,
            self.config.latent_dim,
        )?;

        let metric = SeriesStats::of(scores.view());
        let real = SeriesStats::of(real_scores.view());
        let validation = SeriesStats::of(validation_scores.view());
        state.history.record(&[
            (FAKE_SCORE, SeriesStats::of(fake_scores.view())),
            (REAL_SCORE, real),
            (VALIDATION_SCORE, validation),
            (CONTROL_SCORE, SeriesStats::of(control_scores.view())),
            (self.metric.name(), metric),
            (D_LOSS, SeriesStats::scalar(state.d_loss)),
            (G_LOSS, SeriesStats::scalar(state.g_loss)),
        ])?;
        if train.verbose {
            info!(
                epoch = state.epoch,
                d_loss = state.d_loss,
                g_loss = state.g_loss,
                real = real.mean,
                validation = validation.mean,
                metric = metric.mean,
                "checkpoint"
            );
        }

        state.metric = Some(metric.mean);
        if state.improves_scaled(metric.mean, BEST_METRIC_SLACK) {
            state.keep_best(state.epoch, metric.mean, models.generator.weights());
        }
        Ok(())
    }
}

/// Batches of one progressive epoch, kept for checkpoint scoring
struct EpochBatches {
    real: ArrayD<f32>,
    fake: ArrayD<f32>,
    d_loss: f32,
    g_loss: f32,
}

#[cfg(test)]
mod tests;
